//! HTTP request handlers organized by functionality

pub mod catalog;
pub mod health;
pub mod users;

pub use catalog::{
    get_breed_handler, images_by_breed_handler, list_breeds_handler, search_breeds_handler,
};
pub use health::{health_handler, ping_handler};
pub use users::{
    login_json_handler, login_query_handler, register_json_handler, register_query_handler,
};
