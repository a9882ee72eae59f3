use std::{fmt, sync::Arc};

use felis_core::{
    CatalogService, CredentialService, catalog::CatalogSource, credentials::AccountStore,
};

use crate::infra::config::Config;

pub type Catalog = CatalogService<dyn CatalogSource>;
pub type Credentials = CredentialService<dyn AccountStore>;

#[derive(Clone)]
pub struct AppState {
    pub catalog: Arc<Catalog>,
    pub credentials: Arc<Credentials>,
    pub config: Arc<Config>,
}

impl fmt::Debug for AppState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppState").finish_non_exhaustive()
    }
}

impl AppState {
    pub fn new(catalog: Catalog, credentials: Credentials, config: Config) -> Self {
        Self {
            catalog: Arc::new(catalog),
            credentials: Arc::new(credentials),
            config: Arc::new(config),
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }
}
