//! User accounts: login, registration and password hashing.

pub mod account;
pub mod crypto;
#[cfg(feature = "database")]
#[cfg_attr(docsrs, doc(cfg(feature = "database")))]
pub mod postgres;
pub mod service;
pub mod store;

pub use account::{AccountFieldError, EmailAddress, FullName, StoredAccount, UserAccount, Username};
pub use crypto::{PasswordCrypto, PasswordCryptoError};
#[cfg(feature = "database")]
pub use postgres::PostgresAccountStore;
pub use service::{CredentialError, CredentialService, LoginAttempt, RegistrationRequest};
pub use store::{AccountStore, AccountStoreError, InMemoryAccountStore};
