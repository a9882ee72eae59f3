use std::{any::type_name_of_val, fmt, sync::Arc};

use thiserror::Error;
use tracing::{info, warn};
use zeroize::Zeroizing;

use super::{
    account::{AccountFieldError, EmailAddress, FullName, NewAccount, UserAccount, Username},
    crypto::{PasswordCrypto, PasswordCryptoError},
    store::{AccountStore, AccountStoreError},
};
use crate::error::ErrorKind;

const MAX_PASSWORD_CHARS: usize = 128;

#[derive(Debug, Error)]
pub enum CredentialError {
    #[error("{0}")]
    InvalidInput(String),

    /// Same message for unknown usernames and wrong passwords.
    #[error("invalid username or password")]
    InvalidCredentials,

    #[error("{0}")]
    AlreadyExists(String),

    #[error("account store failed")]
    Store(#[source] AccountStoreError),

    #[error("password hashing failed")]
    Crypto(#[from] PasswordCryptoError),
}

impl CredentialError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            CredentialError::InvalidInput(_) => ErrorKind::InvalidInput,
            CredentialError::InvalidCredentials => ErrorKind::InvalidCredentials,
            CredentialError::AlreadyExists(_) => ErrorKind::AlreadyExists,
            CredentialError::Store(_) | CredentialError::Crypto(_) => ErrorKind::Internal,
        }
    }

    fn username_taken(username: &str) -> Self {
        CredentialError::AlreadyExists(format!("username already exists: {username}"))
    }

    fn email_taken(email: &str) -> Self {
        CredentialError::AlreadyExists(format!("email already exists: {email}"))
    }
}

impl From<AccountFieldError> for CredentialError {
    fn from(err: AccountFieldError) -> Self {
        CredentialError::InvalidInput(err.to_string())
    }
}

impl From<AccountStoreError> for CredentialError {
    fn from(err: AccountStoreError) -> Self {
        CredentialError::Store(err)
    }
}

/// Username and plaintext password, wiped from memory on drop.
pub struct LoginAttempt {
    pub username: String,
    password: Zeroizing<String>,
}

impl LoginAttempt {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: Zeroizing::new(password.into()),
        }
    }
}

impl fmt::Debug for LoginAttempt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginAttempt")
            .field("username", &self.username)
            .finish_non_exhaustive()
    }
}

/// Unvalidated registration input. The plaintext password is wiped when the
/// request is dropped, which [`CredentialService::register`] does right
/// after hashing.
pub struct RegistrationRequest {
    pub username: String,
    pub email: String,
    pub full_name: String,
    password: Zeroizing<String>,
}

impl RegistrationRequest {
    pub fn new(
        username: impl Into<String>,
        email: impl Into<String>,
        full_name: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            username: username.into(),
            email: email.into(),
            full_name: full_name.into(),
            password: Zeroizing::new(password.into()),
        }
    }
}

impl fmt::Debug for RegistrationRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegistrationRequest")
            .field("username", &self.username)
            .field("email", &self.email)
            .field("full_name", &self.full_name)
            .finish_non_exhaustive()
    }
}

/// Login and registration against an [`AccountStore`].
pub struct CredentialService<R>
where
    R: AccountStore + ?Sized,
{
    store: Arc<R>,
    crypto: Arc<PasswordCrypto>,
}

impl<R> Clone for CredentialService<R>
where
    R: AccountStore + ?Sized,
{
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            crypto: Arc::clone(&self.crypto),
        }
    }
}

impl<R> fmt::Debug for CredentialService<R>
where
    R: AccountStore + ?Sized,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CredentialService")
            .field("store", &type_name_of_val(self.store.as_ref()))
            .finish_non_exhaustive()
    }
}

impl<R> CredentialService<R>
where
    R: AccountStore + ?Sized,
{
    pub fn new(store: Arc<R>, crypto: Arc<PasswordCrypto>) -> Self {
        Self { store, crypto }
    }

    pub async fn login(&self, attempt: LoginAttempt) -> Result<UserAccount, CredentialError> {
        let LoginAttempt { username, password } = attempt;

        if username.trim().is_empty() || password.is_empty() {
            return Err(CredentialError::InvalidInput(
                "username and password are required".into(),
            ));
        }

        let Some(stored) = self.store.find_by_username(&username).await? else {
            warn!(%username, "login failed: unknown user");
            return Err(CredentialError::InvalidCredentials);
        };

        if !self.crypto.verify_password(&password, &stored.password_hash)? {
            warn!(%username, "login failed: password mismatch");
            return Err(CredentialError::InvalidCredentials);
        }

        info!(%username, user_id = stored.account.id, "user logged in");
        Ok(stored.account)
    }

    /// Username is checked before email, so when both collide the username
    /// error is the one reported.
    pub async fn register(
        &self,
        request: RegistrationRequest,
    ) -> Result<UserAccount, CredentialError> {
        let RegistrationRequest {
            username,
            email,
            full_name,
            password,
        } = request;

        let username = Username::new(username)?;
        let email = EmailAddress::new(email)?;
        let full_name = FullName::new(full_name)?;
        validate_password(&password)?;

        if self.store.username_exists(username.as_str()).await? {
            warn!(%username, "registration failed: username taken");
            return Err(CredentialError::username_taken(username.as_str()));
        }
        if self.store.email_exists(email.as_str()).await? {
            warn!(%username, "registration failed: email taken");
            return Err(CredentialError::email_taken(email.as_str()));
        }

        let password_hash = self.crypto.hash_password(&password)?;
        drop(password);

        let taken_username = username.to_string();
        let taken_email = email.to_string();

        // The store is the authority on uniqueness; a concurrent registration
        // that won the race shows up here as a constraint violation.
        let account = self
            .store
            .create_account(NewAccount {
                username,
                email,
                full_name,
                password_hash,
            })
            .await
            .map_err(|err| match err {
                AccountStoreError::UsernameTaken => CredentialError::username_taken(&taken_username),
                AccountStoreError::EmailTaken => CredentialError::email_taken(&taken_email),
                other => CredentialError::Store(other),
            })?;

        info!(username = %account.username, user_id = account.id, "user registered");
        Ok(account)
    }
}

fn validate_password(password: &str) -> Result<(), CredentialError> {
    if password.is_empty() {
        return Err(CredentialError::InvalidInput(
            "password must not be empty".into(),
        ));
    }
    if password.chars().count() > MAX_PASSWORD_CHARS {
        return Err(CredentialError::InvalidInput(format!(
            "password cannot exceed {MAX_PASSWORD_CHARS} characters"
        )));
    }
    Ok(())
}
