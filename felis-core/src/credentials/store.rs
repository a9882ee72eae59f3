use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::Mutex;

use super::account::{NewAccount, StoredAccount, UserAccount};

/// Errors that can occur during account store operations
#[derive(Debug, Clone, thiserror::Error)]
pub enum AccountStoreError {
    #[error("Username already exists")]
    UsernameTaken,

    #[error("Email already exists")]
    EmailTaken,

    #[error("Account store error: {0}")]
    Backend(String),
}

/// Persistence port for user accounts.
///
/// Implementations must enforce username and email uniqueness themselves and
/// report a losing insert as [`AccountStoreError::UsernameTaken`] or
/// [`AccountStoreError::EmailTaken`]. The existence checks are only a fast
/// path; `create_account` is the authority.
#[async_trait]
pub trait AccountStore: Send + Sync {
    /// Insert a new account, assigning its id and creation time.
    async fn create_account(&self, account: NewAccount) -> Result<UserAccount, AccountStoreError>;

    /// Exact, case-sensitive username lookup
    async fn find_by_username(
        &self,
        username: &str,
    ) -> Result<Option<StoredAccount>, AccountStoreError>;

    async fn username_exists(&self, username: &str) -> Result<bool, AccountStoreError>;

    async fn email_exists(&self, email: &str) -> Result<bool, AccountStoreError>;
}

#[derive(Debug, Default)]
struct Accounts {
    rows: Vec<StoredAccount>,
    last_id: i64,
}

/// Process-local store. Uniqueness check and insert happen under one lock,
/// so concurrent registrations serialize the same way a unique index would.
#[derive(Debug, Default)]
pub struct InMemoryAccountStore {
    accounts: Mutex<Accounts>,
}

impl InMemoryAccountStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.accounts.lock().await.rows.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[async_trait]
impl AccountStore for InMemoryAccountStore {
    async fn create_account(&self, account: NewAccount) -> Result<UserAccount, AccountStoreError> {
        let mut accounts = self.accounts.lock().await;

        if accounts
            .rows
            .iter()
            .any(|row| row.account.username == account.username.as_str())
        {
            return Err(AccountStoreError::UsernameTaken);
        }
        if accounts
            .rows
            .iter()
            .any(|row| row.account.email == account.email.as_str())
        {
            return Err(AccountStoreError::EmailTaken);
        }

        accounts.last_id += 1;
        let created = UserAccount {
            id: accounts.last_id,
            username: account.username.into(),
            email: account.email.into(),
            full_name: account.full_name.into(),
            created_at: Utc::now(),
        };

        accounts.rows.push(StoredAccount {
            account: created.clone(),
            password_hash: account.password_hash,
        });

        Ok(created)
    }

    async fn find_by_username(
        &self,
        username: &str,
    ) -> Result<Option<StoredAccount>, AccountStoreError> {
        let accounts = self.accounts.lock().await;
        Ok(accounts
            .rows
            .iter()
            .find(|row| row.account.username == username)
            .cloned())
    }

    async fn username_exists(&self, username: &str) -> Result<bool, AccountStoreError> {
        let accounts = self.accounts.lock().await;
        Ok(accounts
            .rows
            .iter()
            .any(|row| row.account.username == username))
    }

    async fn email_exists(&self, email: &str) -> Result<bool, AccountStoreError> {
        let accounts = self.accounts.lock().await;
        Ok(accounts.rows.iter().any(|row| row.account.email == email))
    }
}
