use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use tracing::info;

use super::{
    account::{NewAccount, StoredAccount, UserAccount},
    store::{AccountStore, AccountStoreError},
};

const USERNAME_CONSTRAINT: &str = "users_username_key";
const EMAIL_CONSTRAINT: &str = "users_email_key";

#[derive(sqlx::FromRow)]
struct AccountRow {
    id: i64,
    username: String,
    email: String,
    full_name: String,
    created_at: DateTime<Utc>,
}

impl From<AccountRow> for UserAccount {
    fn from(row: AccountRow) -> Self {
        UserAccount {
            id: row.id,
            username: row.username,
            email: row.email,
            full_name: row.full_name,
            created_at: row.created_at,
        }
    }
}

#[derive(sqlx::FromRow)]
struct CredentialRow {
    #[sqlx(flatten)]
    account: AccountRow,
    password_hash: String,
}

/// PostgreSQL-backed implementation of the [`AccountStore`] port.
///
/// Uniqueness is enforced by the `users_username_key` and `users_email_key`
/// constraints; a violation on insert is reported as a conflict, not a
/// backend failure.
#[derive(Clone, Debug)]
pub struct PostgresAccountStore {
    pool: PgPool,
}

impl PostgresAccountStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    fn pool(&self) -> &PgPool {
        &self.pool
    }
}

fn map_insert_error(err: sqlx::Error) -> AccountStoreError {
    if let Some(db_err) = err.as_database_error() {
        match db_err.constraint() {
            Some(USERNAME_CONSTRAINT) => return AccountStoreError::UsernameTaken,
            Some(EMAIL_CONSTRAINT) => return AccountStoreError::EmailTaken,
            _ => {}
        }
    }
    AccountStoreError::Backend(format!("Failed to create account: {err}"))
}

#[async_trait]
impl AccountStore for PostgresAccountStore {
    async fn create_account(&self, account: NewAccount) -> Result<UserAccount, AccountStoreError> {
        let row = sqlx::query_as::<_, AccountRow>(
            r#"
            INSERT INTO users (username, email, full_name, password_hash)
            VALUES ($1, $2, $3, $4)
            RETURNING id, username, email, full_name, created_at
            "#,
        )
        .bind(account.username.as_str())
        .bind(account.email.as_str())
        .bind(account.full_name.as_str())
        .bind(&account.password_hash)
        .fetch_one(self.pool())
        .await
        .map_err(map_insert_error)?;

        info!("Created account: {} ({})", row.username, row.id);
        Ok(row.into())
    }

    async fn find_by_username(
        &self,
        username: &str,
    ) -> Result<Option<StoredAccount>, AccountStoreError> {
        let row = sqlx::query_as::<_, CredentialRow>(
            r#"
            SELECT id, username, email, full_name, created_at, password_hash
            FROM users
            WHERE username = $1
            "#,
        )
        .bind(username)
        .fetch_optional(self.pool())
        .await
        .map_err(|e| {
            AccountStoreError::Backend(format!("Failed to get account by username: {e}"))
        })?;

        Ok(row.map(|r| StoredAccount {
            account: r.account.into(),
            password_hash: r.password_hash,
        }))
    }

    async fn username_exists(&self, username: &str) -> Result<bool, AccountStoreError> {
        sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM users WHERE username = $1)")
            .bind(username)
            .fetch_one(self.pool())
            .await
            .map_err(|e| AccountStoreError::Backend(format!("Failed to check username: {e}")))
    }

    async fn email_exists(&self, email: &str) -> Result<bool, AccountStoreError> {
        sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM users WHERE email = $1)")
            .bind(email)
            .fetch_one(self.pool())
            .await
            .map_err(|e| AccountStoreError::Backend(format!("Failed to check email: {e}")))
    }
}
