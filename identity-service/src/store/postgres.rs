use anyhow::anyhow;
use async_trait::async_trait;
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use super::{Account, AccountStore, NewAccount, StoreError};

/// Postgres-backed account store. Uniqueness is enforced by the UNIQUE
/// constraints on `accounts.username` and `accounts.nickname` (see
/// `migrations/`), so two racing inserts resolve in the database, not here.
pub struct PgAccountStore {
    pool: PgPool,
}

impl PgAccountStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(FromRow)]
struct AccountRow {
    id: Uuid,
    username: String,
    nickname: String,
    password_hash: String,
    is_admin: bool,
}

impl From<AccountRow> for Account {
    fn from(row: AccountRow) -> Self {
        Self {
            id: row.id,
            username: row.username,
            nickname: row.nickname,
            password_hash: row.password_hash,
            is_admin: row.is_admin,
        }
    }
}

const UNIQUE_VIOLATION: &str = "23505";

fn map_insert_error(err: sqlx::Error) -> StoreError {
    if let sqlx::Error::Database(db_err) = &err {
        if db_err.code().as_deref() == Some(UNIQUE_VIOLATION) {
            return StoreError::Duplicate;
        }
    }
    StoreError::Backend(anyhow!(err))
}

#[async_trait]
impl AccountStore for PgAccountStore {
    async fn find_by_username(&self, username: &str) -> Result<Option<Account>, StoreError> {
        let row = sqlx::query_as::<_, AccountRow>(
            "SELECT id, username, nickname, password_hash, is_admin
             FROM accounts WHERE username = $1",
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await
        .map_err(|err| StoreError::Backend(anyhow!(err)))?;

        Ok(row.map(Account::from))
    }

    async fn insert(&self, account: NewAccount) -> Result<Account, StoreError> {
        let row = sqlx::query_as::<_, AccountRow>(
            "INSERT INTO accounts (id, username, nickname, password_hash)
             VALUES ($1, $2, $3, $4)
             RETURNING id, username, nickname, password_hash, is_admin",
        )
        .bind(Uuid::new_v4())
        .bind(&account.username)
        .bind(&account.nickname)
        .bind(&account.password_hash)
        .fetch_one(&self.pool)
        .await
        .map_err(map_insert_error)?;

        Ok(row.into())
    }

    async fn get_by_id(&self, id: Uuid) -> Result<Option<Account>, StoreError> {
        let row = sqlx::query_as::<_, AccountRow>(
            "SELECT id, username, nickname, password_hash, is_admin
             FROM accounts WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|err| StoreError::Backend(anyhow!(err)))?;

        Ok(row.map(Account::from))
    }

    async fn set_admin(&self, id: Uuid) -> Result<Option<Account>, StoreError> {
        let row = sqlx::query_as::<_, AccountRow>(
            "UPDATE accounts SET is_admin = TRUE WHERE id = $1
             RETURNING id, username, nickname, password_hash, is_admin",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|err| StoreError::Backend(anyhow!(err)))?;

        Ok(row.map(Account::from))
    }
}
