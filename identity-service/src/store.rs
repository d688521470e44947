use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

pub mod memory;
pub mod postgres;

pub use memory::MemoryAccountStore;
pub use postgres::PgAccountStore;

/// A stored account. `password_hash` never leaves the service boundary;
/// handlers project accounts into response shapes explicitly.
#[derive(Debug, Clone)]
pub struct Account {
    pub id: Uuid,
    pub username: String,
    pub nickname: String,
    pub password_hash: String,
    pub is_admin: bool,
}

#[derive(Debug, Clone)]
pub struct NewAccount {
    pub username: String,
    pub nickname: String,
    pub password_hash: String,
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("an account with the same username or nickname already exists")]
    Duplicate,
    #[error(transparent)]
    Backend(#[from] anyhow::Error),
}

/// Persistence contract for accounts.
///
/// `insert` is the authoritative duplicate guard: implementations must
/// enforce username and nickname uniqueness atomically with respect to
/// concurrent writers, regardless of any existence check a caller ran
/// beforehand. The service layer never serializes signups itself.
#[async_trait]
pub trait AccountStore: Send + Sync {
    async fn find_by_username(&self, username: &str) -> Result<Option<Account>, StoreError>;

    /// Creates an account, failing with `StoreError::Duplicate` when the
    /// username or nickname is already taken.
    async fn insert(&self, account: NewAccount) -> Result<Account, StoreError>;

    async fn get_by_id(&self, id: Uuid) -> Result<Option<Account>, StoreError>;

    /// Marks the account as admin. Idempotent; returns `None` when no
    /// account has the given id.
    async fn set_admin(&self, id: Uuid) -> Result<Option<Account>, StoreError>;
}
