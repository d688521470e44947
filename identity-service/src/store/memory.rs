use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use uuid::Uuid;

use super::{Account, AccountStore, NewAccount, StoreError};

/// In-memory account store with the same uniqueness semantics as the
/// Postgres implementation: the check-and-insert happens under one lock,
/// so concurrent duplicate signups still resolve to exactly one winner.
/// Used by tests; no persistence.
#[derive(Default)]
pub struct MemoryAccountStore {
    accounts: Mutex<HashMap<Uuid, Account>>,
}

impl MemoryAccountStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.accounts.lock().expect("store lock poisoned").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl AccountStore for MemoryAccountStore {
    async fn find_by_username(&self, username: &str) -> Result<Option<Account>, StoreError> {
        let accounts = self.accounts.lock().expect("store lock poisoned");
        Ok(accounts
            .values()
            .find(|account| account.username == username)
            .cloned())
    }

    async fn insert(&self, account: NewAccount) -> Result<Account, StoreError> {
        let mut accounts = self.accounts.lock().expect("store lock poisoned");

        let taken = accounts.values().any(|existing| {
            existing.username == account.username || existing.nickname == account.nickname
        });
        if taken {
            return Err(StoreError::Duplicate);
        }

        let created = Account {
            id: Uuid::new_v4(),
            username: account.username,
            nickname: account.nickname,
            password_hash: account.password_hash,
            is_admin: false,
        };
        accounts.insert(created.id, created.clone());
        Ok(created)
    }

    async fn get_by_id(&self, id: Uuid) -> Result<Option<Account>, StoreError> {
        let accounts = self.accounts.lock().expect("store lock poisoned");
        Ok(accounts.get(&id).cloned())
    }

    async fn set_admin(&self, id: Uuid) -> Result<Option<Account>, StoreError> {
        let mut accounts = self.accounts.lock().expect("store lock poisoned");
        match accounts.get_mut(&id) {
            Some(account) => {
                account.is_admin = true;
                Ok(Some(account.clone()))
            }
            None => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;

    fn new_account(username: &str, nickname: &str) -> NewAccount {
        NewAccount {
            username: username.to_string(),
            nickname: nickname.to_string(),
            password_hash: "hash".to_string(),
        }
    }

    #[tokio::test]
    async fn insert_rejects_duplicate_username() {
        let store = MemoryAccountStore::new();
        store
            .insert(new_account("alice", "al"))
            .await
            .expect("first insert");

        let err = store
            .insert(new_account("alice", "completely-different"))
            .await
            .expect_err("duplicate username should fail");
        assert!(matches!(err, StoreError::Duplicate));
        assert_eq!(store.len(), 1);
    }

    #[tokio::test]
    async fn insert_rejects_duplicate_nickname() {
        let store = MemoryAccountStore::new();
        store
            .insert(new_account("alice", "al"))
            .await
            .expect("first insert");

        let err = store
            .insert(new_account("bob", "al"))
            .await
            .expect_err("duplicate nickname should fail");
        assert!(matches!(err, StoreError::Duplicate));
        assert_eq!(store.len(), 1);
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn concurrent_inserts_have_exactly_one_winner() {
        let store = Arc::new(MemoryAccountStore::new());

        let first = {
            let store = store.clone();
            tokio::spawn(async move { store.insert(new_account("race", "nick-a")).await })
        };
        let second = {
            let store = store.clone();
            tokio::spawn(async move { store.insert(new_account("race", "nick-b")).await })
        };

        let outcomes = [
            first.await.expect("task"),
            second.await.expect("task"),
        ];
        let winners = outcomes.iter().filter(|result| result.is_ok()).count();
        let losers = outcomes
            .iter()
            .filter(|result| matches!(result, Err(StoreError::Duplicate)))
            .count();

        assert_eq!(winners, 1);
        assert_eq!(losers, 1);
        assert_eq!(store.len(), 1);
    }

    #[tokio::test]
    async fn set_admin_is_idempotent_and_reports_missing_rows() {
        let store = MemoryAccountStore::new();
        let created = store
            .insert(new_account("alice", "al"))
            .await
            .expect("insert");
        assert!(!created.is_admin);

        let updated = store
            .set_admin(created.id)
            .await
            .expect("set_admin")
            .expect("account exists");
        assert!(updated.is_admin);

        let again = store
            .set_admin(created.id)
            .await
            .expect("set_admin")
            .expect("account exists");
        assert!(again.is_admin);

        let missing = store.set_admin(Uuid::new_v4()).await.expect("set_admin");
        assert!(missing.is_none());
    }
}
