//! In-memory doubles for the repository and cache seams, used by the service
//! tests.
//!
//! A `MemoryStore` transaction holds the whole state exclusively and works on
//! a copy of it. `commit` publishes the copy; dropping the transaction throws
//! it away. Transactions are therefore fully serialized and `lock_keys` has
//! nothing left to do.

use std::{
    collections::HashMap,
    sync::{Arc, Mutex as StdMutex},
};

use tokio::sync::{Mutex, OwnedMutexGuard};
use uuid::Uuid;

use crate::{
    api::error,
    configs::Cache,
    modules::{
        assignment::schema::AssignmentEntity, care_request::schema::CareRequestEntity,
        friend::schema::FriendshipEntity, offer::schema::OfferEntity, pet::schema::PetEntity,
        store::repository::Store, user::schema::UserEntity,
    },
};

mod repositories;

#[derive(Debug, Clone, Default)]
pub struct MemoryState {
    pub users: HashMap<Uuid, UserEntity>,
    pub friendships: HashMap<Uuid, FriendshipEntity>,
    pub pets: HashMap<Uuid, PetEntity>,
    pub requests: HashMap<Uuid, CareRequestEntity>,
    pub assignments: HashMap<Uuid, AssignmentEntity>,
    pub offers: HashMap<Uuid, OfferEntity>,
}

#[derive(Clone, Default)]
pub struct MemoryStore {
    state: Arc<Mutex<MemoryState>>,
}

impl MemoryStore {
    /// Committed state as seen by a fresh transaction.
    pub async fn snapshot(&self) -> MemoryState {
        self.state.lock().await.clone()
    }
}

pub struct MemoryTx {
    guard: OwnedMutexGuard<MemoryState>,
    working: MemoryState,
}

#[async_trait::async_trait]
impl Store for MemoryStore {
    type Tx = MemoryTx;

    async fn begin(&self) -> Result<Self::Tx, error::SystemError> {
        let guard = self.state.clone().lock_owned().await;
        let working = guard.clone();
        Ok(MemoryTx { guard, working })
    }

    async fn commit(&self, tx: Self::Tx) -> Result<(), error::SystemError> {
        let MemoryTx { mut guard, working } = tx;
        *guard = working;
        Ok(())
    }

    async fn lock_keys(&self, _keys: &[Uuid], _tx: &mut Self::Tx) -> Result<(), error::SystemError> {
        Ok(())
    }
}

#[derive(Default)]
pub struct MemoryCache {
    entries: StdMutex<HashMap<String, Vec<u8>>>,
}

impl MemoryCache {
    pub fn contains(&self, key: &str) -> bool {
        self.entries.lock().map(|e| e.contains_key(key)).unwrap_or(false)
    }
}

#[async_trait::async_trait]
impl Cache for MemoryCache {
    async fn get_bytes(&self, key: &str) -> Result<Option<Vec<u8>>, error::SystemError> {
        let entries = self.entries.lock().unwrap();
        Ok(entries.get(key).cloned())
    }

    async fn set_bytes(
        &self,
        key: &str,
        value: Vec<u8>,
        _expiration: u64,
    ) -> Result<(), error::SystemError> {
        self.entries.lock().unwrap().insert(key.to_string(), value);
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<(), error::SystemError> {
        self.entries.lock().unwrap().remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modules::{pet::repository::PetRepository, user::repository::UserRepository};

    #[actix_web::test]
    async fn test_dropped_transaction_rolls_back() {
        let store = MemoryStore::default();
        let owner = fixtures::user(&store, "o@example.com", true, false).await;
        let pet = fixtures::pet(&store, owner.id, "Rex").await;

        let mut tx = store.begin().await.unwrap();
        store.delete_pet(&pet.id, &mut tx).await.unwrap();
        assert!(store.find_pet(&pet.id, &mut tx).await.unwrap().is_none());
        drop(tx);

        assert!(store.snapshot().await.pets.contains_key(&pet.id));
    }

    #[actix_web::test]
    async fn test_commit_publishes_writes() {
        let store = MemoryStore::default();
        let user = fixtures::user(&store, "u@example.com", false, false).await;

        let mut tx = store.begin().await.unwrap();
        let caps = crate::modules::user::model::UpdateCapabilities {
            is_owner: Some(true),
            is_sitter: None,
        };
        store.update_capabilities(&user.id, &caps, &mut tx).await.unwrap();
        store.commit(tx).await.unwrap();

        let snapshot = store.snapshot().await;
        assert!(snapshot.users[&user.id].is_owner);
        assert!(!snapshot.users[&user.id].is_sitter);
    }
}
