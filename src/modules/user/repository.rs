use uuid::Uuid;

use crate::{
    api::error,
    modules::{
        store::repository::Store,
        user::{
            model::{UpdateCapabilities, UserSearch},
            schema::UserEntity,
        },
    },
};

#[async_trait::async_trait]
pub trait UserRepository: Store {
    async fn find_by_id(
        &self,
        id: &Uuid,
        tx: &mut Self::Tx,
    ) -> Result<Option<UserEntity>, error::SystemError>;

    async fn find_by_ids(
        &self,
        ids: &[Uuid],
        tx: &mut Self::Tx,
    ) -> Result<Vec<UserEntity>, error::SystemError>;

    async fn update_capabilities(
        &self,
        id: &Uuid,
        capabilities: &UpdateCapabilities,
        tx: &mut Self::Tx,
    ) -> Result<UserEntity, error::SystemError>;

    /// Users other than `exclude_id` matching `search`, ordered by id.
    async fn search_users(
        &self,
        search: &UserSearch,
        exclude_id: &Uuid,
        limit: i64,
        tx: &mut Self::Tx,
    ) -> Result<Vec<UserEntity>, error::SystemError>;
}
