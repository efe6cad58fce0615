use uuid::Uuid;

use crate::{
    api::error,
    modules::{
        friend::schema::FriendshipEntity, store::repository::Store,
        user::repository::UserRepository,
    },
};

#[async_trait::async_trait]
pub trait FriendshipRepository: Store {
    /// The edge between two users, whichever of them sent it.
    async fn find_between(
        &self,
        user_id_a: &Uuid,
        user_id_b: &Uuid,
        tx: &mut Self::Tx,
    ) -> Result<Option<FriendshipEntity>, error::SystemError>;

    async fn find_accepted_for(
        &self,
        user_id: &Uuid,
        tx: &mut Self::Tx,
    ) -> Result<Vec<FriendshipEntity>, error::SystemError>;

    async fn find_pending_from(
        &self,
        requester_id: &Uuid,
        tx: &mut Self::Tx,
    ) -> Result<Vec<FriendshipEntity>, error::SystemError>;

    async fn find_pending_to(
        &self,
        addressee_id: &Uuid,
        tx: &mut Self::Tx,
    ) -> Result<Vec<FriendshipEntity>, error::SystemError>;

    /// Edges between `user_id` and any of `others`.
    async fn find_touching(
        &self,
        user_id: &Uuid,
        others: &[Uuid],
        tx: &mut Self::Tx,
    ) -> Result<Vec<FriendshipEntity>, error::SystemError>;

    async fn create_request(
        &self,
        requester_id: &Uuid,
        addressee_id: &Uuid,
        tx: &mut Self::Tx,
    ) -> Result<FriendshipEntity, error::SystemError>;

    async fn mark_accepted(
        &self,
        friendship_id: &Uuid,
        tx: &mut Self::Tx,
    ) -> Result<FriendshipEntity, error::SystemError>;

    async fn delete_friendship(
        &self,
        friendship_id: &Uuid,
        tx: &mut Self::Tx,
    ) -> Result<(), error::SystemError>;
}

pub trait FriendRepo: FriendshipRepository + UserRepository {}

impl<T> FriendRepo for T where T: FriendshipRepository + UserRepository {}
