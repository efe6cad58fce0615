use std::{collections::HashMap, sync::Arc};

use uuid::Uuid;

use crate::{
    api::error,
    modules::{
        friend::{
            model::{FriendRequestResponse, FriendResponse},
            repository::{FriendRepo, FriendshipRepository},
            schema::{FriendshipEntity, FriendshipStatus},
        },
        user::repository::UserRepository,
    },
};

/// Accepted edge in either direction between `a` and `b`.
pub async fn are_friends<R>(
    repo: &R,
    a: &Uuid,
    b: &Uuid,
    tx: &mut R::Tx,
) -> Result<bool, error::SystemError>
where
    R: FriendshipRepository + ?Sized,
{
    if a == b {
        return Ok(false);
    }
    let edge = repo.find_between(a, b, tx).await?;
    Ok(edge.is_some_and(|f| f.is_accepted()))
}

/// Other party of every accepted edge touching `user_id`.
pub async fn friend_ids<R>(
    repo: &R,
    user_id: &Uuid,
    tx: &mut R::Tx,
) -> Result<Vec<Uuid>, error::SystemError>
where
    R: FriendshipRepository + ?Sized,
{
    let edges = repo.find_accepted_for(user_id, tx).await?;
    Ok(edges.iter().map(|f| f.other_party(user_id)).collect())
}

#[derive(Clone)]
pub struct FriendService<R>
where
    R: FriendRepo,
{
    repo: Arc<R>,
}

impl<R> FriendService<R>
where
    R: FriendRepo,
{
    pub fn with_dependencies(repo: Arc<R>) -> Self {
        FriendService { repo }
    }

    pub async fn get_friends(&self, user_id: Uuid) -> Result<Vec<FriendResponse>, error::SystemError> {
        let mut tx = self.repo.begin().await?;
        let ids = friend_ids(self.repo.as_ref(), &user_id, &mut tx).await?;
        let users = if ids.is_empty() {
            Vec::new()
        } else {
            self.repo.find_by_ids(&ids, &mut tx).await?
        };
        self.repo.commit(tx).await?;

        Ok(users.into_iter().map(FriendResponse::from).collect())
    }

    /// Sends a request, or accepts the reciprocal one if `receiver_id` already
    /// asked `sender_id`.
    #[tracing::instrument(skip(self))]
    pub async fn send_friend_request(
        &self,
        sender_id: Uuid,
        receiver_id: Uuid,
    ) -> Result<FriendshipEntity, error::SystemError> {
        if receiver_id == sender_id {
            return Err(error::SystemError::bad_request("Cannot send friend request to yourself"));
        }

        let mut tx = self.repo.begin().await?;

        if self.repo.find_by_id(&receiver_id, &mut tx).await?.is_none() {
            return Err(error::SystemError::not_found("Receiver user not found"));
        }

        let friendship = match self.repo.find_between(&sender_id, &receiver_id, &mut tx).await? {
            Some(existing) if existing.status == FriendshipStatus::Accepted => {
                return Err(error::SystemError::conflict("Users are already friends"));
            }
            Some(existing) if existing.requester_id == sender_id => {
                return Err(error::SystemError::conflict("Friend request already exists"));
            }
            Some(reciprocal) => {
                let accepted = self.repo.mark_accepted(&reciprocal.id, &mut tx).await?;
                log::info!("Reciprocal request {} collapsed to friendship", accepted.id);
                accepted
            }
            None => self.repo.create_request(&sender_id, &receiver_id, &mut tx).await?,
        };

        self.repo.commit(tx).await?;

        Ok(friendship)
    }

    #[tracing::instrument(skip(self))]
    pub async fn accept_friend_request(
        &self,
        user_id: Uuid,
        requester_id: Uuid,
    ) -> Result<FriendResponse, error::SystemError> {
        let mut tx = self.repo.begin().await?;

        let request = self.pending_request(&requester_id, &user_id, &mut tx).await?;
        self.repo.mark_accepted(&request.id, &mut tx).await?;

        let from_user = self
            .repo
            .find_by_id(&requester_id, &mut tx)
            .await?
            .ok_or_else(|| error::SystemError::not_found("User not found"))?;

        self.repo.commit(tx).await?;

        log::info!("User {} accepted friend request from {}", user_id, requester_id);
        Ok(FriendResponse::from(from_user))
    }

    pub async fn decline_friend_request(
        &self,
        user_id: Uuid,
        requester_id: Uuid,
    ) -> Result<(), error::SystemError> {
        let mut tx = self.repo.begin().await?;
        let request = self.pending_request(&requester_id, &user_id, &mut tx).await?;
        self.repo.delete_friendship(&request.id, &mut tx).await?;
        self.repo.commit(tx).await
    }

    pub async fn cancel_friend_request(
        &self,
        user_id: Uuid,
        addressee_id: Uuid,
    ) -> Result<(), error::SystemError> {
        let mut tx = self.repo.begin().await?;
        let request = self.pending_request(&user_id, &addressee_id, &mut tx).await?;
        self.repo.delete_friendship(&request.id, &mut tx).await?;
        self.repo.commit(tx).await
    }

    pub async fn get_incoming_requests(
        &self,
        user_id: Uuid,
    ) -> Result<Vec<FriendRequestResponse>, error::SystemError> {
        let mut tx = self.repo.begin().await?;
        let edges = self.repo.find_pending_to(&user_id, &mut tx).await?;
        let rows = self.with_counterparts(&user_id, edges, &mut tx).await?;
        self.repo.commit(tx).await?;
        Ok(rows)
    }

    pub async fn get_sent_requests(
        &self,
        user_id: Uuid,
    ) -> Result<Vec<FriendRequestResponse>, error::SystemError> {
        let mut tx = self.repo.begin().await?;
        let edges = self.repo.find_pending_from(&user_id, &mut tx).await?;
        let rows = self.with_counterparts(&user_id, edges, &mut tx).await?;
        self.repo.commit(tx).await?;
        Ok(rows)
    }

    async fn pending_request(
        &self,
        requester_id: &Uuid,
        addressee_id: &Uuid,
        tx: &mut R::Tx,
    ) -> Result<FriendshipEntity, error::SystemError> {
        self.repo
            .find_between(requester_id, addressee_id, tx)
            .await?
            .filter(|f| f.status == FriendshipStatus::Pending && f.requester_id == *requester_id)
            .ok_or_else(|| error::SystemError::not_found("Friend request not found"))
    }

    async fn with_counterparts(
        &self,
        user_id: &Uuid,
        edges: Vec<FriendshipEntity>,
        tx: &mut R::Tx,
    ) -> Result<Vec<FriendRequestResponse>, error::SystemError> {
        let ids: Vec<Uuid> = edges.iter().map(|f| f.other_party(user_id)).collect();
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let users: HashMap<Uuid, FriendResponse> = self
            .repo
            .find_by_ids(&ids, tx)
            .await?
            .into_iter()
            .map(|u| (u.id, FriendResponse::from(u)))
            .collect();

        Ok(edges
            .into_iter()
            .filter_map(|f| {
                let user = users.get(&f.other_party(user_id))?.clone();
                Some(FriendRequestResponse { id: f.id, user, created_at: f.created_at })
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        modules::store::repository::Store,
        test::{MemoryStore, fixtures},
    };

    fn service(store: &MemoryStore) -> FriendService<MemoryStore> {
        FriendService::with_dependencies(Arc::new(store.clone()))
    }

    async fn befriended(store: &MemoryStore, a: Uuid, b: Uuid) -> bool {
        let mut tx = store.begin().await.unwrap();
        are_friends(store, &a, &b, &mut tx).await.unwrap()
    }

    #[actix_web::test]
    async fn test_send_then_accept_makes_friends_both_ways() {
        let store = MemoryStore::default();
        let a = fixtures::user(&store, "a@example.com", false, true).await;
        let b = fixtures::user(&store, "b@example.com", true, false).await;
        let svc = service(&store);

        let req = svc.send_friend_request(a.id, b.id).await.unwrap();
        assert_eq!(req.status, FriendshipStatus::Pending);
        assert!(!befriended(&store, a.id, b.id).await);

        let from = svc.accept_friend_request(b.id, a.id).await.unwrap();
        assert_eq!(from.id, a.id);
        assert!(befriended(&store, a.id, b.id).await);
        assert!(befriended(&store, b.id, a.id).await);

        let friends_of_b: Vec<Uuid> =
            svc.get_friends(b.id).await.unwrap().into_iter().map(|f| f.id).collect();
        assert_eq!(friends_of_b, vec![a.id]);
    }

    #[actix_web::test]
    async fn test_reciprocal_pending_collapses_to_accepted() {
        let store = MemoryStore::default();
        let a = fixtures::user(&store, "a@example.com", false, true).await;
        let b = fixtures::user(&store, "b@example.com", true, false).await;
        let svc = service(&store);

        svc.send_friend_request(a.id, b.id).await.unwrap();
        let edge = svc.send_friend_request(b.id, a.id).await.unwrap();

        assert_eq!(edge.status, FriendshipStatus::Accepted);
        assert_eq!(edge.requester_id, a.id);
        assert_eq!(store.snapshot().await.friendships.len(), 1);
    }

    #[actix_web::test]
    async fn test_repeat_request_is_rejected() {
        let store = MemoryStore::default();
        let a = fixtures::user(&store, "a@example.com", false, true).await;
        let b = fixtures::user(&store, "b@example.com", true, false).await;
        let svc = service(&store);

        svc.send_friend_request(a.id, b.id).await.unwrap();
        let err = svc.send_friend_request(a.id, b.id).await.unwrap_err();
        assert!(matches!(err, error::SystemError::Conflict(_)));

        svc.accept_friend_request(b.id, a.id).await.unwrap();
        let err = svc.send_friend_request(b.id, a.id).await.unwrap_err();
        assert!(matches!(err, error::SystemError::Conflict(_)));
    }

    #[actix_web::test]
    async fn test_self_and_unknown_targets() {
        let store = MemoryStore::default();
        let a = fixtures::user(&store, "a@example.com", false, true).await;
        let svc = service(&store);

        let err = svc.send_friend_request(a.id, a.id).await.unwrap_err();
        assert!(matches!(err, error::SystemError::BadRequest(_)));

        let err = svc.send_friend_request(a.id, Uuid::now_v7()).await.unwrap_err();
        assert!(matches!(err, error::SystemError::NotFound(_)));
    }

    #[actix_web::test]
    async fn test_only_addressee_can_accept_or_decline() {
        let store = MemoryStore::default();
        let a = fixtures::user(&store, "a@example.com", false, true).await;
        let b = fixtures::user(&store, "b@example.com", true, false).await;
        let svc = service(&store);

        svc.send_friend_request(a.id, b.id).await.unwrap();

        let err = svc.accept_friend_request(a.id, b.id).await.unwrap_err();
        assert!(matches!(err, error::SystemError::NotFound(_)));

        svc.decline_friend_request(b.id, a.id).await.unwrap();
        assert!(store.snapshot().await.friendships.is_empty());
    }

    #[actix_web::test]
    async fn test_cancel_sent_request_and_listings() {
        let store = MemoryStore::default();
        let a = fixtures::user(&store, "a@example.com", false, true).await;
        let b = fixtures::user(&store, "b@example.com", true, false).await;
        let svc = service(&store);

        svc.send_friend_request(a.id, b.id).await.unwrap();

        let sent = svc.get_sent_requests(a.id).await.unwrap();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].user.id, b.id);

        let incoming = svc.get_incoming_requests(b.id).await.unwrap();
        assert_eq!(incoming.len(), 1);
        assert_eq!(incoming[0].user.id, a.id);

        // the addressee cannot cancel someone else's request
        assert!(svc.cancel_friend_request(b.id, a.id).await.is_err());

        svc.cancel_friend_request(a.id, b.id).await.unwrap();
        assert!(svc.get_sent_requests(a.id).await.unwrap().is_empty());
    }

    #[actix_web::test]
    async fn test_friend_ids_ignores_pending_edges() {
        let store = MemoryStore::default();
        let me = fixtures::user(&store, "me@example.com", true, true).await;
        let f1 = fixtures::user(&store, "f1@example.com", false, true).await;
        let f2 = fixtures::user(&store, "f2@example.com", false, true).await;
        let p = fixtures::user(&store, "p@example.com", false, true).await;

        fixtures::friends(&store, me.id, f1.id).await;
        fixtures::friends(&store, f2.id, me.id).await;
        fixtures::pending(&store, me.id, p.id).await;

        let mut tx = store.begin().await.unwrap();
        let mut ids = friend_ids(&store, &me.id, &mut tx).await.unwrap();
        ids.sort();
        let mut expected = vec![f1.id, f2.id];
        expected.sort();
        assert_eq!(ids, expected);
        assert!(are_friends(&store, &f2.id, &me.id, &mut tx).await.unwrap());
        assert!(!are_friends(&store, &p.id, &me.id, &mut tx).await.unwrap());
    }
}
