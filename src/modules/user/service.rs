use log::info;
use std::{collections::HashMap, sync::Arc};
use uuid::Uuid;

use crate::{
    api::error,
    configs::Cache,
    modules::{
        friend::{model::RelationStatus, repository::FriendRepo},
        user::{
            model::{
                SEARCH_LIMIT, UpdateCapabilities, UpdateCapabilitiesModel, UserResponse,
                UserSearch, UserSearchResult,
            },
            repository::UserRepository,
            schema::UserEntity,
        },
    },
};

const PROFILE_TTL: u64 = 3600;

fn profile_key(id: &Uuid) -> String {
    format!("user:{}", id)
}

/// The caller's own record. Callers authenticate with a token, so a missing
/// row means the account was removed.
pub async fn load_caller<R>(
    repo: &R,
    caller: &Uuid,
    tx: &mut R::Tx,
) -> Result<UserEntity, error::SystemError>
where
    R: UserRepository + ?Sized,
{
    repo.find_by_id(caller, tx)
        .await?
        .ok_or_else(|| error::SystemError::unauthorized("User no longer exists"))
}

#[derive(Clone)]
pub struct UserService<R>
where
    R: FriendRepo,
{
    repo: Arc<R>,
    cache: Arc<dyn Cache>,
}

impl<R> UserService<R>
where
    R: FriendRepo,
{
    pub fn with_dependencies(repo: Arc<R>, cache: Arc<dyn Cache>) -> Self {
        info!("UserService initialized with dependencies");
        UserService { repo, cache }
    }

    pub async fn get_profile(&self, id: Uuid) -> Result<UserResponse, error::SystemError> {
        let key = profile_key(&id);
        if let Some(cached_user) = self.cache.get::<UserResponse>(&key).await? {
            info!("User {} found in cache", id);
            return Ok(cached_user);
        }

        let mut tx = self.repo.begin().await?;
        let user_entity = self.repo.find_by_id(&id, &mut tx).await?;
        self.repo.commit(tx).await?;

        let Some(entity) = user_entity else {
            return Err(error::SystemError::not_found("User not found"));
        };

        let user = UserResponse::from(entity);
        self.cache.set(&key, &user, PROFILE_TTL).await?;
        info!("User {} cached", id);
        Ok(user)
    }

    pub async fn update_capabilities(
        &self,
        id: Uuid,
        model: UpdateCapabilitiesModel,
    ) -> Result<UserResponse, error::SystemError> {
        if model.is_owner.is_none() && model.is_sitter.is_none() {
            return Err(error::SystemError::bad_request("No fields to update"));
        }

        let capabilities =
            UpdateCapabilities { is_owner: model.is_owner, is_sitter: model.is_sitter };

        let mut tx = self.repo.begin().await?;
        let user = self.repo.update_capabilities(&id, &capabilities, &mut tx).await?;
        self.repo.commit(tx).await?;

        self.cache.delete(&profile_key(&id)).await?;
        info!("User {} capabilities: owner={} sitter={}", id, user.is_owner, user.is_sitter);
        Ok(UserResponse::from(user))
    }

    pub async fn search(
        &self,
        caller: Uuid,
        query: &str,
    ) -> Result<Vec<UserSearchResult>, error::SystemError> {
        let Some(search) = UserSearch::parse(query) else {
            return Ok(Vec::new());
        };

        let mut tx = self.repo.begin().await?;
        let users = self.repo.search_users(&search, &caller, SEARCH_LIMIT, &mut tx).await?;
        let ids: Vec<Uuid> = users.iter().map(|u| u.id).collect();
        let edges = if ids.is_empty() {
            Vec::new()
        } else {
            self.repo.find_touching(&caller, &ids, &mut tx).await?
        };
        self.repo.commit(tx).await?;

        let edges: HashMap<Uuid, _> = edges.into_iter().map(|f| (f.other_party(&caller), f)).collect();

        Ok(users
            .into_iter()
            .map(|u| {
                let relation = RelationStatus::of(&caller, edges.get(&u.id));
                UserSearchResult { user: UserResponse::from(u), relation }
            })
            .collect())
    }
}
