use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::modules::{
    friend::schema::{FriendshipEntity, FriendshipStatus},
    user::schema::UserEntity,
};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FriendResponse {
    pub id: Uuid,
    pub name: String,
    pub is_owner: bool,
    pub is_sitter: bool,
}

impl From<UserEntity> for FriendResponse {
    fn from(user: UserEntity) -> Self {
        FriendResponse {
            id: user.id,
            name: user.name,
            is_owner: user.is_owner,
            is_sitter: user.is_sitter,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct FriendRequestResponse {
    pub id: Uuid,
    pub user: FriendResponse,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

/// How `caller` relates to someone else, as shown in search results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RelationStatus {
    None,
    Friends,
    Sent,
    Incoming,
}

impl RelationStatus {
    pub fn of(caller: &Uuid, edge: Option<&FriendshipEntity>) -> Self {
        match edge {
            None => RelationStatus::None,
            Some(f) if f.status == FriendshipStatus::Accepted => RelationStatus::Friends,
            Some(f) if f.requester_id == *caller => RelationStatus::Sent,
            Some(_) => RelationStatus::Incoming,
        }
    }
}
