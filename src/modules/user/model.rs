use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::modules::{friend::model::RelationStatus, user::schema::UserEntity};

pub const SEARCH_LIMIT: i64 = 50;

#[derive(Deserialize, Validate)]
pub struct UpdateCapabilitiesModel {
    pub is_owner: Option<bool>,
    pub is_sitter: Option<bool>,
}

pub struct UpdateCapabilities {
    pub is_owner: Option<bool>,
    pub is_sitter: Option<bool>,
}

#[derive(Deserialize, Validate)]
pub struct UserSearchQuery {
    #[validate(length(max = 100, message = "Search query is too long"))]
    pub q: String,
}

/// Parsed search input: an `@` switches to email matching, otherwise every
/// whitespace-separated token has to appear in the name.
#[derive(Debug, Clone, PartialEq)]
pub enum UserSearch {
    Email(String),
    NameTokens(Vec<String>),
}

impl UserSearch {
    pub fn parse(raw: &str) -> Option<Self> {
        let q = raw.trim().to_lowercase();
        if q.is_empty() {
            return None;
        }
        if q.contains('@') {
            return Some(UserSearch::Email(q));
        }
        let tokens: Vec<String> = q.split_whitespace().map(str::to_string).collect();
        Some(UserSearch::NameTokens(tokens))
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct UserResponse {
    pub id: uuid::Uuid,
    pub email: String,
    pub name: String,
    pub is_owner: bool,
    pub is_sitter: bool,
}

impl From<UserEntity> for UserResponse {
    fn from(entity: UserEntity) -> Self {
        UserResponse {
            id: entity.id,
            email: entity.email,
            name: entity.name,
            is_owner: entity.is_owner,
            is_sitter: entity.is_sitter,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct UserSearchResult {
    pub user: UserResponse,
    pub relation: RelationStatus,
}
