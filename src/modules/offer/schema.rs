use serde::{Deserialize, Serialize};
use sqlx::prelude::{FromRow, Type};
use uuid::Uuid;

#[derive(Debug, PartialEq, Eq, Clone, Copy, Type, Serialize, Deserialize)]
#[sqlx(type_name = "offer_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum OfferStatus {
    Offered,
    AcceptedByOwner,
    DeclinedByOwner,
    Withdrawn,
}

/// Owner's invitation to a friend to sit for one of their requests.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct OfferEntity {
    pub id: Uuid,
    pub care_request_id: Uuid,
    pub sitter_id: Uuid,
    pub message: Option<String>,
    pub status: OfferStatus,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_wire_names() {
        assert_eq!(serde_json::to_string(&OfferStatus::AcceptedByOwner).unwrap(), "\"accepted_by_owner\"");
        assert_eq!(serde_json::to_string(&OfferStatus::DeclinedByOwner).unwrap(), "\"declined_by_owner\"");
    }
}
