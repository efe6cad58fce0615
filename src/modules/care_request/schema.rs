use serde::{Deserialize, Serialize};
use sqlx::prelude::{FromRow, Type};
use uuid::Uuid;

use crate::{api::error, utils::Window};

#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy, Type, Serialize, Deserialize)]
#[sqlx(type_name = "care_request_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum CareRequestStatus {
    Open,
    /// Reserved; nothing transitions into it.
    Matched,
    Confirmed,
    Cancelled,
    Completed,
}

impl CareRequestStatus {
    pub fn is_terminal(self) -> bool {
        matches!(self, CareRequestStatus::Cancelled | CareRequestStatus::Completed)
    }
}

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct CareRequestEntity {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub pet_id: Option<Uuid>,
    pub start_at: chrono::DateTime<chrono::Utc>,
    pub end_at: chrono::DateTime<chrono::Utc>,
    pub location_text: Option<String>,
    pub notes: Option<String>,
    pub status: CareRequestStatus,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

impl CareRequestEntity {
    pub fn window(&self) -> Result<Window, error::SystemError> {
        Window::new(self.start_at, self.end_at)
    }

    pub fn is_open(&self) -> bool {
        self.status == CareRequestStatus::Open
    }
}
