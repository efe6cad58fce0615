use serde::{Deserialize, Serialize};
use sqlx::prelude::{FromRow, Type};
use uuid::Uuid;

use crate::{api::error, utils::Window};

#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy, Type, Serialize, Deserialize)]
#[sqlx(type_name = "assignment_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum AssignmentStatus {
    Pending,
    Active,
    Declined,
    Cancelled,
    Done,
}

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct AssignmentEntity {
    pub id: Uuid,
    pub care_request_id: Uuid,
    pub sitter_id: Uuid,
    pub pet_id: Option<Uuid>,
    pub start_at: chrono::DateTime<chrono::Utc>,
    pub end_at: chrono::DateTime<chrono::Utc>,
    pub sitter_note: Option<String>,
    pub status: AssignmentStatus,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

impl AssignmentEntity {
    pub fn window(&self) -> Result<Window, error::SystemError> {
        Window::new(self.start_at, self.end_at)
    }
}
