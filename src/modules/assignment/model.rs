use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::{
    modules::assignment::schema::{AssignmentEntity, AssignmentStatus},
    utils::Window,
};

#[derive(Deserialize, Validate)]
pub struct ApplyModel {
    pub care_request_id: Uuid,
    pub start_at: chrono::DateTime<chrono::Utc>,
    pub end_at: chrono::DateTime<chrono::Utc>,
    #[validate(length(max = 1000, message = "Note must be at most 1000 characters long"))]
    pub sitter_note: Option<String>,
}

/// Owner-adjusted window to approve an application with.
#[derive(Deserialize, Validate)]
pub struct ApproveModel {
    pub start_at: chrono::DateTime<chrono::Utc>,
    pub end_at: chrono::DateTime<chrono::Utc>,
}

pub struct NewAssignment {
    pub care_request_id: Uuid,
    pub sitter_id: Uuid,
    pub pet_id: Option<Uuid>,
    pub window: Window,
    pub sitter_note: Option<String>,
    pub status: AssignmentStatus,
}

#[derive(Debug, Serialize)]
pub struct AssignmentsView {
    /// Applications and bookings on the caller's own requests.
    pub as_owner: Vec<AssignmentEntity>,
    pub as_sitter: Vec<AssignmentEntity>,
}
