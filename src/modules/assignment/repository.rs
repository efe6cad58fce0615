use uuid::Uuid;

use crate::{
    api::error,
    modules::{
        assignment::{
            model::NewAssignment,
            schema::{AssignmentEntity, AssignmentStatus},
        },
        store::repository::Store,
    },
    utils::Window,
};

#[async_trait::async_trait]
pub trait AssignmentRepository: Store {
    async fn insert_assignment(
        &self,
        assignment: &NewAssignment,
        tx: &mut Self::Tx,
    ) -> Result<AssignmentEntity, error::SystemError>;

    async fn find_assignment_for_update(
        &self,
        id: &Uuid,
        tx: &mut Self::Tx,
    ) -> Result<Option<AssignmentEntity>, error::SystemError>;

    /// Any assignment of `sitter_id` on the request, whatever its status.
    async fn find_for_request_and_sitter(
        &self,
        care_request_id: &Uuid,
        sitter_id: &Uuid,
        tx: &mut Self::Tx,
    ) -> Result<Option<AssignmentEntity>, error::SystemError>;

    /// Whether `sitter_id` has an assignment in one of `statuses` whose window
    /// overlaps `window`, ignoring `exclude_id`.
    async fn has_sitter_overlap(
        &self,
        sitter_id: &Uuid,
        window: &Window,
        statuses: &[AssignmentStatus],
        exclude_id: Option<&Uuid>,
        tx: &mut Self::Tx,
    ) -> Result<bool, error::SystemError>;

    async fn has_pet_overlap(
        &self,
        pet_id: &Uuid,
        window: &Window,
        statuses: &[AssignmentStatus],
        exclude_id: Option<&Uuid>,
        tx: &mut Self::Tx,
    ) -> Result<bool, error::SystemError>;

    async fn activate_assignment(
        &self,
        id: &Uuid,
        window: &Window,
        tx: &mut Self::Tx,
    ) -> Result<AssignmentEntity, error::SystemError>;

    async fn set_assignment_status(
        &self,
        id: &Uuid,
        status: AssignmentStatus,
        tx: &mut Self::Tx,
    ) -> Result<AssignmentEntity, error::SystemError>;

    /// Assignments on requests owned by `owner_id`, latest window first.
    async fn list_for_owner(
        &self,
        owner_id: &Uuid,
        tx: &mut Self::Tx,
    ) -> Result<Vec<AssignmentEntity>, error::SystemError>;

    async fn list_for_sitter(
        &self,
        sitter_id: &Uuid,
        tx: &mut Self::Tx,
    ) -> Result<Vec<AssignmentEntity>, error::SystemError>;
}
