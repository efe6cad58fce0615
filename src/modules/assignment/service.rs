//! Sitter applications and the owner's review of them.
//!
//! Every write here runs in one transaction. It locks the rows it reads first
//! (assignment before request), then the advisory keys of the sitter and pet
//! involved, and only then runs its overlap checks. Two writers touching the
//! same sitter or pet therefore see each other's committed rows.

use std::sync::Arc;
use uuid::Uuid;

use crate::{
    api::error,
    modules::{
        assignment::{
            model::{ApplyModel, ApproveModel, AssignmentsView, NewAssignment},
            repository::AssignmentRepository,
            schema::{AssignmentEntity, AssignmentStatus},
        },
        care_request::{
            repository::CareRequestRepository,
            schema::{CareRequestEntity, CareRequestStatus},
        },
        friend::{repository::FriendRepo, service::are_friends},
        user::service::load_caller,
    },
    utils::Window,
};

#[derive(Debug, Clone, Copy, Default)]
pub struct SchedulingPolicy {
    /// Put a confirmed request back to open when its active assignment is
    /// cancelled.
    pub reopen_on_cancel: bool,
}

/// Advisory keys for the sitter and, when known, the pet.
pub fn schedule_keys(sitter_id: Uuid, pet_id: Option<Uuid>) -> Vec<Uuid> {
    let mut keys = vec![sitter_id];
    keys.extend(pet_id);
    keys
}

/// Rejects `window` if the sitter or the pet already has an active
/// assignment overlapping it.
pub async fn ensure_no_active_overlap<R>(
    repo: &R,
    sitter_id: &Uuid,
    pet_id: Option<&Uuid>,
    window: &Window,
    exclude_id: Option<&Uuid>,
    tx: &mut R::Tx,
) -> Result<(), error::SystemError>
where
    R: AssignmentRepository + ?Sized,
{
    let active = [AssignmentStatus::Active];

    if repo.has_sitter_overlap(sitter_id, window, &active, exclude_id, tx).await? {
        return Err(error::SystemError::scheduling_conflict(
            "This sitter has a conflicting assignment",
        ));
    }

    if let Some(pet_id) = pet_id {
        if repo.has_pet_overlap(pet_id, window, &active, exclude_id, tx).await? {
            return Err(error::SystemError::scheduling_conflict(
                "This pet already has a conflicting assignment",
            ));
        }
    }

    Ok(())
}

pub trait AssignmentRepo: AssignmentRepository + CareRequestRepository + FriendRepo {}

impl<T> AssignmentRepo for T where T: AssignmentRepository + CareRequestRepository + FriendRepo {}

#[derive(Clone)]
pub struct AssignmentService<R>
where
    R: AssignmentRepo,
{
    repo: Arc<R>,
    policy: SchedulingPolicy,
}

impl<R> AssignmentService<R>
where
    R: AssignmentRepo,
{
    pub fn with_dependencies(repo: Arc<R>, policy: SchedulingPolicy) -> Self {
        log::info!("AssignmentService initialized, reopen on cancel: {}", policy.reopen_on_cancel);
        AssignmentService { repo, policy }
    }

    /// Submits a pending application for `caller` on an open request of one of
    /// their friends.
    #[tracing::instrument(skip(self, model), fields(request_id = %model.care_request_id))]
    pub async fn apply(
        &self,
        caller: Uuid,
        model: ApplyModel,
    ) -> Result<AssignmentEntity, error::SystemError> {
        let mut tx = self.repo.begin().await?;

        let request = self
            .repo
            .find_request_for_update(&model.care_request_id, &mut tx)
            .await?
            .ok_or_else(|| error::SystemError::not_found("Care request not found"))?;

        if request.owner_id == caller {
            return Err(error::SystemError::not_eligible("You cannot apply to your own request"));
        }
        if !request.is_open() {
            return Err(error::SystemError::RequestNotOpen);
        }

        let sitter = load_caller(self.repo.as_ref(), &caller, &mut tx).await?;
        if !sitter.is_sitter {
            return Err(error::SystemError::not_eligible(
                "You must have the sitter role to apply",
            ));
        }
        if !are_friends(self.repo.as_ref(), &caller, &request.owner_id, &mut tx).await? {
            return Err(error::SystemError::not_eligible(
                "You can apply only to requests from accepted friends",
            ));
        }

        let window = Window::new(model.start_at, model.end_at)?;
        if !request.window()?.contains(&window) {
            return Err(error::SystemError::OutOfWindow);
        }

        self.repo.lock_keys(&schedule_keys(caller, request.pet_id), &mut tx).await?;

        if self.repo.find_for_request_and_sitter(&request.id, &caller, &mut tx).await?.is_some() {
            return Err(error::SystemError::duplicate_application(
                "You have already applied for this request",
            ));
        }

        let busy = [AssignmentStatus::Pending, AssignmentStatus::Active];
        if self.repo.has_sitter_overlap(&caller, &window, &busy, None, &mut tx).await? {
            return Err(error::SystemError::scheduling_conflict(
                "You already have another assignment overlapping these times",
            ));
        }

        if let Some(pet_id) = &request.pet_id {
            let active = [AssignmentStatus::Active];
            if self.repo.has_pet_overlap(pet_id, &window, &active, None, &mut tx).await? {
                return Err(error::SystemError::scheduling_conflict(
                    "This pet already has a conflicting assignment",
                ));
            }
        }

        let assignment = self
            .repo
            .insert_assignment(
                &NewAssignment {
                    care_request_id: request.id,
                    sitter_id: caller,
                    pet_id: request.pet_id,
                    window,
                    sitter_note: model.sitter_note.filter(|n| !n.trim().is_empty()),
                    status: AssignmentStatus::Pending,
                },
                &mut tx,
            )
            .await?;

        self.repo.commit(tx).await?;

        log::info!("Sitter {} applied to request {} ({})", caller, request.id, assignment.id);
        Ok(assignment)
    }

    /// Locks the assignment and its request, and checks that `caller` owns
    /// the request and the assignment is in `expected` state.
    async fn reviewable(
        &self,
        caller: &Uuid,
        assignment_id: &Uuid,
        expected: AssignmentStatus,
        tx: &mut R::Tx,
    ) -> Result<(AssignmentEntity, CareRequestEntity), error::SystemError> {
        let assignment = self
            .repo
            .find_assignment_for_update(assignment_id, tx)
            .await?
            .ok_or_else(|| error::SystemError::not_found("Assignment not found"))?;

        let request = self
            .repo
            .find_request_for_update(&assignment.care_request_id, tx)
            .await?
            .ok_or_else(|| error::SystemError::not_found("Care request not found"))?;

        if request.owner_id != *caller {
            return Err(error::SystemError::forbidden(
                "Only the owner can review this assignment",
            ));
        }
        if assignment.status != expected {
            let msg = match expected {
                AssignmentStatus::Pending => "Assignment is not pending",
                _ => "Assignment is not active",
            };
            return Err(error::SystemError::forbidden(msg));
        }

        Ok((assignment, request))
    }

    #[tracing::instrument(skip(self, model))]
    pub async fn approve(
        &self,
        caller: Uuid,
        assignment_id: Uuid,
        model: ApproveModel,
    ) -> Result<AssignmentEntity, error::SystemError> {
        let mut tx = self.repo.begin().await?;
        let (assignment, request) =
            self.reviewable(&caller, &assignment_id, AssignmentStatus::Pending, &mut tx).await?;

        let window = Window::new(model.start_at, model.end_at)?;
        let request_window = request.window()?;
        if !request_window.contains(&window) {
            return Err(error::SystemError::OutOfWindow);
        }

        // the request row is locked, so its pet is the current one
        self.repo
            .lock_keys(&schedule_keys(assignment.sitter_id, request.pet_id), &mut tx)
            .await?;
        ensure_no_active_overlap(
            self.repo.as_ref(),
            &assignment.sitter_id,
            request.pet_id.as_ref(),
            &window,
            Some(&assignment.id),
            &mut tx,
        )
        .await?;

        let approved = self.repo.activate_assignment(&assignment.id, &window, &mut tx).await?;

        // partial coverage leaves the request open for more sitters
        if window == request_window && request.is_open() {
            self.repo.set_request_status(&request.id, CareRequestStatus::Confirmed, &mut tx).await?;
            log::info!("Care request {} confirmed", request.id);
        }

        self.repo.commit(tx).await?;

        log::info!("Assignment {} approved by {}", assignment_id, caller);
        Ok(approved)
    }

    #[tracing::instrument(skip(self))]
    pub async fn decline(
        &self,
        caller: Uuid,
        assignment_id: Uuid,
    ) -> Result<AssignmentEntity, error::SystemError> {
        let mut tx = self.repo.begin().await?;
        self.reviewable(&caller, &assignment_id, AssignmentStatus::Pending, &mut tx).await?;

        let declined = self
            .repo
            .set_assignment_status(&assignment_id, AssignmentStatus::Declined, &mut tx)
            .await?;
        self.repo.commit(tx).await?;

        log::info!("Assignment {} declined", assignment_id);
        Ok(declined)
    }

    #[tracing::instrument(skip(self))]
    pub async fn cancel(
        &self,
        caller: Uuid,
        assignment_id: Uuid,
    ) -> Result<AssignmentEntity, error::SystemError> {
        let mut tx = self.repo.begin().await?;
        let (_, request) =
            self.reviewable(&caller, &assignment_id, AssignmentStatus::Active, &mut tx).await?;

        let cancelled = self
            .repo
            .set_assignment_status(&assignment_id, AssignmentStatus::Cancelled, &mut tx)
            .await?;

        if self.policy.reopen_on_cancel && request.status == CareRequestStatus::Confirmed {
            self.repo.set_request_status(&request.id, CareRequestStatus::Open, &mut tx).await?;
            log::info!("Care request {} reopened", request.id);
        }

        self.repo.commit(tx).await?;

        log::info!("Assignment {} cancelled", assignment_id);
        Ok(cancelled)
    }

    #[tracing::instrument(skip(self))]
    pub async fn complete(
        &self,
        caller: Uuid,
        assignment_id: Uuid,
    ) -> Result<AssignmentEntity, error::SystemError> {
        let mut tx = self.repo.begin().await?;
        self.reviewable(&caller, &assignment_id, AssignmentStatus::Active, &mut tx).await?;

        let done =
            self.repo.set_assignment_status(&assignment_id, AssignmentStatus::Done, &mut tx).await?;
        self.repo.commit(tx).await?;

        log::info!("Assignment {} done", assignment_id);
        Ok(done)
    }

    pub async fn list_assignments(&self, caller: Uuid) -> Result<AssignmentsView, error::SystemError> {
        let mut tx = self.repo.begin().await?;
        let as_owner = self.repo.list_for_owner(&caller, &mut tx).await?;
        let as_sitter = self.repo.list_for_sitter(&caller, &mut tx).await?;
        self.repo.commit(tx).await?;

        Ok(AssignmentsView { as_owner, as_sitter })
    }
}
