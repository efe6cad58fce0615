use uuid::Uuid;

use crate::{
    api::error,
    modules::{
        assignment::{
            model::NewAssignment,
            repository::AssignmentRepository,
            schema::{AssignmentEntity, AssignmentStatus},
        },
        store::repository_pg::PgStore,
    },
    utils::Window,
};

#[async_trait::async_trait]
impl AssignmentRepository for PgStore {
    async fn insert_assignment(
        &self,
        assignment: &NewAssignment,
        tx: &mut Self::Tx,
    ) -> Result<AssignmentEntity, error::SystemError> {
        let id = Uuid::now_v7();
        let row = sqlx::query_as::<_, AssignmentEntity>(
            r#"
            INSERT INTO care_assignments
                (id, care_request_id, sitter_id, pet_id, start_at, end_at, sitter_note, status)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(assignment.care_request_id)
        .bind(assignment.sitter_id)
        .bind(assignment.pet_id)
        .bind(assignment.window.start_at())
        .bind(assignment.window.end_at())
        .bind(&assignment.sitter_note)
        .bind(assignment.status)
        .fetch_one(tx.as_mut())
        .await?;

        Ok(row)
    }

    async fn find_assignment_for_update(
        &self,
        id: &Uuid,
        tx: &mut Self::Tx,
    ) -> Result<Option<AssignmentEntity>, error::SystemError> {
        let row = sqlx::query_as::<_, AssignmentEntity>(
            "SELECT * FROM care_assignments WHERE id = $1 FOR UPDATE",
        )
        .bind(id)
        .fetch_optional(tx.as_mut())
        .await?;
        Ok(row)
    }

    async fn find_for_request_and_sitter(
        &self,
        care_request_id: &Uuid,
        sitter_id: &Uuid,
        tx: &mut Self::Tx,
    ) -> Result<Option<AssignmentEntity>, error::SystemError> {
        let row = sqlx::query_as::<_, AssignmentEntity>(
            r#"
            SELECT *
            FROM care_assignments
            WHERE care_request_id = $1 AND sitter_id = $2
            LIMIT 1
            "#,
        )
        .bind(care_request_id)
        .bind(sitter_id)
        .fetch_optional(tx.as_mut())
        .await?;
        Ok(row)
    }

    async fn has_sitter_overlap(
        &self,
        sitter_id: &Uuid,
        window: &Window,
        statuses: &[AssignmentStatus],
        exclude_id: Option<&Uuid>,
        tx: &mut Self::Tx,
    ) -> Result<bool, error::SystemError> {
        let exists = sqlx::query_scalar::<_, bool>(
            r#"
            SELECT EXISTS (
                SELECT 1
                FROM care_assignments
                WHERE sitter_id = $1
                AND status = ANY($2)
                AND start_at < $4
                AND end_at > $3
                AND ($5::uuid IS NULL OR id <> $5)
            )
            "#,
        )
        .bind(sitter_id)
        .bind(statuses)
        .bind(window.start_at())
        .bind(window.end_at())
        .bind(exclude_id)
        .fetch_one(tx.as_mut())
        .await?;
        Ok(exists)
    }

    async fn has_pet_overlap(
        &self,
        pet_id: &Uuid,
        window: &Window,
        statuses: &[AssignmentStatus],
        exclude_id: Option<&Uuid>,
        tx: &mut Self::Tx,
    ) -> Result<bool, error::SystemError> {
        let exists = sqlx::query_scalar::<_, bool>(
            r#"
            SELECT EXISTS (
                SELECT 1
                FROM care_assignments
                WHERE pet_id = $1
                AND status = ANY($2)
                AND start_at < $4
                AND end_at > $3
                AND ($5::uuid IS NULL OR id <> $5)
            )
            "#,
        )
        .bind(pet_id)
        .bind(statuses)
        .bind(window.start_at())
        .bind(window.end_at())
        .bind(exclude_id)
        .fetch_one(tx.as_mut())
        .await?;
        Ok(exists)
    }

    async fn activate_assignment(
        &self,
        id: &Uuid,
        window: &Window,
        tx: &mut Self::Tx,
    ) -> Result<AssignmentEntity, error::SystemError> {
        let row = sqlx::query_as::<_, AssignmentEntity>(
            r#"
            UPDATE care_assignments
            SET start_at = $2, end_at = $3, status = $4, updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(window.start_at())
        .bind(window.end_at())
        .bind(AssignmentStatus::Active)
        .fetch_optional(tx.as_mut())
        .await?
        .ok_or_else(|| error::SystemError::not_found("Assignment not found"))?;
        Ok(row)
    }

    async fn set_assignment_status(
        &self,
        id: &Uuid,
        status: AssignmentStatus,
        tx: &mut Self::Tx,
    ) -> Result<AssignmentEntity, error::SystemError> {
        let row = sqlx::query_as::<_, AssignmentEntity>(
            r#"
            UPDATE care_assignments
            SET status = $2, updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(status)
        .fetch_optional(tx.as_mut())
        .await?
        .ok_or_else(|| error::SystemError::not_found("Assignment not found"))?;
        Ok(row)
    }

    async fn list_for_owner(
        &self,
        owner_id: &Uuid,
        tx: &mut Self::Tx,
    ) -> Result<Vec<AssignmentEntity>, error::SystemError> {
        let rows = sqlx::query_as::<_, AssignmentEntity>(
            r#"
            SELECT ca.*
            FROM care_assignments ca
            JOIN care_requests cr ON cr.id = ca.care_request_id
            WHERE cr.owner_id = $1
            ORDER BY ca.start_at DESC, ca.id DESC
            "#,
        )
        .bind(owner_id)
        .fetch_all(tx.as_mut())
        .await?;
        Ok(rows)
    }

    async fn list_for_sitter(
        &self,
        sitter_id: &Uuid,
        tx: &mut Self::Tx,
    ) -> Result<Vec<AssignmentEntity>, error::SystemError> {
        let rows = sqlx::query_as::<_, AssignmentEntity>(
            "SELECT * FROM care_assignments WHERE sitter_id = $1 ORDER BY start_at DESC, id DESC",
        )
        .bind(sitter_id)
        .fetch_all(tx.as_mut())
        .await?;
        Ok(rows)
    }
}
