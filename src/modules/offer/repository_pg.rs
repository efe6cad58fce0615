use uuid::Uuid;

use crate::{
    api::error,
    modules::{
        offer::{
            repository::OfferRepository,
            schema::{OfferEntity, OfferStatus},
        },
        store::repository_pg::PgStore,
    },
};

#[async_trait::async_trait]
impl OfferRepository for PgStore {
    async fn insert_offer(
        &self,
        care_request_id: &Uuid,
        sitter_id: &Uuid,
        message: Option<&str>,
        tx: &mut Self::Tx,
    ) -> Result<OfferEntity, error::SystemError> {
        let id = Uuid::now_v7();
        let offer = sqlx::query_as::<_, OfferEntity>(
            r#"
            INSERT INTO care_offers (id, care_request_id, sitter_id, message, status)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(care_request_id)
        .bind(sitter_id)
        .bind(message)
        .bind(OfferStatus::Offered)
        .fetch_one(tx.as_mut())
        .await?;

        Ok(offer)
    }

    async fn find_offer_for_update(
        &self,
        id: &Uuid,
        tx: &mut Self::Tx,
    ) -> Result<Option<OfferEntity>, error::SystemError> {
        let offer =
            sqlx::query_as::<_, OfferEntity>("SELECT * FROM care_offers WHERE id = $1 FOR UPDATE")
                .bind(id)
                .fetch_optional(tx.as_mut())
                .await?;
        Ok(offer)
    }

    async fn find_open_offer(
        &self,
        care_request_id: &Uuid,
        sitter_id: &Uuid,
        tx: &mut Self::Tx,
    ) -> Result<Option<OfferEntity>, error::SystemError> {
        let offer = sqlx::query_as::<_, OfferEntity>(
            r#"
            SELECT *
            FROM care_offers
            WHERE care_request_id = $1 AND sitter_id = $2 AND status = $3
            "#,
        )
        .bind(care_request_id)
        .bind(sitter_id)
        .bind(OfferStatus::Offered)
        .fetch_optional(tx.as_mut())
        .await?;
        Ok(offer)
    }

    async fn set_offer_status(
        &self,
        id: &Uuid,
        status: OfferStatus,
        tx: &mut Self::Tx,
    ) -> Result<OfferEntity, error::SystemError> {
        let offer = sqlx::query_as::<_, OfferEntity>(
            r#"
            UPDATE care_offers
            SET status = $2, updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(status)
        .fetch_optional(tx.as_mut())
        .await?
        .ok_or_else(|| error::SystemError::not_found("Offer not found"))?;
        Ok(offer)
    }

    async fn list_offers_for_sitter(
        &self,
        sitter_id: &Uuid,
        tx: &mut Self::Tx,
    ) -> Result<Vec<OfferEntity>, error::SystemError> {
        let rows = sqlx::query_as::<_, OfferEntity>(
            "SELECT * FROM care_offers WHERE sitter_id = $1 ORDER BY created_at DESC, id DESC",
        )
        .bind(sitter_id)
        .fetch_all(tx.as_mut())
        .await?;
        Ok(rows)
    }

    async fn list_offers_for_request(
        &self,
        care_request_id: &Uuid,
        tx: &mut Self::Tx,
    ) -> Result<Vec<OfferEntity>, error::SystemError> {
        let rows = sqlx::query_as::<_, OfferEntity>(
            "SELECT * FROM care_offers WHERE care_request_id = $1 ORDER BY created_at DESC, id DESC",
        )
        .bind(care_request_id)
        .fetch_all(tx.as_mut())
        .await?;
        Ok(rows)
    }
}
