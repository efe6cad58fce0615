use uuid::Uuid;

use crate::{api::error, modules::store::repository::Store};

/// Postgres-backed store. Every module's `repository_pg.rs` implements its
/// repository trait for this type.
#[derive(Clone)]
pub struct PgStore {
    pool: sqlx::PgPool,
}

impl PgStore {
    pub fn new(pool: sqlx::PgPool) -> Self {
        Self { pool }
    }

    pub fn get_pool(&self) -> &sqlx::PgPool {
        &self.pool
    }
}

#[async_trait::async_trait]
impl Store for PgStore {
    type Tx = sqlx::Transaction<'static, sqlx::Postgres>;

    async fn begin(&self) -> Result<Self::Tx, error::SystemError> {
        let tx = self.pool.begin().await?;
        Ok(tx)
    }

    async fn commit(&self, tx: Self::Tx) -> Result<(), error::SystemError> {
        tx.commit().await?;
        Ok(())
    }

    async fn lock_keys(&self, keys: &[Uuid], tx: &mut Self::Tx) -> Result<(), error::SystemError> {
        // locks are always taken in ascending key order
        let mut keys = keys.to_vec();
        keys.sort();
        keys.dedup();

        for key in keys {
            tracing::debug!(%key, "acquiring advisory lock");
            sqlx::query("SELECT pg_advisory_xact_lock(hashtextextended($1, 0))")
                .bind(key.to_string())
                .execute(tx.as_mut())
                .await?;
        }

        Ok(())
    }
}
