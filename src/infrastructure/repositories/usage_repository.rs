use crate::error::AppResult;
use crate::infrastructure::db::DbPool;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use uuid::Uuid;

/// Monthly generation counters, stored on the users row
pub struct UsageRepository {
    pool: Arc<DbPool>,
}

impl UsageRepository {
    pub fn new(pool: Arc<DbPool>) -> Self {
        Self { pool }
    }

    /// Zero the counter for a new month. The WHERE on the previous reset
    /// date makes concurrent resets collapse into one.
    pub async fn reset_for_new_month(
        &self,
        user_id: Uuid,
        previous_reset: DateTime<Utc>,
        now: DateTime<Utc>,
    ) -> AppResult<bool> {
        let pool = self.pool.as_ref();
        let result = sqlx::query(
            r#"
            UPDATE users
            SET usage_count = 0, last_reset_date = $1, updated_at = $1
            WHERE id = $2 AND last_reset_date = $3
            "#,
        )
        .bind(now)
        .bind(user_id)
        .bind(previous_reset)
        .execute(pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Take one unit of quota if the user is still below `limit`.
    /// Returns the new count, or None when the quota is exhausted.
    pub async fn try_reserve(&self, user_id: Uuid, limit: i32) -> AppResult<Option<i32>> {
        let pool = self.pool.as_ref();
        let count = sqlx::query_scalar::<_, i32>(
            r#"
            UPDATE users
            SET usage_count = usage_count + 1, updated_at = NOW()
            WHERE id = $1 AND usage_count < $2
            RETURNING usage_count
            "#,
        )
        .bind(user_id)
        .bind(limit)
        .fetch_optional(pool)
        .await?;

        Ok(count)
    }

    /// Give back a reservation that did not turn into a billable generation
    pub async fn release(&self, user_id: Uuid) -> AppResult<()> {
        let pool = self.pool.as_ref();
        sqlx::query(
            r#"
            UPDATE users
            SET usage_count = GREATEST(usage_count - 1, 0), updated_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(user_id)
        .execute(pool)
        .await?;

        Ok(())
    }

    pub async fn current(&self, user_id: Uuid) -> AppResult<Option<i32>> {
        let pool = self.pool.as_ref();
        let count = sqlx::query_scalar::<_, i32>("SELECT usage_count FROM users WHERE id = $1")
            .bind(user_id)
            .fetch_optional(pool)
            .await?;

        Ok(count)
    }

    /// New billing period: counter back to zero
    pub async fn reset(&self, user_id: Uuid) -> AppResult<bool> {
        let pool = self.pool.as_ref();
        let result =
            sqlx::query("UPDATE users SET usage_count = 0, updated_at = NOW() WHERE id = $1")
                .bind(user_id)
                .execute(pool)
                .await?;

        Ok(result.rows_affected() > 0)
    }
}
