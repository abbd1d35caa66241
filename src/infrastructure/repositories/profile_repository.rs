use crate::error::AppResult;
use crate::infrastructure::db::DbPool;
use chrono::{DateTime, Utc};
use serde_json::Value;
use sqlx::FromRow;
use std::sync::Arc;
use uuid::Uuid;

#[derive(Debug, FromRow)]
pub struct MasterProfileRecord {
    pub user_id: Uuid,
    pub data: Value,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// One master profile document per user
pub struct ProfileRepository {
    pool: Arc<DbPool>,
}

impl ProfileRepository {
    pub fn new(pool: Arc<DbPool>) -> Self {
        Self { pool }
    }

    pub async fn find_by_user(&self, user_id: Uuid) -> AppResult<Option<MasterProfileRecord>> {
        let pool = self.pool.as_ref();
        let record = sqlx::query_as::<_, MasterProfileRecord>(
            "SELECT user_id, data, created_at, updated_at FROM master_profiles WHERE user_id = $1",
        )
        .bind(user_id)
        .fetch_optional(pool)
        .await?;

        Ok(record)
    }

    /// Replace the stored document wholesale
    pub async fn upsert(&self, user_id: Uuid, data: &Value) -> AppResult<MasterProfileRecord> {
        let pool = self.pool.as_ref();
        let now = Utc::now();

        let record = sqlx::query_as::<_, MasterProfileRecord>(
            r#"
            INSERT INTO master_profiles (user_id, data, created_at, updated_at)
            VALUES ($1, $2, $3, $3)
            ON CONFLICT (user_id)
            DO UPDATE SET data = EXCLUDED.data, updated_at = EXCLUDED.updated_at
            RETURNING user_id, data, created_at, updated_at
            "#,
        )
        .bind(user_id)
        .bind(data)
        .bind(now)
        .fetch_one(pool)
        .await?;

        Ok(record)
    }
}
