use crate::error::AppResult;
use crate::infrastructure::db::DbPool;
use chrono::{DateTime, Utc};
use serde_json::Value;
use sqlx::FromRow;
use std::sync::Arc;
use uuid::Uuid;

#[derive(Debug, Clone, FromRow)]
pub struct ApplicationRecord {
    pub id: Uuid,
    pub user_id: Uuid,
    pub job_title: String,
    pub company: String,
    pub original_description: String,
    pub tailored_resume: Value,
    pub match_score: i32,
    /// Stored uppercase
    pub status: String,
    pub cover_letter: Option<String>,
    pub interview_questions: Option<Value>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

pub struct NewApplication<'a> {
    pub user_id: Uuid,
    pub job_title: &'a str,
    pub company: &'a str,
    pub original_description: &'a str,
    pub tailored_resume: &'a Value,
    pub match_score: i32,
    pub status: &'a str,
}

const COLUMNS: &str = "id, user_id, job_title, company, original_description, tailored_resume, \
     match_score, status, cover_letter, interview_questions, created_at, updated_at";

/// Every query is scoped by owner: another user's id behaves as missing
pub struct ApplicationRepository {
    pool: Arc<DbPool>,
}

impl ApplicationRepository {
    pub fn new(pool: Arc<DbPool>) -> Self {
        Self { pool }
    }

    /// Newest first
    pub async fn list_by_user(&self, user_id: Uuid) -> AppResult<Vec<ApplicationRecord>> {
        let pool = self.pool.as_ref();
        let records = sqlx::query_as::<_, ApplicationRecord>(&format!(
            "SELECT {} FROM applications WHERE user_id = $1 ORDER BY created_at DESC",
            COLUMNS
        ))
        .bind(user_id)
        .fetch_all(pool)
        .await?;

        Ok(records)
    }

    pub async fn find_owned(&self, id: Uuid, user_id: Uuid) -> AppResult<Option<ApplicationRecord>> {
        let pool = self.pool.as_ref();
        let record = sqlx::query_as::<_, ApplicationRecord>(&format!(
            "SELECT {} FROM applications WHERE id = $1 AND user_id = $2",
            COLUMNS
        ))
        .bind(id)
        .bind(user_id)
        .fetch_optional(pool)
        .await?;

        Ok(record)
    }

    pub async fn create(&self, application: NewApplication<'_>) -> AppResult<ApplicationRecord> {
        let pool = self.pool.as_ref();
        let now = Utc::now();

        let record = sqlx::query_as::<_, ApplicationRecord>(&format!(
            r#"
            INSERT INTO applications (id, user_id, job_title, company, original_description,
                                      tailored_resume, match_score, status, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $9)
            RETURNING {}
            "#,
            COLUMNS
        ))
        .bind(Uuid::new_v4())
        .bind(application.user_id)
        .bind(application.job_title)
        .bind(application.company)
        .bind(application.original_description)
        .bind(application.tailored_resume)
        .bind(application.match_score)
        .bind(application.status)
        .bind(now)
        .fetch_one(pool)
        .await?;

        Ok(record)
    }

    /// Returns false when the application does not exist for this user
    pub async fn update_status(&self, id: Uuid, user_id: Uuid, status: &str) -> AppResult<bool> {
        let pool = self.pool.as_ref();
        let result = sqlx::query(
            "UPDATE applications SET status = $1, updated_at = NOW() WHERE id = $2 AND user_id = $3",
        )
        .bind(status)
        .bind(id)
        .bind(user_id)
        .execute(pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    pub async fn delete(&self, id: Uuid, user_id: Uuid) -> AppResult<bool> {
        let pool = self.pool.as_ref();
        let result = sqlx::query("DELETE FROM applications WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user_id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    pub async fn save_cover_letter(
        &self,
        id: Uuid,
        user_id: Uuid,
        cover_letter: &str,
    ) -> AppResult<bool> {
        let pool = self.pool.as_ref();
        let result = sqlx::query(
            "UPDATE applications SET cover_letter = $1, updated_at = NOW() WHERE id = $2 AND user_id = $3",
        )
        .bind(cover_letter)
        .bind(id)
        .bind(user_id)
        .execute(pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    pub async fn save_interview_questions(
        &self,
        id: Uuid,
        user_id: Uuid,
        questions: &Value,
    ) -> AppResult<bool> {
        let pool = self.pool.as_ref();
        let result = sqlx::query(
            "UPDATE applications SET interview_questions = $1, updated_at = NOW() WHERE id = $2 AND user_id = $3",
        )
        .bind(questions)
        .bind(id)
        .bind(user_id)
        .execute(pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }
}
