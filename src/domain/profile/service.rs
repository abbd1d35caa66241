use super::ensure_document_ids;
use crate::error::AppResult;
use crate::infrastructure::repositories::ProfileRepository;
use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;
use uuid::Uuid;

pub struct ProfileService {
    profile_repo: Arc<ProfileRepository>,
}

impl ProfileService {
    pub fn new(profile_repo: Arc<ProfileRepository>) -> Self {
        Self { profile_repo }
    }
}

fn section_len(document: &Value, name: &str) -> usize {
    document
        .get(name)
        .and_then(Value::as_array)
        .map_or(0, Vec::len)
}

/// The master profile is an opaque document: it is stored and returned as sent,
/// apart from ids generated for list entries that lack one.
#[async_trait]
pub trait ProfileServiceApi: Send + Sync {
    async fn get_profile(&self, user_id: Uuid) -> AppResult<Option<Value>>;

    async fn save_profile(&self, user_id: Uuid, profile: Value) -> AppResult<Value>;
}

#[async_trait]
impl ProfileServiceApi for ProfileService {
    async fn get_profile(&self, user_id: Uuid) -> AppResult<Option<Value>> {
        let record = self.profile_repo.find_by_user(user_id).await?;
        Ok(record.map(|r| r.data))
    }

    async fn save_profile(&self, user_id: Uuid, mut profile: Value) -> AppResult<Value> {
        ensure_document_ids(&mut profile);

        let record = self.profile_repo.upsert(user_id, &profile).await?;

        tracing::info!(
            user_id = %user_id,
            experience = section_len(&record.data, "experience"),
            skills = section_len(&record.data, "skills"),
            "Master profile saved"
        );

        Ok(record.data)
    }
}
