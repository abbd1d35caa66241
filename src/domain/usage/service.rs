use super::error::UsageServiceError;
use super::{needs_monthly_reset, next_reset_at, UsageResponse};
use crate::domain::user::User;
use crate::infrastructure::repositories::{UsageRepository, UserRepository};
use async_trait::async_trait;
use chrono::Utc;
use std::sync::Arc;
use uuid::Uuid;

pub struct UsageService {
    user_repo: Arc<UserRepository>,
    usage_repo: Arc<UsageRepository>,
}

impl UsageService {
    pub fn new(user_repo: Arc<UserRepository>, usage_repo: Arc<UsageRepository>) -> Self {
        Self {
            user_repo,
            usage_repo,
        }
    }

    async fn find_user(&self, user_id: Uuid) -> Result<User, UsageServiceError> {
        self.user_repo
            .find_by_id(user_id)
            .await
            .map_err(|e| UsageServiceError::Dependency(e.to_string()))?
            .ok_or(UsageServiceError::NotFound)
    }
}

#[async_trait]
pub trait UsageServiceApi: Send + Sync {
    /// Reserve one generation for the user, rolling the month over first.
    /// Returns the usage count after the reservation.
    async fn reserve(&self, user_id: Uuid) -> Result<i32, UsageServiceError>;

    /// Hand back a reservation that did not produce a billable generation
    async fn release(&self, user_id: Uuid) -> Result<(), UsageServiceError>;

    async fn get_usage(&self, user_id: Uuid) -> Result<UsageResponse, UsageServiceError>;
}

#[async_trait]
impl UsageServiceApi for UsageService {
    async fn reserve(&self, user_id: Uuid) -> Result<i32, UsageServiceError> {
        let user = self.find_user(user_id).await?;
        let now = Utc::now();

        if needs_monthly_reset(user.last_reset_date, now) {
            let reset = self
                .usage_repo
                .reset_for_new_month(user_id, user.last_reset_date, now)
                .await
                .map_err(|e| UsageServiceError::Dependency(e.to_string()))?;
            if reset {
                tracing::info!(user_id = %user_id, "Monthly usage reset");
            }
        }

        let tier = user.subscription_tier;
        let limit = tier.monthly_limit();

        let reserved = self
            .usage_repo
            .try_reserve(user_id, limit)
            .await
            .map_err(|e| UsageServiceError::Dependency(e.to_string()))?;

        match reserved {
            Some(count) => {
                tracing::debug!(user_id = %user_id, tier = %tier, count, limit, "Usage reserved");
                Ok(count)
            }
            None => {
                let current = self
                    .usage_repo
                    .current(user_id)
                    .await
                    .map_err(|e| UsageServiceError::Dependency(e.to_string()))?
                    .ok_or(UsageServiceError::NotFound)?;

                tracing::info!(user_id = %user_id, tier = %tier, current, limit, "Usage limit reached");

                Err(UsageServiceError::LimitReached {
                    tier,
                    limit,
                    current,
                })
            }
        }
    }

    async fn release(&self, user_id: Uuid) -> Result<(), UsageServiceError> {
        self.usage_repo
            .release(user_id)
            .await
            .map_err(|e| UsageServiceError::Dependency(e.to_string()))?;
        tracing::debug!(user_id = %user_id, "Usage reservation released");
        Ok(())
    }

    async fn get_usage(&self, user_id: Uuid) -> Result<UsageResponse, UsageServiceError> {
        let user = self.find_user(user_id).await?;
        let now = Utc::now();

        // A stale counter belongs to a past month and is not shown
        let used = if needs_monthly_reset(user.last_reset_date, now) {
            0
        } else {
            user.usage_count
        };
        let limit = user.subscription_tier.monthly_limit();

        Ok(UsageResponse {
            tier: user.subscription_tier,
            limit,
            used,
            remaining: (limit - used).max(0),
            resets_at: next_reset_at(now),
        })
    }
}
