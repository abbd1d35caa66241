use crate::infrastructure::db::DbPool;
use crate::{
    domain::user::{SubscriptionTier, User},
    error::AppResult,
};
use chrono::{DateTime, Utc};
use std::sync::Arc;
use uuid::Uuid;

/// Fields needed to create an email/password account
pub struct NewUser<'a> {
    pub email: &'a str,
    pub password_hash: &'a str,
    pub full_name: Option<&'a str>,
    pub verification_token: &'a str,
    pub verification_expires: DateTime<Utc>,
}

pub struct UserRepository {
    pool: Arc<DbPool>,
}

impl UserRepository {
    pub fn new(pool: Arc<DbPool>) -> Self {
        Self { pool }
    }

    /// Find user by ID
    pub async fn find_by_id(&self, user_id: Uuid) -> AppResult<Option<User>> {
        let pool = self.pool.as_ref();
        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1")
            .bind(user_id)
            .fetch_optional(pool)
            .await?;

        Ok(user)
    }

    /// Find user by email
    pub async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        let pool = self.pool.as_ref();
        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE email = $1")
            .bind(email)
            .fetch_optional(pool)
            .await?;

        Ok(user)
    }

    /// Find the user owning a verification token that has not expired yet
    pub async fn find_by_verification_token(
        &self,
        token: &str,
        now: DateTime<Utc>,
    ) -> AppResult<Option<User>> {
        let pool = self.pool.as_ref();
        let user = sqlx::query_as::<_, User>(
            "SELECT * FROM users WHERE verification_token = $1 AND verification_expires > $2",
        )
        .bind(token)
        .bind(now)
        .fetch_optional(pool)
        .await?;

        Ok(user)
    }

    pub async fn find_by_stripe_customer(&self, customer_id: &str) -> AppResult<Option<User>> {
        let pool = self.pool.as_ref();
        let user =
            sqlx::query_as::<_, User>("SELECT * FROM users WHERE stripe_customer_id = $1")
                .bind(customer_id)
                .fetch_optional(pool)
                .await?;

        Ok(user)
    }

    /// Create a new unverified FREE user
    pub async fn create(&self, new_user: NewUser<'_>) -> AppResult<User> {
        let pool = self.pool.as_ref();
        let id = Uuid::new_v4();
        let now = Utc::now();

        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (
                id, email, password_hash, full_name, auth_provider, email_verified,
                verification_token, verification_expires, subscription_tier,
                usage_count, last_reset_date, created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, 'email', FALSE, $5, $6, $7, 0, $8, $8, $8)
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(new_user.email)
        .bind(new_user.password_hash)
        .bind(new_user.full_name)
        .bind(new_user.verification_token)
        .bind(new_user.verification_expires)
        .bind(SubscriptionTier::Free)
        .bind(now)
        .fetch_one(pool)
        .await?;

        Ok(user)
    }

    /// Mark the email verified and consume the token
    pub async fn mark_verified(&self, user_id: Uuid) -> AppResult<()> {
        let pool = self.pool.as_ref();
        sqlx::query(
            r#"
            UPDATE users
            SET email_verified = TRUE, verification_token = NULL,
                verification_expires = NULL, updated_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(user_id)
        .execute(pool)
        .await?;

        Ok(())
    }

    pub async fn set_verification_token(
        &self,
        user_id: Uuid,
        token: &str,
        expires: DateTime<Utc>,
    ) -> AppResult<()> {
        let pool = self.pool.as_ref();
        sqlx::query(
            r#"
            UPDATE users
            SET verification_token = $1, verification_expires = $2, updated_at = NOW()
            WHERE id = $3
            "#,
        )
        .bind(token)
        .bind(expires)
        .bind(user_id)
        .execute(pool)
        .await?;

        Ok(())
    }

    /// Apply a LemonSqueezy subscription: tier, provider ids and a fresh quota.
    /// Returns false when no such user exists.
    pub async fn apply_lemon_subscription(
        &self,
        user_id: Uuid,
        tier: SubscriptionTier,
        customer_id: &str,
        subscription_id: &str,
    ) -> AppResult<bool> {
        let pool = self.pool.as_ref();
        let result = sqlx::query(
            r#"
            UPDATE users
            SET subscription_tier = $1, lemon_customer_id = $2, lemon_subscription_id = $3,
                usage_count = 0, updated_at = NOW()
            WHERE id = $4
            "#,
        )
        .bind(tier)
        .bind(customer_id)
        .bind(subscription_id)
        .bind(user_id)
        .execute(pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Downgrade to FREE and forget the LemonSqueezy subscription
    pub async fn cancel_lemon_subscription(&self, user_id: Uuid) -> AppResult<bool> {
        let pool = self.pool.as_ref();
        let result = sqlx::query(
            r#"
            UPDATE users
            SET subscription_tier = $1, lemon_subscription_id = NULL, updated_at = NOW()
            WHERE id = $2
            "#,
        )
        .bind(SubscriptionTier::Free)
        .bind(user_id)
        .execute(pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    pub async fn set_stripe_customer(&self, user_id: Uuid, customer_id: &str) -> AppResult<()> {
        let pool = self.pool.as_ref();
        sqlx::query(
            "UPDATE users SET stripe_customer_id = $1, updated_at = NOW() WHERE id = $2",
        )
        .bind(customer_id)
        .bind(user_id)
        .execute(pool)
        .await?;

        Ok(())
    }

    /// Apply a Stripe subscription. `subscription_id` of None keeps the stored id.
    pub async fn apply_stripe_subscription(
        &self,
        user_id: Uuid,
        tier: SubscriptionTier,
        subscription_id: Option<&str>,
        period_end: Option<DateTime<Utc>>,
    ) -> AppResult<bool> {
        let pool = self.pool.as_ref();
        let result = sqlx::query(
            r#"
            UPDATE users
            SET subscription_tier = $1,
                stripe_subscription_id = COALESCE($2, stripe_subscription_id),
                subscription_end_date = $3,
                usage_count = 0,
                updated_at = NOW()
            WHERE id = $4
            "#,
        )
        .bind(tier)
        .bind(subscription_id)
        .bind(period_end)
        .bind(user_id)
        .execute(pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Downgrade to FREE and clear the Stripe subscription and end date
    pub async fn cancel_stripe_subscription(&self, user_id: Uuid) -> AppResult<bool> {
        let pool = self.pool.as_ref();
        let result = sqlx::query(
            r#"
            UPDATE users
            SET subscription_tier = $1, stripe_subscription_id = NULL,
                subscription_end_date = NULL, updated_at = NOW()
            WHERE id = $2
            "#,
        )
        .bind(SubscriptionTier::Free)
        .bind(user_id)
        .execute(pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }
}
