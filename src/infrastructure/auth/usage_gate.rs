use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use std::sync::Arc;
use uuid::Uuid;

use super::AuthUser;
use crate::domain::usage::{UsageNotConsumed, UsageService, UsageServiceApi};
use crate::error::AppError;

/// One reserved unit of quota. Unless committed it goes back to the user,
/// including when the request future is dropped because the client went away.
struct Reservation {
    usage_service: Arc<dyn UsageServiceApi>,
    user_id: Uuid,
    settled: bool,
}

impl Reservation {
    fn new(usage_service: Arc<dyn UsageServiceApi>, user_id: Uuid) -> Self {
        Self {
            usage_service,
            user_id,
            settled: false,
        }
    }

    fn commit(mut self) {
        self.settled = true;
    }

    async fn release(mut self) {
        self.settled = true;
        release(self.usage_service.as_ref(), self.user_id).await;
    }
}

impl Drop for Reservation {
    fn drop(&mut self) {
        if self.settled {
            return;
        }

        let Ok(handle) = tokio::runtime::Handle::try_current() else {
            tracing::error!(user_id = %self.user_id, "No runtime to release abandoned usage reservation");
            return;
        };

        tracing::warn!(user_id = %self.user_id, "Request abandoned, releasing usage reservation");
        let usage_service = self.usage_service.clone();
        let user_id = self.user_id;
        handle.spawn(async move {
            release(usage_service.as_ref(), user_id).await;
        });
    }
}

async fn release(usage_service: &dyn UsageServiceApi, user_id: Uuid) {
    if let Err(e) = usage_service.release(user_id).await {
        tracing::error!(user_id = %user_id, error = %e, "Failed to release usage reservation");
    }
}

/// Quota gate for AI generation routes.
///
/// Reserves one unit before the handler runs and gives it back when the
/// handler fails, is abandoned, or marks its response with [`UsageNotConsumed`],
/// so only successful generations are counted. Must run after [`super::auth_middleware`].
pub async fn usage_gate_middleware(
    State(usage_service): State<Arc<UsageService>>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let user_id = request
        .extensions()
        .get::<AuthUser>()
        .map(|u| u.user_id)
        .ok_or_else(|| AppError::Unauthorized("Unauthorized".to_string()))?;

    usage_service.reserve(user_id).await?;
    let reservation = Reservation::new(usage_service, user_id);

    let response = next.run(request).await;

    let consumed = response.status().is_success()
        && response.extensions().get::<UsageNotConsumed>().is_none();

    if consumed {
        reservation.commit();
    } else {
        reservation.release().await;
    }

    Ok(response)
}
