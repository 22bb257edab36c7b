//! Caller identity.
//!
//! Session handling lives in the authentication layer in front of this
//! service, which forwards the signed-in user's ID in `X-User-Id`.

use axum::async_trait;
use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use database::{user, DatabaseError, User};
use tracing::debug;

use crate::error::ApiError;
use crate::state::AppState;

/// Header carrying the authenticated user's ID.
pub const USER_ID_HEADER: &str = "x-user-id";

/// The user making the request, loaded from the database.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub User);

#[async_trait]
impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user_id = parts
            .headers
            .get(USER_ID_HEADER)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.trim().parse::<i64>().ok())
            .ok_or(ApiError::Unauthorized)?;

        match user::get_user(state.db.pool(), user_id).await {
            Ok(user) => Ok(CurrentUser(user)),
            Err(DatabaseError::NotFound { .. }) => {
                debug!(user_id, "Request for unknown user");
                Err(ApiError::Unauthorized)
            }
            Err(err) => Err(err.into()),
        }
    }
}
