use axum::{
    extract::{Request, State},
    http::{StatusCode, header},
    middleware::Next,
    response::Response,
};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::AppState;
use crate::application::errors::Translated;

pub const UNAUTHORIZED_MESSAGE: &str = "Authorization has been denied for this request.";

/// Caller identity stored in the token cache and attached to authenticated requests.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthenticatedUser {
    pub user_id: String,
}

/// Middleware that accepts requests carrying a bearer token known to the token cache.
pub async fn bearer_auth(
    State(app_state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, Translated> {
    let token = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|header| header.to_str().ok())
        .and_then(|header| header.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty());

    let Some(token) = token else {
        warn!("Bearer authentication failed: missing, empty, or invalid Authorization header.");
        return Err(unauthorized());
    };

    match app_state.tokens.get(token).await {
        Ok(Some(cached)) => match serde_json::from_slice::<AuthenticatedUser>(&cached) {
            Ok(user) => {
                info!("Bearer token authenticated for user: {}", user.user_id);
                req.extensions_mut().insert(user);
                Ok(next.run(req).await)
            }
            Err(e) => {
                warn!("Failed to deserialize cached user for bearer token: {}", e);
                Err(unauthorized())
            }
        },
        Ok(None) => {
            warn!("Provided bearer token not found in cache.");
            Err(unauthorized())
        }
        Err(e) => {
            warn!("Cache error during bearer token lookup: {}", e);
            Err(unauthorized())
        }
    }
}

fn unauthorized() -> Translated {
    Translated::bare(StatusCode::UNAUTHORIZED, UNAUTHORIZED_MESSAGE)
}
