//! Newsletter signup

use axum::{extract::State, Json};
use serde::Deserialize;
use serde_json::{json, Value};

use super::{ApiError, ApiJson};
use crate::{db, AppState};

#[derive(Debug, Deserialize)]
pub struct SubscribeRequest {
    #[serde(default)]
    pub email: String,
}

/// POST /api/newsletter
///
/// 400 for an address without `@`, 409 when already subscribed.
pub async fn subscribe_newsletter(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<SubscribeRequest>,
) -> Result<Json<Value>, ApiError> {
    let email = request.email.trim();
    if email.is_empty() || !email.contains('@') {
        return Err(ApiError::BadRequest(
            "Please provide a valid email address".to_string(),
        ));
    }

    match db::subscribe_newsletter(&state.db, email, &npulse_common::time::now_rfc3339()).await {
        Ok(()) => Ok(Json(json!({
            "message": "Successfully subscribed to newsletter",
        }))),
        Err(npulse_common::Error::Conflict(_)) => Err(ApiError::Conflict(
            "This email is already subscribed to our newsletter".to_string(),
        )),
        Err(e) => Err(e.into()),
    }
}
