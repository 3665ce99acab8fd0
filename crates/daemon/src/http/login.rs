// SPDX-License-Identifier: MIT

//! `/login`: exchanges the shared password for a signed, 15-minute
//! cookie. Never subject to the auth middleware itself — it's how a
//! client gets a token in the first place.

use axum::extract::State;
use axum::http::header;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Deserialize;

use crate::error::HttpError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub password: String,
}

pub async fn login(State(state): State<AppState>, Json(req): Json<LoginRequest>) -> Result<Response, HttpError> {
    if !state.config.auth_required() {
        return Ok(().into_response());
    }
    if req.password != state.config.password {
        return Err(HttpError::Unauthorized);
    }

    let token = state.signing_secret.issue(state.clock_now());
    let cookie = format!("token={token}; Path=/; HttpOnly; SameSite=Lax; Max-Age=900");
    Ok((
        [(header::SET_COOKIE, cookie)],
        Json(serde_json::json!({ "ok": true })),
    )
        .into_response())
}
