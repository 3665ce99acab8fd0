// SPDX-License-Identifier: MIT

//! Cookie-based auth middleware. Wraps every route except `/login` and
//! `/events` (per the external HTTP contract) with a signed-cookie check
//! when a password is configured; a process with no password configured
//! never checks anything.

use axum::extract::{Request, State};
use axum::http::header;
use axum::middleware::Next;
use axum::response::Response;
use dropjob_adapters::auth::TOKEN_COOKIE_NAME;

use crate::error::HttpError;
use crate::state::AppState;

/// Pull a named cookie value out of the raw `Cookie` request header.
fn cookie_value<'a>(headers: &'a axum::http::HeaderMap, name: &str) -> Option<&'a str> {
    let raw = headers.get(header::COOKIE)?.to_str().ok()?;
    raw.split(';').find_map(|pair| {
        let (k, v) = pair.trim().split_once('=')?;
        (k == name).then_some(v)
    })
}

pub async fn require_auth(State(state): State<AppState>, request: Request, next: Next) -> Result<Response, HttpError> {
    if !state.config.auth_required() {
        return Ok(next.run(request).await);
    }

    let token = cookie_value(request.headers(), TOKEN_COOKIE_NAME).ok_or(HttpError::Unauthorized)?;
    state
        .signing_secret
        .verify(token, state.clock_now())
        .map_err(|_| HttpError::Unauthorized)?;

    Ok(next.run(request).await)
}

#[cfg(test)]
#[path = "auth_tests.rs"]
mod tests;
