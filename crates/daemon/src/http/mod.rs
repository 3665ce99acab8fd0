// SPDX-License-Identifier: MIT

//! axum router assembly. Auth wraps every route except `/login` and
//! `/events`.

pub mod controls;
pub mod events;
pub mod index;
pub mod jobs;
pub mod login;

use axum::middleware;
use axum::routing::{get, post};
use axum::Router;
use tower_http::trace::TraceLayer;

use crate::auth::require_auth;
use crate::state::AppState;

pub fn router(state: AppState) -> Router {
    let protected = Router::new()
        .route("/jobs", get(jobs::snapshot))
        .route("/onoff", get(controls::onoff))
        .route("/runnow", get(controls::run_now))
        .route("/restart", get(controls::restart))
        .route("/cancel", get(controls::cancel))
        .route("/lastoutput", get(jobs::last_output))
        .route("/parsingerrors", get(jobs::parsing_errors))
        .route("/", get(index::index))
        .route_layer(middleware::from_fn_with_state(state.clone(), require_auth));

    Router::new()
        .route("/login", post(login::login))
        .route("/events", get(events::stream))
        .merge(protected)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
