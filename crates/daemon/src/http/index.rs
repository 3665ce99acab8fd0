// SPDX-License-Identifier: MIT

//! `/`: minimal static index page. This is an operator tool, not a
//! product UI — the page just renders the `/jobs` snapshot and opens an
//! `EventSource` against `/events`.

use axum::response::Html;

const INDEX_HTML: &str = include_str!("../../assets/index.html");

pub async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}
