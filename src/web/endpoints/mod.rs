//! Page handlers, one module per screen group.
//!
//! Handlers translate forms and sessions into core calls; every gate
//! decision is made by the core and mapped to a redirect by `WebError`.

pub mod appointments;
pub mod auth;
pub mod dashboard;
pub mod health;
pub mod profile;

use axum::http::header::{HeaderMap, SET_COOKIE};
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};

use super::flash::{self, Flash};
use super::views;

/// Render a page, clearing any flash cookie that was just displayed.
pub(super) fn render(flash: Option<Flash>, html: Html<String>) -> Response {
    let had_flash = flash.is_some();
    let mut response = html.into_response();
    if had_flash {
        response
            .headers_mut()
            .append(SET_COOKIE, flash::clear_cookie());
    }
    response
}

/// Read the pending flash for a page render.
pub(super) fn pending_flash(headers: &HeaderMap) -> Option<Flash> {
    flash::read(headers)
}

/// Fallback for unknown routes.
pub async fn not_found() -> Response {
    (StatusCode::NOT_FOUND, views::not_found_page()).into_response()
}
