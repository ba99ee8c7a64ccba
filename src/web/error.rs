//! Core error → HTTP response mapping.
//!
//! Every `AppError` variant has a fixed redirect-and-flash policy; no
//! variant ever leaks internal detail or a stack trace to the browser.

use axum::http::header::SET_COOKIE;
use axum::response::{IntoResponse, Redirect, Response};

use crate::error::AppError;

use super::flash::Flash;

/// Web-boundary wrapper so handlers can use `?` on core results.
#[derive(Debug)]
pub struct WebError(pub AppError);

impl From<AppError> for WebError {
    fn from(err: AppError) -> Self {
        WebError(err)
    }
}

impl IntoResponse for WebError {
    fn into_response(self) -> Response {
        match self.0 {
            // Handlers that can re-render a form intercept Validation
            // before it reaches here; the fallback is a flashed redirect.
            AppError::Validation(msg) => redirect_with_flash("/dashboard", Flash::danger(msg)),
            AppError::Auth(msg) => redirect_with_flash("/login", Flash::danger(msg)),
            AppError::Forbidden => redirect_with_flash(
                "/dashboard",
                Flash::danger("You are not authorized to view this appointment."),
            ),
            AppError::NotFound(what) => {
                redirect_with_flash("/dashboard", Flash::danger(format!("{what} not found.")))
            }
            AppError::Dependency(detail) => {
                tracing::error!(%detail, "dependency failure");
                redirect_with_flash(
                    "/dashboard",
                    Flash::danger("An error occurred. Please try again."),
                )
            }
        }
    }
}

/// 303 redirect carrying a one-shot flash message.
pub fn redirect_with_flash(location: &str, flash: Flash) -> Response {
    let mut response = Redirect::to(location).into_response();
    response.headers_mut().append(SET_COOKIE, flash.set_cookie());
    response
}
