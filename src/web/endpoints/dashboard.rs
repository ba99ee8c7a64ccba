//! Role-specific dashboard.

use axum::extract::State;
use axum::http::header::HeaderMap;
use axum::response::Response;
use axum::Extension;

use crate::appointments;
use crate::models::Role;

use super::super::error::WebError;
use super::super::types::{AppContext, CurrentSession};
use super::super::views;
use super::{pending_flash, render};

/// `GET /dashboard` — the caller's appointments; patients also get the
/// doctor directory for booking.
pub async fn dashboard(
    State(ctx): State<AppContext>,
    Extension(session): Extension<CurrentSession>,
    headers: HeaderMap,
) -> Result<Response, WebError> {
    let principal = session.require()?;

    let listed = appointments::list_for_user(ctx.appointments.as_ref(), principal);
    let doctors = if principal.role == Role::Patient {
        appointments::list_doctors(ctx.users.as_ref())
    } else {
        Vec::new()
    };

    let flash = pending_flash(&headers);
    Ok(render(
        flash.clone(),
        views::dashboard_page(
            principal,
            &listed.appointments,
            &doctors,
            listed.degraded,
            flash.as_ref(),
        ),
    ))
}
