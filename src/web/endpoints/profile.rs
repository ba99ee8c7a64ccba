//! Profile view and edit.

use axum::extract::State;
use axum::http::header::{HeaderMap, HeaderValue, SET_COOKIE};
use axum::response::Response;
use axum::{Extension, Form};
use serde::Deserialize;

use crate::appointments;
use crate::error::AppError;
use crate::models::ProfileUpdate;
use crate::session::{self, Principal, SESSION_COOKIE};

use super::super::error::{redirect_with_flash, WebError};
use super::super::flash::Flash;
use super::super::types::{AppContext, CurrentSession};
use super::super::views;
use super::{pending_flash, render};

/// `GET /profile`
pub async fn profile_form(
    State(ctx): State<AppContext>,
    Extension(session): Extension<CurrentSession>,
    headers: HeaderMap,
) -> Result<Response, WebError> {
    let principal = session.require()?;
    let user = ctx
        .users
        .get(&principal.email)
        .map_err(AppError::from)?
        .ok_or_else(|| AppError::NotFound("User".into()))?;

    let flash = pending_flash(&headers);
    Ok(render(
        flash.clone(),
        views::profile_page(&user, flash.as_ref()),
    ))
}

#[derive(Debug, Deserialize)]
pub struct ProfileForm {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub age: String,
    #[serde(default)]
    pub gender: String,
    pub specialization: Option<String>,
}

/// `POST /profile` — overwrites name/age/gender; specialization only
/// sticks for doctors. The session cookie is re-issued so the displayed
/// name follows the edit.
pub async fn profile_submit(
    State(ctx): State<AppContext>,
    Extension(session): Extension<CurrentSession>,
    Form(form): Form<ProfileForm>,
) -> Result<Response, WebError> {
    let principal = session.require()?;

    let Ok(age) = form.age.trim().parse::<u32>() else {
        return Ok(redirect_with_flash(
            "/profile",
            Flash::danger("Please enter a valid age."),
        ));
    };
    let update = ProfileUpdate {
        name: form.name.clone(),
        age,
        gender: form.gender,
        specialization: form.specialization.filter(|s| !s.is_empty()),
    };
    appointments::update_profile(ctx.users.as_ref(), principal, update)?;

    // Refresh the principal's display name in the cookie
    let refreshed = Principal {
        email: principal.email.clone(),
        role: principal.role,
        name: form.name,
    };
    let cookie = format!(
        "{SESSION_COOKIE}={}; Path=/; Max-Age=86400; HttpOnly; SameSite=Lax",
        session::encode(&refreshed, &ctx.config.secret_key)
    );
    let mut response =
        redirect_with_flash("/profile", Flash::success("Profile updated successfully."));
    if let Ok(value) = HeaderValue::from_str(&cookie) {
        response.headers_mut().append(SET_COOKIE, value);
    }
    Ok(response)
}
