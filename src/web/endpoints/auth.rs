//! Home, registration, login and logout pages.

use axum::extract::State;
use axum::http::header::{HeaderMap, HeaderValue, SET_COOKIE};
use axum::response::{IntoResponse, Redirect, Response};
use axum::{Extension, Form};
use serde::Deserialize;

use crate::auth;
use crate::error::AppError;
use crate::models::Role;
use crate::session::{self, Principal, SESSION_COOKIE};

use super::super::error::{redirect_with_flash, WebError};
use super::super::flash::Flash;
use super::super::types::{AppContext, CurrentSession};
use super::super::views;
use super::{pending_flash, render};

const SESSION_MAX_AGE_SECS: u32 = 86_400;

/// `GET /` — home page, or straight to the dashboard when logged in.
pub async fn index(
    Extension(session): Extension<CurrentSession>,
    headers: HeaderMap,
) -> Response {
    if session.is_authenticated() {
        return Redirect::to("/dashboard").into_response();
    }
    let flash = pending_flash(&headers);
    render(flash.clone(), views::index_page(flash.as_ref()))
}

/// `GET /register`
pub async fn register_form(
    Extension(session): Extension<CurrentSession>,
    headers: HeaderMap,
) -> Response {
    if session.is_authenticated() {
        return Redirect::to("/dashboard").into_response();
    }
    let flash = pending_flash(&headers);
    render(flash.clone(), views::register_page(flash.as_ref()))
}

#[derive(Debug, Deserialize)]
pub struct RegisterForm {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
    pub confirm_password: Option<String>,
    #[serde(default)]
    pub age: String,
    #[serde(default)]
    pub gender: String,
    #[serde(default)]
    pub role: String,
}

/// `POST /register`
pub async fn register_submit(
    State(ctx): State<AppContext>,
    Extension(session): Extension<CurrentSession>,
    Form(form): Form<RegisterForm>,
) -> Result<Response, WebError> {
    if session.is_authenticated() {
        return Ok(Redirect::to("/dashboard").into_response());
    }

    let request = auth::RegistrationRequest {
        name: form.name,
        email: form.email,
        password: form.password,
        confirm_password: form.confirm_password,
        age: form.age,
        gender: form.gender,
        role: form.role,
    };
    match auth::register(ctx.users.as_ref(), ctx.notifier.as_ref(), request) {
        Ok(()) => Ok(redirect_with_flash(
            "/login",
            Flash::success("Registration successful. Please log in."),
        )),
        // User-correctable input: re-render the form with the message
        Err(AppError::Validation(msg)) => {
            let flash = Flash::danger(msg);
            Ok(views::register_page(Some(&flash)).into_response())
        }
        Err(err) => Err(err.into()),
    }
}

/// `GET /login`
pub async fn login_form(
    Extension(session): Extension<CurrentSession>,
    headers: HeaderMap,
) -> Response {
    if session.is_authenticated() {
        return Redirect::to("/dashboard").into_response();
    }
    let flash = pending_flash(&headers);
    render(flash.clone(), views::login_page(flash.as_ref()))
}

#[derive(Debug, Deserialize)]
pub struct LoginForm {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub role: String,
}

/// `POST /login`
pub async fn login_submit(
    State(ctx): State<AppContext>,
    Extension(session): Extension<CurrentSession>,
    Form(form): Form<LoginForm>,
) -> Result<Response, WebError> {
    if session.is_authenticated() {
        return Ok(Redirect::to("/dashboard").into_response());
    }
    if form.email.is_empty() || form.password.is_empty() || form.role.is_empty() {
        let flash = Flash::danger("All fields are required");
        return Ok(views::login_page(Some(&flash)).into_response());
    }
    let Some(role) = Role::parse(&form.role) else {
        let flash = Flash::danger("Invalid role selected.");
        return Ok(views::login_page(Some(&flash)).into_response());
    };

    match auth::login(ctx.users.as_ref(), &form.email, &form.password, role) {
        Ok(principal) => Ok(login_response(&principal, &ctx)),
        // Bad credentials re-render the form; the message says which
        // check failed, matching the original behavior
        Err(AppError::Auth(msg)) => {
            let flash = Flash::danger(msg);
            Ok(views::login_page(Some(&flash)).into_response())
        }
        Err(err) => Err(err.into()),
    }
}

fn login_response(principal: &Principal, ctx: &AppContext) -> Response {
    let cookie = format!(
        "{SESSION_COOKIE}={}; Path=/; Max-Age={SESSION_MAX_AGE_SECS}; HttpOnly; SameSite=Lax",
        session::encode(principal, &ctx.config.secret_key)
    );
    let mut response = redirect_with_flash("/dashboard", Flash::success("Login successful."));
    if let Ok(value) = HeaderValue::from_str(&cookie) {
        response.headers_mut().append(SET_COOKIE, value);
    }
    response
}

/// `GET /logout` — clears the session unconditionally; idempotent.
pub async fn logout() -> Response {
    let mut response =
        redirect_with_flash("/login", Flash::success("You have been logged out."));
    response.headers_mut().append(
        SET_COOKIE,
        HeaderValue::from_static("medibook_session=; Path=/; Max-Age=0; HttpOnly"),
    );
    response
}
