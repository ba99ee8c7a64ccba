//! Route table.
//!
//! Layers are applied bottom-up, so the Extension carrying `AppContext`
//! is outermost (the session middleware reads it), then session
//! loading, then the handlers with router state.

use axum::routing::{get, post};
use axum::Router;

use super::endpoints;
use super::middleware;
use super::types::AppContext;

/// Build the application router.
pub fn app_router(ctx: AppContext) -> Router {
    Router::new()
        .route("/", get(endpoints::auth::index))
        .route(
            "/register",
            get(endpoints::auth::register_form).post(endpoints::auth::register_submit),
        )
        .route(
            "/login",
            get(endpoints::auth::login_form).post(endpoints::auth::login_submit),
        )
        .route("/logout", get(endpoints::auth::logout))
        .route("/dashboard", get(endpoints::dashboard::dashboard))
        .route(
            "/book_appointment",
            get(endpoints::appointments::book_form).post(endpoints::appointments::book_submit),
        )
        .route(
            "/view_appointment/:appointment_id",
            get(endpoints::appointments::view),
        )
        .route(
            "/submit_diagnosis/:appointment_id",
            post(endpoints::appointments::submit_diagnosis),
        )
        .route(
            "/search_appointments",
            get(endpoints::appointments::search_form)
                .post(endpoints::appointments::search_submit),
        )
        .route(
            "/profile",
            get(endpoints::profile::profile_form).post(endpoints::profile::profile_submit),
        )
        .route("/health", get(endpoints::health::check))
        .fallback(endpoints::not_found)
        .with_state(ctx.clone())
        .layer(axum::middleware::from_fn(middleware::load_session))
        .layer(axum::Extension(ctx))
}
