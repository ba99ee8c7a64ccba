//! Core error taxonomy.
//!
//! Every operation failure falls into one of five buckets, each with a
//! fixed user-facing policy (mapped at the web boundary in `web/error.rs`):
//! - `Validation` — user-correctable input, re-render the form with a message
//! - `Auth` — not logged in / wrong role / bad credentials, redirect to login
//! - `Forbidden` — authenticated but not a party on the resource, redirect
//!   to dashboard with no detail leaked
//! - `NotFound` — unknown id, redirect with a message
//! - `Dependency` — store/notifier failure, logged server-side; the user
//!   only ever sees a generic message

use thiserror::Error;

use crate::store::StoreError;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    Auth(String),

    #[error("You are not authorized to view this appointment.")]
    Forbidden,

    #[error("{0} not found.")]
    NotFound(String),

    #[error("Dependency failure: {0}")]
    Dependency(String),
}

impl AppError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub fn auth(message: impl Into<String>) -> Self {
        Self::Auth(message.into())
    }
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        AppError::Dependency(err.to_string())
    }
}
