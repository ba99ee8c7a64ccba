//! HTTP surface: axum router, session middleware, flash messages and the
//! thin HTML renderer. All business decisions live in the core modules;
//! this layer only translates requests, sessions and errors.

pub mod endpoints;
pub mod error;
pub mod flash;
pub mod middleware;
pub mod router;
pub mod types;
pub mod views;

pub use router::app_router;
pub use types::AppContext;
