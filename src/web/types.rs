//! Shared state for the router, plus the request-scoped session value.

use std::sync::Arc;

use crate::config::AppConfig;
use crate::error::AppError;
use crate::notify::Notifier;
use crate::session::Principal;
use crate::store::{AppointmentStore, UserStore};

/// Shared context for all routes and middleware: configuration plus the
/// external collaborators, constructed once in `main`.
#[derive(Clone)]
pub struct AppContext {
    pub config: Arc<AppConfig>,
    pub users: Arc<dyn UserStore>,
    pub appointments: Arc<dyn AppointmentStore>,
    pub notifier: Arc<Notifier>,
}

impl AppContext {
    pub fn new(
        config: Arc<AppConfig>,
        users: Arc<dyn UserStore>,
        appointments: Arc<dyn AppointmentStore>,
        notifier: Arc<Notifier>,
    ) -> Self {
        Self {
            config,
            users,
            appointments,
            notifier,
        }
    }
}

/// Decoded session for the current request, injected by the session
/// middleware. `None` when no valid signed cookie was presented.
#[derive(Debug, Clone)]
pub struct CurrentSession(pub Option<Principal>);

impl CurrentSession {
    /// Authentication gate: the principal, or the auth error that sends
    /// the user to the login page.
    pub fn require(&self) -> Result<&Principal, AppError> {
        self.0
            .as_ref()
            .ok_or_else(|| AppError::auth("Please log in to continue."))
    }

    pub fn is_authenticated(&self) -> bool {
        self.0.is_some()
    }
}
