//! Trait seams for the external document store.
//!
//! The real deployment owns two managed key-value tables (users keyed by
//! email, appointments keyed by id, with secondary indexes on the party
//! emails). The core only speaks these traits; `memory` provides the
//! reference implementation used by tests and local runs.
//!
//! Neither table supports delete — users and appointments are never
//! removed, only created and updated.

pub mod memory;

pub use memory::{MemoryAppointmentStore, MemoryUserStore};

use thiserror::Error;

use crate::models::{Appointment, DiagnosisUpdate, ProfileUpdate, Role, User};

#[derive(Debug, Error)]
pub enum StoreError {
    /// The secondary index is missing or unusable. Callers with a scan
    /// fallback should take it; everything else treats this like any
    /// other dependency failure.
    #[error("secondary index unavailable")]
    IndexUnavailable,

    #[error("store unavailable: {0}")]
    Unavailable(String),
}

/// User table: key = email.
pub trait UserStore: Send + Sync {
    fn get(&self, email: &str) -> Result<Option<User>, StoreError>;

    /// Create (or overwrite — the document store has put semantics; the
    /// core pre-checks for duplicates at registration).
    fn put(&self, user: User) -> Result<(), StoreError>;

    /// Monotonic login counter bump. No-op for unknown emails.
    fn increment_login_count(&self, email: &str) -> Result<(), StoreError>;

    /// Partial attribute update for profile edits. No-op for unknown
    /// emails.
    fn update_profile(&self, email: &str, update: &ProfileUpdate) -> Result<(), StoreError>;

    /// Filtered full-table scan, used for the doctor directory.
    fn scan_by_role(&self, role: Role) -> Result<Vec<User>, StoreError>;
}

/// Appointment table: key = appointment_id, secondary indexes on
/// doctor_email and patient_email.
pub trait AppointmentStore: Send + Sync {
    fn get(&self, appointment_id: &str) -> Result<Option<Appointment>, StoreError>;

    fn put(&self, appointment: Appointment) -> Result<(), StoreError>;

    /// Apply the terminal diagnosis update: status becomes completed and
    /// the findings fields are set. No-op for unknown ids (the core
    /// resolves the record first).
    fn apply_diagnosis(
        &self,
        appointment_id: &str,
        update: &DiagnosisUpdate,
    ) -> Result<(), StoreError>;

    /// Indexed lookup by doctor email. May fail with `IndexUnavailable`.
    fn query_by_doctor(&self, email: &str) -> Result<Vec<Appointment>, StoreError>;

    /// Indexed lookup by patient email. May fail with `IndexUnavailable`.
    fn query_by_patient(&self, email: &str) -> Result<Vec<Appointment>, StoreError>;

    /// Filtered full-table scan: the fallback path for both indexes and
    /// the substring-search path.
    fn scan(&self, filter: &dyn Fn(&Appointment) -> bool) -> Result<Vec<Appointment>, StoreError>;
}
