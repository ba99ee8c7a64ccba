pub mod appointment;
pub mod enums;
pub mod user;

pub use appointment::{Appointment, DiagnosisUpdate};
pub use enums::{AppointmentStatus, Role};
pub use user::{ProfileUpdate, User};
