use serde::{Deserialize, Serialize};

use super::enums::{AppointmentStatus, Role};

/// A booking between exactly one patient and one doctor, keyed by a
/// generated id. Party display names are denormalized at booking time so
/// list views need no extra user lookups.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Appointment {
    pub appointment_id: String,
    pub doctor_email: String,
    pub doctor_name: String,
    pub patient_email: String,
    pub patient_name: String,
    pub symptoms: String,
    pub appointment_date: String,
    pub created_at: String,
    pub status: AppointmentStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub diagnosis: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub treatment_plan: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prescription: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

impl Appointment {
    /// Whether `email`, acting as `role`, is the recorded party on this
    /// appointment. Doctors are matched against `doctor_email`, patients
    /// against `patient_email`.
    pub fn is_party(&self, email: &str, role: Role) -> bool {
        match role {
            Role::Doctor => self.doctor_email == email,
            Role::Patient => self.patient_email == email,
        }
    }
}

/// The single permitted mutation: pending → completed with the doctor's
/// findings. Applied at most once per appointment.
#[derive(Debug, Clone)]
pub struct DiagnosisUpdate {
    pub diagnosis: String,
    pub treatment_plan: String,
    pub prescription: String,
    pub updated_at: String,
}
