//! Appointment lifecycle and role-gated operations.
//!
//! Every operation takes the caller's `Principal` explicitly and checks
//! its gates before touching the store. Gate order is fixed: role gate
//! (auth error, redirect-to-login semantics), then ownership gate
//! (forbidden, redirect-to-dashboard, no detail leaked), then the
//! operation itself. No downstream work runs when a gate fails.
//!
//! The state machine is two-valued: pending → completed, once, by the
//! assigned doctor. There is no cancellation or rejection path.

use chrono::Utc;
use uuid::Uuid;

use crate::error::AppError;
use crate::models::{Appointment, AppointmentStatus, DiagnosisUpdate, ProfileUpdate, Role, User};
use crate::notify::Notifier;
use crate::session::Principal;
use crate::store::{AppointmentStore, StoreError, UserStore};

// ─── Guards ───────────────────────────────────────────────────────────────

/// Role gate: the principal must hold `role`.
pub fn require_role(principal: &Principal, role: Role, denied: &str) -> Result<(), AppError> {
    if principal.role == role {
        Ok(())
    } else {
        Err(AppError::auth(denied))
    }
}

/// Ownership gate: the principal must be the recorded party on the
/// appointment for their role.
fn require_party(principal: &Principal, appointment: &Appointment) -> Result<(), AppError> {
    if appointment.is_party(&principal.email, principal.role) {
        Ok(())
    } else {
        Err(AppError::Forbidden)
    }
}

// ─── Booking ──────────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct BookingRequest {
    pub doctor_email: String,
    pub symptoms: String,
    /// Defaults to the booking time when the form leaves it empty.
    pub appointment_date: Option<String>,
}

/// Book a new appointment (patients only).
///
/// Display names for both parties are resolved from the user store; a
/// missing record falls back to a generic placeholder rather than
/// failing the booking. Both parties are emailed and an admin event is
/// published, all best-effort — the booking stands regardless.
pub fn book(
    users: &dyn UserStore,
    appointments: &dyn AppointmentStore,
    notifier: &Notifier,
    principal: &Principal,
    req: BookingRequest,
) -> Result<Appointment, AppError> {
    require_role(principal, Role::Patient, "Only patients can book appointments.")?;

    if req.doctor_email.is_empty() || req.symptoms.is_empty() {
        return Err(AppError::validation("Please fill all required fields."));
    }

    let patient_name = display_name(users, &principal.email, "Patient")?;
    let doctor_name = display_name(users, &req.doctor_email, "Doctor")?;

    let now = Utc::now().to_rfc3339();
    let appointment = Appointment {
        appointment_id: Uuid::new_v4().to_string(),
        doctor_email: req.doctor_email,
        doctor_name,
        patient_email: principal.email.clone(),
        patient_name,
        symptoms: req.symptoms,
        appointment_date: req.appointment_date.unwrap_or_else(|| now.clone()),
        created_at: now,
        status: AppointmentStatus::Pending,
        diagnosis: None,
        treatment_plan: None,
        prescription: None,
        updated_at: None,
    };
    appointments.put(appointment.clone())?;
    tracing::info!(
        appointment_id = %appointment.appointment_id,
        patient = %appointment.patient_email,
        doctor = %appointment.doctor_email,
        "appointment booked"
    );

    notifier.send_email(
        &appointment.doctor_email,
        "New Appointment Notification",
        &format!(
            "Dear Dr. {},\n\nA new appointment has been booked by {}.\n\n\
             Symptoms: {}\nDate: {}\n\nPlease login to view details.",
            appointment.doctor_name,
            appointment.patient_name,
            appointment.symptoms,
            appointment.appointment_date
        ),
    );
    notifier.send_email(
        &appointment.patient_email,
        "Appointment Confirmation",
        &format!(
            "Dear {},\n\nYour appointment with Dr. {} has been booked successfully.\n\n\
             Date: {}\n\nThank you for using our service.",
            appointment.patient_name, appointment.doctor_name, appointment.appointment_date
        ),
    );
    notifier.publish(
        &format!(
            "New appointment booked: Patient {} with Dr. {} for date {}",
            appointment.patient_name, appointment.doctor_name, appointment.appointment_date
        ),
        "New Appointment Booked - MediBook",
    );

    Ok(appointment)
}

/// Resolve a display name, defaulting to a placeholder for absent
/// records. Store failures still propagate — only absence is tolerated.
fn display_name(
    users: &dyn UserStore,
    email: &str,
    placeholder: &str,
) -> Result<String, AppError> {
    Ok(users
        .get(email)?
        .map(|u| u.name)
        .unwrap_or_else(|| placeholder.to_string()))
}

// ─── Diagnosis ────────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct DiagnosisRequest {
    pub diagnosis: String,
    pub treatment_plan: String,
    pub prescription: String,
}

/// Complete an appointment with the doctor's findings.
///
/// Only the assigned doctor may diagnose, and only once: a second
/// diagnosis on a completed appointment is a conflict, not an
/// overwrite. The patient is emailed best-effort.
pub fn diagnose(
    appointments: &dyn AppointmentStore,
    notifier: &Notifier,
    principal: &Principal,
    appointment_id: &str,
    req: DiagnosisRequest,
) -> Result<Appointment, AppError> {
    require_role(principal, Role::Doctor, "Only doctors can submit a diagnosis.")?;

    let appointment = appointments
        .get(appointment_id)?
        .ok_or_else(|| AppError::NotFound("Appointment".into()))?;
    require_party(principal, &appointment)?;

    if appointment.status == AppointmentStatus::Completed {
        return Err(AppError::validation(
            "This appointment has already been completed.",
        ));
    }

    let update = DiagnosisUpdate {
        diagnosis: req.diagnosis,
        treatment_plan: req.treatment_plan,
        prescription: req.prescription,
        updated_at: Utc::now().to_rfc3339(),
    };
    appointments.apply_diagnosis(appointment_id, &update)?;
    tracing::info!(%appointment_id, doctor = %principal.email, "diagnosis submitted");

    notifier.send_email(
        &appointment.patient_email,
        "Appointment Completed - Diagnosis Available",
        &format!(
            "Dear {},\n\nYour appointment with Dr. {} has been completed.\n\n\
             Diagnosis: {}\n\nTreatment Plan: {}\n\nThank you for using our service.",
            appointment.patient_name,
            appointment.doctor_name,
            update.diagnosis,
            update.treatment_plan
        ),
    );

    let mut completed = appointment;
    completed.status = AppointmentStatus::Completed;
    completed.diagnosis = Some(update.diagnosis);
    completed.treatment_plan = Some(update.treatment_plan);
    completed.prescription = Some(update.prescription);
    completed.updated_at = Some(update.updated_at);
    Ok(completed)
}

// ─── Reads ────────────────────────────────────────────────────────────────

/// Fetch one appointment, enforcing the ownership gate.
pub fn view(
    appointments: &dyn AppointmentStore,
    principal: &Principal,
    appointment_id: &str,
) -> Result<Appointment, AppError> {
    let appointment = appointments
        .get(appointment_id)?
        .ok_or_else(|| AppError::NotFound("Appointment".into()))?;
    require_party(principal, &appointment)?;
    Ok(appointment)
}

/// Role-conditional substring search among the caller's own
/// appointments. Doctors match on patient name; patients match on
/// doctor name or status. A failing store degrades to an empty result —
/// search never errors toward the caller.
pub fn search(
    appointments: &dyn AppointmentStore,
    principal: &Principal,
    term: &str,
) -> Vec<Appointment> {
    let result = match principal.role {
        Role::Doctor => appointments.scan(&|a| {
            a.doctor_email == principal.email && a.patient_name.contains(term)
        }),
        Role::Patient => appointments.scan(&|a| {
            a.patient_email == principal.email
                && (a.doctor_name.contains(term) || a.status.as_str().contains(term))
        }),
    };
    match result {
        Ok(matches) => matches,
        Err(err) => {
            tracing::warn!(email = %principal.email, %err, "search failed, returning empty");
            Vec::new()
        }
    }
}

/// Result of `list_for_user`: `degraded` marks lists served from the
/// scan fallback (or empty after both paths failed) — an explicit
/// availability-over-latency policy, surfaced so callers can tell.
#[derive(Debug, Clone)]
pub struct ListOutcome {
    pub appointments: Vec<Appointment>,
    pub degraded: bool,
}

/// All appointments where the principal is a party. Prefers the
/// secondary index, transparently falling back to a filtered scan when
/// the index is unavailable.
pub fn list_for_user(appointments: &dyn AppointmentStore, principal: &Principal) -> ListOutcome {
    let indexed = match principal.role {
        Role::Doctor => appointments.query_by_doctor(&principal.email),
        Role::Patient => appointments.query_by_patient(&principal.email),
    };
    let err = match indexed {
        Ok(list) => {
            return ListOutcome {
                appointments: list,
                degraded: false,
            }
        }
        Err(err) => err,
    };

    if !matches!(err, StoreError::IndexUnavailable) {
        tracing::warn!(email = %principal.email, %err, "indexed appointment lookup failed");
    }
    let fallback = appointments.scan(&|a| a.is_party(&principal.email, principal.role));
    match fallback {
        Ok(list) => {
            tracing::warn!(
                email = %principal.email,
                count = list.len(),
                "served appointment list from scan fallback"
            );
            ListOutcome {
                appointments: list,
                degraded: true,
            }
        }
        Err(err) => {
            tracing::warn!(email = %principal.email, %err, "fallback scan failed");
            ListOutcome {
                appointments: Vec::new(),
                degraded: true,
            }
        }
    }
}

// ─── Profile & directory ──────────────────────────────────────────────────

/// Overwrite the caller's profile. Name/age/gender always overwrite;
/// specialization is persisted only for doctors and silently dropped
/// for patients.
pub fn update_profile(
    users: &dyn UserStore,
    principal: &Principal,
    mut update: ProfileUpdate,
) -> Result<(), AppError> {
    if principal.role != Role::Doctor {
        update.specialization = None;
    }
    users.update_profile(&principal.email, &update)?;
    tracing::info!(email = %principal.email, "profile updated");
    Ok(())
}

/// Registered doctors, for the booking form and patient dashboard.
/// Scan failure degrades to an empty directory.
pub fn list_doctors(users: &dyn UserStore) -> Vec<User> {
    match users.scan_by_role(Role::Doctor) {
        Ok(doctors) => doctors,
        Err(err) => {
            tracing::warn!(%err, "failed to fetch doctors");
            Vec::new()
        }
    }
}
