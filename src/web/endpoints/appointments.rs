//! Booking, viewing, diagnosing and searching appointments.

use axum::extract::{Path, State};
use axum::http::header::HeaderMap;
use axum::response::{IntoResponse, Response};
use axum::{Extension, Form};
use serde::Deserialize;

use crate::appointments::{self, BookingRequest, DiagnosisRequest};
use crate::error::AppError;
use crate::models::Role;

use super::super::error::{redirect_with_flash, WebError};
use super::super::flash::Flash;
use super::super::types::{AppContext, CurrentSession};
use super::super::views;
use super::{pending_flash, render};

/// `GET /book_appointment` — booking form with the doctor directory.
pub async fn book_form(
    State(ctx): State<AppContext>,
    Extension(session): Extension<CurrentSession>,
    headers: HeaderMap,
) -> Result<Response, WebError> {
    let principal = session.require()?;
    appointments::require_role(principal, Role::Patient, "Only patients can book appointments.")?;

    let doctors = appointments::list_doctors(ctx.users.as_ref());
    let flash = pending_flash(&headers);
    Ok(render(
        flash.clone(),
        views::book_page(&doctors, flash.as_ref()),
    ))
}

#[derive(Debug, Deserialize)]
pub struct BookForm {
    #[serde(default)]
    pub doctor_email: String,
    #[serde(default)]
    pub symptoms: String,
    #[serde(default)]
    pub appointment_date: String,
}

/// `POST /book_appointment`
pub async fn book_submit(
    State(ctx): State<AppContext>,
    Extension(session): Extension<CurrentSession>,
    Form(form): Form<BookForm>,
) -> Result<Response, WebError> {
    let principal = session.require()?;

    let request = BookingRequest {
        doctor_email: form.doctor_email,
        symptoms: form.symptoms,
        appointment_date: (!form.appointment_date.is_empty()).then_some(form.appointment_date),
    };
    match appointments::book(
        ctx.users.as_ref(),
        ctx.appointments.as_ref(),
        ctx.notifier.as_ref(),
        principal,
        request,
    ) {
        Ok(_) => Ok(redirect_with_flash(
            "/dashboard",
            Flash::success("Appointment booked successfully."),
        )),
        Err(AppError::Validation(msg)) => {
            Ok(redirect_with_flash("/book_appointment", Flash::danger(msg)))
        }
        Err(AppError::Dependency(detail)) => {
            tracing::error!(%detail, "booking failed");
            Ok(redirect_with_flash(
                "/book_appointment",
                Flash::danger("An error occurred while booking the appointment. Please try again."),
            ))
        }
        Err(err) => Err(err.into()),
    }
}

/// `GET /view_appointment/:id` — detail view for either party.
pub async fn view(
    State(ctx): State<AppContext>,
    Extension(session): Extension<CurrentSession>,
    headers: HeaderMap,
    Path(appointment_id): Path<String>,
) -> Result<Response, WebError> {
    let principal = session.require()?;
    let appointment = appointments::view(ctx.appointments.as_ref(), principal, &appointment_id)?;

    let flash = pending_flash(&headers);
    Ok(render(
        flash.clone(),
        views::appointment_page(principal, &appointment, flash.as_ref()),
    ))
}

#[derive(Debug, Deserialize)]
pub struct DiagnosisForm {
    #[serde(default)]
    pub diagnosis: String,
    #[serde(default)]
    pub treatment_plan: String,
    #[serde(default)]
    pub prescription: String,
}

/// `POST /submit_diagnosis/:id` — assigned doctor completes the
/// appointment.
pub async fn submit_diagnosis(
    State(ctx): State<AppContext>,
    Extension(session): Extension<CurrentSession>,
    Path(appointment_id): Path<String>,
    Form(form): Form<DiagnosisForm>,
) -> Result<Response, WebError> {
    let principal = session.require()?;

    let request = DiagnosisRequest {
        diagnosis: form.diagnosis,
        treatment_plan: form.treatment_plan,
        prescription: form.prescription,
    };
    match appointments::diagnose(
        ctx.appointments.as_ref(),
        ctx.notifier.as_ref(),
        principal,
        &appointment_id,
        request,
    ) {
        Ok(_) => Ok(redirect_with_flash(
            "/dashboard",
            Flash::success("Diagnosis submitted successfully."),
        )),
        // Conflict (already completed): back to the record with the message
        Err(AppError::Validation(msg)) => Ok(redirect_with_flash(
            &format!("/view_appointment/{appointment_id}"),
            Flash::danger(msg),
        )),
        Err(err) => Err(err.into()),
    }
}

/// `GET /search_appointments`
pub async fn search_form(
    Extension(session): Extension<CurrentSession>,
    headers: HeaderMap,
) -> Result<Response, WebError> {
    session.require()?;
    let flash = pending_flash(&headers);
    Ok(render(
        flash.clone(),
        views::search_page(None, flash.as_ref()),
    ))
}

#[derive(Debug, Deserialize)]
pub struct SearchForm {
    #[serde(default)]
    pub search_term: String,
}

/// `POST /search_appointments` — never errors: a failing store reads as
/// no results.
pub async fn search_submit(
    State(ctx): State<AppContext>,
    Extension(session): Extension<CurrentSession>,
    Form(form): Form<SearchForm>,
) -> Result<Response, WebError> {
    let principal = session.require()?;

    let results = appointments::search(ctx.appointments.as_ref(), principal, &form.search_term);
    Ok(views::search_page(
        Some((form.search_term.as_str(), results.as_slice())),
        None,
    )
    .into_response())
}
