//! Minimal server-side HTML rendering.
//!
//! Deliberately thin: plain escaped string assembly behind one page
//! shell. The handlers pass already-authorized data in; nothing here
//! reads stores or sessions.

use axum::response::Html;

use crate::models::{Appointment, AppointmentStatus, Role, User};
use crate::session::Principal;

use super::flash::{Flash, FlashLevel};

/// Escape text for safe interpolation into HTML.
pub fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Common page shell with optional flash banner.
pub fn page(title: &str, flash: Option<&Flash>, body: &str) -> Html<String> {
    let banner = match flash {
        Some(f) => {
            let class = match f.level {
                FlashLevel::Success => "flash success",
                FlashLevel::Danger => "flash danger",
            };
            format!("<p class=\"{class}\">{}</p>", escape(&f.message))
        }
        None => String::new(),
    };
    Html(format!(
        "<!DOCTYPE html>\n<html><head><title>{} - MediBook</title></head>\n\
         <body><h1>MediBook</h1>{banner}\n{body}\n</body></html>",
        escape(title)
    ))
}

pub fn index_page(flash: Option<&Flash>) -> Html<String> {
    page(
        "Welcome",
        flash,
        "<p>Book and manage healthcare appointments.</p>\
         <p><a href=\"/login\">Login</a> | <a href=\"/register\">Register</a></p>",
    )
}

pub fn register_page(flash: Option<&Flash>) -> Html<String> {
    page(
        "Register",
        flash,
        "<form method=\"post\" action=\"/register\">\
         <input name=\"name\" placeholder=\"Name\">\
         <input name=\"email\" placeholder=\"Email\">\
         <input name=\"password\" type=\"password\" placeholder=\"Password\">\
         <input name=\"confirm_password\" type=\"password\" placeholder=\"Confirm password\">\
         <input name=\"age\" placeholder=\"Age\">\
         <select name=\"gender\"><option value=\"\">Gender</option>\
         <option>female</option><option>male</option><option>other</option></select>\
         <select name=\"role\"><option value=\"\">Role</option>\
         <option value=\"patient\">Patient</option><option value=\"doctor\">Doctor</option></select>\
         <button type=\"submit\">Register</button></form>",
    )
}

pub fn login_page(flash: Option<&Flash>) -> Html<String> {
    page(
        "Login",
        flash,
        "<form method=\"post\" action=\"/login\">\
         <input name=\"email\" placeholder=\"Email\">\
         <input name=\"password\" type=\"password\" placeholder=\"Password\">\
         <select name=\"role\"><option value=\"\">Login as</option>\
         <option value=\"patient\">Patient</option><option value=\"doctor\">Doctor</option></select>\
         <button type=\"submit\">Login</button></form>",
    )
}

pub fn dashboard_page(
    principal: &Principal,
    appointments: &[Appointment],
    doctors: &[User],
    degraded: bool,
    flash: Option<&Flash>,
) -> Html<String> {
    let mut body = format!(
        "<p>Welcome, {} ({}).</p>\
         <p><a href=\"/profile\">Profile</a> | \
         <a href=\"/search_appointments\">Search</a> | \
         <a href=\"/logout\">Logout</a></p>",
        escape(&principal.name),
        principal.role.as_str()
    );
    if degraded {
        body.push_str("<p class=\"notice\">Showing partial results.</p>");
    }
    body.push_str("<h2>Your appointments</h2>");
    body.push_str(&appointment_table(appointments));
    if principal.role == Role::Patient {
        body.push_str("<h2>Doctors</h2><ul>");
        for doctor in doctors {
            let spec = doctor
                .specialization
                .as_deref()
                .unwrap_or("general practice");
            body.push_str(&format!(
                "<li>Dr. {} — {} ({})</li>",
                escape(&doctor.name),
                escape(spec),
                escape(&doctor.email)
            ));
        }
        body.push_str("</ul><p><a href=\"/book_appointment\">Book an appointment</a></p>");
    }
    page("Dashboard", flash, &body)
}

pub fn book_page(doctors: &[User], flash: Option<&Flash>) -> Html<String> {
    let mut options = String::new();
    for doctor in doctors {
        options.push_str(&format!(
            "<option value=\"{}\">Dr. {}</option>",
            escape(&doctor.email),
            escape(&doctor.name)
        ));
    }
    page(
        "Book Appointment",
        flash,
        &format!(
            "<form method=\"post\" action=\"/book_appointment\">\
             <select name=\"doctor_email\"><option value=\"\">Choose a doctor</option>{options}</select>\
             <textarea name=\"symptoms\" placeholder=\"Symptoms\"></textarea>\
             <input name=\"appointment_date\" type=\"date\">\
             <button type=\"submit\">Book</button></form>"
        ),
    )
}

pub fn appointment_page(
    principal: &Principal,
    appointment: &Appointment,
    flash: Option<&Flash>,
) -> Html<String> {
    let mut body = format!(
        "<h2>Appointment {}</h2>\
         <p>Patient: {} ({})</p>\
         <p>Doctor: Dr. {} ({})</p>\
         <p>Date: {}</p>\
         <p>Symptoms: {}</p>\
         <p>Status: {}</p>",
        escape(&appointment.appointment_id),
        escape(&appointment.patient_name),
        escape(&appointment.patient_email),
        escape(&appointment.doctor_name),
        escape(&appointment.doctor_email),
        escape(&appointment.appointment_date),
        escape(&appointment.symptoms),
        appointment.status.as_str()
    );
    if appointment.status == AppointmentStatus::Completed {
        body.push_str(&format!(
            "<h3>Findings</h3>\
             <p>Diagnosis: {}</p><p>Treatment plan: {}</p><p>Prescription: {}</p>",
            escape(appointment.diagnosis.as_deref().unwrap_or("")),
            escape(appointment.treatment_plan.as_deref().unwrap_or("")),
            escape(appointment.prescription.as_deref().unwrap_or(""))
        ));
    } else if principal.role == Role::Doctor {
        body.push_str(&format!(
            "<h3>Submit diagnosis</h3>\
             <form method=\"post\" action=\"/submit_diagnosis/{}\">\
             <textarea name=\"diagnosis\" placeholder=\"Diagnosis\"></textarea>\
             <textarea name=\"treatment_plan\" placeholder=\"Treatment plan\"></textarea>\
             <textarea name=\"prescription\" placeholder=\"Prescription\"></textarea>\
             <button type=\"submit\">Submit</button></form>",
            escape(&appointment.appointment_id)
        ));
    }
    body.push_str("<p><a href=\"/dashboard\">Back to dashboard</a></p>");
    page("Appointment", flash, &body)
}

pub fn search_page(
    results: Option<(&str, &[Appointment])>,
    flash: Option<&Flash>,
) -> Html<String> {
    let mut body = String::from(
        "<form method=\"post\" action=\"/search_appointments\">\
         <input name=\"search_term\" placeholder=\"Search\">\
         <button type=\"submit\">Search</button></form>",
    );
    if let Some((term, appointments)) = results {
        body.push_str(&format!("<h2>Results for \"{}\"</h2>", escape(term)));
        body.push_str(&appointment_table(appointments));
    }
    body.push_str("<p><a href=\"/dashboard\">Back to dashboard</a></p>");
    page("Search Appointments", flash, &body)
}

pub fn profile_page(user: &User, flash: Option<&Flash>) -> Html<String> {
    let specialization = if user.role == Role::Doctor {
        format!(
            "<input name=\"specialization\" value=\"{}\" placeholder=\"Specialization\">",
            escape(user.specialization.as_deref().unwrap_or(""))
        )
    } else {
        String::new()
    };
    page(
        "Profile",
        flash,
        &format!(
            "<form method=\"post\" action=\"/profile\">\
             <input name=\"name\" value=\"{}\">\
             <input name=\"age\" value=\"{}\">\
             <input name=\"gender\" value=\"{}\">\
             {specialization}\
             <button type=\"submit\">Save</button></form>\
             <p><a href=\"/dashboard\">Back to dashboard</a></p>",
            escape(&user.name),
            user.age,
            escape(&user.gender)
        ),
    )
}

pub fn not_found_page() -> Html<String> {
    page(
        "Not Found",
        None,
        "<p>The page you requested does not exist.</p>\
         <p><a href=\"/\">Home</a></p>",
    )
}

fn appointment_table(appointments: &[Appointment]) -> String {
    if appointments.is_empty() {
        return "<p>No appointments.</p>".to_string();
    }
    let mut table = String::from(
        "<table><tr><th>Date</th><th>Doctor</th><th>Patient</th>\
         <th>Status</th><th></th></tr>",
    );
    for appt in appointments {
        table.push_str(&format!(
            "<tr><td>{}</td><td>Dr. {}</td><td>{}</td><td>{}</td>\
             <td><a href=\"/view_appointment/{}\">view</a></td></tr>",
            escape(&appt.appointment_date),
            escape(&appt.doctor_name),
            escape(&appt.patient_name),
            appt.status.as_str(),
            escape(&appt.appointment_id)
        ));
    }
    table.push_str("</table>");
    table
}
