//! In-memory reference implementation of the store seams.
//!
//! Stands in for the managed document tables in tests and local runs.
//! Two toggles exist for exercising failure paths: `fail_requests`
//! simulates a table outage, and `set_index_available(false)` makes the
//! secondary-index queries fail so callers take their scan fallback.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::RwLock;

use crate::models::{Appointment, DiagnosisUpdate, ProfileUpdate, Role, User};

use super::{AppointmentStore, StoreError, UserStore};

fn poisoned() -> StoreError {
    StoreError::Unavailable("store lock poisoned".into())
}

fn outage() -> StoreError {
    StoreError::Unavailable("simulated outage".into())
}

// ─── User table ───────────────────────────────────────────────────────────

#[derive(Default)]
pub struct MemoryUserStore {
    rows: RwLock<HashMap<String, User>>,
    fail: AtomicBool,
}

impl MemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent call fail with `Unavailable`.
    pub fn fail_requests(&self, fail: bool) {
        self.fail.store(fail, Ordering::SeqCst);
    }

    fn check(&self) -> Result<(), StoreError> {
        if self.fail.load(Ordering::SeqCst) {
            Err(outage())
        } else {
            Ok(())
        }
    }
}

impl UserStore for MemoryUserStore {
    fn get(&self, email: &str) -> Result<Option<User>, StoreError> {
        self.check()?;
        let rows = self.rows.read().map_err(|_| poisoned())?;
        Ok(rows.get(email).cloned())
    }

    fn put(&self, user: User) -> Result<(), StoreError> {
        self.check()?;
        let mut rows = self.rows.write().map_err(|_| poisoned())?;
        rows.insert(user.email.clone(), user);
        Ok(())
    }

    fn increment_login_count(&self, email: &str) -> Result<(), StoreError> {
        self.check()?;
        let mut rows = self.rows.write().map_err(|_| poisoned())?;
        if let Some(user) = rows.get_mut(email) {
            user.login_count += 1;
        }
        Ok(())
    }

    fn update_profile(&self, email: &str, update: &ProfileUpdate) -> Result<(), StoreError> {
        self.check()?;
        let mut rows = self.rows.write().map_err(|_| poisoned())?;
        if let Some(user) = rows.get_mut(email) {
            user.name = update.name.clone();
            user.age = update.age;
            user.gender = update.gender.clone();
            if let Some(spec) = &update.specialization {
                user.specialization = Some(spec.clone());
            }
        }
        Ok(())
    }

    fn scan_by_role(&self, role: Role) -> Result<Vec<User>, StoreError> {
        self.check()?;
        let rows = self.rows.read().map_err(|_| poisoned())?;
        let mut users: Vec<User> = rows.values().filter(|u| u.role == role).cloned().collect();
        users.sort_by(|a, b| a.email.cmp(&b.email));
        Ok(users)
    }
}

// ─── Appointment table ────────────────────────────────────────────────────

pub struct MemoryAppointmentStore {
    rows: RwLock<HashMap<String, Appointment>>,
    index_available: AtomicBool,
    fail: AtomicBool,
}

impl Default for MemoryAppointmentStore {
    fn default() -> Self {
        Self {
            rows: RwLock::new(HashMap::new()),
            index_available: AtomicBool::new(true),
            fail: AtomicBool::new(false),
        }
    }
}

impl MemoryAppointmentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Toggle the simulated secondary indexes. When off, the indexed
    /// queries fail with `IndexUnavailable` while scans keep working.
    pub fn set_index_available(&self, available: bool) {
        self.index_available.store(available, Ordering::SeqCst);
    }

    /// Make every subsequent call fail with `Unavailable`.
    pub fn fail_requests(&self, fail: bool) {
        self.fail.store(fail, Ordering::SeqCst);
    }

    fn check(&self) -> Result<(), StoreError> {
        if self.fail.load(Ordering::SeqCst) {
            Err(outage())
        } else {
            Ok(())
        }
    }

    fn collect(
        &self,
        filter: impl Fn(&Appointment) -> bool,
    ) -> Result<Vec<Appointment>, StoreError> {
        let rows = self.rows.read().map_err(|_| poisoned())?;
        let mut matches: Vec<Appointment> = rows.values().filter(|a| filter(a)).cloned().collect();
        matches.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        Ok(matches)
    }
}

impl AppointmentStore for MemoryAppointmentStore {
    fn get(&self, appointment_id: &str) -> Result<Option<Appointment>, StoreError> {
        self.check()?;
        let rows = self.rows.read().map_err(|_| poisoned())?;
        Ok(rows.get(appointment_id).cloned())
    }

    fn put(&self, appointment: Appointment) -> Result<(), StoreError> {
        self.check()?;
        let mut rows = self.rows.write().map_err(|_| poisoned())?;
        rows.insert(appointment.appointment_id.clone(), appointment);
        Ok(())
    }

    fn apply_diagnosis(
        &self,
        appointment_id: &str,
        update: &DiagnosisUpdate,
    ) -> Result<(), StoreError> {
        self.check()?;
        let mut rows = self.rows.write().map_err(|_| poisoned())?;
        if let Some(appt) = rows.get_mut(appointment_id) {
            appt.status = crate::models::AppointmentStatus::Completed;
            appt.diagnosis = Some(update.diagnosis.clone());
            appt.treatment_plan = Some(update.treatment_plan.clone());
            appt.prescription = Some(update.prescription.clone());
            appt.updated_at = Some(update.updated_at.clone());
        }
        Ok(())
    }

    fn query_by_doctor(&self, email: &str) -> Result<Vec<Appointment>, StoreError> {
        self.check()?;
        if !self.index_available.load(Ordering::SeqCst) {
            return Err(StoreError::IndexUnavailable);
        }
        self.collect(|a| a.doctor_email == email)
    }

    fn query_by_patient(&self, email: &str) -> Result<Vec<Appointment>, StoreError> {
        self.check()?;
        if !self.index_available.load(Ordering::SeqCst) {
            return Err(StoreError::IndexUnavailable);
        }
        self.collect(|a| a.patient_email == email)
    }

    fn scan(&self, filter: &dyn Fn(&Appointment) -> bool) -> Result<Vec<Appointment>, StoreError> {
        self.check()?;
        self.collect(filter)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::AppointmentStatus;

    fn user(email: &str, role: Role) -> User {
        User {
            email: email.into(),
            password_hash: "pbkdf2-sha256$1$AA$BB".into(),
            name: email.split('@').next().unwrap_or("user").into(),
            age: 30,
            gender: "other".into(),
            role,
            login_count: 0,
            specialization: None,
            created_at: "2026-01-01T00:00:00Z".into(),
        }
    }

    fn appointment(id: &str, doctor: &str, patient: &str) -> Appointment {
        Appointment {
            appointment_id: id.into(),
            doctor_email: doctor.into(),
            doctor_name: "Dr".into(),
            patient_email: patient.into(),
            patient_name: "Pat".into(),
            symptoms: "fever".into(),
            appointment_date: "2026-02-01".into(),
            created_at: format!("2026-01-01T00:00:0{id}Z"),
            status: AppointmentStatus::Pending,
            diagnosis: None,
            treatment_plan: None,
            prescription: None,
            updated_at: None,
        }
    }

    #[test]
    fn user_put_get_round_trip() {
        let store = MemoryUserStore::new();
        store.put(user("a@x.com", Role::Patient)).unwrap();
        let found = store.get("a@x.com").unwrap().unwrap();
        assert_eq!(found.email, "a@x.com");
        assert!(store.get("missing@x.com").unwrap().is_none());
    }

    #[test]
    fn login_counter_increments_and_ignores_unknown() {
        let store = MemoryUserStore::new();
        store.put(user("a@x.com", Role::Patient)).unwrap();
        store.increment_login_count("a@x.com").unwrap();
        store.increment_login_count("a@x.com").unwrap();
        store.increment_login_count("ghost@x.com").unwrap();
        assert_eq!(store.get("a@x.com").unwrap().unwrap().login_count, 2);
    }

    #[test]
    fn scan_by_role_filters() {
        let store = MemoryUserStore::new();
        store.put(user("d@x.com", Role::Doctor)).unwrap();
        store.put(user("p@x.com", Role::Patient)).unwrap();
        let doctors = store.scan_by_role(Role::Doctor).unwrap();
        assert_eq!(doctors.len(), 1);
        assert_eq!(doctors[0].email, "d@x.com");
    }

    #[test]
    fn profile_update_keeps_existing_specialization_when_absent() {
        let store = MemoryUserStore::new();
        let mut doc = user("d@x.com", Role::Doctor);
        doc.specialization = Some("cardiology".into());
        store.put(doc).unwrap();
        store
            .update_profile(
                "d@x.com",
                &ProfileUpdate {
                    name: "New Name".into(),
                    age: 41,
                    gender: "f".into(),
                    specialization: None,
                },
            )
            .unwrap();
        let updated = store.get("d@x.com").unwrap().unwrap();
        assert_eq!(updated.name, "New Name");
        assert_eq!(updated.specialization.as_deref(), Some("cardiology"));
    }

    #[test]
    fn indexed_queries_fail_when_index_disabled() {
        let store = MemoryAppointmentStore::new();
        store.put(appointment("1", "d@x.com", "p@x.com")).unwrap();
        assert_eq!(store.query_by_doctor("d@x.com").unwrap().len(), 1);

        store.set_index_available(false);
        assert!(matches!(
            store.query_by_doctor("d@x.com"),
            Err(StoreError::IndexUnavailable)
        ));
        // Scan keeps working while the index is down
        let scanned = store.scan(&|a| a.doctor_email == "d@x.com").unwrap();
        assert_eq!(scanned.len(), 1);
    }

    #[test]
    fn queries_are_ordered_by_creation_time() {
        let store = MemoryAppointmentStore::new();
        store.put(appointment("2", "d@x.com", "p@x.com")).unwrap();
        store.put(appointment("1", "d@x.com", "q@x.com")).unwrap();
        let all = store.query_by_doctor("d@x.com").unwrap();
        assert_eq!(all[0].appointment_id, "1");
        assert_eq!(all[1].appointment_id, "2");
    }

    #[test]
    fn outage_fails_every_call() {
        let store = MemoryAppointmentStore::new();
        store.fail_requests(true);
        assert!(store.get("1").is_err());
        assert!(store.scan(&|_| true).is_err());
        store.fail_requests(false);
        assert!(store.get("1").unwrap().is_none());
    }

    #[test]
    fn apply_diagnosis_sets_terminal_fields() {
        let store = MemoryAppointmentStore::new();
        store.put(appointment("1", "d@x.com", "p@x.com")).unwrap();
        store
            .apply_diagnosis(
                "1",
                &DiagnosisUpdate {
                    diagnosis: "flu".into(),
                    treatment_plan: "rest".into(),
                    prescription: "paracetamol".into(),
                    updated_at: "2026-02-02T00:00:00Z".into(),
                },
            )
            .unwrap();
        let appt = store.get("1").unwrap().unwrap();
        assert_eq!(appt.status, AppointmentStatus::Completed);
        assert_eq!(appt.diagnosis.as_deref(), Some("flu"));
    }
}
