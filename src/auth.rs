//! Registration, login and the session predicate.
//!
//! Login is tri-state gated: the caller picks a role on the form, and
//! correct credentials with the wrong role still fail. The login-counter
//! bump is best-effort — its failure is logged and never fails the login.

use chrono::Utc;

use crate::crypto;
use crate::error::AppError;
use crate::models::{Role, User};
use crate::notify::Notifier;
use crate::session::Principal;
use crate::store::UserStore;

/// Raw registration form input. Fields arrive as strings and are
/// validated here; the password confirmation is optional (some clients
/// omit the field entirely).
#[derive(Debug, Clone, Default)]
pub struct RegistrationRequest {
    pub name: String,
    pub email: String,
    pub password: String,
    pub confirm_password: Option<String>,
    pub age: String,
    pub gender: String,
    pub role: String,
}

/// Register a new doctor or patient.
///
/// Fails with `Validation` on any missing field, password mismatch, or
/// duplicate email. On success the record is persisted with a one-way
/// password hash and a welcome email + admin event go out best-effort.
pub fn register(
    users: &dyn UserStore,
    notifier: &Notifier,
    req: RegistrationRequest,
) -> Result<(), AppError> {
    required(&req.name, "name")?;
    required(&req.email, "email")?;
    required(&req.password, "password")?;
    required(&req.age, "age")?;
    required(&req.gender, "gender")?;
    required(&req.role, "role")?;

    if let Some(confirm) = &req.confirm_password {
        if confirm != &req.password {
            return Err(AppError::validation("Passwords do not match."));
        }
    }

    let role = Role::parse(&req.role)
        .ok_or_else(|| AppError::validation("Please select a valid role."))?;
    let age: u32 = req
        .age
        .trim()
        .parse()
        .map_err(|_| AppError::validation("Please enter a valid age."))?;

    if users.get(&req.email)?.is_some() {
        return Err(AppError::validation("Email already registered."));
    }

    let user = User {
        email: req.email.clone(),
        password_hash: crypto::hash_password(&req.password),
        name: req.name.clone(),
        age,
        gender: req.gender,
        role,
        login_count: 0,
        specialization: None,
        created_at: Utc::now().to_rfc3339(),
    };
    users.put(user)?;

    notifier.send_email(
        &req.email,
        "Welcome to MediBook",
        &format!(
            "Welcome to MediBook, {}! Your account has been created successfully.",
            req.name
        ),
    );
    notifier.publish(
        &format!(
            "New user registered: {} ({}) as {}",
            req.name,
            req.email,
            role.as_str()
        ),
        "New User Registration - MediBook",
    );

    tracing::info!(email = %req.email, role = role.as_str(), "user registered");
    Ok(())
}

/// Authenticate and build the session principal.
pub fn login(
    users: &dyn UserStore,
    email: &str,
    password: &str,
    role: Role,
) -> Result<Principal, AppError> {
    let user = users
        .get(email)?
        .ok_or_else(|| AppError::auth("Email not found."))?;

    if !crypto::verify_password(password, &user.password_hash) {
        return Err(AppError::auth("Invalid password."));
    }
    if user.role != role {
        return Err(AppError::auth("Invalid role selected."));
    }

    if let Err(err) = users.increment_login_count(email) {
        tracing::warn!(%email, %err, "failed to update login count");
    }

    tracing::info!(%email, role = role.as_str(), "login successful");
    Ok(Principal {
        email: user.email,
        role: user.role,
        name: user.name,
    })
}

fn required(value: &str, field: &str) -> Result<(), AppError> {
    if value.is_empty() {
        Err(AppError::Validation(format!(
            "Please fill in the {field} field."
        )))
    } else {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{MemoryUserStore, StoreError};

    fn request(email: &str, role: &str) -> RegistrationRequest {
        RegistrationRequest {
            name: "Pat".into(),
            email: email.into(),
            password: "secret-pass".into(),
            confirm_password: Some("secret-pass".into()),
            age: "34".into(),
            gender: "f".into(),
            role: role.into(),
        }
    }

    #[test]
    fn register_rejects_missing_fields() {
        let store = MemoryUserStore::new();
        let notifier = Notifier::disabled();
        let mut req = request("p@x.com", "patient");
        req.gender = String::new();
        let err = register(&store, &notifier, req).unwrap_err();
        assert!(matches!(err, AppError::Validation(msg) if msg.contains("gender")));
        assert!(store.get("p@x.com").unwrap().is_none());
    }

    #[test]
    fn register_rejects_password_mismatch() {
        let store = MemoryUserStore::new();
        let notifier = Notifier::disabled();
        let mut req = request("p@x.com", "patient");
        req.confirm_password = Some("different".into());
        let err = register(&store, &notifier, req).unwrap_err();
        assert!(matches!(err, AppError::Validation(msg) if msg.contains("match")));
    }

    #[test]
    fn register_without_confirmation_is_accepted() {
        let store = MemoryUserStore::new();
        let notifier = Notifier::disabled();
        let mut req = request("p@x.com", "patient");
        req.confirm_password = None;
        register(&store, &notifier, req).unwrap();
        assert!(store.get("p@x.com").unwrap().is_some());
    }

    #[test]
    fn duplicate_email_fails_and_first_record_is_untouched() {
        let store = MemoryUserStore::new();
        let notifier = Notifier::disabled();
        register(&store, &notifier, request("p@x.com", "patient")).unwrap();
        let original = store.get("p@x.com").unwrap().unwrap();

        let mut second = request("p@x.com", "doctor");
        second.name = "Impostor".into();
        let err = register(&store, &notifier, second).unwrap_err();
        assert!(matches!(err, AppError::Validation(msg) if msg.contains("already registered")));

        let after = store.get("p@x.com").unwrap().unwrap();
        assert_eq!(after.name, original.name);
        assert_eq!(after.role, Role::Patient);
    }

    #[test]
    fn register_stores_hash_not_plaintext() {
        let store = MemoryUserStore::new();
        let notifier = Notifier::disabled();
        register(&store, &notifier, request("p@x.com", "patient")).unwrap();
        let user = store.get("p@x.com").unwrap().unwrap();
        assert!(!user.password_hash.contains("secret-pass"));
        assert!(crypto::verify_password("secret-pass", &user.password_hash));
    }

    #[test]
    fn login_with_wrong_role_fails_even_with_correct_credentials() {
        let store = MemoryUserStore::new();
        let notifier = Notifier::disabled();
        register(&store, &notifier, request("p@x.com", "patient")).unwrap();

        let err = login(&store, "p@x.com", "secret-pass", Role::Doctor).unwrap_err();
        assert!(matches!(err, AppError::Auth(msg) if msg.contains("role")));
    }

    #[test]
    fn login_rejects_unknown_email_and_bad_password() {
        let store = MemoryUserStore::new();
        let notifier = Notifier::disabled();
        register(&store, &notifier, request("p@x.com", "patient")).unwrap();

        assert!(matches!(
            login(&store, "ghost@x.com", "secret-pass", Role::Patient),
            Err(AppError::Auth(_))
        ));
        assert!(matches!(
            login(&store, "p@x.com", "wrong", Role::Patient),
            Err(AppError::Auth(_))
        ));
    }

    #[test]
    fn login_increments_counter() {
        let store = MemoryUserStore::new();
        let notifier = Notifier::disabled();
        register(&store, &notifier, request("p@x.com", "patient")).unwrap();

        let principal = login(&store, "p@x.com", "secret-pass", Role::Patient).unwrap();
        assert_eq!(principal.email, "p@x.com");
        assert_eq!(principal.role, Role::Patient);
        assert_eq!(store.get("p@x.com").unwrap().unwrap().login_count, 1);
    }

    /// Wraps the memory store but fails the counter bump, to prove the
    /// increment is best-effort.
    struct FlakyCounterStore(MemoryUserStore);

    impl UserStore for FlakyCounterStore {
        fn get(&self, email: &str) -> Result<Option<User>, StoreError> {
            self.0.get(email)
        }
        fn put(&self, user: User) -> Result<(), StoreError> {
            self.0.put(user)
        }
        fn increment_login_count(&self, _email: &str) -> Result<(), StoreError> {
            Err(StoreError::Unavailable("counter write refused".into()))
        }
        fn update_profile(
            &self,
            email: &str,
            update: &crate::models::ProfileUpdate,
        ) -> Result<(), StoreError> {
            self.0.update_profile(email, update)
        }
        fn scan_by_role(&self, role: Role) -> Result<Vec<User>, StoreError> {
            self.0.scan_by_role(role)
        }
    }

    #[test]
    fn counter_failure_does_not_fail_login() {
        let store = FlakyCounterStore(MemoryUserStore::new());
        let notifier = Notifier::disabled();
        register(&store.0, &notifier, request("p@x.com", "patient")).unwrap();

        let principal = login(&store, "p@x.com", "secret-pass", Role::Patient).unwrap();
        assert_eq!(principal.name, "Pat");
    }

    #[test]
    fn register_notifies_both_channels() {
        use crate::notify::testing::{RecordingMailer, RecordingPublisher};
        use std::sync::Arc;

        let store = MemoryUserStore::new();
        let mailer = Arc::new(RecordingMailer::default());
        let publisher = Arc::new(RecordingPublisher::default());
        let notifier = Notifier::new(
            Some(Box::new(mailer.clone())),
            Some(Box::new(publisher.clone())),
        );

        register(&store, &notifier, request("p@x.com", "patient")).unwrap();

        let sent = mailer.sent.lock().unwrap();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].subject, "Welcome to MediBook");
        let published = publisher.published.lock().unwrap();
        assert_eq!(published.len(), 1);
        assert!(published[0].0.contains("p@x.com"));
    }
}
