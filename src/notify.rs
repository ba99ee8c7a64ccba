//! Best-effort notification fan-out: email and a pub/sub topic.
//!
//! Delivery transport lives behind the `Mailer`/`Publisher` seams — the
//! crate ships tracing-backed implementations and the deployment can
//! swap in real SMTP/topic clients. Policy is fixed regardless of
//! implementation: a disabled channel is skipped silently (debug log),
//! a failing channel is logged at warn and swallowed. Notification
//! outcome never affects the triggering operation.

use thiserror::Error;

use crate::config::AppConfig;

#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("delivery failed: {0}")]
    Delivery(String),
}

pub trait Mailer: Send + Sync {
    fn send(&self, to: &str, subject: &str, body: &str) -> Result<(), NotifyError>;
}

pub trait Publisher: Send + Sync {
    fn publish(&self, message: &str, subject: &str) -> Result<(), NotifyError>;
}

/// Fan-out facade held in the router state. `None` channels are the
/// disabled state (feature flag off, or no topic configured).
pub struct Notifier {
    mailer: Option<Box<dyn Mailer>>,
    publisher: Option<Box<dyn Publisher>>,
}

impl Notifier {
    pub fn new(mailer: Option<Box<dyn Mailer>>, publisher: Option<Box<dyn Publisher>>) -> Self {
        Self { mailer, publisher }
    }

    /// Both channels off.
    pub fn disabled() -> Self {
        Self::new(None, None)
    }

    /// Wire channels from the feature flags. The pub/sub channel also
    /// requires a configured topic.
    pub fn from_config(config: &AppConfig) -> Self {
        let mailer: Option<Box<dyn Mailer>> = if config.enable_email {
            Some(Box::new(TracingMailer))
        } else {
            None
        };
        let publisher: Option<Box<dyn Publisher>> = match (&config.sns_topic, config.enable_sns) {
            (Some(topic), true) => Some(Box::new(TracingPublisher {
                topic: topic.clone(),
            })),
            _ => None,
        };
        Self::new(mailer, publisher)
    }

    /// Send an email, best-effort.
    pub fn send_email(&self, to: &str, subject: &str, body: &str) {
        let Some(mailer) = &self.mailer else {
            tracing::debug!(%to, subject, "email disabled, skipping");
            return;
        };
        match mailer.send(to, subject, body) {
            Ok(()) => tracing::info!(%to, subject, "email sent"),
            Err(err) => tracing::warn!(%to, subject, %err, "email delivery failed"),
        }
    }

    /// Publish to the topic, best-effort.
    pub fn publish(&self, message: &str, subject: &str) {
        let Some(publisher) = &self.publisher else {
            tracing::debug!(subject, "pub/sub disabled, skipping");
            return;
        };
        match publisher.publish(message, subject) {
            Ok(()) => tracing::info!(subject, "event published"),
            Err(err) => tracing::warn!(subject, %err, "event publish failed"),
        }
    }
}

/// Logs the would-be email. Body is deliberately not logged in full —
/// it can carry diagnosis text.
struct TracingMailer;

impl Mailer for TracingMailer {
    fn send(&self, to: &str, subject: &str, body: &str) -> Result<(), NotifyError> {
        tracing::info!(%to, subject, body_len = body.len(), "outbound email");
        Ok(())
    }
}

struct TracingPublisher {
    topic: String,
}

impl Publisher for TracingPublisher {
    fn publish(&self, message: &str, subject: &str) -> Result<(), NotifyError> {
        tracing::info!(topic = %self.topic, subject, message, "outbound event");
        Ok(())
    }
}
