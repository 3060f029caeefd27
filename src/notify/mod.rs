//! End-of-run notification

pub mod smtp;

pub use smtp::SmtpNotifier;

use crate::config::Profile;
use crate::config::constants::{FAILURE_SUBJECT, SUCCESS_SUBJECT};
use crate::error::{ReconcileError, Result};
use crate::pipeline::RunSummary;
use async_trait::async_trait;
use tracing::{error, info};

/// Subject line plus plain-text body
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub subject: String,
    pub body: String,
}

impl Notification {
    pub fn success(summary: &RunSummary) -> Self {
        Self {
            subject: SUCCESS_SUBJECT.to_string(),
            body: format!("All files have been processed successfully.\n\n{summary}."),
        }
    }

    pub fn failure(error: &ReconcileError) -> Self {
        Self {
            subject: FAILURE_SUBJECT.to_string(),
            body: format!("An error occurred during processing: {error}"),
        }
    }

    pub fn from_outcome(outcome: &Result<RunSummary>) -> Self {
        match outcome {
            Ok(summary) => Self::success(summary),
            Err(e) => Self::failure(e),
        }
    }
}

#[async_trait]
pub trait Notifier: Send + Sync {
    fn name(&self) -> &str;

    async fn send(&self, notification: &Notification) -> Result<()>;
}

/// Writes the notification to the log; used when no transport is configured
pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    fn name(&self) -> &str {
        "log"
    }

    async fn send(&self, notification: &Notification) -> Result<()> {
        info!("{}: {}", notification.subject, notification.body);
        Ok(())
    }
}

/// Pick the transport configured for a profile
pub fn notifier_for(profile: &Profile) -> Result<Box<dyn Notifier>> {
    match &profile.email {
        Some(settings) => Ok(Box::new(SmtpNotifier::from_settings(settings)?)),
        None => Ok(Box::new(LogNotifier)),
    }
}

/// Send once. Delivery failures are logged and never escalate.
pub async fn deliver(notifier: &dyn Notifier, notification: &Notification) -> bool {
    match notifier.send(notification).await {
        Ok(()) => {
            info!("Notification sent via {}.", notifier.name());
            true
        }
        Err(e) => {
            error!("Error sending notification via {}: {}", notifier.name(), e);
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use std::sync::Mutex;

    struct Recording {
        sent: Mutex<Vec<Notification>>,
        fail: bool,
    }

    #[async_trait]
    impl Notifier for Recording {
        fn name(&self) -> &str {
            "recording"
        }

        async fn send(&self, notification: &Notification) -> Result<()> {
            if self.fail {
                return Err(ReconcileError::notify("connection refused"));
            }
            self.sent.lock().unwrap().push(notification.clone());
            Ok(())
        }
    }

    #[test]
    fn test_failure_body_carries_cause() {
        let outcome: Result<RunSummary> =
            Err(ReconcileError::EmptyReference(PathBuf::from("ref.csv")));
        let notification = Notification::from_outcome(&outcome);

        assert_eq!(notification.subject, "Processing Failed");
        assert_eq!(
            notification.body,
            "An error occurred during processing: Reference dataset \"ref.csv\" has no rows"
        );
    }

    #[test]
    fn test_success_body_has_summary() {
        let summary = RunSummary {
            discovered: 3,
            skipped: 1,
            written: 1,
            incomplete: 1,
            ..RunSummary::default()
        };
        let notification = Notification::success(&summary);

        assert_eq!(notification.subject, "Processing Completed Successfully");
        assert!(notification.body.contains("3 batches found"));
        assert!(notification.body.contains("1 incomplete"));
    }

    #[tokio::test]
    async fn test_deliver_swallows_transport_failure() {
        let notifier = Recording {
            sent: Mutex::new(Vec::new()),
            fail: true,
        };
        let notification = Notification::success(&RunSummary::default());
        assert!(!deliver(&notifier, &notification).await);
    }

    #[tokio::test]
    async fn test_deliver_sends_once() {
        let notifier = Recording {
            sent: Mutex::new(Vec::new()),
            fail: false,
        };
        let notification = Notification::success(&RunSummary::default());
        assert!(deliver(&notifier, &notification).await);
        assert_eq!(notifier.sent.lock().unwrap().as_slice(), [notification]);
    }
}
