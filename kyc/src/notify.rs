//! Post-commit customer notifications.
//!
//! Notifications are strictly best-effort and strictly after the fact:
//! they are dispatched only once the state change has committed, and a
//! delivery failure is logged, never propagated back into the request.

use std::sync::Arc;
use thiserror::Error;
use verity_types::SubmissionId;

#[derive(Debug, Error)]
#[error("notification delivery failed: {0}")]
pub struct NotifyError(pub String);

/// A customer-facing event worth a message.
#[derive(Clone, Debug)]
pub enum Notification {
    SubmissionReceived {
        email: String,
        submission_id: SubmissionId,
    },
    SubmissionApproved {
        email: String,
        submission_id: SubmissionId,
    },
    SubmissionRejected {
        email: String,
        submission_id: SubmissionId,
        reason: String,
    },
}

/// Delivery backend. The shipped implementation logs; a mail or SMS
/// gateway slots in behind the same trait.
pub trait Notifier: Send + Sync {
    fn send(&self, notification: &Notification) -> Result<(), NotifyError>;
}

/// Notifier that records deliveries in the trace log.
#[derive(Clone, Copy, Debug, Default)]
pub struct TraceNotifier;

impl Notifier for TraceNotifier {
    fn send(&self, notification: &Notification) -> Result<(), NotifyError> {
        match notification {
            Notification::SubmissionReceived {
                email,
                submission_id,
            } => {
                tracing::info!(%submission_id, email, "would notify: submission received");
            }
            Notification::SubmissionApproved {
                email,
                submission_id,
            } => {
                tracing::info!(%submission_id, email, "would notify: submission approved");
            }
            Notification::SubmissionRejected {
                email,
                submission_id,
                reason,
            } => {
                tracing::info!(%submission_id, email, reason, "would notify: submission rejected");
            }
        }
        Ok(())
    }
}

/// Fire-and-forget dispatch. Runs on the async runtime when one is
/// available; otherwise sends inline (tests and tools without a
/// runtime). Failures are logged and dropped.
pub fn dispatch(notifier: Arc<dyn Notifier>, notification: Notification) {
    let deliver = move || {
        if let Err(err) = notifier.send(&notification) {
            tracing::warn!(%err, "notification dropped");
        }
    };
    match tokio::runtime::Handle::try_current() {
        Ok(handle) => {
            handle.spawn(async move { deliver() });
        }
        Err(_) => deliver(),
    }
}
