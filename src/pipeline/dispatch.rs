//! Notification dispatch.
//!
//! Turns change events into messages and hands them to the sink. Delivery
//! failures are logged and reported back as `false`; they never propagate.

use crate::error::AppError;
use crate::models::ChangeEvent;
use crate::services::{Message, NotificationSink};

/// Sends one message per change event.
pub struct Dispatcher {
    sink: Box<dyn NotificationSink>,
}

impl Dispatcher {
    pub fn new(sink: Box<dyn NotificationSink>) -> Self {
        Self { sink }
    }

    /// Format a change event as a message.
    pub fn format(event: &ChangeEvent) -> Message {
        let body = serde_json::to_string_pretty(&event.payload)
            .unwrap_or_else(|_| event.payload.to_string());
        Message {
            subject: event.subject.clone(),
            body,
        }
    }

    /// Deliver a single event. Returns whether the sink accepted it.
    pub async fn notify(&self, event: &ChangeEvent) -> bool {
        let message = Self::format(event);
        match self.sink.send(&message).await {
            Ok(()) => {
                log::info!("Notification sent: {}", message.subject);
                true
            }
            Err(e) => {
                let e = match e {
                    AppError::Notification(_) => e,
                    other => AppError::notification(other),
                };
                log::error!("Failed to send notification '{}': {}", message.subject, e);
                false
            }
        }
    }
}
