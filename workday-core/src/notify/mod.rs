//! Signup notifications.
//!
//! Delivery is best-effort: [`notify_signup`] logs failures and never
//! returns them, so a stored signup is never undone by a mail problem.

mod render;
mod sendmail;

use std::sync::Arc;

use tokio::sync::Mutex;

use crate::config::NotifyConfig;
use crate::error::WorkdayResult;
use crate::event::{Event, Task, Volunteer};

pub use render::{roster, thank_you};
pub use sendmail::Sendmail;

/// A rendered notification ready for delivery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub to: String,
    pub subject: String,
    pub html: String,
}

/// Where notifications go.
#[derive(Debug, Clone)]
pub enum Notifier {
    /// Mail is not configured; messages are dropped.
    Disabled,
    /// Piped into a sendmail-compatible program.
    Sendmail(Sendmail),
    /// Collected in memory, for dry runs and tests.
    Outbox(Outbox),
}

impl Notifier {
    pub fn from_config(config: &NotifyConfig) -> Self {
        match &config.command {
            Some(command) if !command.trim().is_empty() => Notifier::Sendmail(Sendmail::new(
                command,
                config.from.clone(),
                config.timeout(),
            )),
            _ => Notifier::Disabled,
        }
    }

    pub async fn send(&self, message: &Message) -> WorkdayResult<()> {
        match self {
            Notifier::Disabled => {
                tracing::debug!(to = %message.to, subject = %message.subject, "notifications disabled, dropping message");
                Ok(())
            }
            Notifier::Sendmail(sendmail) => sendmail.send(message).await,
            Notifier::Outbox(outbox) => {
                outbox.push(message.clone()).await;
                Ok(())
            }
        }
    }

    /// Deliver, logging instead of failing.
    pub async fn send_logged(&self, message: &Message) {
        match self.send(message).await {
            Ok(()) => tracing::debug!(to = %message.to, subject = %message.subject, "notification sent"),
            Err(e) => tracing::warn!(to = %message.to, error = %e, "failed to send notification"),
        }
    }
}

/// Shared in-memory message sink.
#[derive(Debug, Clone, Default)]
pub struct Outbox {
    messages: Arc<Mutex<Vec<Message>>>,
}

impl Outbox {
    pub fn new() -> Self {
        Self::default()
    }

    async fn push(&self, message: Message) {
        self.messages.lock().await.push(message);
    }

    pub async fn messages(&self) -> Vec<Message> {
        self.messages.lock().await.clone()
    }
}

/// Thank the volunteer and, when the event names an organizer, send them
/// the updated roster. Both go out concurrently.
pub async fn notify_signup(notifier: &Notifier, event: &Event, task: &Task, volunteer: &Volunteer) {
    let thanks = thank_you(event, task, volunteer);
    let roster = roster(event, task, volunteer);

    let organizer = async {
        if let Some(message) = &roster {
            notifier.send_logged(message).await;
        }
    };

    tokio::join!(notifier.send_logged(&thanks), organizer);
}
