//! Signup, cancellation and event replacement over the two stores.
//!
//! Every operation is a whole-document read-modify-write. Callers that can
//! run operations concurrently must serialize them (the server holds a
//! mutex around each call).

use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::error::{WorkdayError, WorkdayResult};
use crate::event::{Event, LedgerEntry, Volunteer};
use crate::store::Store;

/// Signup form as submitted by the page.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewVolunteer {
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
    pub task_id: String,
}

/// A completed signup: the stored volunteer and the event as written.
#[derive(Debug, Clone)]
pub struct Signup {
    pub volunteer: Volunteer,
    pub task_id: String,
    pub event: Event,
}

impl Signup {
    pub fn task_name(&self) -> &str {
        self.event
            .task(&self.task_id)
            .map(|t| t.name.as_str())
            .unwrap_or(self.task_id.as_str())
    }
}

/// Outcome of a removal. Removing an unknown id is not an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Removal {
    pub from_task: bool,
    pub from_ledger: usize,
}

impl Removal {
    pub fn removed_anything(&self) -> bool {
        self.from_task || self.from_ledger > 0
    }
}

/// Add a volunteer to a task, enforcing its capacity.
pub fn sign_up(store: &Store, request: NewVolunteer, now: DateTime<Utc>) -> WorkdayResult<Signup> {
    let mut event = store.read_event()?;
    let mut ledger = store.read_volunteers()?;

    let id = unique_volunteer_id(now, &event, &ledger);

    let task = event
        .task_mut(&request.task_id)
        .ok_or_else(|| WorkdayError::InvalidTask("Invalid task selected".into()))?;

    if task.is_full() {
        return Err(WorkdayError::TaskFull("This task is already full".into()));
    }

    let volunteer = Volunteer {
        id,
        name: request.name,
        email: request.email,
        phone: request.phone.unwrap_or_default(),
        notes: request.notes.unwrap_or_default(),
        signup_time: Volunteer::format_signup_time(now),
        extra: Default::default(),
    };

    task.volunteers.push(volunteer.clone());
    ledger.push(LedgerEntry::new(volunteer.clone(), task));

    store.write_event(&event)?;
    store.write_volunteers(&ledger)?;

    tracing::info!(
        volunteer_id = %volunteer.id,
        task_id = %request.task_id,
        "volunteer signed up"
    );

    Ok(Signup {
        volunteer,
        task_id: request.task_id,
        event,
    })
}

/// Remove a volunteer from a task roster and from the ledger.
///
/// An unknown task leaves the event untouched; the ledger is filtered by
/// volunteer id regardless of task.
pub fn remove_volunteer(store: &Store, task_id: &str, volunteer_id: &str) -> WorkdayResult<Removal> {
    let mut event = store.read_event()?;
    let mut ledger = store.read_volunteers()?;

    let from_task = match event.task_mut(task_id) {
        Some(task) => {
            let before = task.volunteers.len();
            task.volunteers.retain(|v| v.id != volunteer_id);
            task.volunteers.len() != before
        }
        None => false,
    };

    let before = ledger.len();
    ledger.retain(|entry| entry.id() != volunteer_id);
    let from_ledger = before - ledger.len();

    store.write_event(&event)?;
    store.write_volunteers(&ledger)?;

    let removal = Removal {
        from_task,
        from_ledger,
    };

    if removal.removed_anything() {
        tracing::info!(%volunteer_id, %task_id, "volunteer removed");
    } else {
        tracing::debug!(%volunteer_id, %task_id, "no volunteer matched removal");
    }

    Ok(removal)
}

/// Overwrite the event document. No shape checks beyond deserialization.
pub fn replace_event(store: &Store, event: &Event) -> WorkdayResult<()> {
    store.write_event(event)?;
    tracing::info!(event_id = %event.id, tasks = event.tasks.len(), "event replaced");
    Ok(())
}

/// Millisecond timestamp id, bumped until no stored volunteer uses it.
fn unique_volunteer_id(now: DateTime<Utc>, event: &Event, ledger: &[LedgerEntry]) -> String {
    let mut candidate = now.timestamp_millis();
    loop {
        let id = candidate.to_string();
        let taken = event.has_volunteer(&id) || ledger.iter().any(|e| e.id() == id);
        if !taken {
            return id;
        }
        candidate += 1;
    }
}
