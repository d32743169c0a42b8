//! Event, task and volunteer types.
//!
//! These mirror the JSON documents kept on disk and served to the signup
//! page, so every field name is camelCase on the wire.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// The single work-day record. Replaced wholesale on every organizer write.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub date: String,
    #[serde(default)]
    pub time: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub organizer_email: Option<String>,
    #[serde(default)]
    pub tasks: Vec<Task>,
    /// Organizer-supplied fields this service doesn't interpret; kept as-is.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A sub-activity of the event with a capacity and a roster.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub id: String,
    pub name: String,
    pub needed: u32,
    #[serde(default)]
    pub volunteers: Vec<Volunteer>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A person signed up to a task, as embedded in the event document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Volunteer {
    pub id: String,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub notes: String,
    pub signup_time: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Flat copy of a volunteer kept in the ledger for reporting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LedgerEntry {
    #[serde(flatten)]
    pub volunteer: Volunteer,
    pub task_id: String,
    pub task_name: String,
}

/// Filled and needed slot totals across every task.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FillSummary {
    pub filled: usize,
    pub needed: usize,
}

impl FillSummary {
    /// Percentage of slots filled, rounded. Zero when nothing is needed.
    pub fn percent(&self) -> usize {
        if self.needed == 0 {
            return 0;
        }
        (self.filled * 100 + self.needed / 2) / self.needed
    }
}

impl Event {
    /// The event written on first boot when no event document exists.
    pub fn seed() -> Self {
        let task = |id: &str, name: &str, needed| Task {
            id: id.to_string(),
            name: name.to_string(),
            needed,
            volunteers: Vec::new(),
            extra: Map::new(),
        };

        Event {
            id: "spring-cleanup-2024".to_string(),
            name: "Spring Cleanup & Maintenance".to_string(),
            date: "2024-04-15".to_string(),
            time: "9:00 AM - 4:00 PM".to_string(),
            description: "Join us for our spring work day! Help maintain our beautiful club \
                facilities with landscaping, cleaning, and general maintenance tasks."
                .to_string(),
            organizer_email: Some("organizer@club.com".to_string()),
            tasks: vec![
                task("landscaping", "Landscaping & Grounds", 6),
                task("maintenance", "General Maintenance", 4),
                task("cleaning", "Clubhouse Cleaning", 3),
                task("painting", "Touch-up Painting", 2),
            ],
            extra: Map::new(),
        }
    }

    pub fn task(&self, id: &str) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    pub fn task_mut(&mut self, id: &str) -> Option<&mut Task> {
        self.tasks.iter_mut().find(|t| t.id == id)
    }

    /// Organizer address, if one is configured and non-blank.
    pub fn organizer_email(&self) -> Option<&str> {
        self.organizer_email
            .as_deref()
            .map(str::trim)
            .filter(|e| !e.is_empty())
    }

    pub fn fill_summary(&self) -> FillSummary {
        self.tasks.iter().fold(
            FillSummary {
                filled: 0,
                needed: 0,
            },
            |acc, task| FillSummary {
                filled: acc.filled + task.volunteers.len(),
                needed: acc.needed + task.needed as usize,
            },
        )
    }

    /// True if any task roster already holds a volunteer with this id.
    pub fn has_volunteer(&self, volunteer_id: &str) -> bool {
        self.tasks
            .iter()
            .any(|t| t.volunteers.iter().any(|v| v.id == volunteer_id))
    }
}

impl Task {
    pub fn is_full(&self) -> bool {
        self.volunteers.len() >= self.needed as usize
    }

    pub fn open_slots(&self) -> usize {
        (self.needed as usize).saturating_sub(self.volunteers.len())
    }
}

impl Volunteer {
    /// Render a signup timestamp the way it is stored on disk.
    pub fn format_signup_time(time: DateTime<Utc>) -> String {
        time.to_rfc3339_opts(SecondsFormat::Millis, true)
    }
}

impl LedgerEntry {
    pub fn new(volunteer: Volunteer, task: &Task) -> Self {
        LedgerEntry {
            volunteer,
            task_id: task.id.clone(),
            task_name: task.name.clone(),
        }
    }

    pub fn id(&self) -> &str {
        &self.volunteer.id
    }
}
