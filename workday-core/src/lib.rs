//! Core library for the club work-day volunteer signup service.
//!
//! - `event` holds the event/task/volunteer documents
//! - `store` persists them as two flat JSON files
//! - `signup` implements signup, removal and event replacement
//! - `gate` checks the shared volunteer and organizer codes
//! - `notify` renders and delivers signup notifications

pub mod config;
pub mod error;
pub mod event;
pub mod gate;
pub mod notify;
pub mod signup;
pub mod store;

pub use config::{NotifyConfig, WorkdayConfig};
pub use error::{WorkdayError, WorkdayResult};
pub use event::{Event, FillSummary, LedgerEntry, Task, Volunteer};
pub use gate::{GateCodes, Role};
pub use notify::{Message, Notifier, Outbox};
pub use signup::{NewVolunteer, Removal, Signup};
pub use store::Store;
