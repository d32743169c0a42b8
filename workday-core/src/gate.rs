//! Shared-secret gate codes for volunteer and organizer actions.

use std::fmt;
use std::str::FromStr;

use crate::error::{WorkdayError, WorkdayResult};

pub const DEFAULT_VOLUNTEER_CODE: &str = "1957";
pub const DEFAULT_ORGANIZER_CODE: &str = "5791";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Volunteer,
    Organizer,
}

impl FromStr for Role {
    type Err = WorkdayError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "volunteer" => Ok(Role::Volunteer),
            "organizer" => Ok(Role::Organizer),
            other => Err(WorkdayError::InvalidPayload(format!(
                "unknown gate code type '{other}'"
            ))),
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Role::Volunteer => write!(f, "volunteer"),
            Role::Organizer => write!(f, "organizer"),
        }
    }
}

/// The two secrets a caller can present.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GateCodes {
    volunteer: String,
    organizer: String,
}

impl Default for GateCodes {
    fn default() -> Self {
        GateCodes::new(DEFAULT_VOLUNTEER_CODE, DEFAULT_ORGANIZER_CODE)
    }
}

impl GateCodes {
    pub fn new(volunteer: impl Into<String>, organizer: impl Into<String>) -> Self {
        GateCodes {
            volunteer: volunteer.into(),
            organizer: organizer.into(),
        }
    }

    pub fn verify(&self, code: &str, role: Role) -> bool {
        match role {
            Role::Volunteer => code == self.volunteer,
            Role::Organizer => code == self.organizer,
        }
    }

    /// Like [`GateCodes::verify`], but fails with `Unauthorized`.
    pub fn require(&self, code: &str, role: Role) -> WorkdayResult<()> {
        if self.verify(code, role) {
            return Ok(());
        }

        let message = match role {
            Role::Volunteer => "Invalid gate code",
            Role::Organizer => "Invalid organizer gate code",
        };
        Err(WorkdayError::Unauthorized(message.to_string()))
    }
}
