/// Course types for the registration catalog
use crate::schedule::{parse_schedule, Schedule};
use serde::{Deserialize, Serialize};

/// A course offering as listed in the catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Course {
    pub id: String,
    pub code: String,
    pub name: String,
    pub department: String,
    pub instructor: String,

    /// Schedule as shown to students, e.g. "MWF 10:00-10:50"
    pub schedule: String,

    /// Parsed form of `schedule`; `None` when the text could not be parsed,
    /// in which case the course never conflicts with anything.
    #[serde(default)]
    pub meeting: Option<Schedule>,

    pub credits: u32,
    pub capacity: u32,
    pub current_enrollment: u32,

    #[serde(default = "default_active")]
    pub active: bool,

    /// Course ids that must already be in the student's enrollment set
    #[serde(default)]
    pub prerequisites: Vec<String>,
}

fn default_active() -> bool {
    true
}

impl Course {
    /// Fills in `meeting` from the schedule text if it is missing.
    pub fn with_parsed_meeting(mut self) -> Self {
        if self.meeting.is_none() {
            self.meeting = parse_schedule(&self.schedule);
        }
        self
    }

    pub fn is_full(&self) -> bool {
        self.current_enrollment >= self.capacity
    }

    pub fn spots_available(&self) -> u32 {
        self.capacity.saturating_sub(self.current_enrollment)
    }

    /// "CS101 - Introduction to Programming"
    pub fn display_name(&self) -> String {
        format!("{} - {}", self.code, self.name)
    }
}
