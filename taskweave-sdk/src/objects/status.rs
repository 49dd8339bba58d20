//! Closed status and unit enums with their wire-string mappings.
//!
//! Each enum maps bijectively to the strings the task service uses both in
//! API payloads and in webhook history values. Parsing an unrecognized
//! string is a hard error, never a silent default.

use std::str::FromStr;

/// Error produced when a wire string does not match any enum variant.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum WireEnumError {
    #[error("unrecognized task status: {0:?}")]
    TaskStatus(String),
    #[error("unrecognized event status: {0:?}")]
    EventStatus(String),
    #[error("unrecognized relevance unit: {0:?}")]
    RelevanceUnit(String),
}

/// Status of a plain date-tracked task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TaskStatus {
    Backlog,
    ToDo,
    InProgress,
    Complete,
}

impl TaskStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            TaskStatus::Backlog => "backlog",
            TaskStatus::ToDo => "to do",
            TaskStatus::InProgress => "in progress",
            TaskStatus::Complete => "complete",
        }
    }
}

impl FromStr for TaskStatus {
    type Err = WireEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "backlog" => Ok(TaskStatus::Backlog),
            "to do" => Ok(TaskStatus::ToDo),
            "in progress" => Ok(TaskStatus::InProgress),
            "complete" => Ok(TaskStatus::Complete),
            other => Err(WireEnumError::TaskStatus(other.to_owned())),
        }
    }
}

impl std::fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Computed schedule status of an event-type task.
///
/// Never stored as a source of truth; always recomputed from
/// `(start_time, end_time, now)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventStatus {
    NotScheduled,
    Upcoming,
    Occurring,
    Occurred,
}

impl EventStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            EventStatus::NotScheduled => "not scheduled",
            EventStatus::Upcoming => "upcoming",
            EventStatus::Occurring => "occurring",
            EventStatus::Occurred => "occurred",
        }
    }
}

impl FromStr for EventStatus {
    type Err = WireEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "not scheduled" => Ok(EventStatus::NotScheduled),
            "upcoming" => Ok(EventStatus::Upcoming),
            "occurring" => Ok(EventStatus::Occurring),
            "occurred" => Ok(EventStatus::Occurred),
            other => Err(WireEnumError::EventStatus(other.to_owned())),
        }
    }
}

impl std::fmt::Display for EventStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Unit for the relevance-date offset.
///
/// `Months` is approximated as exactly 30 days; the offset arithmetic is
/// deliberately not calendar-accurate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RelevanceUnit {
    Days,
    Weeks,
    Months,
}

impl RelevanceUnit {
    pub fn as_str(self) -> &'static str {
        match self {
            RelevanceUnit::Days => "days",
            RelevanceUnit::Weeks => "weeks",
            RelevanceUnit::Months => "months",
        }
    }

    /// Duration of `num` of this unit.
    pub fn duration(self, num: i64) -> time::Duration {
        match self {
            RelevanceUnit::Days => time::Duration::days(num),
            RelevanceUnit::Weeks => time::Duration::days(7 * num),
            RelevanceUnit::Months => time::Duration::days(30 * num),
        }
    }
}

impl FromStr for RelevanceUnit {
    type Err = WireEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "days" => Ok(RelevanceUnit::Days),
            "weeks" => Ok(RelevanceUnit::Weeks),
            "months" => Ok(RelevanceUnit::Months),
            other => Err(WireEnumError::RelevanceUnit(other.to_owned())),
        }
    }
}

impl std::fmt::Display for RelevanceUnit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
