use crate::error::AppError;
use std::collections::BTreeSet;
use std::str::FromStr;
use time::format_description::BorrowedFormatItem;
use time::macros::format_description;
use time::{Date, OffsetDateTime};

pub const DEFAULT_PRIORITY: u8 = 5;

const DATE_FORMAT: &[BorrowedFormatItem<'static>] = format_description!("[year]-[month]-[day]");

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Importance {
    Low,
    Medium,
    High,
    Critical,
}

impl Importance {
    pub fn wire_name(self) -> &'static str {
        match self {
            Self::Low => "LOW",
            Self::Medium => "MEDIUM",
            Self::High => "HIGH",
            Self::Critical => "CRITICAL",
        }
    }

    /// Strict wire decoding; an unknown importance has no safe fallback.
    pub fn from_wire(value: &str) -> Result<Self, AppError> {
        match value {
            "LOW" => Ok(Self::Low),
            "MEDIUM" => Ok(Self::Medium),
            "HIGH" => Ok(Self::High),
            "CRITICAL" => Ok(Self::Critical),
            other => Err(AppError::decode(format!("unknown importance '{other}'"))),
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
            Self::Critical => "critical",
        }
    }
}

impl FromStr for Importance {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "low" => Ok(Self::Low),
            "medium" => Ok(Self::Medium),
            "high" => Ok(Self::High),
            "critical" => Ok(Self::Critical),
            other => Err(AppError::invalid_input(format!(
                "unknown importance '{other}' (expected low, medium, high or critical)"
            ))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Waiting,
    InProgress,
    Done,
}

impl Status {
    pub fn wire_name(self) -> &'static str {
        match self {
            Self::Waiting => "WAITING",
            Self::InProgress => "IN_PROGRESS",
            Self::Done => "DONE",
        }
    }

    /// Lenient wire decoding. An unknown status falls back to `Done` when the
    /// stored completion flag was set, otherwise to `Waiting`, so documents
    /// written by older schema revisions keep loading.
    pub fn from_wire(value: &str, was_completed: bool) -> Self {
        match value {
            "WAITING" => Self::Waiting,
            "IN_PROGRESS" => Self::InProgress,
            "DONE" => Self::Done,
            _ if was_completed => Self::Done,
            _ => Self::Waiting,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Waiting => "waiting",
            Self::InProgress => "in progress",
            Self::Done => "done",
        }
    }
}

impl FromStr for Status {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "waiting" => Ok(Self::Waiting),
            "in-progress" | "in_progress" | "inprogress" => Ok(Self::InProgress),
            "done" => Ok(Self::Done),
            other => Err(AppError::invalid_input(format!(
                "unknown status '{other}' (expected waiting, in-progress or done)"
            ))),
        }
    }
}

/// One date-ranged task. Identity is `id` alone; every other field may change
/// through a wholesale replace in the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskRecord {
    pub id: String,
    pub name: String,
    pub importance: Importance,
    pub priority: u8,
    pub tags: BTreeSet<String>,
    pub description: String,
    pub start_date: Date,
    pub end_date: Date,
    pub status: Status,
}

impl TaskRecord {
    pub fn new(name: &str, importance: Importance, start_date: Date, end_date: Date) -> Self {
        Self {
            id: generate_id(),
            name: name.to_string(),
            importance,
            priority: DEFAULT_PRIORITY,
            tags: BTreeSet::new(),
            description: String::new(),
            start_date,
            end_date,
            status: Status::Waiting,
        }
    }

    /// Derived, never stored: completion is the `Done` status and nothing else.
    pub fn is_completed(&self) -> bool {
        self.status == Status::Done
    }

    pub fn active_on(&self, date: Date) -> bool {
        self.start_date <= date && date <= self.end_date
    }
}

pub fn generate_id() -> String {
    format!("task-{}", OffsetDateTime::now_utc().unix_timestamp_nanos())
}

pub fn parse_date(value: &str) -> Result<Date, AppError> {
    Date::parse(value.trim(), DATE_FORMAT)
        .map_err(|_| AppError::decode(format!("invalid date '{value}' (expected YYYY-MM-DD)")))
}

pub fn format_date(date: Date) -> Result<String, AppError> {
    date.format(DATE_FORMAT)
        .map_err(|err| AppError::decode(err.to_string()))
}
