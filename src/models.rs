use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    Personal,
    Historic,
}

impl EntryKind {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "personal" => Some(Self::Personal),
            "historic" => Some(Self::Historic),
            _ => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Personal => "Personal",
            Self::Historic => "Historic",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryStatus {
    Pending,
    Approved,
    Denied,
    Chosen,
}

impl EntryStatus {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "pending" => Some(Self::Pending),
            "approved" => Some(Self::Approved),
            "denied" => Some(Self::Denied),
            "chosen" => Some(Self::Chosen),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Approved => "approved",
            Self::Denied => "denied",
            Self::Chosen => "chosen",
        }
    }

    /// Statuses that feed the public calendar.
    pub fn is_eligible(self) -> bool {
        matches!(self, Self::Approved | Self::Chosen)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Entry {
    pub id: u64,
    pub kind: EntryKind,
    pub date: NaiveDate,
    pub description: String,
    #[serde(default)]
    pub source: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    pub status: EntryStatus,
}

/// One calendar day's summarized submissions, the gap-filler's input unit.
/// Rows exist only for days with at least one eligible entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DailyAggregate {
    pub month: u8,
    pub day: u8,
    pub count: u32,
    pub chosen: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RangeColor {
    Empty,
    Warning,
    Neutral,
    Positive,
}

impl RangeColor {
    pub fn hex(self) -> &'static str {
        match self {
            Self::Empty => "#ff007a",
            Self::Warning => "#ff9e3d",
            Self::Neutral => "#ffed5e",
            Self::Positive => "#47cfad",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Empty => "No events recorded yet :(",
            Self::Warning => "Only a couple of events so far",
            Self::Neutral => "A few events have been recorded",
            Self::Positive => "We already have a solid set of events",
        }
    }

    pub fn details(self) -> &'static str {
        match self {
            Self::Empty => "Be one of the first to record something for this day!",
            Self::Warning => "Add more so this day has a real choice of events!",
            Self::Neutral => "Add yours to round out the selection!",
            Self::Positive => "Maybe you can help us out with the pink spots instead!",
        }
    }
}

/// An inclusive run of consecutive calendar days sharing one display color,
/// the gap-filler's output unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub from_month: u8,
    pub from_day: u8,
    pub to_month: u8,
    pub to_day: u8,
    pub color: RangeColor,
}

impl DateRange {
    pub fn new(from: (u8, u8), to: (u8, u8), color: RangeColor) -> Self {
        Self {
            from_month: from.0,
            from_day: from.1,
            to_month: to.0,
            to_day: to.1,
            color,
        }
    }

    pub fn single_day(self) -> bool {
        (self.from_month, self.from_day) == (self.to_month, self.to_day)
    }
}

/// Wire shape for `/api/calendar`, one element per emitted range.
#[derive(Debug, Serialize, Deserialize)]
pub struct CalendarRange {
    pub from_month: u8,
    pub from_day: u8,
    pub to_month: u8,
    pub to_day: u8,
    pub color: String,
    pub label: String,
    pub details: String,
}

impl From<DateRange> for CalendarRange {
    fn from(range: DateRange) -> Self {
        Self {
            from_month: range.from_month,
            from_day: range.from_day,
            to_month: range.to_month,
            to_day: range.to_day,
            color: range.color.hex().to_string(),
            label: range.color.label().to_string(),
            details: range.color.details().to_string(),
        }
    }
}

/// Moderation status-change form body.
#[derive(Debug, Deserialize)]
pub struct StatusChangeForm {
    pub id: u64,
    pub status: String,
    /// Status filter of the list the moderator came from.
    pub state: String,
    pub order: String,
    #[serde(default)]
    pub token: String,
}

#[derive(Debug, Deserialize)]
pub struct ModQuery {
    #[serde(default)]
    pub token: String,
}
