use crate::errors::AppError;
use crate::intake::SubmittedEntry;
use crate::models::{DailyAggregate, Entry, EntryKind, EntryStatus};
use chrono::Datelike;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use tokio::fs;
use tracing::error;

/// Everything the app persists: submitted entries plus the id counter.
/// Loaded once at boot, rewritten after every mutation.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct EntryBook {
    pub next_id: u64,
    pub entries: Vec<Entry>,
}

/// Sort orders accepted by the moderation list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ListOrder {
    /// Ascending by calendar day, ignoring year.
    #[default]
    Date,
    HistoricFirst,
    PersonalFirst,
}

impl ListOrder {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "date" => Some(Self::Date),
            "historic" => Some(Self::HistoricFirst),
            "personal" => Some(Self::PersonalFirst),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Date => "date",
            Self::HistoricFirst => "historic",
            Self::PersonalFirst => "personal",
        }
    }
}

impl EntryBook {
    pub fn insert(&mut self, submitted: SubmittedEntry) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        self.entries.push(Entry {
            id,
            kind: submitted.kind,
            date: submitted.date,
            description: submitted.description,
            source: submitted.source,
            name: submitted.name,
            email: submitted.email,
            status: EntryStatus::Pending,
        });
        id
    }

    pub fn change_status(&mut self, id: u64, status: EntryStatus) -> Result<(), AppError> {
        match self.entries.iter_mut().find(|entry| entry.id == id) {
            Some(entry) => {
                entry.status = status;
                Ok(())
            }
            None => Err(AppError::bad_request(format!("no entry with id {id}"))),
        }
    }

    /// Entries filtered to one status (or all) in the requested order.
    pub fn list(&self, status: Option<EntryStatus>, order: ListOrder) -> Vec<Entry> {
        let mut entries: Vec<Entry> = self
            .entries
            .iter()
            .filter(|entry| status.is_none_or(|s| entry.status == s))
            .cloned()
            .collect();
        match order {
            ListOrder::Date => {
                entries.sort_by_key(|entry| (entry.date.month(), entry.date.day(), entry.id));
            }
            ListOrder::HistoricFirst => {
                entries.sort_by_key(|entry| (entry.kind != EntryKind::Historic, entry.id));
            }
            ListOrder::PersonalFirst => {
                entries.sort_by_key(|entry| (entry.kind != EntryKind::Personal, entry.id));
            }
        }
        entries
    }

    /// The one aggregate read the gap-filler consumes: eligible entries
    /// grouped by calendar day, counted, flagged when a chosen entry exists,
    /// ascending by (month, day). The BTreeMap grouping guarantees the
    /// sorted/unique precondition by construction.
    pub fn daily_aggregates(&self) -> Vec<DailyAggregate> {
        let mut days: BTreeMap<(u8, u8), (u32, bool)> = BTreeMap::new();
        for entry in &self.entries {
            if !entry.status.is_eligible() {
                continue;
            }
            let key = (entry.date.month() as u8, entry.date.day() as u8);
            let slot = days.entry(key).or_insert((0, false));
            slot.0 += 1;
            slot.1 |= entry.status == EntryStatus::Chosen;
        }
        days.into_iter()
            .map(|((month, day), (count, chosen))| DailyAggregate {
                month,
                day,
                count,
                chosen,
            })
            .collect()
    }
}

pub async fn load_data(path: &Path) -> EntryBook {
    match fs::read(path).await {
        Ok(bytes) => match serde_json::from_slice(&bytes) {
            Ok(book) => book,
            Err(err) => {
                error!("failed to parse data file: {err}");
                EntryBook::default()
            }
        },
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => EntryBook::default(),
        Err(err) => {
            error!("failed to read data file: {err}");
            EntryBook::default()
        }
    }
}

pub async fn persist_data(path: &Path, book: &EntryBook) -> Result<(), AppError> {
    let payload = serde_json::to_vec_pretty(book).map_err(AppError::internal)?;
    fs::write(path, payload).await.map_err(AppError::internal)?;
    Ok(())
}
