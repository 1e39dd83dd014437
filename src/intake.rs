//! Submission intake: turns raw multipart form fields into a validated entry
//! or a tagged rejection.

use crate::models::EntryKind;
use chrono::NaiveDate;
use std::collections::HashMap;
use std::fmt;

pub const MIN_DESCRIPTION_LEN: usize = 5;
pub const MAX_DESCRIPTION_LEN: usize = 500;

/// A submission that passed every field check. Still unpersisted and unrated;
/// the store assigns the id and pending status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmittedEntry {
    pub kind: EntryKind,
    pub date: NaiveDate,
    pub description: String,
    pub source: String,
    pub name: String,
    pub email: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IntakeError {
    MissingField(&'static str),
    UnknownKind(String),
    BadDate(String),
    DescriptionLength(usize),
    MissingSource,
    BadSourceUrl(String),
}

impl fmt::Display for IntakeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingField(field) => write!(f, "missing field '{field}'"),
            Self::UnknownKind(kind) => write!(f, "unknown entry type '{kind}'"),
            Self::BadDate(date) => write!(f, "date '{date}' is not YYYY-MM-DD"),
            Self::DescriptionLength(len) => write!(
                f,
                "description must be {MIN_DESCRIPTION_LEN}-{MAX_DESCRIPTION_LEN} characters, got {len}"
            ),
            Self::MissingSource => write!(f, "historic entries need a source link"),
            Self::BadSourceUrl(url) => write!(f, "'{url}' does not look like a link"),
        }
    }
}

impl std::error::Error for IntakeError {}

impl SubmittedEntry {
    /// Explicit presence/format checks over the collected form fields.
    pub fn from_fields(fields: &HashMap<String, String>) -> Result<Self, IntakeError> {
        let kind_raw = require(fields, "type")?;
        let kind = EntryKind::parse(kind_raw)
            .ok_or_else(|| IntakeError::UnknownKind(kind_raw.to_string()))?;

        let date_raw = require(fields, "date")?.trim();
        let date = NaiveDate::parse_from_str(date_raw, "%Y-%m-%d")
            .map_err(|_| IntakeError::BadDate(date_raw.to_string()))?;

        let description = require(fields, "description")?.trim().to_string();
        let len = description.chars().count();
        if !(MIN_DESCRIPTION_LEN..=MAX_DESCRIPTION_LEN).contains(&len) {
            return Err(IntakeError::DescriptionLength(len));
        }

        let source = fields.get("source").map(|s| s.trim()).unwrap_or("");
        let source = match kind {
            EntryKind::Historic => {
                if source.is_empty() {
                    return Err(IntakeError::MissingSource);
                }
                if !looks_like_url(source) {
                    return Err(IntakeError::BadSourceUrl(source.to_string()));
                }
                source.to_string()
            }
            // Personal entries may carry a link; drop it when it is junk.
            EntryKind::Personal => {
                if looks_like_url(source) {
                    source.to_string()
                } else {
                    String::new()
                }
            }
        };

        Ok(Self {
            kind,
            date,
            description,
            source,
            name: optional(fields, "name"),
            email: optional(fields, "email"),
        })
    }
}

fn require<'a>(
    fields: &'a HashMap<String, String>,
    name: &'static str,
) -> Result<&'a str, IntakeError> {
    match fields.get(name) {
        Some(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(IntakeError::MissingField(name)),
    }
}

fn optional(fields: &HashMap<String, String>, name: &str) -> String {
    fields.get(name).map(|s| s.trim().to_string()).unwrap_or_default()
}

/// Accepts http(s)://host.tld or www.host.tld shapes, no whitespace.
pub fn looks_like_url(value: &str) -> bool {
    if value.chars().any(char::is_whitespace) {
        return false;
    }
    let rest = if let Some(stripped) = value.strip_prefix("https://") {
        stripped
    } else if let Some(stripped) = value.strip_prefix("http://") {
        stripped
    } else if value.starts_with("www.") {
        value
    } else {
        return false;
    };
    let host = rest.split('/').next().unwrap_or("");
    match host.rsplit_once('.') {
        Some((name, tld)) => {
            !name.is_empty()
                && tld.len() >= 2
                && host
                    .chars()
                    .all(|c| c.is_ascii_alphanumeric() || c == '.' || c == '-')
        }
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fields(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn personal_entry_needs_type_date_description() {
        let ok = SubmittedEntry::from_fields(&fields(&[
            ("type", "personal"),
            ("date", "2026-06-14"),
            ("description", "Grandma's 90th birthday"),
        ]))
        .unwrap();
        assert_eq!(ok.kind, EntryKind::Personal);
        assert_eq!(ok.date, NaiveDate::from_ymd_opt(2026, 6, 14).unwrap());
        assert!(ok.source.is_empty());

        let err = SubmittedEntry::from_fields(&fields(&[
            ("type", "personal"),
            ("date", "2026-06-14"),
        ]))
        .unwrap_err();
        assert_eq!(err, IntakeError::MissingField("description"));
    }

    #[test]
    fn historic_entry_requires_valid_source() {
        let base = [
            ("type", "historic"),
            ("date", "1969-07-20"),
            ("description", "First crewed Moon landing"),
        ];

        let err = SubmittedEntry::from_fields(&fields(&base)).unwrap_err();
        assert_eq!(err, IntakeError::MissingSource);

        let mut with_bad = fields(&base);
        with_bad.insert("source".into(), "not a link".into());
        assert!(matches!(
            SubmittedEntry::from_fields(&with_bad),
            Err(IntakeError::BadSourceUrl(_))
        ));

        let mut with_good = fields(&base);
        with_good.insert("source".into(), "https://en.wikipedia.org/wiki/Apollo_11".into());
        let ok = SubmittedEntry::from_fields(&with_good).unwrap();
        assert_eq!(ok.source, "https://en.wikipedia.org/wiki/Apollo_11");
    }

    #[test]
    fn junk_source_on_personal_entry_is_blanked_not_rejected() {
        let mut f = fields(&[
            ("type", "personal"),
            ("date", "2026-01-01"),
            ("description", "New year's resolution kickoff"),
        ]);
        f.insert("source".into(), "just some text".into());
        let ok = SubmittedEntry::from_fields(&f).unwrap();
        assert!(ok.source.is_empty());
    }

    #[test]
    fn bad_dates_and_kinds_are_rejected() {
        let err = SubmittedEntry::from_fields(&fields(&[
            ("type", "mythic"),
            ("date", "2026-06-14"),
            ("description", "A perfectly fine description"),
        ]))
        .unwrap_err();
        assert_eq!(err, IntakeError::UnknownKind("mythic".into()));

        let err = SubmittedEntry::from_fields(&fields(&[
            ("type", "personal"),
            ("date", "14.06.2026"),
            ("description", "A perfectly fine description"),
        ]))
        .unwrap_err();
        assert!(matches!(err, IntakeError::BadDate(_)));
    }

    #[test]
    fn description_length_bounds() {
        let too_short = SubmittedEntry::from_fields(&fields(&[
            ("type", "personal"),
            ("date", "2026-06-14"),
            ("description", "hey"),
        ]))
        .unwrap_err();
        assert_eq!(too_short, IntakeError::DescriptionLength(3));

        let long = "x".repeat(MAX_DESCRIPTION_LEN + 1);
        let too_long = SubmittedEntry::from_fields(&fields(&[
            ("type", "personal"),
            ("date", "2026-06-14"),
            ("description", &long),
        ]))
        .unwrap_err();
        assert_eq!(too_long, IntakeError::DescriptionLength(long.len()));
    }

    #[test]
    fn url_shapes() {
        assert!(looks_like_url("https://example.org"));
        assert!(looks_like_url("http://example.org/page?q=1"));
        assert!(looks_like_url("www.example.org"));
        assert!(!looks_like_url("example.org"));
        assert!(!looks_like_url("https://nodot"));
        assert!(!looks_like_url("https://spaced out.org"));
        assert!(!looks_like_url(""));
    }
}
