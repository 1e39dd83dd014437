//! CSV export of chosen entries for the moderator.

use crate::models::Entry;

pub const EXPORT_FILENAME: &str = "chosen-events-export.csv";

const COLUMNS: [&str; 4] = ["Date", "Kind", "Description", "Name"];

/// Renders entries (already filtered and ordered by the caller) as a CSV
/// document with a header row.
pub fn entries_csv(entries: &[Entry]) -> String {
    let mut out = String::new();
    out.push_str(&COLUMNS.join(","));
    out.push('\n');
    for entry in entries {
        let row = [
            entry.date.format("%d.%m.%Y").to_string(),
            entry.kind.label().to_string(),
            entry.description.clone(),
            entry.name.clone(),
        ];
        let quoted: Vec<String> = row.iter().map(|field| csv_field(field)).collect();
        out.push_str(&quoted.join(","));
        out.push('\n');
    }
    out
}

fn csv_field(value: &str) -> String {
    if value.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}
