//! Records view helpers: search and CSV export.

use chrono::Utc;

use crate::registrant::Registrant;

/// MIME type of the exported file.
pub const CSV_MIME_TYPE: &str = "text/csv";

/// Fixed CSV header line.
const CSV_HEADER: &str =
    "First Name,Middle Name,Last Name,Department,Section,Date Registered,Signature Status";

/// Case-insensitive substring search over names, department, and
/// section.
///
/// An empty term returns the input unfiltered; ordering is preserved.
#[must_use]
pub fn search(term: &str, records: &[Registrant]) -> Vec<Registrant> {
    let needle = term.to_lowercase();
    records
        .iter()
        .filter(|r| needle.is_empty() || r.search_haystack().contains(&needle))
        .cloned()
        .collect()
}

/// Serialize records to CSV, one row per record.
///
/// The signature image is omitted as impractically large for a
/// spreadsheet cell; `Signature Status` is always `Signed` because a
/// non-empty signature was a precondition of creation. Every field is
/// quoted with embedded quotes doubled, so splitting a row on top-level
/// commas recovers the original field count.
#[must_use]
pub fn export_csv(records: &[Registrant]) -> String {
    let mut csv = String::from(CSV_HEADER);
    csv.push('\n');

    for record in records {
        let row = [
            csv_field(&record.first_name),
            csv_field(record.middle_name.as_deref().unwrap_or("")),
            csv_field(&record.last_name),
            csv_field(&record.department.to_string()),
            csv_field(record.section.as_deref().unwrap_or("")),
            csv_field(&record.registered_at.to_rfc3339()),
            csv_field("Signed"),
        ];
        csv.push_str(&row.join(","));
        csv.push('\n');
    }
    csv
}

/// Quote a field value, doubling embedded quote characters.
fn csv_field(value: &str) -> String {
    format!("\"{}\"", value.replace('"', "\"\""))
}

/// An export ready to hand to the host for download.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportFile {
    /// Suggested file name, dated with the export day.
    pub file_name: String,
    /// Content type of the file.
    pub mime_type: &'static str,
    /// The CSV text.
    pub contents: String,
}

/// Build a dated CSV export of the given records.
#[must_use]
pub fn export_file(records: &[Registrant]) -> ExportFile {
    ExportFile {
        file_name: format!("registrants_{}.csv", Utc::now().format("%Y-%m-%d")),
        mime_type: CSV_MIME_TYPE,
        contents: export_csv(records),
    }
}
