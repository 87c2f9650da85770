//! Table rendering for the history listing.
//!
//! Formats stored scans as a two-column terminal table, payload first,
//! newest scan at the top.

use crate::store::ScanRecord;
use crate::util::{format_timestamp, truncate};

pub fn render(records: &[ScanRecord]) -> String {
    if records.is_empty() {
        return String::from("No scans recorded. Run 'qrlog watch' to scan a code.\n");
    }

    let mut output = String::new();

    output.push_str(&format!("{:<50} {:<20}\n", "Payload", "Scanned"));
    output.push_str(&"-".repeat(70));
    output.push('\n');

    for record in records {
        output.push_str(&format!(
            "{:<50} {:<20}\n",
            truncate(&record.data, 50),
            format_timestamp(record.timestamp)
        ));
    }

    output.push_str(&format!("\n{} scan(s)\n", records.len()));

    output
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_listing_suggests_scanning() {
        assert!(render(&[]).contains("No scans recorded"));
    }

    #[test]
    fn rows_render_payload_and_timestamp() {
        let records = vec![ScanRecord {
            data: "https://example.com".to_string(),
            timestamp: 0,
        }];
        let output = render(&records);
        assert!(output.contains("https://example.com"));
        assert!(output.contains("1970-01-01 00:00:00"));
        assert!(output.contains("1 scan(s)"));
    }

    #[test]
    fn long_payloads_are_truncated() {
        let records = vec![ScanRecord {
            data: "x".repeat(120),
            timestamp: 0,
        }];
        assert!(render(&records).contains("..."));
    }
}
