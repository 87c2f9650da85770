//! JSON output for the history listing.
//!
//! Serializes scan records for scripting and piping.

use crate::store::ScanRecord;

pub fn render(records: &[ScanRecord]) -> String {
    serde_json::to_string_pretty(records).unwrap_or_else(|_| String::from("[]"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_records_as_json_array() {
        let records = vec![ScanRecord {
            data: "ABC".to_string(),
            timestamp: 1700000000,
        }];
        let parsed: serde_json::Value = serde_json::from_str(&render(&records)).unwrap();
        assert_eq!(parsed[0]["data"], "ABC");
        assert_eq!(parsed[0]["timestamp"], 1700000000);
    }

    #[test]
    fn empty_listing_is_an_empty_array() {
        assert_eq!(render(&[]).trim(), "[]");
    }
}
