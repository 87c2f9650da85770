//! The history view model.
//!
//! Pull-based: `refresh` re-reads the store when the history tab is
//! activated and holds the rows until the next activation. Nothing here
//! refreshes in the background or knows how the rows are rendered.

use crate::store::{ScanRecord, Store};
use crate::util::format_timestamp;

#[derive(Default)]
pub struct HistoryView {
    rows: Vec<ScanRecord>,
}

impl HistoryView {
    pub fn new() -> HistoryView {
        HistoryView::default()
    }

    /// Drop the current rows and re-read everything, newest first.
    pub fn refresh(&mut self, store: &Store) -> Result<(), Box<dyn std::error::Error>> {
        self.rows = store.list_all_desc()?;
        Ok(())
    }

    pub fn rows(&self) -> &[ScanRecord] {
        &self.rows
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Secondary line for a row: the scan time, human-readable.
    pub fn timestamp_label(record: &ScanRecord) -> String {
        format_timestamp(record.timestamp)
    }
}
