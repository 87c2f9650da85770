use std::cell::Cell;

use tempfile::TempDir;

use qrlog::camera::{Frame, FrameSource, StillSource};
use qrlog::controller::{Controller, ScanState, Tick};
use qrlog::decode::Gate;
use qrlog::dialog::Dialog;
use qrlog::history::HistoryView;
use qrlog::store::{InsertOutcome, Store};

/// Yields a payload on one specific tick, nothing on the others.
struct ScriptedGate {
    hit_on_call: usize,
    payload: &'static str,
    calls: Cell<usize>,
}

impl ScriptedGate {
    fn hit_on(call: usize, payload: &'static str) -> ScriptedGate {
        ScriptedGate {
            hit_on_call: call,
            payload,
            calls: Cell::new(0),
        }
    }
}

impl Gate for ScriptedGate {
    fn available(&self) -> bool {
        true
    }

    fn decode(&self, _frame: &Frame) -> Option<String> {
        let call = self.calls.get() + 1;
        self.calls.set(call);
        (call == self.hit_on_call).then(|| self.payload.to_string())
    }
}

fn temp_store() -> (TempDir, Store) {
    let dir = TempDir::new().unwrap();
    let store = Store::open_at(&dir.path().join("history.db")).unwrap();
    (dir, store)
}

#[test]
fn payload_at_tick_five_is_persisted_once_and_presented() {
    let (_dir, store) = temp_store();
    let mut controller = Controller::new(Box::new(ScriptedGate::hit_on(5, "https://example.com")));
    let mut dialog = Dialog::new();
    let mut source =
        StillSource::from_frames((0..8).map(|_| Frame::blank(640, 480)).collect());

    let mut detection_tick = None;
    for tick_number in 1..=8 {
        let frame = source.frame();
        match controller.tick(&store, frame.as_ref()).unwrap() {
            Tick::Detected { payload, outcome } => {
                dialog.show_or_update(&payload);
                detection_tick = Some(tick_number);
                assert_eq!(outcome, InsertOutcome::Inserted);
            }
            Tick::NoPayload => {
                // before the hit: still scanning, nothing stored, no dialog
                assert!(tick_number < 5);
                assert_eq!(controller.state(), ScanState::Scanning);
                assert!(store.list_all_desc().unwrap().is_empty());
                assert!(!dialog.is_visible());
            }
            Tick::Idle => {
                // after the hit the controller stays paused
                assert!(tick_number > 5);
                assert_eq!(controller.state(), ScanState::Paused);
            }
        }
    }

    assert_eq!(detection_tick, Some(5));
    assert!(dialog.is_visible());
    assert_eq!(dialog.body(), "https://example.com");

    let records = store.list_all_desc().unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].data, "https://example.com");
    assert!(records[0].timestamp > 0);

    // dismissing hands control back to the scanner
    dialog.dismiss();
    controller.resume();
    assert_eq!(controller.state(), ScanState::Scanning);
}

#[test]
fn two_detections_reuse_one_dialog() {
    let (_dir, store) = temp_store();
    let mut dialog = Dialog::new();
    let frame = Frame::blank(4, 4);

    let mut controller = Controller::new(Box::new(ScriptedGate::hit_on(1, "first")));
    if let Tick::Detected { payload, .. } = controller.tick(&store, Some(&frame)).unwrap() {
        dialog.show_or_update(&payload);
    }
    assert_eq!(dialog.body(), "first");

    dialog.dismiss();
    controller.resume();

    let mut controller = Controller::new(Box::new(ScriptedGate::hit_on(1, "second")));
    if let Tick::Detected { payload, .. } = controller.tick(&store, Some(&frame)).unwrap() {
        dialog.show_or_update(&payload);
    }

    // same dialog value, body updated in place
    assert!(dialog.is_visible());
    assert_eq!(dialog.body(), "second");
}

#[test]
fn scanning_the_same_payload_twice_stores_one_row() {
    let (_dir, store) = temp_store();

    assert_eq!(store.insert_if_new("ABC").unwrap(), InsertOutcome::Inserted);
    assert_eq!(store.insert_if_new("ABC").unwrap(), InsertOutcome::Duplicate);

    let records = store.list_all_desc().unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].data, "ABC");
}

#[test]
fn history_view_reads_newest_first_on_refresh() {
    let (_dir, store) = temp_store();
    store.insert_if_new("older").unwrap();
    store.insert_if_new("newer").unwrap();

    let mut view = HistoryView::new();
    view.refresh(&store).unwrap();

    let data: Vec<_> = view.rows().iter().map(|r| r.data.as_str()).collect();
    assert_eq!(data, vec!["newer", "older"]);
}
