//! The scan controller.
//!
//! Owns the Scanning/Paused session state and the per-tick control flow:
//! decode the current frame, persist a hit, and carry the payload out so the
//! caller can present the dialog. Pausing gates decode attempts only — the
//! tick itself keeps firing for the process lifetime, and nothing but the
//! dialog actions resumes scanning.

use crate::camera::Frame;
use crate::decode::Gate;
use crate::store::{InsertOutcome, Store};

/// Controller states. `Paused` holds from a detection until the dialog's
/// dismiss or open-link action resumes scanning; there is no auto-resume.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanState {
    Scanning,
    Paused,
}

/// What a single sampling tick did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Tick {
    /// Paused, no frame ready, or no decoder available.
    Idle,
    /// A frame was examined and held no readable code.
    NoPayload,
    /// A code was decoded and persisted; the caller should present the
    /// dialog with this payload.
    Detected {
        payload: String,
        outcome: InsertOutcome,
    },
}

pub struct Controller {
    gate: Box<dyn Gate>,
    state: ScanState,
}

impl Controller {
    pub fn new(gate: Box<dyn Gate>) -> Controller {
        Controller {
            gate,
            state: ScanState::Scanning,
        }
    }

    pub fn state(&self) -> ScanState {
        self.state
    }

    /// One sampling tick. Runs at the configured cadence whether or not a
    /// frame is ready.
    pub fn tick(
        &mut self,
        store: &Store,
        frame: Option<&Frame>,
    ) -> Result<Tick, Box<dyn std::error::Error>> {
        if self.state == ScanState::Paused || !self.gate.available() {
            return Ok(Tick::Idle);
        }

        let Some(frame) = frame else {
            return Ok(Tick::Idle);
        };

        match self.gate.decode(frame) {
            Some(payload) => {
                self.state = ScanState::Paused;
                let outcome = store.insert_if_new(&payload)?;
                Ok(Tick::Detected { payload, outcome })
            }
            None => Ok(Tick::NoPayload),
        }
    }

    /// The only Paused → Scanning transition, driven by the dialog actions.
    pub fn resume(&mut self) {
        self.state = ScanState::Scanning;
    }
}
