//! The detection dialog.
//!
//! One reusable modal value: filled on the first detection, mutated in place
//! and reopened on every later one. Both actions close it and hand control
//! back to the scanner; opening the payload as a URL is fire-and-forget.

/// The two dialog actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DialogAction {
    Dismiss,
    OpenLink,
}

/// Result of an open-link attempt. A failure carries no detail — the call is
/// fire-and-forget and scanning resumes either way.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpenOutcome {
    Opened,
    Failed,
}

#[derive(Debug, Default)]
pub struct Dialog {
    body: String,
    visible: bool,
}

impl Dialog {
    pub const TITLE: &'static str = "QR code detected";

    pub fn new() -> Dialog {
        Dialog::default()
    }

    /// Update-or-create: set the body to the latest payload and (re)open.
    pub fn show_or_update(&mut self, text: &str) {
        self.body.clear();
        self.body.push_str(text);
        self.visible = true;
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn body(&self) -> &str {
        &self.body
    }

    /// Close without touching the body. The caller resumes scanning.
    pub fn dismiss(&mut self) {
        self.visible = false;
    }

    /// Close and try to open the body as a URL in the external handler.
    /// The text is not validated first, and a handler failure surfaces only
    /// as the returned outcome.
    pub fn open_link(&mut self) -> OpenOutcome {
        self.visible = false;
        match open::that(&self.body) {
            Ok(()) => OpenOutcome::Opened,
            Err(_) => OpenOutcome::Failed,
        }
    }
}
