//! The interactive scanner front end.
//!
//! One cooperative loop drives rendering and the fixed-rate sampling tick:
//! draw, poll the keyboard with the residual tick timeout, tick the
//! controller when the interval elapses. Frame grabs and decode calls run
//! synchronously on this loop, so a slow decode stalls that tick and
//! nothing else.

pub mod view;

use std::io;
use std::time::Instant;

use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;

use crate::camera::{Frame, FrameSource};
use crate::config::Config;
use crate::controller::{Controller, Tick};
use crate::decode::QrGate;
use crate::dialog::{Dialog, DialogAction, OpenOutcome};
use crate::history::HistoryView;
use crate::store::{InsertOutcome, Store};

/// The two tabs. History re-reads the store only when activated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tab {
    Scanner,
    History,
}

pub struct App {
    pub config: Config,
    pub tab: Tab,
    pub controller: Controller,
    pub dialog: Dialog,
    pub history: HistoryView,
    pub current_frame: Option<Frame>,
    pub last_detection: Option<(String, InsertOutcome)>,
    pub source_name: &'static str,
    pub source_available: bool,
    pub diagnostics: Vec<String>,
    should_quit: bool,
}

impl App {
    pub fn new(config: Config, controller: Controller, source: &dyn FrameSource) -> App {
        App {
            config,
            tab: Tab::Scanner,
            controller,
            dialog: Dialog::new(),
            history: HistoryView::new(),
            current_frame: None,
            last_detection: None,
            source_name: source.name(),
            source_available: source.available(),
            diagnostics: Vec::new(),
            should_quit: false,
        }
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    /// One sampling tick: pull the latest frame, hand it to the controller,
    /// surface a detection in the dialog.
    pub fn on_tick(&mut self, store: &Store, source: &mut dyn FrameSource) {
        // the last grabbed frame stays current until the source yields a new
        // one, so the preview holds steady across missed grabs
        if let Some(frame) = source.frame() {
            self.current_frame = Some(frame);
        }

        match self.controller.tick(store, self.current_frame.as_ref()) {
            Ok(Tick::Detected { payload, outcome }) => {
                self.dialog.show_or_update(&payload);
                self.last_detection = Some((payload, outcome));
            }
            Ok(Tick::Idle) | Ok(Tick::NoPayload) => {}
            Err(e) => self.diagnostics.push(format!("failed to record scan: {e}")),
        }
    }

    pub fn handle_key(&mut self, code: KeyCode, store: &Store) {
        // the dialog captures keys while visible
        if self.dialog.is_visible() {
            match code {
                KeyCode::Esc | KeyCode::Char('d') => self.dialog_action(DialogAction::Dismiss),
                KeyCode::Enter | KeyCode::Char('o') => self.dialog_action(DialogAction::OpenLink),
                _ => {}
            }
            return;
        }

        match code {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Tab | KeyCode::BackTab => self.switch_tab(store),
            _ => {}
        }
    }

    /// Both actions close the dialog and resume scanning; an open-link
    /// failure is recorded as a diagnostic, never shown to the user.
    pub fn dialog_action(&mut self, action: DialogAction) {
        match action {
            DialogAction::Dismiss => self.dialog.dismiss(),
            DialogAction::OpenLink => {
                if self.dialog.open_link() == OpenOutcome::Failed {
                    self.diagnostics
                        .push("failed to open payload in external handler".to_string());
                }
            }
        }
        self.controller.resume();
    }

    fn switch_tab(&mut self, store: &Store) {
        self.tab = match self.tab {
            Tab::Scanner => Tab::History,
            Tab::History => Tab::Scanner,
        };

        // pull-based refresh, on activation only
        if self.tab == Tab::History {
            if let Err(e) = self.history.refresh(store) {
                self.diagnostics.push(format!("history refresh failed: {e}"));
            }
        }
    }
}

/// Run the scanner until the user quits. Returns the session diagnostics.
pub fn run(
    config: Config,
    store: &Store,
    mut source: Box<dyn FrameSource>,
    diagnostics: Vec<String>,
) -> Result<Vec<String>, Box<dyn std::error::Error>> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(config, Controller::new(Box::new(QrGate)), source.as_ref());
    app.diagnostics = diagnostics;

    let result = run_loop(&mut terminal, &mut app, store, source.as_mut());

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result?;
    Ok(app.diagnostics)
}

fn run_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    store: &Store,
    source: &mut dyn FrameSource,
) -> Result<(), Box<dyn std::error::Error>> {
    let tick_rate = app.config.tick_interval();
    let mut last_tick = Instant::now();

    loop {
        terminal.draw(|f| view::draw(f, app))?;

        let timeout = tick_rate.saturating_sub(last_tick.elapsed());
        if event::poll(timeout)? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    app.handle_key(key.code, store);
                }
            }
        }

        if last_tick.elapsed() >= tick_rate {
            app.on_tick(store, source);
            last_tick = Instant::now();
        }

        if app.should_quit() {
            return Ok(());
        }
    }
}
