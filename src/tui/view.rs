//! Static view tree for the scanner UI.
//!
//! Pure functions from app state to widgets. All state mutation lives in
//! the event loop; the controller, dialog, and history modules carry no
//! rendering detail.

use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, List, ListItem, Paragraph, Tabs, Wrap};
use ratatui::Frame as UiFrame;

use crate::camera::Frame;
use crate::controller::ScanState;
use crate::history::HistoryView;
use crate::store::InsertOutcome;

use super::{App, Tab};

const SHADES: [char; 5] = [' ', '░', '▒', '▓', '█'];

pub fn draw(f: &mut UiFrame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .split(f.area());

    draw_tabs(f, app, chunks[0]);
    match app.tab {
        Tab::Scanner => draw_scanner(f, app, chunks[1]),
        Tab::History => draw_history(f, app, chunks[1]),
    }
    draw_keybar(f, app, chunks[2]);

    // the dialog overlays whichever tab is showing
    if app.dialog.is_visible() {
        draw_dialog(f, app, f.area());
    }
}

fn accent(app: &App) -> Color {
    match app.config.theme.accent.as_str() {
        "green" => Color::Green,
        "magenta" => Color::Magenta,
        "yellow" => Color::Yellow,
        "blue" => Color::Blue,
        _ => Color::Cyan,
    }
}

fn draw_tabs(f: &mut UiFrame, app: &App, area: Rect) {
    let selected = match app.tab {
        Tab::Scanner => 0,
        Tab::History => 1,
    };

    let tabs = Tabs::new(vec!["Scanner", "History"])
        .select(selected)
        .highlight_style(
            Style::default()
                .fg(accent(app))
                .add_modifier(Modifier::BOLD),
        )
        .block(Block::default().borders(Borders::ALL).title("qrlog"));

    f.render_widget(tabs, area);
}

fn draw_scanner(f: &mut UiFrame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(4), Constraint::Min(0)])
        .split(area);

    draw_status(f, app, chunks[0]);
    draw_preview(f, app, chunks[1]);
}

fn draw_status(f: &mut UiFrame, app: &App, area: Rect) {
    let state_label = match app.controller.state() {
        ScanState::Scanning => Span::styled("scanning", Style::default().fg(accent(app))),
        ScanState::Paused => Span::styled("paused", Style::default().fg(Color::Yellow)),
    };

    let source_label = if app.source_available {
        Span::raw(app.source_name)
    } else {
        Span::styled("unavailable", Style::default().fg(Color::Red))
    };

    let mut lines = vec![Line::from(vec![
        Span::raw("state: "),
        state_label,
        Span::raw("   source: "),
        source_label,
        Span::raw(format!(
            "   {}x{} @ {} Hz",
            app.config.resolution.0, app.config.resolution.1, app.config.sample_rate_hz
        )),
    ])];

    if let Some((payload, outcome)) = &app.last_detection {
        let note = match outcome {
            InsertOutcome::Inserted => "recorded",
            InsertOutcome::Duplicate => "already recorded",
        };
        lines.push(Line::from(vec![
            Span::raw("last: "),
            Span::styled(payload.clone(), Style::default().add_modifier(Modifier::BOLD)),
            Span::styled(format!("  ({note})"), Style::default().fg(Color::DarkGray)),
        ]));
    }

    let status =
        Paragraph::new(lines).block(Block::default().borders(Borders::ALL).title("Status"));
    f.render_widget(status, area);
}

fn draw_preview(f: &mut UiFrame, app: &App, area: Rect) {
    let block = Block::default().borders(Borders::ALL).title("Camera");
    let inner = block.inner(area);
    f.render_widget(block, area);

    let Some(frame) = &app.current_frame else {
        let placeholder = Paragraph::new("no frame")
            .style(Style::default().fg(Color::DarkGray))
            .alignment(Alignment::Center);
        f.render_widget(placeholder, inner);
        return;
    };

    let lines = preview_lines(frame, inner.width, inner.height, app.config.theme.dark);
    f.render_widget(Paragraph::new(lines), inner);
}

/// Nearest-neighbour downsample of the luma channel into shade cells. On a
/// light theme the mapping inverts so bright pixels stay low-ink.
fn preview_lines(frame: &Frame, width: u16, height: u16, dark: bool) -> Vec<Line<'static>> {
    if width == 0 || height == 0 || frame.width == 0 || frame.height == 0 {
        return Vec::new();
    }

    let mut lines = Vec::with_capacity(height as usize);
    for row in 0..height {
        let mut text = String::with_capacity(width as usize);
        for col in 0..width {
            let x = (u32::from(col) * frame.width / u32::from(width)).min(frame.width - 1);
            let y = (u32::from(row) * frame.height / u32::from(height)).min(frame.height - 1);
            let mut luma = frame.luma_at(x, y);
            if !dark {
                luma = 255 - luma;
            }
            text.push(SHADES[luma as usize * (SHADES.len() - 1) / 255]);
        }
        lines.push(Line::from(text));
    }
    lines
}

fn draw_history(f: &mut UiFrame, app: &App, area: Rect) {
    let block = Block::default().borders(Borders::ALL).title("History");

    if app.history.is_empty() {
        let empty = Paragraph::new("no scans recorded yet")
            .style(Style::default().fg(Color::DarkGray))
            .block(block);
        f.render_widget(empty, area);
        return;
    }

    let items: Vec<ListItem> = app
        .history
        .rows()
        .iter()
        .map(|record| {
            ListItem::new(vec![
                Line::from(Span::styled(
                    record.data.clone(),
                    Style::default().add_modifier(Modifier::BOLD),
                )),
                Line::from(Span::styled(
                    HistoryView::timestamp_label(record),
                    Style::default().fg(Color::DarkGray),
                )),
            ])
        })
        .collect();

    f.render_widget(List::new(items).block(block), area);
}

fn draw_keybar(f: &mut UiFrame, app: &App, area: Rect) {
    let hints = if app.dialog.is_visible() {
        "d/Esc dismiss   o/Enter open link"
    } else {
        "Tab switch tab   q quit"
    };
    let bar = Paragraph::new(hints).style(Style::default().fg(Color::DarkGray));
    f.render_widget(bar, area);
}

fn draw_dialog(f: &mut UiFrame, app: &App, area: Rect) {
    let popup = centered_rect(60, 30, area);
    f.render_widget(Clear, popup);

    let body = vec![
        Line::from(app.dialog.body().to_string()),
        Line::from(""),
        Line::from(Span::styled(
            "[d] dismiss   [o] open link",
            Style::default().fg(accent(app)),
        )),
    ];

    let dialog = Paragraph::new(body).wrap(Wrap { trim: false }).block(
        Block::default()
            .borders(Borders::ALL)
            .title(crate::dialog::Dialog::TITLE)
            .border_style(Style::default().fg(accent(app))),
    );
    f.render_widget(dialog, popup);
}

fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1])[1]
}
