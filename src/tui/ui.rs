//! UI rendering for the control panel.

use std::time::Instant;

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Gauge, Paragraph},
    Frame,
};

use crate::host::Field;
use crate::presenter::overlay::{OverlayViewModel, SHOWN_OPACITY};
use crate::presenter::widget::{render_bars, Placement};
use crate::presenter::TOTAL_BARS;
use crate::session::Phase;
use crate::tui::app::App;
use crate::tui::event::HELP;

/// Render the application UI.
pub fn render(frame: &mut Frame<'_>, app: &App, now: Instant) {
    // Create layout: header, session, inputs, status bar
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Length(4), // Session
            Constraint::Min(6),    // Inputs
            Constraint::Length(1), // Status bar
        ])
        .split(frame.area());

    render_header(frame, app, chunks[0]);
    render_session(frame, app, chunks[1]);
    render_inputs(frame, app, chunks[2]);
    render_status_bar(frame, app, chunks[3]);

    if let Some(widget) = app.controller.widget() {
        let vm = widget.view_model();
        render_widget(frame, widget.placement(), &vm.remaining_label, vm.bars_lit);
    }

    if let Some(overlay) = app.controller.overlay() {
        render_overlay(frame, &overlay.view_model(now));
    }
}

/// Render the header, marking when a reminder surface is up.
fn render_header(frame: &mut Frame<'_>, app: &App, area: Rect) {
    let mut spans = vec![Span::styled(
        " ikiflow ",
        Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD),
    )];
    if app.controller.surface_visible() {
        spans.push(Span::styled("● reminder on screen", Style::default().fg(Color::Green)));
    }

    let header = Paragraph::new(Line::from(spans))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Cyan)),
        );

    frame.render_widget(header, area);
}

/// Render the status and countdown lines.
fn render_session(frame: &mut Frame<'_>, app: &App, area: Rect) {
    let color = match app.controller.phase() {
        Phase::Idle => Color::White,
        Phase::Running => Color::Green,
        Phase::Paused => Color::Yellow,
        Phase::Break => Color::Cyan,
    };

    let lines = vec![
        Line::from(Span::styled(
            app.controller.status_label(),
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        )),
        Line::from(app.controller.countdown_label()),
    ];

    let session = Paragraph::new(lines).block(Block::default().borders(Borders::ALL));
    frame.render_widget(session, area);
}

/// Render the focus and break inputs, each as a slider with its text value.
fn render_inputs(frame: &mut Frame<'_>, app: &App, area: Rect) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Length(3), Constraint::Min(0)])
        .split(area);

    render_input(frame, app, Field::FocusMinutes, "Focus", "min", rows[0]);
    render_input(frame, app, Field::BreakSeconds, "Break", "s", rows[1]);
}

fn render_input(frame: &mut Frame<'_>, app: &App, field: Field, title: &str, unit: &str, area: Rect) {
    let enabled = app.controller.inputs_enabled();
    let selected = app.selected == field;
    let editing = selected && app.draft.is_some();

    let border = if !enabled {
        Style::default().fg(Color::DarkGray)
    } else if selected {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default().fg(Color::White)
    };
    let gauge_color = if enabled { Color::Blue } else { Color::DarkGray };

    let mut label = format!("{} {unit}", app.field_text(field));
    if editing {
        label.push_str(" (Enter to apply)");
    }

    let gauge = Gauge::default()
        .block(
            Block::default()
                .title(format!(" {title} "))
                .borders(Borders::ALL)
                .border_style(border),
        )
        .gauge_style(Style::default().fg(gauge_color))
        .ratio(app.bindings.setting(field).slider_fraction().clamp(0.0, 1.0))
        .label(label);

    frame.render_widget(gauge, area);
}

/// Render the status bar.
fn render_status_bar(frame: &mut Frame<'_>, app: &App, area: Rect) {
    let status_text = app.status.as_deref().unwrap_or(HELP);
    let status = Paragraph::new(status_text).style(Style::default().fg(Color::DarkGray));
    frame.render_widget(status, area);
}

/// Render the floating widget at its placement, cut to the frame.
fn render_widget(frame: &mut Frame<'_>, placement: Placement, label: &str, bars_lit: usize) {
    let area = Rect::new(placement.x, placement.y, placement.width, placement.height)
        .intersection(frame.area());
    if area.is_empty() {
        return;
    }

    let body = Paragraph::new(vec![
        Line::from(Span::styled(
            render_bars(bars_lit, TOTAL_BARS),
            Style::default().fg(Color::Green),
        )),
        Line::from(label.to_string()),
    ])
    .alignment(Alignment::Center)
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::DarkGray)),
    );

    frame.render_widget(Clear, area);
    frame.render_widget(body, area);
}

/// Render the break overlay over the whole frame.
fn render_overlay(frame: &mut Frame<'_>, vm: &OverlayViewModel) {
    let area = frame.area();
    let style = overlay_style(vm.opacity);

    frame.render_widget(Clear, area);
    frame.render_widget(Block::default().style(style), area);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage(35),
            Constraint::Length(2),
            Constraint::Length(3),
            Constraint::Length(2),
            Constraint::Min(0),
        ])
        .split(area);

    let title = Paragraph::new("Time for a break")
        .alignment(Alignment::Center)
        .style(style.add_modifier(Modifier::BOLD));
    frame.render_widget(title, rows[1]);

    let bar_area = centered(rows[2], 60);
    let ratio = if vm.max_seconds == 0 {
        0.0
    } else {
        f64::from(vm.seconds_remaining) / f64::from(vm.max_seconds)
    };
    let gauge = Gauge::default()
        .block(Block::default().borders(Borders::ALL).border_style(style))
        .gauge_style(style.fg(Color::Cyan))
        .ratio(ratio.clamp(0.0, 1.0))
        .label(format!("{}s", vm.seconds_remaining));
    frame.render_widget(gauge, bar_area);

    let tip = Paragraph::new(vm.tip)
        .alignment(Alignment::Center)
        .style(style);
    frame.render_widget(tip, rows[3]);
}

/// Text color standing in for the overlay's opacity.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn overlay_style(opacity: f32) -> Style {
    let level = ((opacity / SHOWN_OPACITY).clamp(0.0, 1.0) * 255.0) as u8;
    let style = Style::default()
        .bg(Color::Black)
        .fg(Color::Rgb(level, level, level));
    if opacity < SHOWN_OPACITY {
        style.add_modifier(Modifier::DIM)
    } else {
        style
    }
}

/// A horizontally centered slice of `area`, `percent` wide.
fn centered(area: Rect, percent: u16) -> Rect {
    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent) / 2),
            Constraint::Percentage(percent),
            Constraint::Min(0),
        ])
        .split(area)[1]
}
