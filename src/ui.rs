//! Terminal UI rendering.
//!
//! All drawing logic lives here, separated from application state ([`App`])
//! and input handling ([`crate::input`]).  Drawing never mutates the state,
//! so a frame can be redrawn as often as the main loop likes.
//!
//! The layout, top to bottom: header, error banner, one block per snapshot
//! row, countdown gauge, lookup counter, options form, status bar.  Regions
//! with nothing to show collapse to zero height.

use std::time::Instant;

use chrono::{DateTime, Utc};
use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Gauge, Paragraph, Wrap},
    Frame,
};

use crate::app::App;
use crate::error::FetchError;
use crate::form::{Field, OptionsForm};
use crate::format::{format_count, format_relative_time, show_seconds_human};
use crate::source::Snapshot;

/// Draw the complete UI for one frame.
pub fn draw(app: &App, frame: &mut Frame) {
    draw_at(app, frame, Instant::now(), Utc::now());
}

/// Draw as of the given moment.
pub fn draw_at(app: &App, frame: &mut Frame, now: Instant, wall: DateTime<Utc>) {
    let error_height = if app.error.is_some() { 3 } else { 0 };
    let gauge_height = if app.countdown.is_some() { 3 } else { 0 };
    let form_height = if app.form.is_some() { 7 } else { 0 };

    let [header, error, aggregates, gauge, lookups, form, status] = Layout::vertical([
        Constraint::Length(2),
        Constraint::Length(error_height),
        Constraint::Min(3),
        Constraint::Length(gauge_height),
        Constraint::Length(1),
        Constraint::Length(form_height),
        Constraint::Length(1),
    ])
    .areas(frame.area());

    draw_header(frame, header);
    if let Some(e) = &app.error {
        draw_error(e, frame, error);
    }
    draw_aggregates(app, frame, aggregates, wall);
    draw_countdown(app, frame, gauge, now);
    draw_lookups(app, frame, lookups);
    if let Some(f) = &app.form {
        draw_form(f, frame, form);
    }
    draw_status_bar(app, frame, status);
}

fn draw_header(frame: &mut Frame, area: Rect) {
    let header = Paragraph::new(vec![
        Line::from(Span::styled(
            " Fresh Off The Build",
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            " What's most recently built in Mozilla TaskCluster, according to Buildhub.",
            Style::default().fg(Color::DarkGray),
        )),
    ]);
    frame.render_widget(header, area);
}

/// Render the error banner.
fn draw_error(error: &FetchError, frame: &mut Frame, area: Rect) {
    let body = match error {
        FetchError::Server { status, url } => Line::from(vec![
            Span::styled(status.to_string(), Style::default().add_modifier(Modifier::BOLD)),
            Span::raw(" on "),
            Span::styled(url.as_str(), Style::default().add_modifier(Modifier::BOLD)),
        ]),
        FetchError::Network(message) | FetchError::Payload(message) => Line::from(message.as_str()),
    };

    let banner = Paragraph::new(body).block(
        Block::default()
            .title(format!(" {} ", error.title()))
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Red)),
    );
    frame.render_widget(banner, area);
}

/// One labelled row of product counts.
fn snapshot_row<'a>(title: String, snapshot: &'a Snapshot, accent: Color) -> Paragraph<'a> {
    let mut spans = Vec::with_capacity(snapshot.len() * 3);
    for product in snapshot.iter() {
        spans.push(Span::styled(product.name.as_str(), Style::default().fg(Color::DarkGray)));
        spans.push(Span::raw(" "));
        spans.push(Span::styled(
            format_count(product.count),
            Style::default().fg(accent).add_modifier(Modifier::BOLD),
        ));
        spans.push(Span::raw("   "));
    }
    if snapshot.is_empty() {
        spans.push(Span::styled("no products", Style::default().fg(Color::DarkGray)));
    }

    Paragraph::new(Line::from(spans))
        .wrap(Wrap { trim: true })
        .block(Block::default().title(title).borders(Borders::ALL))
}

/// Render the current snapshot and whichever comparison rows apply.
fn draw_aggregates(app: &App, frame: &mut Frame, area: Rect, wall: DateTime<Utc>) {
    let Some(cmp) = app.history.comparison() else {
        let waiting = Paragraph::new(Line::from(Span::styled(
            " Waiting for the first lookup…",
            Style::default().fg(Color::DarkGray),
        )));
        frame.render_widget(waiting, area);
        return;
    };

    // Only a "Before" row turns the first row into "Current".
    let current_title = if cmp.before.is_some() {
        " Current ".to_string()
    } else {
        " Builds per product ".to_string()
    };

    let mut rows = vec![snapshot_row(current_title, cmp.current, Color::White)];
    if let Some(before) = cmp.before {
        rows.push(snapshot_row(" Before ".into(), before, Color::Yellow));
    }
    if let Some(initial) = cmp.initial {
        rows.push(snapshot_row(" Initial ".into(), initial, Color::Blue));
    }
    if let Some((last, at)) = cmp.last_visit {
        let title = format!(" Last time you visited ({}) ", format_relative_time(at, wall));
        rows.push(snapshot_row(title, last, Color::Magenta));
    }

    let areas = Layout::vertical(rows.iter().map(|_| Constraint::Fill(1))).split(area);
    for (row, row_area) in rows.into_iter().zip(areas.iter()) {
        frame.render_widget(row, *row_area);
    }
}

fn draw_countdown(app: &App, frame: &mut Frame, area: Rect, now: Instant) {
    let Some(countdown) = app.countdown else {
        return;
    };

    let title = format!(
        " Time until next check: {} ",
        show_seconds_human(countdown.seconds_left(now))
    );
    let gauge = Gauge::default()
        .block(Block::default().title(title).borders(Borders::ALL))
        .gauge_style(Style::default().fg(Color::Green))
        .percent(countdown.percentage(now));
    frame.render_widget(gauge, area);
}

fn draw_lookups(app: &App, frame: &mut Frame, area: Rect) {
    let line = if app.lookups > 0 {
        Line::from(vec![
            Span::raw(" Number of lookups made: "),
            Span::styled(
                format_count(app.lookups),
                Style::default().add_modifier(Modifier::BOLD),
            ),
        ])
    } else {
        Line::from(Span::styled(
            " Lookups haven't started yet.",
            Style::default().add_modifier(Modifier::ITALIC),
        ))
    };
    frame.render_widget(Paragraph::new(line), area);
}

fn form_field<'a>(label: &'a str, value: String, focused: bool) -> Line<'a> {
    let style = if focused {
        Style::default().fg(Color::Black).bg(Color::Cyan)
    } else {
        Style::default()
    };
    Line::from(vec![
        Span::styled(format!(" {label:<18}"), Style::default().add_modifier(Modifier::BOLD)),
        Span::styled(value, style),
    ])
}

fn draw_form(form: &OptionsForm, frame: &mut Frame, area: Rect) {
    let mut lines = vec![
        form_field("Source", form.source.clone(), form.focus == Field::Source),
        form_field("Update Frequency", form.frequency.clone(), form.focus == Field::Frequency),
        form_field("Unit", format!("◂ {} ▸", form.unit), form.focus == Field::Unit),
        Line::from(Span::styled(
            " Tab: next field  ←/→: unit  Enter: change options  Esc: cancel",
            Style::default().fg(Color::DarkGray),
        )),
    ];
    if let Some(error) = &form.error {
        lines.push(Line::from(Span::styled(
            format!(" {error}"),
            Style::default().fg(Color::Red),
        )));
    }

    let panel = Paragraph::new(lines).block(Block::default().title(" Options ").borders(Borders::ALL));
    frame.render_widget(panel, area);
}

/// Render the bottom status bar.
fn draw_status_bar(app: &App, frame: &mut Frame, area: Rect) {
    let status = Paragraph::new(Line::from(vec![
        Span::styled(" ", Style::default()),
        Span::styled(&app.status, Style::default().fg(Color::Yellow)),
        Span::raw("  "),
        Span::styled(app.config.source.as_str(), Style::default().fg(Color::Green)),
        Span::raw("  q: quit  r: refresh now  o: options  "),
        Span::styled(
            concat!("v", env!("CARGO_PKG_VERSION")),
            Style::default().fg(Color::DarkGray),
        ),
    ]));
    frame.render_widget(status, area);
}
