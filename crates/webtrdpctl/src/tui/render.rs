//! Rendering - header, telegram table, catalog panel, status bar

use super::state::MonitorView;
use crate::session::{Notice, OperationKind};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Clear, List, ListItem, Paragraph, Row, Table},
    Frame,
};
use webtrdp_common::format::{
    format_cycle, format_direction, format_period_ms, format_rx_age, or_empty, EMPTY_VALUE,
};

/// Draw the whole monitor
pub fn draw_ui(f: &mut Frame, view: &mut MonitorView, now_us: i64) {
    let size = f.size();

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(5),
            Constraint::Length(3),
        ])
        .split(size);

    draw_header(f, rows[0], view);

    let content = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(72), Constraint::Percentage(28)])
        .split(rows[1]);

    draw_telegram_table(f, content[0], view, now_us);
    draw_catalog(f, content[1], view);
    draw_status_bar(f, rows[2], view);

    if view.show_help {
        draw_help_overlay(f, size, view);
    }
}

fn busy_span(label: &str, busy: bool) -> Span<'static> {
    if busy {
        Span::styled(
            format!(" {}… ", label),
            Style::default().fg(Color::Black).bg(Color::Yellow),
        )
    } else {
        Span::styled(format!(" {} ", label), Style::default().fg(Color::DarkGray))
    }
}

/// Format: webTRDP | http://host:8080 | host: ecu-1 | config: /etc/cfg/a.xml
fn draw_header(f: &mut Frame, area: Rect, view: &MonitorView) {
    let session = &view.session;
    let path = match &view.path_input {
        Some(input) => format!("{}_", input),
        None if session.selected_path.is_empty() => EMPTY_VALUE.to_string(),
        None => session.selected_path.clone(),
    };

    let mut spans = vec![
        Span::styled(
            " webTRDP ",
            Style::default()
                .fg(Color::Rgb(150, 200, 255))
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw(format!("| {} | host: {} | config: ", session.base_url, session.host_name)),
        Span::styled(
            path,
            if view.path_input.is_some() {
                Style::default().fg(Color::Yellow)
            } else {
                Style::default()
            },
        ),
        Span::raw("  "),
    ];
    for (kind, label) in [
        (OperationKind::Telemetry, "telemetry"),
        (OperationKind::Catalog, "catalog"),
        (OperationKind::Load, "load"),
        (OperationKind::Control, "control"),
    ] {
        spans.push(busy_span(label, session.is_busy(kind)));
    }

    let header = Paragraph::new(Line::from(spans)).block(Block::default().borders(Borders::ALL));
    f.render_widget(header, area);
}

fn draw_telegram_table(f: &mut Frame, area: Rect, view: &mut MonitorView, now_us: i64) {
    let header = Row::new(vec![
        "Name", "COM ID", "Dataset", "Dir", "Cycle", "Iface", "TX", "TX#", "RX#", "Timeouts",
        "Last RX", "Period", "Avg",
    ])
    .style(
        Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD),
    );

    let rows: Vec<Row> = view
        .session
        .snapshot
        .records()
        .iter()
        .map(|r| {
            let tx = if r.tx_enabled {
                Cell::from("on").style(Style::default().fg(Color::Green))
            } else {
                Cell::from("off").style(Style::default().fg(Color::DarkGray))
            };
            let timeouts = Cell::from(r.timeout_count.to_string()).style(if r.timeout_count > 0 {
                Style::default().fg(Color::Red)
            } else {
                Style::default()
            });
            Row::new(vec![
                Cell::from(r.display_name()),
                Cell::from(r.com_id.map(|v| v.to_string()).unwrap_or_else(|| or_empty(None))),
                Cell::from(r.dataset_id.map(|v| v.to_string()).unwrap_or_else(|| or_empty(None))),
                Cell::from(format_direction(r.direction.as_deref())),
                Cell::from(format_cycle(r.cycle_us)),
                Cell::from(or_empty(r.interface.as_deref())),
                tx,
                Cell::from(r.tx_count.to_string()),
                Cell::from(r.rx_count.to_string()),
                timeouts,
                Cell::from(format_rx_age(r, now_us)),
                Cell::from(format_period_ms(r.last_period())),
                Cell::from(format_period_ms(r.avg_period())),
            ])
        })
        .collect();

    let widths = [
        Constraint::Min(14),
        Constraint::Length(7),
        Constraint::Length(8),
        Constraint::Length(12),
        Constraint::Length(9),
        Constraint::Length(6),
        Constraint::Length(4),
        Constraint::Length(8),
        Constraint::Length(8),
        Constraint::Length(8),
        Constraint::Length(9),
        Constraint::Length(9),
        Constraint::Length(9),
    ];

    let title = format!(" Process data telegrams ({}) ", view.session.snapshot.len());
    let table = Table::new(rows, widths)
        .header(header)
        .block(Block::default().borders(Borders::ALL).title(title))
        .highlight_style(Style::default().add_modifier(Modifier::REVERSED));

    f.render_stateful_widget(table, area, &mut view.table);
}

fn draw_catalog(f: &mut Frame, area: Rect, view: &mut MonitorView) {
    let items: Vec<ListItem> = view
        .session
        .catalog
        .iter()
        .map(|file| ListItem::new(file.name.clone()))
        .collect();

    let title = if view.session.catalog_directory.is_empty() {
        " Configurations ".to_string()
    } else {
        format!(" Configurations in {} ", view.session.catalog_directory)
    };

    let list = List::new(items)
        .block(Block::default().borders(Borders::ALL).title(title))
        .highlight_style(
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("> ");

    f.render_stateful_widget(list, area, &mut view.catalog);
}

fn draw_status_bar(f: &mut Frame, area: Rect, view: &MonitorView) {
    let line = match &view.session.notice {
        Some(Notice::Error(text)) => Line::from(Span::styled(
            text.clone(),
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        )),
        Some(Notice::Info(text)) => {
            Line::from(Span::styled(text.clone(), Style::default().fg(Color::Green)))
        }
        None => Line::from(Span::styled(
            "r refresh · s rescan · l load · ? help",
            Style::default().fg(Color::DarkGray),
        )),
    };

    let status = Paragraph::new(line).block(Block::default().borders(Borders::ALL));
    f.render_widget(status, area);
}

fn draw_help_overlay(f: &mut Frame, area: Rect, view: &MonitorView) {
    let key = |k: &'static str, what: &'static str| {
        Line::from(vec![
            Span::styled(format!("{:<8}", k), Style::default().fg(Color::Cyan)),
            Span::raw(what),
        ])
    };

    let mut lines = vec![
        Line::from(Span::styled(
            "Keyboard Shortcuts",
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        key("r", "Refresh telemetry"),
        key("s", "Rescan configurations"),
        key("l", "Load selected configuration"),
        key("Tab", "Select next catalog entry"),
        key("p", "Edit configuration path (Enter/Esc)"),
        key("e", "Toggle transmission of highlighted telegram"),
        key("↑/↓", "Move highlight"),
        key("Esc", "Close help or dismiss the status message"),
        key("?", "Toggle this help"),
        key("q", "Quit"),
    ];
    if let Some(path) = &view.log_path {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            format!("Log: {}", path.display()),
            Style::default().fg(Color::DarkGray),
        )));
    }

    let popup = centered_rect(60, 60, area);
    f.render_widget(Clear, popup);
    f.render_widget(
        Paragraph::new(lines).block(Block::default().borders(Borders::ALL).title(" Help ")),
        popup,
    );
}

fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1])[1]
}
