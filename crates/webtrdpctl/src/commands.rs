//! One-shot commands
//!
//! Each command runs one operation through the workbench, prints the result
//! and the session notice, and returns the process exit code.

use crate::errors::{exit_code, EXIT_SUCCESS};
use crate::session::{Notice, SessionState};
use crate::workbench::Workbench;
use anyhow::{Context, Result};
use owo_colors::OwoColorize;
use webtrdp_common::format::{
    format_cycle, format_direction, format_period_ms, format_rx_age, or_empty,
};
use webtrdp_common::model::{FieldValue, Snapshot};
use webtrdp_common::ClientError;

/// `webtrdpctl telegrams`
pub async fn telegrams(workbench: &Workbench, json: bool) -> Result<i32> {
    let result = workbench.refresh_telemetry().await;
    if let Ok(snapshot) = &result {
        if json {
            let text = serde_json::to_string_pretty(snapshot.as_ref())
                .context("Failed to serialize telegrams")?;
            println!("{}", text);
        } else if !snapshot.is_empty() {
            print!("{}", render_table(snapshot, now_us()));
        }
    }
    Ok(report(workbench, result))
}

/// `webtrdpctl configs`
pub async fn configs(workbench: &Workbench) -> Result<i32> {
    let result = workbench.rescan_configs().await;
    if result.is_ok() {
        let state = workbench.state();
        for file in &state.catalog {
            let marker = if file.path == state.selected_path { "*" } else { " " };
            println!("{} {:<32} {}", marker, file.name, file.path.dimmed());
        }
    }
    Ok(report(workbench, result))
}

/// `webtrdpctl load [PATH]`
///
/// Without a path the configured one is used; if that is empty too, the
/// catalog is scanned so its first entry gets selected.
pub async fn load(workbench: &Workbench, path: Option<String>) -> Result<i32> {
    if let Some(path) = path {
        workbench.select_path(&path);
    } else if workbench.state().selected_path.is_empty() {
        if let Err(err) = workbench.rescan_configs().await {
            return Ok(report::<()>(workbench, Err(err)));
        }
    }

    let result = workbench.load_config().await;
    Ok(report(workbench, result))
}

/// `webtrdpctl enable <COM_ID> [--off]`
pub async fn enable(workbench: &Workbench, com_id: u32, enable: bool) -> Result<i32> {
    let result = workbench.set_pd_enabled(com_id, enable).await;
    Ok(report(workbench, result))
}

/// `webtrdpctl set <COM_ID> NAME=VALUE...`
pub async fn set_values(workbench: &Workbench, com_id: u32, assignments: &[String]) -> Result<i32> {
    let fields = assignments
        .iter()
        .map(|a| {
            FieldValue::parse_assignment(a)
                .with_context(|| format!("Invalid field assignment '{}', expected NAME=VALUE", a))
        })
        .collect::<Result<Vec<_>>>()?;

    let result = workbench.set_pd_values(com_id, fields).await;
    Ok(report(workbench, result))
}

/// Print the session notice and map the outcome to an exit code
fn report<T>(workbench: &Workbench, result: Result<T, ClientError>) -> i32 {
    print_notice(&workbench.state());
    match result {
        Ok(_) => EXIT_SUCCESS,
        Err(err) => exit_code(err.kind()),
    }
}

fn print_notice(state: &SessionState) {
    match &state.notice {
        Some(Notice::Info(text)) => eprintln!("{}", text.green()),
        Some(Notice::Error(text)) => eprintln!("{}", text.red()),
        None => {}
    }
}

fn now_us() -> i64 {
    chrono::Utc::now().timestamp_micros()
}

const HEADERS: [&str; 13] = [
    "NAME", "COM ID", "DATASET", "DIR", "CYCLE", "IFACE", "TX", "TX#", "RX#", "TIMEOUTS",
    "LAST RX", "PERIOD", "AVG",
];

/// Plain-text telegram table, columns padded to their widest cell
pub fn render_table(snapshot: &Snapshot, now_us: i64) -> String {
    let rows: Vec<[String; 13]> = snapshot
        .records()
        .iter()
        .map(|r| {
            [
                r.display_name(),
                r.com_id.map(|v| v.to_string()).unwrap_or_else(|| or_empty(None)),
                r.dataset_id.map(|v| v.to_string()).unwrap_or_else(|| or_empty(None)),
                format_direction(r.direction.as_deref()),
                format_cycle(r.cycle_us),
                or_empty(r.interface.as_deref()),
                if r.tx_enabled { "on" } else { "off" }.to_string(),
                r.tx_count.to_string(),
                r.rx_count.to_string(),
                r.timeout_count.to_string(),
                format_rx_age(r, now_us),
                format_period_ms(r.last_period()),
                format_period_ms(r.avg_period()),
            ]
        })
        .collect();

    let mut widths: Vec<usize> = HEADERS.iter().map(|h| h.chars().count()).collect();
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row.iter()) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let mut out = String::new();
    push_row(&mut out, HEADERS.iter().map(|h| h.to_string()), &widths);
    for row in rows {
        push_row(&mut out, row.into_iter(), &widths);
    }
    out
}

fn push_row(out: &mut String, cells: impl Iterator<Item = String>, widths: &[usize]) {
    let line = cells
        .zip(widths)
        .map(|(cell, width)| {
            let pad = width.saturating_sub(cell.chars().count());
            format!("{}{}", cell, " ".repeat(pad))
        })
        .collect::<Vec<_>>()
        .join("  ");
    out.push_str(line.trim_end());
    out.push('\n');
}

#[cfg(test)]
mod tests {
    use super::*;
    use webtrdp_common::model::TelegramRecord;

    #[test]
    fn test_render_table() {
        let snapshot = Snapshot::new(vec![
            TelegramRecord {
                name: Some("door_status".to_string()),
                com_id: Some(1001),
                dataset_id: Some(2001),
                direction: Some("source_sink".to_string()),
                cycle_us: Some(100_000),
                interface: Some("eth0".to_string()),
                tx_enabled: true,
                tx_count: 12,
                rx_count: 10,
                last_rx_valid: true,
                last_rx_time_us: 9_000_000,
                last_period_us: 99_800.0,
                avg_period_us: 100_010.0,
                ..Default::default()
            },
            TelegramRecord {
                com_id: Some(7),
                ..Default::default()
            },
        ]);

        let table = render_table(&snapshot, 10_000_000);
        let lines: Vec<&str> = table.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("NAME"));
        assert!(lines[1].contains("door_status"));
        assert!(lines[1].contains("Source/Sink"));
        assert!(lines[1].contains("100.0 ms"));
        assert!(lines[1].contains("1s ago"));
        assert!(lines[1].contains("99.8 ms"));
        assert!(lines[2].starts_with("COM 7"));
        assert!(lines[2].contains("off"));
    }

    #[test]
    fn test_render_empty_table_has_header_only() {
        let table = render_table(&Snapshot::default(), 0);
        assert_eq!(table.lines().count(), 1);
    }
}
