//! Event Loop - terminal lifecycle, key handling and operation dispatch

use super::render::draw_ui;
use super::state::MonitorView;
use crate::session::{OperationKind, SessionState};
use crate::workbench::Workbench;
use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::future::Future;
use std::io;
use std::path::PathBuf;
use std::time::{Duration, Instant};
use tokio::sync::mpsc;
use tracing::{debug, info};

/// Messages delivered to the event loop
#[derive(Debug)]
pub enum TuiMessage {
    /// The session store applied an update
    SessionChanged(SessionState),
}

/// Run the monitor until the operator quits
pub async fn run(
    workbench: Workbench,
    auto_refresh: Option<Duration>,
    log_path: Option<PathBuf>,
) -> Result<()> {
    enable_raw_mode().map_err(|e| {
        anyhow::anyhow!(
            "Failed to enable raw mode: {}. Ensure you're running in a real terminal (TTY).",
            e
        )
    })?;

    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen).map_err(|e| {
        let _ = disable_raw_mode();
        anyhow::anyhow!("Failed to initialize terminal: {}", e)
    })?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let (tx, mut rx) = mpsc::unbounded_channel();
    let subscription = workbench.store().subscribe(move |state| {
        let _ = tx.send(TuiMessage::SessionChanged(state.clone()));
    });

    let mut view = MonitorView::new(workbench.state(), log_path);
    info!("Monitor started against {}", view.session.base_url);

    // Catalog scan and first poll run in the background
    spawn_op(&workbench, |wb| async move { wb.startup().await });

    let result = run_event_loop(&mut terminal, &mut view, &workbench, &mut rx, auto_refresh).await;

    workbench.store().unsubscribe(subscription);
    let cleanup_result = restore_terminal(&mut terminal);
    info!("Monitor stopped");

    result.and(cleanup_result)
}

fn restore_terminal(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>) -> Result<()> {
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    Ok(())
}

/// Spawn an operation; its outcome reaches the view through the session
fn spawn_op<F, Fut>(workbench: &Workbench, op: F)
where
    F: FnOnce(Workbench) -> Fut,
    Fut: Future + Send + 'static,
    Fut::Output: Send + 'static,
{
    tokio::spawn(op(workbench.clone()));
}

async fn run_event_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    view: &mut MonitorView,
    workbench: &Workbench,
    rx: &mut mpsc::UnboundedReceiver<TuiMessage>,
    auto_refresh: Option<Duration>,
) -> Result<()> {
    let mut last_auto_refresh = Instant::now();

    loop {
        while let Ok(msg) = rx.try_recv() {
            match msg {
                TuiMessage::SessionChanged(state) => view.update(state),
            }
        }

        if let Some(interval) = auto_refresh {
            if last_auto_refresh.elapsed() >= interval {
                last_auto_refresh = Instant::now();
                if !view.session.is_busy(OperationKind::Telemetry) {
                    spawn_op(workbench, |wb| async move { wb.refresh_telemetry().await });
                }
            }
        }

        let now_us = chrono::Utc::now().timestamp_micros();
        terminal.draw(|f| draw_ui(f, view, now_us))?;

        if event::poll(Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                if handle_key(key, view, workbench) == KeyOutcome::Quit {
                    break;
                }
            }
        }
    }

    Ok(())
}

#[derive(Debug, PartialEq, Eq)]
enum KeyOutcome {
    Continue,
    Quit,
}

fn handle_key(key: KeyEvent, view: &mut MonitorView, workbench: &Workbench) -> KeyOutcome {
    if let (KeyCode::Char('c'), KeyModifiers::CONTROL) = (key.code, key.modifiers) {
        return KeyOutcome::Quit;
    }

    // Path editing swallows everything else
    if let Some(input) = view.path_input.as_mut() {
        match key.code {
            KeyCode::Enter => {
                let path = input.clone();
                view.path_input = None;
                workbench.select_path(&path);
            }
            KeyCode::Esc => view.path_input = None,
            KeyCode::Backspace => {
                input.pop();
            }
            KeyCode::Char(c) => input.push(c),
            _ => {}
        }
        return KeyOutcome::Continue;
    }

    match key.code {
        KeyCode::Char('q') => return KeyOutcome::Quit,
        KeyCode::Esc if view.show_help => view.show_help = false,
        KeyCode::Esc => workbench.clear_notice(),
        KeyCode::Char('?') => view.show_help = !view.show_help,
        KeyCode::Char('r') => {
            debug!("Manual telemetry refresh");
            spawn_op(workbench, |wb| async move { wb.refresh_telemetry().await });
        }
        KeyCode::Char('s') => {
            spawn_op(workbench, |wb| async move { wb.rescan_configs().await });
        }
        KeyCode::Char('l') => {
            spawn_op(workbench, |wb| async move { wb.load_config().await });
        }
        KeyCode::Char('p') => {
            view.path_input = Some(view.session.selected_path.clone());
        }
        KeyCode::Tab => {
            if let Some(path) = view.next_catalog_path() {
                workbench.select_path(&path);
            }
        }
        KeyCode::Char('e') => {
            if let Some((com_id, enabled)) = view.highlighted_telegram() {
                spawn_op(workbench, move |wb| async move {
                    wb.set_pd_enabled(com_id, !enabled).await
                });
            }
        }
        KeyCode::Up => view.move_highlight(-1),
        KeyCode::Down => view.move_highlight(1),
        KeyCode::PageUp => view.move_highlight(-10),
        KeyCode::PageDown => view.move_highlight(10),
        _ => {}
    }

    KeyOutcome::Continue
}
