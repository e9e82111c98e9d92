//! Monitor view state - the latest session copy plus purely local UI state

use crate::session::SessionState;
use ratatui::widgets::{ListState, TableState};
use std::path::PathBuf;

/// Everything the monitor renders
pub struct MonitorView {
    /// Latest session state delivered by the store
    pub session: SessionState,

    /// Highlighted telegram row
    pub table: TableState,

    /// Highlighted catalog entry
    pub catalog: ListState,

    /// Path being typed, Some while in edit mode
    pub path_input: Option<String>,

    pub show_help: bool,

    /// Where tracing output goes, shown in the help overlay
    pub log_path: Option<PathBuf>,
}

impl MonitorView {
    pub fn new(session: SessionState, log_path: Option<PathBuf>) -> Self {
        let mut view = Self {
            session,
            table: TableState::default(),
            catalog: ListState::default(),
            path_input: None,
            show_help: false,
            log_path,
        };
        view.sync_selection();
        view
    }

    /// Take a new session state and keep highlights in range
    pub fn update(&mut self, session: SessionState) {
        self.session = session;
        self.sync_selection();
    }

    fn sync_selection(&mut self) {
        let rows = self.session.snapshot.len();
        match self.table.selected() {
            _ if rows == 0 => self.table.select(None),
            None => self.table.select(Some(0)),
            Some(i) if i >= rows => self.table.select(Some(rows - 1)),
            Some(_) => {}
        }

        // Catalog highlight follows the selected path when it is listed
        let listed = self
            .session
            .catalog
            .iter()
            .position(|f| f.path == self.session.selected_path);
        self.catalog.select(listed);
    }

    pub fn move_highlight(&mut self, delta: isize) {
        let rows = self.session.snapshot.len();
        if rows == 0 {
            return;
        }
        let current = self.table.selected().unwrap_or(0) as isize;
        let next = (current + delta).clamp(0, rows as isize - 1);
        self.table.select(Some(next as usize));
    }

    /// COM ID and transmit flag of the highlighted telegram
    pub fn highlighted_telegram(&self) -> Option<(u32, bool)> {
        let record = self.session.snapshot.records().get(self.table.selected()?)?;
        Some((record.com_id?, record.tx_enabled))
    }

    /// Path of the catalog entry after the highlighted one (wrapping)
    pub fn next_catalog_path(&self) -> Option<String> {
        let files = &self.session.catalog;
        if files.is_empty() {
            return None;
        }
        let next = match self.catalog.selected() {
            Some(i) => (i + 1) % files.len(),
            None => 0,
        };
        Some(files[next].path.clone())
    }
}
