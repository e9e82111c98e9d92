//! Session state container
//!
//! All client state lives in one [`SessionState`] behind a [`SessionStore`].
//! Readers take consistent clones with `get()`; writers go through
//! `apply(update)`, which replaces whole fields under one lock and then
//! notifies subscribers synchronously, in update order.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use webtrdp_common::format::pluralize;
use webtrdp_common::model::{ConfigCatalog, ConfigFileRef, Snapshot};

/// The independently tracked operation kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OperationKind {
    Telemetry,
    Catalog,
    Load,
    Control,
}

impl OperationKind {
    pub const ALL: [OperationKind; 4] = [
        OperationKind::Telemetry,
        OperationKind::Catalog,
        OperationKind::Load,
        OperationKind::Control,
    ];

    /// Phrase used in classified error messages
    pub fn action(&self) -> &'static str {
        match self {
            OperationKind::Telemetry => "load telegrams",
            OperationKind::Catalog => "scan configurations",
            OperationKind::Load => "load configuration",
            OperationKind::Control => "update telegram",
        }
    }
}

/// Single status/error slot shown to the operator
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    Info(String),
    Error(String),
}

impl Notice {
    pub fn text(&self) -> &str {
        match self {
            Notice::Info(text) | Notice::Error(text) => text,
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Notice::Error(_))
    }
}

/// How overlapping telemetry responses are reconciled
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StalePolicy {
    /// Every response is applied as it arrives, even if a newer request
    /// already completed
    #[default]
    LastArrivalWins,
    /// Responses older than the last applied one are dropped
    DiscardStale,
}

/// Process-wide session state
#[derive(Debug, Clone)]
pub struct SessionState {
    pub base_url: String,
    pub host_name: String,
    /// Operator-selected configuration path
    pub selected_path: String,
    pub snapshot: Arc<Snapshot>,
    pub catalog_directory: String,
    pub catalog: Vec<ConfigFileRef>,
    pub notice: Option<Notice>,
    pub stale_policy: StalePolicy,
    in_flight: HashMap<OperationKind, u32>,
    next_seq: u64,
    applied_telemetry_seq: u64,
}

impl SessionState {
    pub fn new(base_url: &str, host_name: &str, selected_path: &str) -> Self {
        Self {
            base_url: base_url.to_string(),
            host_name: host_name.to_string(),
            selected_path: selected_path.to_string(),
            snapshot: Arc::new(Snapshot::default()),
            catalog_directory: String::new(),
            catalog: Vec::new(),
            notice: None,
            stale_policy: StalePolicy::default(),
            in_flight: HashMap::new(),
            next_seq: 0,
            applied_telemetry_seq: 0,
        }
    }

    pub fn with_stale_policy(mut self, policy: StalePolicy) -> Self {
        self.stale_policy = policy;
        self
    }

    /// True while at least one operation of `kind` is outstanding
    pub fn is_busy(&self, kind: OperationKind) -> bool {
        self.in_flight.get(&kind).copied().unwrap_or(0) > 0
    }

    /// Sequence number handed to the most recent `Begin`
    pub fn last_issued_seq(&self) -> u64 {
        self.next_seq
    }

    /// Sequence number of the telemetry response currently shown
    pub fn applied_telemetry_seq(&self) -> u64 {
        self.applied_telemetry_seq
    }

    fn finish(&mut self, kind: OperationKind) {
        if let Some(count) = self.in_flight.get_mut(&kind) {
            *count = count.saturating_sub(1);
        }
    }

    fn is_stale_telemetry(&self, seq: u64) -> bool {
        self.stale_policy == StalePolicy::DiscardStale && seq < self.applied_telemetry_seq
    }

    /// Reducer behind [`SessionStore::apply`]
    fn reduce(&mut self, update: SessionUpdate) {
        match update {
            SessionUpdate::SetBaseUrl(url) => self.base_url = url,
            SessionUpdate::SetHostName(host) => self.host_name = host,
            SessionUpdate::SelectPath(path) => self.selected_path = path,
            SessionUpdate::Begin(kind) => {
                self.next_seq += 1;
                *self.in_flight.entry(kind).or_insert(0) += 1;
                self.notice = None;
            }
            SessionUpdate::TelemetryLoaded { seq, snapshot } => {
                self.finish(OperationKind::Telemetry);
                if self.is_stale_telemetry(seq) {
                    return;
                }
                self.notice = Some(Notice::Info(format!(
                    "Loaded {}.",
                    pluralize(
                        snapshot.len(),
                        "process data telegram",
                        "process data telegrams"
                    )
                )));
                self.snapshot = snapshot;
                self.applied_telemetry_seq = self.applied_telemetry_seq.max(seq);
            }
            SessionUpdate::CatalogLoaded { catalog, .. } => {
                self.finish(OperationKind::Catalog);
                self.notice = Some(Notice::Info(catalog_message(&catalog)));
                // Auto-select runs once per fetched catalog, never over an
                // operator-entered path
                if self.selected_path.is_empty() {
                    if let Some(first) = catalog.first() {
                        self.selected_path = first.path.clone();
                    }
                }
                self.catalog_directory = catalog.directory_label().to_string();
                self.catalog = catalog.files;
            }
            SessionUpdate::Completed { kind, message, .. } => {
                self.finish(kind);
                self.notice = Some(Notice::Info(message));
            }
            SessionUpdate::Failed { kind, seq, message } => {
                self.finish(kind);
                if kind == OperationKind::Telemetry && self.is_stale_telemetry(seq) {
                    return;
                }
                self.notice = Some(Notice::Error(message));
            }
            SessionUpdate::ClearNotice => self.notice = None,
        }
    }
}

fn catalog_message(catalog: &ConfigCatalog) -> String {
    let directory = catalog.directory_label();
    if catalog.files.is_empty() {
        return if directory.is_empty() {
            "No XML configurations found.".to_string()
        } else {
            format!("No XML configurations found in {}.", directory)
        };
    }

    let found = pluralize(catalog.files.len(), "XML configuration", "XML configurations");
    if directory.is_empty() {
        format!("Found {}.", found)
    } else {
        format!("Found {} in {}.", found, directory)
    }
}

/// One atomic change to the session
#[derive(Debug, Clone)]
pub enum SessionUpdate {
    SetBaseUrl(String),
    SetHostName(String),
    SelectPath(String),
    /// An operation was issued; raises its busy flag and clears the notice
    Begin(OperationKind),
    TelemetryLoaded {
        seq: u64,
        snapshot: Arc<Snapshot>,
    },
    CatalogLoaded {
        seq: u64,
        catalog: ConfigCatalog,
    },
    /// A command (load, control) succeeded
    Completed {
        kind: OperationKind,
        seq: u64,
        message: String,
    },
    Failed {
        kind: OperationKind,
        seq: u64,
        message: String,
    },
    ClearNotice,
}

/// Handle returned by [`SessionStore::subscribe`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Listener = Box<dyn Fn(&SessionState) + Send + Sync>;

#[derive(Default)]
struct Listeners {
    next_id: u64,
    entries: Vec<(SubscriptionId, Listener)>,
}

/// Shared handle to the session state
#[derive(Clone)]
pub struct SessionStore {
    state: Arc<Mutex<SessionState>>,
    listeners: Arc<Mutex<Listeners>>,
}

impl SessionStore {
    pub fn new(initial: SessionState) -> Self {
        Self {
            state: Arc::new(Mutex::new(initial)),
            listeners: Arc::new(Mutex::new(Listeners::default())),
        }
    }

    /// Consistent copy of the current state
    pub fn get(&self) -> SessionState {
        lock(&self.state).clone()
    }

    /// Apply one update atomically and notify subscribers.
    ///
    /// Returns the state right after this update. Listeners may call `get()`
    /// but must not call `apply()`.
    pub fn apply(&self, update: SessionUpdate) -> SessionState {
        // Holding the listener lock across the update keeps notifications in
        // the same order as updates
        let listeners = lock(&self.listeners);
        let after = {
            let mut state = lock(&self.state);
            state.reduce(update);
            state.clone()
        };
        for (_, listener) in &listeners.entries {
            listener(&after);
        }
        after
    }

    /// Register a listener called after every update
    pub fn subscribe<F>(&self, listener: F) -> SubscriptionId
    where
        F: Fn(&SessionState) + Send + Sync + 'static,
    {
        let mut listeners = lock(&self.listeners);
        listeners.next_id += 1;
        let id = SubscriptionId(listeners.next_id);
        listeners.entries.push((id, Box::new(listener)));
        id
    }

    pub fn unsubscribe(&self, id: SubscriptionId) {
        lock(&self.listeners).entries.retain(|(entry, _)| *entry != id);
    }
}

/// A panicking listener must not take the whole session down with it
fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}
