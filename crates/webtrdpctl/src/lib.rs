//! webtrdpctl library - the client side of the webTRDP simulator
//!
//! Exposes the workbench and its parts so integration tests can drive them
//! against a stub backend.

pub mod catalog;
pub mod client;
pub mod commands;
pub mod control;
pub mod errors;
pub mod loader;
pub mod logging;
pub mod poller;
pub mod session;
pub mod tui;
pub mod workbench;

pub use client::BackendClient;
pub use session::{Notice, OperationKind, SessionState, SessionStore, SessionUpdate, StalePolicy};
pub use workbench::Workbench;
