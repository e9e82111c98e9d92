//! webTRDP common types
//!
//! Shared between the control client and its tests: the telegram snapshot
//! model, wire payloads, error taxonomy and classifier, presentation helpers
//! and client configuration.

pub mod classify;
pub mod config;
pub mod error;
pub mod format;
pub mod model;

pub use classify::{classify, classify_with_status};
pub use config::ClientConfig;
pub use error::{ClientError, ErrorKind};
pub use model::{ConfigCatalog, ConfigFileRef, Snapshot, TelegramRecord};
