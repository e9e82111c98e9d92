//! Config load orchestrator
//!
//! Submits the selected path and host identity. A successful load only
//! updates the notice: telemetry is refreshed separately by the operator.

use crate::client::BackendClient;
use crate::session::{OperationKind, SessionStore, SessionUpdate};
use tracing::{info, warn};
use webtrdp_common::{classify_with_status, ClientError};

/// Load the session's selected configuration.
///
/// Returns the path the backend reports as applied.
pub async fn load(client: &BackendClient, store: &SessionStore) -> Result<String, ClientError> {
    let started = store.apply(SessionUpdate::Begin(OperationKind::Load));
    let seq = started.last_issued_seq();
    let requested = started.selected_path.trim().to_string();

    let result = if requested.is_empty() {
        Err(ClientError::ValidationFailed {
            status: None,
            message: "Select or enter a configuration path before loading.".to_string(),
        })
    } else {
        info!(seq, "Loading configuration {} for host {}", requested, started.host_name);
        client
            .load_config(&started.base_url, &requested, &started.host_name)
            .await
    };

    match result {
        Ok(ack) => {
            // The backend may normalize the path; show what it applied
            let applied = if ack.path.is_empty() {
                requested
            } else {
                ack.path
            };
            info!(seq, "Backend applied configuration {}", applied);
            store.apply(SessionUpdate::Completed {
                kind: OperationKind::Load,
                seq,
                message: format!(
                    "Loaded configuration {}. Refresh telemetry to see its effect.",
                    applied
                ),
            });
            Ok(applied)
        }
        Err(err) => {
            let message = classify_with_status(OperationKind::Load.action(), &err);
            warn!(seq, kind = ?err.kind(), "{}", message);
            store.apply(SessionUpdate::Failed {
                kind: OperationKind::Load,
                seq,
                message,
            });
            Err(err)
        }
    }
}
