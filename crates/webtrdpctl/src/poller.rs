//! Telemetry poller
//!
//! One request per invocation. A successful response replaces the session
//! snapshot wholesale; overlapping polls are reconciled by the session's
//! stale policy.

use crate::client::BackendClient;
use crate::session::{OperationKind, SessionStore, SessionUpdate};
use std::sync::Arc;
use tracing::{debug, info, warn};
use webtrdp_common::model::Snapshot;
use webtrdp_common::{classify, ClientError};

/// Fetch the current snapshot and publish it to the session.
///
/// The outcome is always written to the session; the returned value is for
/// callers that need it directly (one-shot commands).
pub async fn refresh(
    client: &BackendClient,
    store: &SessionStore,
) -> Result<Arc<Snapshot>, ClientError> {
    let started = store.apply(SessionUpdate::Begin(OperationKind::Telemetry));
    let seq = started.last_issued_seq();
    debug!(seq, "Polling telemetry from {}", started.base_url);

    match client.fetch_telegrams(&started.base_url).await {
        Ok(snapshot) => {
            info!(seq, "Received {} telegrams", snapshot.len());
            let snapshot = snapshot.into_shared();
            store.apply(SessionUpdate::TelemetryLoaded {
                seq,
                snapshot: snapshot.clone(),
            });
            Ok(snapshot)
        }
        Err(err) => {
            let message = classify(OperationKind::Telemetry.action(), &err);
            warn!(seq, kind = ?err.kind(), "{}", message);
            store.apply(SessionUpdate::Failed {
                kind: OperationKind::Telemetry,
                seq,
                message,
            });
            Err(err)
        }
    }
}
