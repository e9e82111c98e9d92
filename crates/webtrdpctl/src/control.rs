//! PD control commands
//!
//! Enable/disable transmission and overwrite dataset values of a single
//! telegram. Like config loads, these never re-poll telemetry.

use crate::client::BackendClient;
use crate::session::{OperationKind, SessionStore, SessionUpdate};
use tracing::{info, warn};
use webtrdp_common::format::pluralize;
use webtrdp_common::model::FieldValue;
use webtrdp_common::{classify_with_status, ClientError};

/// Enable or disable transmission of `com_id`
pub async fn set_enabled(
    client: &BackendClient,
    store: &SessionStore,
    com_id: u32,
    enable: bool,
) -> Result<bool, ClientError> {
    let started = store.apply(SessionUpdate::Begin(OperationKind::Control));
    let seq = started.last_issued_seq();

    let result = client
        .enable_pd(&started.base_url, com_id, enable)
        .await
        .map(|ack| ack.enabled);
    finish(store, seq, result, |enabled| {
        format!(
            "Transmission of COM ID {} {}. Refresh telemetry to see the effect.",
            com_id,
            if *enabled { "enabled" } else { "disabled" }
        )
    })
}

/// Overwrite dataset fields of `com_id`
pub async fn set_values(
    client: &BackendClient,
    store: &SessionStore,
    com_id: u32,
    fields: Vec<FieldValue>,
) -> Result<u64, ClientError> {
    let started = store.apply(SessionUpdate::Begin(OperationKind::Control));
    let seq = started.last_issued_seq();

    let result = if fields.is_empty() {
        Err(ClientError::ValidationFailed {
            status: None,
            message: "No field values given.".to_string(),
        })
    } else {
        client
            .set_pd_values(&started.base_url, com_id, fields)
            .await
            .map(|ack| ack.updated_fields)
    };
    finish(store, seq, result, |updated| {
        format!(
            "Updated {} on COM ID {}. Refresh telemetry to see the effect.",
            pluralize(usize::try_from(*updated).unwrap_or(usize::MAX), "field", "fields"),
            com_id
        )
    })
}

fn finish<T, F>(
    store: &SessionStore,
    seq: u64,
    result: Result<T, ClientError>,
    describe: F,
) -> Result<T, ClientError>
where
    F: FnOnce(&T) -> String,
{
    match result {
        Ok(value) => {
            let message = describe(&value);
            info!(seq, "{}", message);
            store.apply(SessionUpdate::Completed {
                kind: OperationKind::Control,
                seq,
                message,
            });
            Ok(value)
        }
        Err(err) => {
            let message = classify_with_status(OperationKind::Control.action(), &err);
            warn!(seq, kind = ?err.kind(), "{}", message);
            store.apply(SessionUpdate::Failed {
                kind: OperationKind::Control,
                seq,
                message,
            });
            Err(err)
        }
    }
}
