//! Config catalog client
//!
//! Lists the XML configurations the backend offers. Auto-selection of the
//! first entry happens in the session reducer, once per successful scan.

use crate::client::BackendClient;
use crate::session::{OperationKind, SessionStore, SessionUpdate};
use tracing::{info, warn};
use webtrdp_common::model::ConfigCatalog;
use webtrdp_common::{classify, ClientError};

/// Scan the backend catalog and publish it to the session
pub async fn rescan(
    client: &BackendClient,
    store: &SessionStore,
) -> Result<ConfigCatalog, ClientError> {
    let started = store.apply(SessionUpdate::Begin(OperationKind::Catalog));
    let seq = started.last_issued_seq();

    match client.list_configs(&started.base_url).await {
        Ok(catalog) => {
            info!(
                seq,
                "Catalog lists {} configurations in '{}'",
                catalog.files.len(),
                catalog.directory_label()
            );
            store.apply(SessionUpdate::CatalogLoaded {
                seq,
                catalog: catalog.clone(),
            });
            Ok(catalog)
        }
        Err(err) => {
            let message = classify(OperationKind::Catalog.action(), &err);
            warn!(seq, kind = ?err.kind(), "{}", message);
            store.apply(SessionUpdate::Failed {
                kind: OperationKind::Catalog,
                seq,
                message,
            });
            Err(err)
        }
    }
}
