//! HTTP client for the webTRDP backend.
//!
//! Endpoints used:
//! - GET /api/pd/telegrams - telemetry snapshot
//! - GET /api/configs - config catalog
//! - POST /api/configs/load - load a configuration
//! - POST /api/pd/{com_id}/enable - enable/disable transmission
//! - PATCH /api/pd/{com_id}/values - set dataset field values
//!
//! Every call takes the base address explicitly since the operator can change
//! it during a session.

use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::debug;
use webtrdp_common::config::BackendConfig;
use webtrdp_common::model::{
    ConfigCatalog, EnablePdAck, EnablePdRequest, FieldValue, LoadConfigAck, LoadConfigRequest,
    SetPdValuesAck, SetPdValuesRequest, Snapshot,
};
use webtrdp_common::ClientError;

/// Strip surrounding whitespace and trailing slashes from a base address
pub fn normalize_base_url(base_url: &str) -> String {
    base_url.trim().trim_end_matches('/').to_string()
}

/// Client for the backend REST API
#[derive(Debug, Clone)]
pub struct BackendClient {
    http: reqwest::Client,
}

impl BackendClient {
    /// Create a client with the transport settings from config
    pub fn new(config: &BackendConfig) -> Result<Self, ClientError> {
        let http = reqwest::Client::builder()
            .connect_timeout(Duration::from_millis(config.connect_timeout_ms))
            .user_agent(format!("webtrdpctl/{}", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| ClientError::Unreachable {
                base_url: normalize_base_url(&config.url),
                detail: e.to_string(),
            })?;
        Ok(Self { http })
    }

    /// Fetch the current telemetry snapshot
    pub async fn fetch_telegrams(&self, base_url: &str) -> Result<Snapshot, ClientError> {
        let base = normalize_base_url(base_url);
        let request = self.http.get(format!("{}/api/pd/telegrams", base));
        let body = self.send(&base, request, false).await?;
        parse_body(&body, "telegram")
    }

    /// Fetch the list of configuration files the backend can load
    pub async fn list_configs(&self, base_url: &str) -> Result<ConfigCatalog, ClientError> {
        let base = normalize_base_url(base_url);
        let request = self.http.get(format!("{}/api/configs", base));
        let body = self.send(&base, request, false).await?;
        parse_body(&body, "config catalog")
    }

    /// Ask the backend to load `path` for `host_name`
    pub async fn load_config(
        &self,
        base_url: &str,
        path: &str,
        host_name: &str,
    ) -> Result<LoadConfigAck, ClientError> {
        let base = normalize_base_url(base_url);
        let payload = LoadConfigRequest {
            path: path.to_string(),
            host_name: host_name.to_string(),
        };
        let request = self
            .http
            .post(format!("{}/api/configs/load", base))
            .json(&payload);
        let body = self.send(&base, request, true).await?;
        parse_body(&body, "config load")
    }

    /// Enable or disable transmission of one telegram
    pub async fn enable_pd(
        &self,
        base_url: &str,
        com_id: u32,
        enable: bool,
    ) -> Result<EnablePdAck, ClientError> {
        let base = normalize_base_url(base_url);
        let request = self
            .http
            .post(format!("{}/api/pd/{}/enable", base, com_id))
            .json(&EnablePdRequest { enable });
        let body = self.send(&base, request, true).await?;
        parse_body(&body, "pd enable")
    }

    /// Overwrite dataset field values of one telegram
    pub async fn set_pd_values(
        &self,
        base_url: &str,
        com_id: u32,
        fields: Vec<FieldValue>,
    ) -> Result<SetPdValuesAck, ClientError> {
        let base = normalize_base_url(base_url);
        let request = self
            .http
            .patch(format!("{}/api/pd/{}/values", base, com_id))
            .json(&SetPdValuesRequest { fields });
        let body = self.send(&base, request, true).await?;
        parse_body(&body, "pd values")
    }

    /// Send a request and return the success body.
    ///
    /// Any failure before a response arrives is Unreachable. Non-success
    /// statuses become Backend, or ValidationFailed for rejected commands,
    /// even when their body cannot be read.
    async fn send(
        &self,
        base: &str,
        request: reqwest::RequestBuilder,
        is_command: bool,
    ) -> Result<String, ClientError> {
        let response = request.send().await.map_err(|e| {
            debug!("Request to {} failed before a response: {}", base, e);
            ClientError::Unreachable {
                base_url: base.to_string(),
                detail: transport_detail(&e),
            }
        })?;

        let status = response.status();
        debug!("{} answered {}", response.url(), status);

        let body = match response.text().await {
            Ok(body) => body,
            Err(e) if status.is_success() => {
                return Err(ClientError::Malformed {
                    what: "backend".to_string(),
                    detail: format!("response body could not be read: {}", e),
                })
            }
            // The status alone decides the failure kind
            Err(e) => {
                debug!("Failure body from {} could not be read: {}", base, e);
                String::new()
            }
        };

        if status.is_success() {
            Ok(body)
        } else if is_command {
            Err(ClientError::from_command_response(status.as_u16(), &body))
        } else {
            Err(ClientError::from_response(status.as_u16(), &body))
        }
    }
}

fn transport_detail(e: &reqwest::Error) -> String {
    if e.is_timeout() {
        "request timed out".to_string()
    } else if e.is_connect() {
        format!("connection failed: {}", e)
    } else if e.is_builder() {
        format!("invalid backend address: {}", e)
    } else {
        e.to_string()
    }
}

fn parse_body<T: DeserializeOwned>(body: &str, what: &str) -> Result<T, ClientError> {
    serde_json::from_str(body).map_err(|e| ClientError::Malformed {
        what: what.to_string(),
        detail: e.to_string(),
    })
}
