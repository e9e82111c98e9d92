//! Process data telegram model
//!
//! Typed mirror of what the backend reports for each PD runtime, plus the
//! config catalog and the request/ack payloads of the control endpoints.

use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// One monitored process data telegram as reported by `/api/pd/telegrams`.
///
/// Identity and configuration fields are absent when the backend has no
/// definition for the runtime yet, so everything defaults.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TelegramRecord {
    pub name: Option<String>,
    pub com_id: Option<u32>,
    pub dataset_id: Option<u32>,

    /// Raw direction token (`source`, `sink`, `source_sink`, `tx_rx`, ...)
    pub direction: Option<String>,
    pub cycle_us: Option<u64>,
    pub interface: Option<String>,

    pub tx_enabled: bool,
    /// Next scheduled transmit, monotonic clock domain
    pub next_tx_due_us: i64,
    pub tx_payload_size: u64,
    pub tx_count: u64,

    pub last_rx_payload_size: u64,
    /// Microseconds since epoch; only meaningful when `last_rx_valid`
    pub last_rx_time_us: i64,
    pub last_rx_valid: bool,
    pub rx_count: u64,
    pub timeout_count: u64,
    pub last_period_us: f64,
    pub avg_period_us: f64,
}

impl TelegramRecord {
    /// Label used in tables and log lines
    pub fn display_name(&self) -> String {
        match (&self.name, self.com_id) {
            (Some(name), _) if !name.is_empty() => name.clone(),
            (_, Some(com_id)) => format!("COM {}", com_id),
            _ => "unnamed".to_string(),
        }
    }

    /// Last receive timestamp, or None until a valid receipt happened
    pub fn last_rx_time(&self) -> Option<i64> {
        if self.last_rx_valid && self.last_rx_time_us != 0 {
            Some(self.last_rx_time_us)
        } else {
            None
        }
    }

    /// Last inter-arrival period, or None until a valid receipt happened
    pub fn last_period(&self) -> Option<f64> {
        self.last_rx_valid.then_some(self.last_period_us)
    }

    /// Running average period, gated the same way as `last_period`
    pub fn avg_period(&self) -> Option<f64> {
        self.last_rx_valid.then_some(self.avg_period_us)
    }
}

/// The complete set of telegrams from one successful poll.
///
/// Never merged: the next successful poll replaces it wholesale.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Snapshot {
    records: Vec<TelegramRecord>,
}

impl Snapshot {
    pub fn new(records: Vec<TelegramRecord>) -> Self {
        Self { records }
    }

    pub fn records(&self) -> &[TelegramRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn into_shared(self) -> Arc<Snapshot> {
        Arc::new(self)
    }
}

impl From<Vec<TelegramRecord>> for Snapshot {
    fn from(records: Vec<TelegramRecord>) -> Self {
        Self::new(records)
    }
}

/// A configuration file the backend offers for loading
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigFileRef {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub path: String,
}

/// Response from `GET /api/configs`; both fields may be missing
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConfigCatalog {
    pub directory: Option<String>,
    pub files: Vec<ConfigFileRef>,
}

impl ConfigCatalog {
    /// Directory label, empty string when the backend did not report one
    pub fn directory_label(&self) -> &str {
        self.directory.as_deref().unwrap_or("")
    }

    /// Entry picked when the operator has not chosen a path yet
    pub fn first(&self) -> Option<&ConfigFileRef> {
        self.files.first()
    }
}

/// Body of `POST /api/configs/load`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoadConfigRequest {
    pub path: String,
    pub host_name: String,
}

/// Success body of `POST /api/configs/load`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoadConfigAck {
    /// Path the backend actually applied
    pub path: String,
    pub status: Option<String>,
    pub host_name: Option<String>,
}

/// Body of `POST /api/pd/{com_id}/enable`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnablePdRequest {
    pub enable: bool,
}

/// Success body of `POST /api/pd/{com_id}/enable`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnablePdAck {
    pub status: Option<String>,
    pub com_id: Option<u32>,
    pub enabled: bool,
}

/// One field assignment for `PATCH /api/pd/{com_id}/values`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldValue {
    pub name: String,
    pub value: f64,
}

impl FieldValue {
    /// Parse `NAME=VALUE` as typed on the command line
    pub fn parse_assignment(input: &str) -> Option<Self> {
        let (name, value) = input.split_once('=')?;
        let name = name.trim();
        if name.is_empty() {
            return None;
        }
        let value: f64 = value.trim().parse().ok()?;
        value.is_finite().then(|| Self {
            name: name.to_string(),
            value,
        })
    }
}

/// Body of `PATCH /api/pd/{com_id}/values`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SetPdValuesRequest {
    pub fields: Vec<FieldValue>,
}

/// Success body of `PATCH /api/pd/{com_id}/values`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SetPdValuesAck {
    pub status: Option<String>,
    pub com_id: Option<u32>,
    pub updated_fields: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_from_backend_json() {
        let json = r#"{
            "name": "door_status",
            "com_id": 1001,
            "dataset_id": 2001,
            "direction": "source_sink",
            "cycle_us": 100000,
            "interface": "eth0",
            "tx_enabled": true,
            "next_tx_due_us": 123456789,
            "tx_payload_size": 16,
            "last_rx_payload_size": 16,
            "last_rx_time_us": 1700000000000000,
            "last_rx_valid": true,
            "rx_count": 10,
            "tx_count": 12,
            "timeout_count": 1,
            "last_period_us": 99800.5,
            "avg_period_us": 100010.0
        }"#;

        let record: TelegramRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.com_id, Some(1001));
        assert_eq!(record.direction.as_deref(), Some("source_sink"));
        assert_eq!(record.cycle_us, Some(100000));
        assert_eq!(record.tx_count, 12);
        assert_eq!(record.last_rx_time(), Some(1_700_000_000_000_000));
        assert_eq!(record.last_period(), Some(99800.5));
    }

    #[test]
    fn test_record_without_definition() {
        // Runtimes without a definition only carry counters
        let json = r#"{"tx_enabled": false, "rx_count": 3, "last_rx_valid": false, "last_period_us": 0}"#;
        let record: TelegramRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.name, None);
        assert_eq!(record.com_id, None);
        assert_eq!(record.rx_count, 3);
        assert_eq!(record.display_name(), "unnamed");
    }

    #[test]
    fn test_invalid_rx_hides_timing() {
        let record = TelegramRecord {
            last_rx_valid: false,
            last_rx_time_us: 0,
            last_period_us: 0.0,
            ..Default::default()
        };
        assert_eq!(record.last_rx_time(), None);
        assert_eq!(record.last_period(), None);
        assert_eq!(record.avg_period(), None);
    }

    #[test]
    fn test_snapshot_is_transparent_array() {
        let snapshot: Snapshot = serde_json::from_str("[]").unwrap();
        assert!(snapshot.is_empty());

        let snapshot: Snapshot =
            serde_json::from_str(r#"[{"com_id": 1}, {"com_id": 2, "name": "b"}]"#).unwrap();
        assert_eq!(snapshot.len(), 2);
        assert_eq!(snapshot.records()[1].display_name(), "b");
        assert!(serde_json::from_str::<Snapshot>(r#"{"com_id": 1}"#).is_err());
    }

    #[test]
    fn test_catalog_defaults() {
        let catalog: ConfigCatalog = serde_json::from_str("{}").unwrap();
        assert_eq!(catalog.directory_label(), "");
        assert!(catalog.first().is_none());

        let catalog: ConfigCatalog = serde_json::from_str(
            r#"{"directory": "/etc/cfg", "files": [{"name": "a.xml", "path": "/etc/cfg/a.xml"}]}"#,
        )
        .unwrap();
        assert_eq!(catalog.directory_label(), "/etc/cfg");
        assert_eq!(catalog.first().map(|f| f.path.as_str()), Some("/etc/cfg/a.xml"));
    }

    #[test]
    fn test_field_assignment_parsing() {
        assert_eq!(
            FieldValue::parse_assignment("speed=12.5"),
            Some(FieldValue {
                name: "speed".to_string(),
                value: 12.5
            })
        );
        assert!(FieldValue::parse_assignment("speed").is_none());
        assert!(FieldValue::parse_assignment("=3").is_none());
        assert!(FieldValue::parse_assignment("speed=fast").is_none());
        assert!(FieldValue::parse_assignment("speed=NaN").is_none());
    }
}
