use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::model::snapshot::{has_snapshot_shape, TrackerData};

/// Format version written into every export
pub const EXPORT_VERSION: u32 = 1;

/// The portable export document
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportPayload {
    pub version: u32,
    pub export_date: DateTime<Utc>,
    pub user_name: String,
    pub data: TrackerData,
}

/// A validated import, not yet applied anywhere
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Imported {
    pub data: TrackerData,
    pub user_name: String,
    /// Declared format version, carried but not enforced
    pub version: Option<u64>,
}

/// Rejected import document
#[derive(Debug, thiserror::Error)]
#[error("invalid import file: {0}")]
pub struct ImportError(String);

impl ImportError {
    fn new(msg: impl Into<String>) -> Self {
        ImportError(msg.into())
    }

    pub fn message(&self) -> &str {
        &self.0
    }
}

/// Render a snapshot as a pretty-printed export document
pub fn export_payload(
    data: &TrackerData,
    user_name: &str,
    now: DateTime<Utc>,
) -> serde_json::Result<String> {
    let payload = ExportPayload {
        version: EXPORT_VERSION,
        export_date: now,
        user_name: user_name.to_string(),
        data: data.clone(),
    };
    serde_json::to_string_pretty(&payload)
}

/// Suggested file name for an export: `ibadah-<name>-<yyyy-mm-dd>.json`
pub fn export_file_name(user_name: &str, now: DateTime<Utc>) -> String {
    let name: String = user_name
        .chars()
        .map(|c| if c.is_whitespace() || c == '/' || c == '\\' { '-' } else { c })
        .collect();
    format!("ibadah-{}-{}.json", name, now.format("%Y-%m-%d"))
}

/// Parse and validate an export document. No side effects.
pub fn parse_import(text: &str) -> Result<Imported, ImportError> {
    let payload: Value = serde_json::from_str(text)
        .map_err(|e| ImportError::new(format!("not valid JSON ({})", e)))?;

    let data = match payload.get("data") {
        Some(data) if !data.is_null() => data,
        _ => return Err(ImportError::new("missing `data`")),
    };
    if !has_snapshot_shape(data) {
        return Err(ImportError::new(
            "`data` needs `categories` and `items` arrays and an `entries` object",
        ));
    }
    let data = TrackerData::from_value(data.clone())
        .ok_or_else(|| ImportError::new("`data` is not a valid tracker snapshot"))?;

    let user_name = payload
        .get("userName")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string();

    Ok(Imported {
        data,
        user_name,
        version: payload.get("version").and_then(Value::as_u64),
    })
}
