//! Device collaborator model.
//!
//! A device is described by two metadata maps and its current status:
//! - `function`: write-capable DP specs
//! - `status_range`: read-capable DP specs
//! - `status`: DP code -> raw reported value
//!
//! Devices are usually supplied by a cloud client; they can also be loaded
//! from a JSON description for fixtures and offline tooling.

use std::collections::HashMap;
use std::path::Path;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::error::DeviceError;

// Constraint blobs arrive as JSON-encoded strings from the cloud, but
// hand-written descriptions often inline them as objects.
mod values_blob {
    use super::*;

    pub fn deserialize<'de, D>(deserializer: D) -> Result<String, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Value::deserialize(deserializer)? {
            Value::String(s) => Ok(s),
            Value::Null => Ok("{}".to_string()),
            other => Ok(other.to_string()),
        }
    }
}

/// Metadata entry describing one DP in a function or status-range map.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DpSpec {
    /// DP code
    #[serde(default)]
    pub code: String,
    /// Raw type tag, possibly non-canonical
    #[serde(rename = "type")]
    pub dp_type: String,
    /// JSON-encoded constraint blob
    #[serde(default = "empty_values", deserialize_with = "values_blob::deserialize")]
    pub values: String,
    /// Reporting sub-type (e.g. "sum")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub report_type: Option<String>,
}

fn empty_values() -> String {
    "{}".to_string()
}

impl DpSpec {
    pub fn new(
        code: impl Into<String>,
        dp_type: impl Into<String>,
        values: impl Into<String>,
    ) -> Self {
        Self {
            code: code.into(),
            dp_type: dp_type.into(),
            values: values.into(),
            report_type: None,
        }
    }

    pub fn with_report_type(mut self, report_type: impl Into<String>) -> Self {
        self.report_type = Some(report_type.into());
        self
    }
}

/// A device as seen by the type-resolution engine.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Device {
    /// Device identifier, also the warning-cache partition key
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub product_id: String,
    #[serde(default)]
    pub function: HashMap<String, DpSpec>,
    #[serde(default)]
    pub status_range: HashMap<String, DpSpec>,
    #[serde(default)]
    pub status: HashMap<String, Value>,
}

impl Device {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Default::default()
        }
    }

    /// Parse a device from its JSON description.
    pub fn from_json_str(json: &str) -> Result<Self, DeviceError> {
        let mut device: Device =
            serde_json::from_str(json).map_err(|e| DeviceError::Serialization(e.to_string()))?;
        device.fill_spec_codes();
        Ok(device)
    }

    /// Load a device from a JSON file.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self, DeviceError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json_str(&content)
    }

    // Entries keyed by DP code may omit the redundant `code` field.
    fn fill_spec_codes(&mut self) {
        for map in [&mut self.function, &mut self.status_range] {
            for (key, spec) in map.iter_mut() {
                if spec.code.is_empty() {
                    spec.code = key.clone();
                }
            }
        }
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = category.into();
        self
    }

    pub fn with_product_id(mut self, product_id: impl Into<String>) -> Self {
        self.product_id = product_id.into();
        self
    }

    pub fn with_function(mut self, spec: DpSpec) -> Self {
        self.function.insert(spec.code.clone(), spec);
        self
    }

    pub fn with_status_range(mut self, spec: DpSpec) -> Self {
        self.status_range.insert(spec.code.clone(), spec);
        self
    }

    pub fn with_status(mut self, dp_code: impl Into<String>, value: impl Into<Value>) -> Self {
        self.status.insert(dp_code.into(), value.into());
        self
    }

    /// Current reported value; `None` if the DP is missing or explicitly null.
    pub fn status_value(&self, dp_code: &str) -> Option<&Value> {
        self.status.get(dp_code).filter(|v| !v.is_null())
    }
}

/// A single update command in the shape handed to the device transport.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DpCommand {
    pub code: String,
    pub value: Value,
}

impl DpCommand {
    pub fn new(code: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            code: code.into(),
            value: value.into(),
        }
    }
}

/// Resolver options.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ResolveOptions {
    /// Look in the function map before the status-range map
    pub prefer_function: bool,
}

impl ResolveOptions {
    pub fn prefer_function() -> Self {
        Self {
            prefer_function: true,
        }
    }
}
