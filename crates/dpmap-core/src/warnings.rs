//! Deduplicated warnings for invalid reported values.
//!
//! Devices keep reporting the same bad value on every poll. The cache makes
//! sure each `(device, dp_code, value)` combination is logged once.

use std::collections::{HashMap, HashSet};

use parking_lot::Mutex;
use serde_json::Value;
use tracing::warn;

/// Seen combinations, partitioned by device id.
#[derive(Debug, Default)]
pub struct WarningCache {
    seen: Mutex<HashMap<String, HashSet<(String, String)>>>,
}

impl WarningCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a combination; returns `true` the first time it is seen.
    pub fn first_occurrence(&self, device_id: &str, dp_code: &str, value: &str) -> bool {
        self.seen
            .lock()
            .entry(device_id.to_string())
            .or_default()
            .insert((dp_code.to_string(), value.to_string()))
    }

    /// Log an invalid reported value unless it was already reported.
    pub fn warn_invalid_value(&self, device_id: &str, dp_code: &str, value: &Value, reason: &str) {
        let rendered = value.to_string();
        if self.first_occurrence(device_id, dp_code, &rendered) {
            warn!(
                device_id,
                dp_code,
                value = %rendered,
                "Found invalid value {} for dpcode {} on device {}: {}",
                rendered,
                dp_code,
                device_id,
                reason
            );
        }
    }

    /// Forget all recorded combinations.
    pub fn clear(&self) {
        self.seen.lock().clear();
    }

    /// Number of distinct combinations recorded.
    pub fn len(&self) -> usize {
        self.seen.lock().values().map(HashSet::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
