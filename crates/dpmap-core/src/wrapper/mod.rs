//! Value wrappers.
//!
//! A wrapper binds a resolved type definition to one DP code and converts
//! between the device's raw status and a typed native value:
//!
//! ```text
//! Device ──find_dpcode──→ Wrapper ──read_device_status──→ native value
//!                            └────get_update_commands──→ [{code, value}]
//! ```
//!
//! Base wrappers (one per DP type) live in [`common`]; derived wrappers that
//! post-process a base wrapper live in [`sensor`]; [`dispatch`] provides the
//! closed union used when the wrapper kind is chosen at runtime.

pub mod common;
pub mod dispatch;
pub mod sensor;

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::device::{Device, DpCommand};
use crate::error::WrapperResult;
use crate::warnings::WarningCache;

pub use common::{
    BitmapBitWrapper, BitmapWrapper, BooleanWrapper, EnumWrapper, IntegerWrapper, JsonWrapper,
    RawWrapper, StringWrapper,
};
pub use dispatch::{resolve_wrapper, AnyWrapper, DpValue, WrapperKind};
pub use sensor::{
    DeltaIntegerWrapper, ElectricityJsonWrapper, ElectricityRawWrapper, WindDirectionWrapper,
};

/// How the platform should treat a sensor's history.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StateClass {
    Measurement,
    Total,
    TotalIncreasing,
}

/// Common contract of every wrapper.
pub trait DeviceWrapper {
    /// Native value type
    type Value;

    /// Called once when the owning entity is set up.
    fn initialize(&mut self, _device: &Device) {}

    /// Decide whether an update notification is irrelevant to this wrapper.
    ///
    /// `updated_status_properties` lists the DP codes carried by the
    /// notification, `dp_timestamps` their report timestamps.
    fn skip_update(
        &mut self,
        _device: &Device,
        _updated_status_properties: Option<&[String]>,
        _dp_timestamps: Option<&HashMap<String, i64>>,
    ) -> bool {
        true
    }

    /// Read the current native value. Missing, null and invalid values
    /// all yield `None`.
    fn read_device_status(&self, device: &Device, warnings: &WarningCache) -> Option<Self::Value>;

    /// Build the commands that set `value` on the device.
    fn get_update_commands(
        &self,
        device: &Device,
        value: Self::Value,
    ) -> WrapperResult<Vec<DpCommand>>;

    fn native_unit(&self) -> Option<&str> {
        None
    }

    fn suggested_unit(&self) -> Option<&str> {
        None
    }

    fn state_class(&self) -> Option<StateClass> {
        None
    }
}

/// Skip unless `dp_code` is among the updated properties.
pub(crate) fn skip_unless_updated(dp_code: &str, updated: Option<&[String]>) -> bool {
    updated.map_or(true, |properties| !properties.iter().any(|p| p == dp_code))
}

/// Outcome of decoding a raw status value.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Decoded<T> {
    /// No status, or explicit null
    Missing,
    Valid(T),
    /// Present but outside the declared domain
    Invalid(&'static str),
    /// Present but not decodable (bad JSON, bad base64)
    Malformed(String),
}

impl<T> Decoded<T> {
    pub(crate) fn resolve(
        self,
        device: &Device,
        dp_code: &str,
        warnings: &WarningCache,
    ) -> Option<T> {
        match self {
            Self::Valid(value) => Some(value),
            Self::Missing => None,
            Self::Invalid(reason) => {
                if let Some(raw) = device.status_value(dp_code) {
                    warnings.warn_invalid_value(&device.id, dp_code, raw, reason);
                }
                None
            }
            Self::Malformed(reason) => {
                debug!(device_id = %device.id, dp_code, "Failed to decode status: {}", reason);
                None
            }
        }
    }

    pub(crate) fn valid(self) -> Option<T> {
        match self {
            Self::Valid(value) => Some(value),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_skip_unless_updated() {
        assert!(skip_unless_updated("switch", None));
        assert!(skip_unless_updated("switch", Some(&[][..])));
        assert!(skip_unless_updated("switch", Some(&["mode".to_string()][..])));
        assert!(!skip_unless_updated(
            "switch",
            Some(&["mode".to_string(), "switch".to_string()][..])
        ));
    }

    #[test]
    fn test_decoded_valid() {
        assert_eq!(Decoded::Valid(3).valid(), Some(3));
        assert_eq!(Decoded::<i32>::Invalid("bad").valid(), None);
        assert_eq!(Decoded::<i32>::Missing.valid(), None);
    }
}
