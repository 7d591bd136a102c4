//! Derived wrappers that post-process a base wrapper.
//!
//! Each derived wrapper owns its base wrapper and delegates resolution and
//! decoding to it.

use std::collections::HashMap;

use serde_json::Value;
use tracing::{debug, trace};

use super::common::{EnumWrapper, IntegerWrapper, JsonWrapper, RawWrapper};
use super::{DeviceWrapper, StateClass};
use crate::device::{Device, DpCommand, ResolveOptions};
use crate::electricity::{ElectricityData, ElectricityField};
use crate::error::{WrapperError, WrapperResult};
use crate::warnings::WarningCache;

/// Unit constants shared by sensor wrappers.
pub mod units {
    pub const DEGREE: &str = "°";
    pub const AMPERE: &str = "A";
    pub const MILLIAMPERE: &str = "mA";
    pub const WATT: &str = "W";
    pub const KILO_WATT: &str = "kW";
    pub const VOLT: &str = "V";
}

// ============================================================================
// Wind direction
// ============================================================================

const WIND_DIRECTIONS: [(&str, f64); 16] = [
    ("north", 0.0),
    ("north_north_east", 22.5),
    ("north_east", 45.0),
    ("east_north_east", 67.5),
    ("east", 90.0),
    ("east_south_east", 112.5),
    ("south_east", 135.0),
    ("south_south_east", 157.5),
    ("south", 180.0),
    ("south_south_west", 202.5),
    ("south_west", 225.0),
    ("west_south_west", 247.5),
    ("west", 270.0),
    ("west_north_west", 292.5),
    ("north_west", 315.0),
    ("north_north_west", 337.5),
];

/// Bearing in degrees for a compass-point literal.
pub fn wind_direction_degrees(direction: &str) -> Option<f64> {
    WIND_DIRECTIONS
        .iter()
        .find(|(name, _)| *name == direction)
        .map(|(_, degrees)| *degrees)
}

/// Maps a compass-point Enum DP to a bearing in degrees.
#[derive(Debug, Clone)]
pub struct WindDirectionWrapper {
    inner: EnumWrapper,
}

impl WindDirectionWrapper {
    pub fn find_dpcode(device: &Device, dp_code: &str) -> Option<Self> {
        Self::find_dpcode_with(device, dp_code, ResolveOptions::default())
    }

    pub fn find_dpcode_with(
        device: &Device,
        dp_code: &str,
        options: ResolveOptions,
    ) -> Option<Self> {
        EnumWrapper::find_dpcode_with(device, dp_code, options).map(|inner| Self { inner })
    }

    pub fn dp_code(&self) -> &str {
        self.inner.dp_code()
    }

    pub fn options(&self) -> &[String] {
        self.inner.options()
    }
}

impl DeviceWrapper for WindDirectionWrapper {
    type Value = f64;

    fn skip_update(
        &mut self,
        device: &Device,
        updated_status_properties: Option<&[String]>,
        dp_timestamps: Option<&HashMap<String, i64>>,
    ) -> bool {
        self.inner
            .skip_update(device, updated_status_properties, dp_timestamps)
    }

    fn read_device_status(&self, device: &Device, warnings: &WarningCache) -> Option<f64> {
        let direction = self.inner.read_device_status(device, warnings)?;
        wind_direction_degrees(&direction)
    }

    fn get_update_commands(&self, _device: &Device, _value: f64) -> WrapperResult<Vec<DpCommand>> {
        Err(WrapperError::not_implemented(self.dp_code(), "WindDirection"))
    }

    fn native_unit(&self) -> Option<&str> {
        Some(units::DEGREE)
    }
}

// ============================================================================
// Delta accumulation
// ============================================================================

/// Accumulates an Integer DP that reports increments instead of totals.
///
/// Each update notification whose timestamp for the DP advanced adds the
/// decoded value to a running total; reads return that total.
#[derive(Debug, Clone)]
pub struct DeltaIntegerWrapper {
    inner: IntegerWrapper,
    accumulated_value: f64,
    last_dp_timestamp: Option<i64>,
}

impl DeltaIntegerWrapper {
    pub fn find_dpcode(device: &Device, dp_code: &str) -> Option<Self> {
        Self::find_dpcode_with(device, dp_code, ResolveOptions::default())
    }

    pub fn find_dpcode_with(
        device: &Device,
        dp_code: &str,
        options: ResolveOptions,
    ) -> Option<Self> {
        IntegerWrapper::find_dpcode_with(device, dp_code, options).map(Self::new)
    }

    pub fn new(inner: IntegerWrapper) -> Self {
        Self {
            inner,
            accumulated_value: 0.0,
            last_dp_timestamp: None,
        }
    }

    pub fn dp_code(&self) -> &str {
        self.inner.dp_code()
    }

    pub fn accumulated_value(&self) -> f64 {
        self.accumulated_value
    }
}

impl DeviceWrapper for DeltaIntegerWrapper {
    type Value = f64;

    fn initialize(&mut self, _device: &Device) {
        self.accumulated_value = 0.0;
        self.last_dp_timestamp = None;
    }

    fn skip_update(
        &mut self,
        device: &Device,
        updated_status_properties: Option<&[String]>,
        dp_timestamps: Option<&HashMap<String, i64>>,
    ) -> bool {
        if self
            .inner
            .skip_update(device, updated_status_properties, dp_timestamps)
        {
            return true;
        }

        let dp_code = self.inner.dp_code();
        let Some(timestamp) = dp_timestamps.and_then(|ts| ts.get(dp_code)).copied() else {
            trace!(dp_code, "Delta update without timestamp ignored");
            return true;
        };
        if self.last_dp_timestamp.is_some_and(|last| timestamp <= last) {
            trace!(dp_code, timestamp, "Delta update with stale timestamp ignored");
            return true;
        }
        let Some(delta) = self.inner.decode(device).valid() else {
            return true;
        };

        self.accumulated_value += delta;
        self.last_dp_timestamp = Some(timestamp);
        debug!(
            device_id = %device.id,
            dp_code,
            delta,
            total = self.accumulated_value,
            "Accumulated delta"
        );
        false
    }

    fn read_device_status(&self, _device: &Device, _warnings: &WarningCache) -> Option<f64> {
        Some(self.accumulated_value)
    }

    fn get_update_commands(&self, _device: &Device, _value: f64) -> WrapperResult<Vec<DpCommand>> {
        Err(WrapperError::not_implemented(self.dp_code(), "Delta"))
    }

    fn native_unit(&self) -> Option<&str> {
        self.inner.native_unit()
    }

    fn state_class(&self) -> Option<StateClass> {
        Some(StateClass::TotalIncreasing)
    }
}

// ============================================================================
// Electricity
// ============================================================================

/// Extracts one electricity quantity from a Json DP.
#[derive(Debug, Clone)]
pub struct ElectricityJsonWrapper {
    inner: JsonWrapper,
    field: ElectricityField,
}

impl ElectricityJsonWrapper {
    pub fn find_dpcode(device: &Device, dp_code: &str, field: ElectricityField) -> Option<Self> {
        Self::find_dpcode_with(device, dp_code, field, ResolveOptions::default())
    }

    pub fn find_dpcode_with(
        device: &Device,
        dp_code: &str,
        field: ElectricityField,
        options: ResolveOptions,
    ) -> Option<Self> {
        JsonWrapper::find_dpcode_with(device, dp_code, options).map(|inner| Self { inner, field })
    }

    pub fn dp_code(&self) -> &str {
        self.inner.dp_code()
    }

    pub fn field(&self) -> ElectricityField {
        self.field
    }
}

impl DeviceWrapper for ElectricityJsonWrapper {
    type Value = f64;

    fn skip_update(
        &mut self,
        device: &Device,
        updated_status_properties: Option<&[String]>,
        dp_timestamps: Option<&HashMap<String, i64>>,
    ) -> bool {
        self.inner
            .skip_update(device, updated_status_properties, dp_timestamps)
    }

    fn read_device_status(&self, device: &Device, warnings: &WarningCache) -> Option<f64> {
        let record = self.inner.read_device_status(device, warnings)?;
        record.get(self.field.json_key()).and_then(Value::as_f64)
    }

    fn get_update_commands(&self, _device: &Device, _value: f64) -> WrapperResult<Vec<DpCommand>> {
        Err(WrapperError::not_implemented(self.dp_code(), "Json"))
    }

    fn native_unit(&self) -> Option<&str> {
        Some(match self.field {
            ElectricityField::Current => units::AMPERE,
            ElectricityField::Power => units::KILO_WATT,
            ElectricityField::Voltage => units::VOLT,
        })
    }

    fn suggested_unit(&self) -> Option<&str> {
        match self.field {
            ElectricityField::Current => Some(units::MILLIAMPERE),
            ElectricityField::Power => Some(units::WATT),
            ElectricityField::Voltage => None,
        }
    }

    fn state_class(&self) -> Option<StateClass> {
        Some(StateClass::Measurement)
    }
}

/// Extracts one electricity quantity from a packed binary Raw DP.
#[derive(Debug, Clone)]
pub struct ElectricityRawWrapper {
    inner: RawWrapper,
    field: ElectricityField,
}

impl ElectricityRawWrapper {
    pub fn find_dpcode(device: &Device, dp_code: &str, field: ElectricityField) -> Option<Self> {
        Self::find_dpcode_with(device, dp_code, field, ResolveOptions::default())
    }

    pub fn find_dpcode_with(
        device: &Device,
        dp_code: &str,
        field: ElectricityField,
        options: ResolveOptions,
    ) -> Option<Self> {
        RawWrapper::find_dpcode_with(device, dp_code, options).map(|inner| Self { inner, field })
    }

    pub fn dp_code(&self) -> &str {
        self.inner.dp_code()
    }

    pub fn field(&self) -> ElectricityField {
        self.field
    }
}

impl DeviceWrapper for ElectricityRawWrapper {
    type Value = f64;

    fn skip_update(
        &mut self,
        device: &Device,
        updated_status_properties: Option<&[String]>,
        dp_timestamps: Option<&HashMap<String, i64>>,
    ) -> bool {
        self.inner
            .skip_update(device, updated_status_properties, dp_timestamps)
    }

    fn read_device_status(&self, device: &Device, warnings: &WarningCache) -> Option<f64> {
        let raw = self.inner.read_device_status(device, warnings)?;
        ElectricityData::from_bytes(&raw).map(|data| data.get(self.field))
    }

    fn get_update_commands(&self, _device: &Device, _value: f64) -> WrapperResult<Vec<DpCommand>> {
        Err(WrapperError::not_implemented(self.dp_code(), "Raw"))
    }

    fn native_unit(&self) -> Option<&str> {
        Some(match self.field {
            ElectricityField::Current => units::MILLIAMPERE,
            ElectricityField::Power => units::WATT,
            ElectricityField::Voltage => units::VOLT,
        })
    }

    fn suggested_unit(&self) -> Option<&str> {
        match self.field {
            ElectricityField::Current => Some(units::AMPERE),
            ElectricityField::Power => Some(units::KILO_WATT),
            ElectricityField::Voltage => None,
        }
    }

    fn state_class(&self) -> Option<StateClass> {
        Some(StateClass::Measurement)
    }
}
