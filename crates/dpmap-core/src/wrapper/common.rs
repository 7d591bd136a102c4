//! Base wrappers, one per DP type.

use std::collections::HashMap;

use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use serde_json::{Map, Value};

use super::{skip_unless_updated, Decoded, DeviceWrapper};
use crate::device::{Device, DpCommand, ResolveOptions};
use crate::dp_type::DpType;
use crate::error::{WrapperError, WrapperResult};
use crate::models::{
    BitmapTypeDefinition, DataPointDefinition, EnumTypeDefinition, IntegerTypeDefinition, Scaling,
    TypeDefinition,
};
use crate::parser::{parse_bitmap_definition, parse_enum_definition, parse_integer_definition};
use crate::resolver::find_definition;
use crate::warnings::WarningCache;

/// Resolve `dp_code`, keeping it only if its type matches `expected`.
fn find_typed<'a>(
    device: &'a Device,
    dp_code: &str,
    options: ResolveOptions,
    expected: DpType,
) -> Option<DataPointDefinition<'a>> {
    find_definition(device, dp_code, options).filter(|d| d.dp_type == Some(expected))
}

fn plain_definition(definition: DataPointDefinition<'_>) -> TypeDefinition {
    TypeDefinition {
        dp_code: definition.dp_code,
        dp_type: definition.dp_type,
    }
}

// ============================================================================
// Boolean
// ============================================================================

/// Wrapper for Boolean DPs.
#[derive(Debug, Clone)]
pub struct BooleanWrapper {
    dp_code: String,
    type_information: TypeDefinition,
}

impl BooleanWrapper {
    pub fn find_dpcode(device: &Device, dp_code: &str) -> Option<Self> {
        Self::find_dpcode_with(device, dp_code, ResolveOptions::default())
    }

    pub fn find_dpcode_with(
        device: &Device,
        dp_code: &str,
        options: ResolveOptions,
    ) -> Option<Self> {
        let definition = find_typed(device, dp_code, options, DpType::Boolean)?;
        Some(Self {
            dp_code: dp_code.to_string(),
            type_information: plain_definition(definition),
        })
    }

    pub fn dp_code(&self) -> &str {
        &self.dp_code
    }

    pub fn type_information(&self) -> &TypeDefinition {
        &self.type_information
    }

    fn decode(&self, device: &Device) -> Decoded<bool> {
        match device.status_value(&self.dp_code) {
            None => Decoded::Missing,
            Some(Value::Bool(value)) => Decoded::Valid(*value),
            Some(_) => Decoded::Invalid("expected a boolean"),
        }
    }
}

impl DeviceWrapper for BooleanWrapper {
    type Value = bool;

    fn skip_update(
        &mut self,
        _device: &Device,
        updated_status_properties: Option<&[String]>,
        _dp_timestamps: Option<&HashMap<String, i64>>,
    ) -> bool {
        skip_unless_updated(&self.dp_code, updated_status_properties)
    }

    fn read_device_status(&self, device: &Device, warnings: &WarningCache) -> Option<bool> {
        self.decode(device).resolve(device, &self.dp_code, warnings)
    }

    fn get_update_commands(&self, _device: &Device, value: bool) -> WrapperResult<Vec<DpCommand>> {
        Ok(vec![DpCommand::new(&self.dp_code, value)])
    }
}

// ============================================================================
// Enum
// ============================================================================

/// Wrapper for Enum DPs.
#[derive(Debug, Clone)]
pub struct EnumWrapper {
    dp_code: String,
    type_information: EnumTypeDefinition,
}

impl EnumWrapper {
    pub fn find_dpcode(device: &Device, dp_code: &str) -> Option<Self> {
        Self::find_dpcode_with(device, dp_code, ResolveOptions::default())
    }

    pub fn find_dpcode_with(
        device: &Device,
        dp_code: &str,
        options: ResolveOptions,
    ) -> Option<Self> {
        let definition = find_typed(device, dp_code, options, DpType::Enum)?;
        Some(Self {
            dp_code: dp_code.to_string(),
            type_information: parse_enum_definition(&definition)?,
        })
    }

    pub fn dp_code(&self) -> &str {
        &self.dp_code
    }

    pub fn type_information(&self) -> &EnumTypeDefinition {
        &self.type_information
    }

    /// Legal values, in display order.
    pub fn options(&self) -> &[String] {
        &self.type_information.range
    }

    pub(crate) fn decode(&self, device: &Device) -> Decoded<String> {
        match device.status_value(&self.dp_code) {
            None => Decoded::Missing,
            Some(Value::String(value)) if self.type_information.contains(value) => {
                Decoded::Valid(value.clone())
            }
            Some(Value::String(_)) => Decoded::Invalid("value not in enum range"),
            Some(_) => Decoded::Invalid("expected a string"),
        }
    }
}

impl DeviceWrapper for EnumWrapper {
    type Value = String;

    fn skip_update(
        &mut self,
        _device: &Device,
        updated_status_properties: Option<&[String]>,
        _dp_timestamps: Option<&HashMap<String, i64>>,
    ) -> bool {
        skip_unless_updated(&self.dp_code, updated_status_properties)
    }

    fn read_device_status(&self, device: &Device, warnings: &WarningCache) -> Option<String> {
        self.decode(device).resolve(device, &self.dp_code, warnings)
    }

    fn get_update_commands(
        &self,
        _device: &Device,
        value: String,
    ) -> WrapperResult<Vec<DpCommand>> {
        if !self.type_information.contains(&value) {
            return Err(WrapperError::out_of_range(&self.dp_code, value));
        }
        Ok(vec![DpCommand::new(&self.dp_code, value)])
    }
}

// ============================================================================
// Integer
// ============================================================================

/// Wrapper for Integer DPs, converting between raw and scaled values.
#[derive(Debug, Clone)]
pub struct IntegerWrapper {
    dp_code: String,
    type_information: IntegerTypeDefinition,
}

impl IntegerWrapper {
    pub fn find_dpcode(device: &Device, dp_code: &str) -> Option<Self> {
        Self::find_dpcode_with(device, dp_code, ResolveOptions::default())
    }

    pub fn find_dpcode_with(
        device: &Device,
        dp_code: &str,
        options: ResolveOptions,
    ) -> Option<Self> {
        let definition = find_typed(device, dp_code, options, DpType::Integer)?;
        Some(Self {
            dp_code: dp_code.to_string(),
            type_information: parse_integer_definition(&definition, Scaling::Decimal)?,
        })
    }

    /// Replace the decimal conversion with a device-specific one.
    pub fn with_scaling(mut self, scaling: Scaling) -> Self {
        self.type_information.scaling = scaling;
        self
    }

    pub fn dp_code(&self) -> &str {
        &self.dp_code
    }

    pub fn type_information(&self) -> &IntegerTypeDefinition {
        &self.type_information
    }

    pub fn min_value(&self) -> f64 {
        self.type_information.min_scaled()
    }

    pub fn max_value(&self) -> f64 {
        self.type_information.max_scaled()
    }

    pub fn value_step(&self) -> f64 {
        self.type_information.step_scaled()
    }

    pub(crate) fn decode(&self, device: &Device) -> Decoded<f64> {
        let Some(raw) = device.status_value(&self.dp_code) else {
            return Decoded::Missing;
        };
        match raw.as_i64() {
            Some(value) if self.type_information.contains(value) => {
                Decoded::Valid(self.type_information.scale_value(value))
            }
            Some(_) => Decoded::Invalid("value out of range"),
            None => Decoded::Invalid("expected an integer"),
        }
    }
}

impl DeviceWrapper for IntegerWrapper {
    type Value = f64;

    fn skip_update(
        &mut self,
        _device: &Device,
        updated_status_properties: Option<&[String]>,
        _dp_timestamps: Option<&HashMap<String, i64>>,
    ) -> bool {
        skip_unless_updated(&self.dp_code, updated_status_properties)
    }

    fn read_device_status(&self, device: &Device, warnings: &WarningCache) -> Option<f64> {
        self.decode(device).resolve(device, &self.dp_code, warnings)
    }

    fn get_update_commands(&self, _device: &Device, value: f64) -> WrapperResult<Vec<DpCommand>> {
        if !value.is_finite() {
            return Err(WrapperError::out_of_range(&self.dp_code, value));
        }
        let raw = self.type_information.scale_value_back(value);
        if !self.type_information.contains(raw) {
            return Err(WrapperError::out_of_range(&self.dp_code, value));
        }
        Ok(vec![DpCommand::new(&self.dp_code, raw)])
    }

    fn native_unit(&self) -> Option<&str> {
        self.type_information.unit.as_deref()
    }
}

// ============================================================================
// Bitmap
// ============================================================================

/// Wrapper for Bitmap DPs. Read-only.
#[derive(Debug, Clone)]
pub struct BitmapWrapper {
    dp_code: String,
    type_information: BitmapTypeDefinition,
}

impl BitmapWrapper {
    pub fn find_dpcode(device: &Device, dp_code: &str) -> Option<Self> {
        Self::find_dpcode_with(device, dp_code, ResolveOptions::default())
    }

    pub fn find_dpcode_with(
        device: &Device,
        dp_code: &str,
        options: ResolveOptions,
    ) -> Option<Self> {
        let definition = find_typed(device, dp_code, options, DpType::Bitmap)?;
        Some(Self {
            dp_code: dp_code.to_string(),
            type_information: parse_bitmap_definition(&definition)?,
        })
    }

    pub fn dp_code(&self) -> &str {
        &self.dp_code
    }

    pub fn type_information(&self) -> &BitmapTypeDefinition {
        &self.type_information
    }

    fn decode(&self, device: &Device) -> Decoded<u64> {
        match device.status_value(&self.dp_code) {
            None => Decoded::Missing,
            Some(raw) => match raw.as_u64() {
                Some(bits) => Decoded::Valid(bits),
                None => Decoded::Invalid("expected an integer bitfield"),
            },
        }
    }
}

impl DeviceWrapper for BitmapWrapper {
    type Value = u64;

    fn skip_update(
        &mut self,
        _device: &Device,
        updated_status_properties: Option<&[String]>,
        _dp_timestamps: Option<&HashMap<String, i64>>,
    ) -> bool {
        skip_unless_updated(&self.dp_code, updated_status_properties)
    }

    fn read_device_status(&self, device: &Device, warnings: &WarningCache) -> Option<u64> {
        self.decode(device).resolve(device, &self.dp_code, warnings)
    }

    fn get_update_commands(&self, _device: &Device, _value: u64) -> WrapperResult<Vec<DpCommand>> {
        Err(WrapperError::not_implemented(&self.dp_code, "Bitmap"))
    }
}

/// Exposes a single labelled bit of a Bitmap DP.
#[derive(Debug, Clone)]
pub struct BitmapBitWrapper {
    bitmap: BitmapWrapper,
    bitmap_key: String,
    bit: u32,
}

impl BitmapBitWrapper {
    pub fn find_dpcode(device: &Device, dp_code: &str, bitmap_key: &str) -> Option<Self> {
        Self::find_dpcode_with(device, dp_code, bitmap_key, ResolveOptions::default())
    }

    pub fn find_dpcode_with(
        device: &Device,
        dp_code: &str,
        bitmap_key: &str,
        options: ResolveOptions,
    ) -> Option<Self> {
        let bitmap = BitmapWrapper::find_dpcode_with(device, dp_code, options)?;
        let bit = bitmap
            .type_information
            .label
            .iter()
            .position(|label| label == bitmap_key)?;
        Some(Self {
            bitmap,
            bitmap_key: bitmap_key.to_string(),
            bit: u32::try_from(bit).ok()?,
        })
    }

    pub fn dp_code(&self) -> &str {
        self.bitmap.dp_code()
    }

    pub fn bitmap_key(&self) -> &str {
        &self.bitmap_key
    }
}

impl DeviceWrapper for BitmapBitWrapper {
    type Value = bool;

    fn skip_update(
        &mut self,
        device: &Device,
        updated_status_properties: Option<&[String]>,
        dp_timestamps: Option<&HashMap<String, i64>>,
    ) -> bool {
        self.bitmap
            .skip_update(device, updated_status_properties, dp_timestamps)
    }

    fn read_device_status(&self, device: &Device, warnings: &WarningCache) -> Option<bool> {
        let bits = self.bitmap.read_device_status(device, warnings)?;
        Some(bits.checked_shr(self.bit).unwrap_or(0) & 1 == 1)
    }

    fn get_update_commands(&self, _device: &Device, _value: bool) -> WrapperResult<Vec<DpCommand>> {
        Err(WrapperError::not_implemented(self.dp_code(), "Bitmap"))
    }
}

// ============================================================================
// Json
// ============================================================================

/// Wrapper for Json DPs. Read-only.
#[derive(Debug, Clone)]
pub struct JsonWrapper {
    dp_code: String,
    type_information: TypeDefinition,
}

impl JsonWrapper {
    pub fn find_dpcode(device: &Device, dp_code: &str) -> Option<Self> {
        Self::find_dpcode_with(device, dp_code, ResolveOptions::default())
    }

    pub fn find_dpcode_with(
        device: &Device,
        dp_code: &str,
        options: ResolveOptions,
    ) -> Option<Self> {
        let definition = find_typed(device, dp_code, options, DpType::Json)?;
        Some(Self {
            dp_code: dp_code.to_string(),
            type_information: plain_definition(definition),
        })
    }

    pub fn dp_code(&self) -> &str {
        &self.dp_code
    }

    pub fn type_information(&self) -> &TypeDefinition {
        &self.type_information
    }

    fn decode(&self, device: &Device) -> Decoded<Map<String, Value>> {
        match device.status_value(&self.dp_code) {
            None => Decoded::Missing,
            Some(Value::Object(map)) => Decoded::Valid(map.clone()),
            Some(Value::String(blob)) => match serde_json::from_str(blob) {
                Ok(map) => Decoded::Valid(map),
                Err(e) => Decoded::Malformed(format!("invalid JSON object: {}", e)),
            },
            Some(other) => Decoded::Malformed(format!("expected a JSON blob, got {}", other)),
        }
    }
}

impl DeviceWrapper for JsonWrapper {
    type Value = Map<String, Value>;

    fn skip_update(
        &mut self,
        _device: &Device,
        updated_status_properties: Option<&[String]>,
        _dp_timestamps: Option<&HashMap<String, i64>>,
    ) -> bool {
        skip_unless_updated(&self.dp_code, updated_status_properties)
    }

    fn read_device_status(
        &self,
        device: &Device,
        warnings: &WarningCache,
    ) -> Option<Map<String, Value>> {
        self.decode(device).resolve(device, &self.dp_code, warnings)
    }

    fn get_update_commands(
        &self,
        _device: &Device,
        _value: Map<String, Value>,
    ) -> WrapperResult<Vec<DpCommand>> {
        Err(WrapperError::not_implemented(&self.dp_code, "Json"))
    }
}

// ============================================================================
// Raw
// ============================================================================

/// Wrapper for Raw DPs (base64-encoded bytes). Read-only.
#[derive(Debug, Clone)]
pub struct RawWrapper {
    dp_code: String,
    type_information: TypeDefinition,
}

impl RawWrapper {
    pub fn find_dpcode(device: &Device, dp_code: &str) -> Option<Self> {
        Self::find_dpcode_with(device, dp_code, ResolveOptions::default())
    }

    pub fn find_dpcode_with(
        device: &Device,
        dp_code: &str,
        options: ResolveOptions,
    ) -> Option<Self> {
        let definition = find_typed(device, dp_code, options, DpType::Raw)?;
        Some(Self {
            dp_code: dp_code.to_string(),
            type_information: plain_definition(definition),
        })
    }

    pub fn dp_code(&self) -> &str {
        &self.dp_code
    }

    pub fn type_information(&self) -> &TypeDefinition {
        &self.type_information
    }

    fn decode(&self, device: &Device) -> Decoded<Vec<u8>> {
        match device.status_value(&self.dp_code) {
            None => Decoded::Missing,
            Some(Value::String(encoded)) => match BASE64.decode(encoded) {
                Ok(bytes) => Decoded::Valid(bytes),
                Err(e) => Decoded::Malformed(format!("invalid base64: {}", e)),
            },
            Some(other) => Decoded::Malformed(format!("expected base64 text, got {}", other)),
        }
    }
}

impl DeviceWrapper for RawWrapper {
    type Value = Vec<u8>;

    fn skip_update(
        &mut self,
        _device: &Device,
        updated_status_properties: Option<&[String]>,
        _dp_timestamps: Option<&HashMap<String, i64>>,
    ) -> bool {
        skip_unless_updated(&self.dp_code, updated_status_properties)
    }

    fn read_device_status(&self, device: &Device, warnings: &WarningCache) -> Option<Vec<u8>> {
        self.decode(device).resolve(device, &self.dp_code, warnings)
    }

    fn get_update_commands(
        &self,
        _device: &Device,
        _value: Vec<u8>,
    ) -> WrapperResult<Vec<DpCommand>> {
        Err(WrapperError::not_implemented(&self.dp_code, "Raw"))
    }
}

// ============================================================================
// String
// ============================================================================

/// Wrapper for String DPs. Read-only.
#[derive(Debug, Clone)]
pub struct StringWrapper {
    dp_code: String,
    type_information: TypeDefinition,
}

impl StringWrapper {
    pub fn find_dpcode(device: &Device, dp_code: &str) -> Option<Self> {
        Self::find_dpcode_with(device, dp_code, ResolveOptions::default())
    }

    pub fn find_dpcode_with(
        device: &Device,
        dp_code: &str,
        options: ResolveOptions,
    ) -> Option<Self> {
        let definition = find_typed(device, dp_code, options, DpType::String)?;
        Some(Self {
            dp_code: dp_code.to_string(),
            type_information: plain_definition(definition),
        })
    }

    pub fn dp_code(&self) -> &str {
        &self.dp_code
    }

    pub fn type_information(&self) -> &TypeDefinition {
        &self.type_information
    }

    fn decode(&self, device: &Device) -> Decoded<String> {
        match device.status_value(&self.dp_code) {
            None => Decoded::Missing,
            Some(Value::String(value)) => Decoded::Valid(value.clone()),
            Some(_) => Decoded::Invalid("expected a string"),
        }
    }
}

impl DeviceWrapper for StringWrapper {
    type Value = String;

    fn skip_update(
        &mut self,
        _device: &Device,
        updated_status_properties: Option<&[String]>,
        _dp_timestamps: Option<&HashMap<String, i64>>,
    ) -> bool {
        skip_unless_updated(&self.dp_code, updated_status_properties)
    }

    fn read_device_status(&self, device: &Device, warnings: &WarningCache) -> Option<String> {
        self.decode(device).resolve(device, &self.dp_code, warnings)
    }

    fn get_update_commands(
        &self,
        _device: &Device,
        _value: String,
    ) -> WrapperResult<Vec<DpCommand>> {
        Err(WrapperError::not_implemented(&self.dp_code, "String"))
    }
}
