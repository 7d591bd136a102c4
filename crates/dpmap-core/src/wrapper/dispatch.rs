//! Runtime wrapper selection.
//!
//! [`AnyWrapper`] is the closed union of every wrapper in this crate. It is
//! what a quirk or a generic entity builder holds when the wrapper kind is
//! only known at runtime.

use std::collections::HashMap;
use std::fmt;

use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use serde_json::{Map, Value};
use tracing::trace;

use super::common::{
    BitmapBitWrapper, BitmapWrapper, BooleanWrapper, EnumWrapper, IntegerWrapper, JsonWrapper,
    RawWrapper, StringWrapper,
};
use super::sensor::{
    DeltaIntegerWrapper, ElectricityJsonWrapper, ElectricityRawWrapper, WindDirectionWrapper,
};
use super::{DeviceWrapper, StateClass};
use crate::device::{Device, DpCommand, ResolveOptions};
use crate::dp_type::DpType;
use crate::electricity::ElectricityField;
use crate::error::{WrapperError, WrapperResult};
use crate::resolver::find_dp_type;
use crate::warnings::WarningCache;

/// Report type of accumulating integer counters.
pub const SUM_REPORT_TYPE: &str = "sum";

/// Native value of any wrapper.
#[derive(Debug, Clone, PartialEq)]
pub enum DpValue {
    Boolean(bool),
    Number(f64),
    Bitmap(u64),
    Json(Map<String, Value>),
    Raw(Vec<u8>),
    String(String),
}

impl fmt::Display for DpValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Boolean(v) => write!(f, "{}", v),
            Self::Number(v) => write!(f, "{}", v),
            Self::Bitmap(v) => write!(f, "{:#b}", v),
            Self::Json(v) => write!(f, "{}", Value::Object(v.clone())),
            Self::Raw(v) => write!(f, "{}", BASE64.encode(v)),
            Self::String(v) => write!(f, "{}", v),
        }
    }
}

impl From<bool> for DpValue {
    fn from(v: bool) -> Self {
        Self::Boolean(v)
    }
}

impl From<f64> for DpValue {
    fn from(v: f64) -> Self {
        Self::Number(v)
    }
}

impl From<&str> for DpValue {
    fn from(v: &str) -> Self {
        Self::String(v.to_string())
    }
}

impl From<String> for DpValue {
    fn from(v: String) -> Self {
        Self::String(v)
    }
}

/// Which wrapper to build for a DP.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WrapperKind {
    Boolean,
    Enum,
    Integer,
    Bitmap,
    /// A single labelled bit of a Bitmap DP
    BitmapBit { key: String },
    Json,
    Raw,
    String,
    WindDirection,
    Delta,
    ElectricityJson(ElectricityField),
    ElectricityRaw(ElectricityField),
}

impl WrapperKind {
    /// DP type the wrapper kind operates on.
    pub fn dp_type(&self) -> DpType {
        match self {
            Self::Boolean => DpType::Boolean,
            Self::Enum | Self::WindDirection => DpType::Enum,
            Self::Integer | Self::Delta => DpType::Integer,
            Self::Bitmap | Self::BitmapBit { .. } => DpType::Bitmap,
            Self::Json | Self::ElectricityJson(_) => DpType::Json,
            Self::Raw | Self::ElectricityRaw(_) => DpType::Raw,
            Self::String => DpType::String,
        }
    }
}

/// Any wrapper, selected at runtime.
#[derive(Debug, Clone)]
pub enum AnyWrapper {
    Boolean(BooleanWrapper),
    Enum(EnumWrapper),
    Integer(IntegerWrapper),
    Bitmap(BitmapWrapper),
    BitmapBit(BitmapBitWrapper),
    Json(JsonWrapper),
    Raw(RawWrapper),
    String(StringWrapper),
    WindDirection(WindDirectionWrapper),
    Delta(DeltaIntegerWrapper),
    ElectricityJson(ElectricityJsonWrapper),
    ElectricityRaw(ElectricityRawWrapper),
}

macro_rules! each_wrapper {
    ($value:expr, $w:ident => $body:expr) => {
        match $value {
            AnyWrapper::Boolean($w) => $body,
            AnyWrapper::Enum($w) => $body,
            AnyWrapper::Integer($w) => $body,
            AnyWrapper::Bitmap($w) => $body,
            AnyWrapper::BitmapBit($w) => $body,
            AnyWrapper::Json($w) => $body,
            AnyWrapper::Raw($w) => $body,
            AnyWrapper::String($w) => $body,
            AnyWrapper::WindDirection($w) => $body,
            AnyWrapper::Delta($w) => $body,
            AnyWrapper::ElectricityJson($w) => $body,
            AnyWrapper::ElectricityRaw($w) => $body,
        }
    };
}

impl AnyWrapper {
    /// Pick the base wrapper matching the DP's resolved type.
    ///
    /// Integer DPs reporting `"sum"` get a [`DeltaIntegerWrapper`].
    pub fn find_dpcode(device: &Device, dp_code: &str) -> Option<Self> {
        Self::find_dpcode_with(device, dp_code, ResolveOptions::default())
    }

    pub fn find_dpcode_with(
        device: &Device,
        dp_code: &str,
        options: ResolveOptions,
    ) -> Option<Self> {
        let wrapper = match find_dp_type(device, dp_code, options)? {
            DpType::Boolean => {
                Self::Boolean(BooleanWrapper::find_dpcode_with(device, dp_code, options)?)
            }
            DpType::Enum => Self::Enum(EnumWrapper::find_dpcode_with(device, dp_code, options)?),
            DpType::Integer => {
                let integer = IntegerWrapper::find_dpcode_with(device, dp_code, options)?;
                if integer.type_information().report_type.as_deref() == Some(SUM_REPORT_TYPE) {
                    Self::Delta(DeltaIntegerWrapper::new(integer))
                } else {
                    Self::Integer(integer)
                }
            }
            DpType::Bitmap => {
                Self::Bitmap(BitmapWrapper::find_dpcode_with(device, dp_code, options)?)
            }
            DpType::Json => Self::Json(JsonWrapper::find_dpcode_with(device, dp_code, options)?),
            DpType::Raw => Self::Raw(RawWrapper::find_dpcode_with(device, dp_code, options)?),
            DpType::String => {
                Self::String(StringWrapper::find_dpcode_with(device, dp_code, options)?)
            }
        };
        Some(wrapper)
    }

    pub fn dp_code(&self) -> &str {
        each_wrapper!(self, w => w.dp_code())
    }

    /// Short name of the wrapper variant.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::Boolean(_) => "Boolean",
            Self::Enum(_) => "Enum",
            Self::Integer(_) => "Integer",
            Self::Bitmap(_) => "Bitmap",
            Self::BitmapBit(_) => "BitmapBit",
            Self::Json(_) => "Json",
            Self::Raw(_) => "Raw",
            Self::String(_) => "String",
            Self::WindDirection(_) => "WindDirection",
            Self::Delta(_) => "Delta",
            Self::ElectricityJson(_) => "ElectricityJson",
            Self::ElectricityRaw(_) => "ElectricityRaw",
        }
    }

    /// Whether the wrapper can build update commands.
    pub fn is_writable(&self) -> bool {
        matches!(self, Self::Boolean(_) | Self::Enum(_) | Self::Integer(_))
    }

    /// Enum options, for Enum-backed wrappers.
    pub fn options(&self) -> Option<&[String]> {
        match self {
            Self::Enum(w) => Some(w.options()),
            Self::WindDirection(w) => Some(w.options()),
            _ => None,
        }
    }

    /// Integer bounds `(min, max, step)` in native units.
    pub fn integer_bounds(&self) -> Option<(f64, f64, f64)> {
        match self {
            Self::Integer(w) => Some((w.min_value(), w.max_value(), w.value_step())),
            _ => None,
        }
    }
}

impl DeviceWrapper for AnyWrapper {
    type Value = DpValue;

    fn initialize(&mut self, device: &Device) {
        each_wrapper!(self, w => w.initialize(device))
    }

    fn skip_update(
        &mut self,
        device: &Device,
        updated_status_properties: Option<&[String]>,
        dp_timestamps: Option<&HashMap<String, i64>>,
    ) -> bool {
        each_wrapper!(self, w => w.skip_update(device, updated_status_properties, dp_timestamps))
    }

    fn read_device_status(&self, device: &Device, warnings: &WarningCache) -> Option<DpValue> {
        match self {
            Self::Boolean(w) => w.read_device_status(device, warnings).map(DpValue::Boolean),
            Self::BitmapBit(w) => w.read_device_status(device, warnings).map(DpValue::Boolean),
            Self::Enum(w) => w.read_device_status(device, warnings).map(DpValue::String),
            Self::String(w) => w.read_device_status(device, warnings).map(DpValue::String),
            Self::Integer(w) => w.read_device_status(device, warnings).map(DpValue::Number),
            Self::WindDirection(w) => w.read_device_status(device, warnings).map(DpValue::Number),
            Self::Delta(w) => w.read_device_status(device, warnings).map(DpValue::Number),
            Self::ElectricityJson(w) => w.read_device_status(device, warnings).map(DpValue::Number),
            Self::ElectricityRaw(w) => w.read_device_status(device, warnings).map(DpValue::Number),
            Self::Bitmap(w) => w.read_device_status(device, warnings).map(DpValue::Bitmap),
            Self::Json(w) => w.read_device_status(device, warnings).map(DpValue::Json),
            Self::Raw(w) => w.read_device_status(device, warnings).map(DpValue::Raw),
        }
    }

    fn get_update_commands(
        &self,
        device: &Device,
        value: DpValue,
    ) -> WrapperResult<Vec<DpCommand>> {
        match (self, value) {
            (Self::Boolean(w), DpValue::Boolean(v)) => w.get_update_commands(device, v),
            (Self::Enum(w), DpValue::String(v)) => w.get_update_commands(device, v),
            (Self::Integer(w), DpValue::Number(v)) => w.get_update_commands(device, v),
            (wrapper, value) if wrapper.is_writable() => {
                Err(WrapperError::out_of_range(wrapper.dp_code(), value))
            }
            (wrapper, _) => Err(WrapperError::not_implemented(
                wrapper.dp_code(),
                wrapper.kind_name(),
            )),
        }
    }

    fn native_unit(&self) -> Option<&str> {
        each_wrapper!(self, w => w.native_unit())
    }

    fn suggested_unit(&self) -> Option<&str> {
        each_wrapper!(self, w => w.suggested_unit())
    }

    fn state_class(&self) -> Option<StateClass> {
        each_wrapper!(self, w => w.state_class())
    }
}

/// Build the wrapper of `kind` for `dp_code`.
///
/// Returns `None` when the DP is unknown or its resolved type does not match
/// the requested kind.
pub fn resolve_wrapper(
    device: &Device,
    dp_code: &str,
    kind: &WrapperKind,
    options: ResolveOptions,
) -> Option<AnyWrapper> {
    let dp_type = find_dp_type(device, dp_code, options)?;
    if dp_type != kind.dp_type() {
        trace!(
            device_id = %device.id,
            dp_code,
            "Wrapper {:?} does not apply to {} dp",
            kind,
            dp_type
        );
        return None;
    }

    let wrapper = match kind {
        WrapperKind::Boolean => {
            AnyWrapper::Boolean(BooleanWrapper::find_dpcode_with(device, dp_code, options)?)
        }
        WrapperKind::Enum => {
            AnyWrapper::Enum(EnumWrapper::find_dpcode_with(device, dp_code, options)?)
        }
        WrapperKind::Integer => {
            AnyWrapper::Integer(IntegerWrapper::find_dpcode_with(device, dp_code, options)?)
        }
        WrapperKind::Bitmap => {
            AnyWrapper::Bitmap(BitmapWrapper::find_dpcode_with(device, dp_code, options)?)
        }
        WrapperKind::BitmapBit { key } => AnyWrapper::BitmapBit(
            BitmapBitWrapper::find_dpcode_with(device, dp_code, key, options)?,
        ),
        WrapperKind::Json => {
            AnyWrapper::Json(JsonWrapper::find_dpcode_with(device, dp_code, options)?)
        }
        WrapperKind::Raw => {
            AnyWrapper::Raw(RawWrapper::find_dpcode_with(device, dp_code, options)?)
        }
        WrapperKind::String => {
            AnyWrapper::String(StringWrapper::find_dpcode_with(device, dp_code, options)?)
        }
        WrapperKind::WindDirection => AnyWrapper::WindDirection(
            WindDirectionWrapper::find_dpcode_with(device, dp_code, options)?,
        ),
        WrapperKind::Delta => {
            AnyWrapper::Delta(DeltaIntegerWrapper::find_dpcode_with(device, dp_code, options)?)
        }
        WrapperKind::ElectricityJson(field) => AnyWrapper::ElectricityJson(
            ElectricityJsonWrapper::find_dpcode_with(device, dp_code, *field, options)?,
        ),
        WrapperKind::ElectricityRaw(field) => AnyWrapper::ElectricityRaw(
            ElectricityRawWrapper::find_dpcode_with(device, dp_code, *field, options)?,
        ),
    };
    Some(wrapper)
}
