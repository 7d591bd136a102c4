//! Type definitions produced by the resolver.
//!
//! Definitions are plain data, recomputed on every resolution and owned by
//! the wrapper that requested them.

use serde::Serialize;

use crate::device::DpSpec;
use crate::dp_type::DpType;

/// A metadata entry matched for a DP code, before constraint parsing.
#[derive(Debug, Clone, PartialEq)]
pub struct DataPointDefinition<'a> {
    pub dp_code: String,
    pub dp_type: Option<DpType>,
    pub specs: &'a DpSpec,
}

/// Definition of a DP without type-specific constraints.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TypeDefinition {
    pub dp_code: String,
    pub dp_type: Option<DpType>,
}

/// Definition of an Enum DP.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EnumTypeDefinition {
    pub dp_code: String,
    pub dp_type: Option<DpType>,
    /// Legal values, in display order
    pub range: Vec<String>,
}

impl EnumTypeDefinition {
    pub fn contains(&self, value: &str) -> bool {
        self.range.iter().any(|v| v == value)
    }
}

/// Definition of a Bitmap DP.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BitmapTypeDefinition {
    pub dp_code: String,
    pub dp_type: Option<DpType>,
    /// Bit labels, least significant bit first
    pub label: Vec<String>,
}

/// Device-supplied conversion pair used instead of decimal scaling.
#[derive(Debug, Clone, Copy)]
pub struct CustomScaling {
    /// Raw wire value -> native value
    pub to_native: fn(i64) -> f64,
    /// Native value -> raw wire value
    pub to_raw: fn(f64) -> i64,
}

/// How an integer DP converts between raw and native values.
#[derive(Debug, Clone, Copy, Default)]
pub enum Scaling {
    /// `raw / 10^scale`
    #[default]
    Decimal,
    Custom(CustomScaling),
}

/// Definition of an Integer DP.
#[derive(Debug, Clone, Serialize)]
pub struct IntegerTypeDefinition {
    pub dp_code: String,
    pub dp_type: Option<DpType>,
    pub min: i64,
    pub max: i64,
    pub scale: u32,
    pub step: i64,
    pub unit: Option<String>,
    /// Vendor sub-type, e.g. "sum" for accumulating counters
    #[serde(rename = "type")]
    pub report_type: Option<String>,
    #[serde(skip)]
    pub scaling: Scaling,
}

impl IntegerTypeDefinition {
    pub fn new(dp_code: impl Into<String>, min: i64, max: i64, scale: u32, step: i64) -> Self {
        Self {
            dp_code: dp_code.into(),
            dp_type: Some(DpType::Integer),
            min,
            max,
            scale,
            step,
            unit: None,
            report_type: None,
            scaling: Scaling::Decimal,
        }
    }

    pub fn with_unit(mut self, unit: impl Into<String>) -> Self {
        self.unit = Some(unit.into());
        self
    }

    pub fn with_scaling(mut self, scaling: Scaling) -> Self {
        self.scaling = scaling;
        self
    }

    fn divisor(&self) -> f64 {
        10f64.powi(i32::try_from(self.scale).unwrap_or(i32::MAX))
    }

    /// Convert a raw wire value to its native value.
    pub fn scale_value(&self, value: i64) -> f64 {
        match self.scaling {
            Scaling::Decimal => value as f64 / self.divisor(),
            Scaling::Custom(custom) => (custom.to_native)(value),
        }
    }

    /// Convert a native value back to its raw wire value, rounding to the
    /// nearest integer.
    pub fn scale_value_back(&self, value: f64) -> i64 {
        match self.scaling {
            Scaling::Decimal => (value * self.divisor()).round() as i64,
            Scaling::Custom(custom) => (custom.to_raw)(value),
        }
    }

    pub fn min_scaled(&self) -> f64 {
        self.scale_value(self.min)
    }

    pub fn max_scaled(&self) -> f64 {
        self.scale_value(self.max)
    }

    /// Step is always expressed in decimal scale, custom conversions included.
    pub fn step_scaled(&self) -> f64 {
        self.step as f64 / self.divisor()
    }

    /// Whether a raw value lies inside `[min, max]`.
    pub fn contains(&self, raw: i64) -> bool {
        (self.min..=self.max).contains(&raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn half_degrees() -> Scaling {
        Scaling::Custom(CustomScaling {
            to_native: |v| v as f64 / 2.0,
            to_raw: |v| (v * 2.0).round() as i64,
        })
    }

    #[test]
    fn test_scale_value() {
        let definition = IntegerTypeDefinition::new("upper_temp", 0, 100, 1, 1).with_unit("℃");
        assert_eq!(definition.scale_value(10), 1.0);
        assert_eq!(definition.scale_value(1), 0.1);
        assert_eq!(definition.scale_value_back(1.0), 10);
        assert_eq!(definition.scale_value_back(10.0), 100);
    }

    #[test]
    fn test_scaled_bounds() {
        let definition = IntegerTypeDefinition::new("temp_set", 500, 3200, 2, 50);
        assert_eq!(definition.min_scaled(), 5.0);
        assert_eq!(definition.max_scaled(), 32.0);
        assert_eq!(definition.step_scaled(), 0.5);
    }

    #[test]
    fn test_scale_value_back_rounds() {
        let definition = IntegerTypeDefinition::new("demo", 0, 1000, 1, 1);
        assert_eq!(definition.scale_value_back(11.3), 113);
        assert_eq!(definition.scale_value_back(11.26), 113);
        assert_eq!(definition.scale_value_back(11.24), 112);
    }

    #[test]
    fn test_custom_scaling() {
        let definition =
            IntegerTypeDefinition::new("temp_set", 10, 70, 1, 5).with_scaling(half_degrees());
        assert_eq!(definition.scale_value(45), 22.5);
        assert_eq!(definition.scale_value_back(22.5), 45);
        assert_eq!(definition.min_scaled(), 5.0);
        assert_eq!(definition.max_scaled(), 35.0);
        // Step keeps the decimal form
        assert_eq!(definition.step_scaled(), 0.5);
    }

    #[test]
    fn test_contains() {
        let definition = IntegerTypeDefinition::new("demo", -10, 10, 0, 1);
        assert!(definition.contains(-10));
        assert!(definition.contains(10));
        assert!(!definition.contains(11));
    }

    #[test]
    fn test_enum_contains() {
        let definition = EnumTypeDefinition {
            dp_code: "mode".to_string(),
            dp_type: Some(DpType::Enum),
            range: vec!["auto".to_string(), "cold".to_string()],
        };
        assert!(definition.contains("cold"));
        assert!(!definition.contains("hot"));
    }

    #[test]
    fn test_integer_serializes_type_field() {
        let mut definition = IntegerTypeDefinition::new("add_ele", 0, 50000, 3, 100);
        definition.report_type = Some("sum".to_string());
        let value = serde_json::to_value(&definition).unwrap();
        assert_eq!(value["type"], "sum");
        assert!(value.get("scaling").is_none());
    }
}
