//! Type parser: metadata entry -> type definition.

use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::dp_type::DpType;
use crate::error::DefinitionError;
use crate::models::{
    BitmapTypeDefinition, DataPointDefinition, EnumTypeDefinition, IntegerTypeDefinition, Scaling,
};

#[derive(Deserialize)]
struct EnumValues {
    range: Vec<String>,
}

#[derive(Deserialize)]
struct IntegerValues {
    min: i64,
    max: i64,
    scale: u32,
    step: i64,
    #[serde(default)]
    unit: Option<String>,
    #[serde(default, rename = "type")]
    report_type: Option<String>,
}

#[derive(Deserialize)]
struct BitmapValues {
    label: Vec<String>,
}

/// Normalize a raw type tag. Unknown tags yield `None`.
pub fn normalize_type(tag: &str) -> Option<DpType> {
    DpType::try_parse(tag)
}

fn check_type(
    definition: &DataPointDefinition<'_>,
    expected: DpType,
) -> Result<(), DefinitionError> {
    if definition.dp_type == Some(expected) {
        Ok(())
    } else {
        Err(DefinitionError::TypeMismatch {
            dp_code: definition.dp_code.clone(),
            expected,
            actual: definition.dp_type,
        })
    }
}

fn decode_values<T: DeserializeOwned>(
    definition: &DataPointDefinition<'_>,
) -> Result<T, DefinitionError> {
    serde_json::from_str(&definition.specs.values).map_err(|source| {
        DefinitionError::InvalidValues {
            dp_code: definition.dp_code.clone(),
            source,
        }
    })
}

fn parse_with<T>(
    definition: &DataPointDefinition<'_>,
    expected: DpType,
    build: impl FnOnce(&DataPointDefinition<'_>) -> Result<T, DefinitionError>,
) -> Option<T> {
    if let Err(e) = check_type(definition, expected) {
        warn!(dp_code = %definition.dp_code, "Failed to parse {} definition: {}", expected, e);
        return None;
    }
    match build(definition) {
        Ok(parsed) => Some(parsed),
        Err(e) => {
            debug!(dp_code = %definition.dp_code, "{}", e);
            None
        }
    }
}

/// Parse an Enum definition from its `range` constraint.
pub fn parse_enum_definition(definition: &DataPointDefinition<'_>) -> Option<EnumTypeDefinition> {
    parse_with(definition, DpType::Enum, |definition| {
        let values: EnumValues = decode_values(definition)?;
        Ok(EnumTypeDefinition {
            dp_code: definition.dp_code.clone(),
            dp_type: definition.dp_type,
            range: values.range,
        })
    })
}

/// Parse an Integer definition.
///
/// `scaling` lets a device override the default decimal conversion.
pub fn parse_integer_definition(
    definition: &DataPointDefinition<'_>,
    scaling: Scaling,
) -> Option<IntegerTypeDefinition> {
    parse_with(definition, DpType::Integer, |definition| {
        let values: IntegerValues = decode_values(definition)?;
        if i32::try_from(values.scale).is_err() {
            return Err(DefinitionError::InvalidScale {
                dp_code: definition.dp_code.clone(),
                scale: values.scale,
            });
        }
        Ok(IntegerTypeDefinition {
            dp_code: definition.dp_code.clone(),
            dp_type: definition.dp_type,
            min: values.min,
            max: values.max,
            scale: values.scale,
            step: values.step,
            unit: values.unit,
            report_type: values
                .report_type
                .or_else(|| definition.specs.report_type.clone()),
            scaling,
        })
    })
}

/// Parse a Bitmap definition from its `label` constraint.
pub fn parse_bitmap_definition(
    definition: &DataPointDefinition<'_>,
) -> Option<BitmapTypeDefinition> {
    parse_with(definition, DpType::Bitmap, |definition| {
        let values: BitmapValues = decode_values(definition)?;
        Ok(BitmapTypeDefinition {
            dp_code: definition.dp_code.clone(),
            dp_type: definition.dp_type,
            label: values.label,
        })
    })
}
