//! DP resolver.
//!
//! A device advertises DP specs in two maps. Read decoding prefers the
//! status-range map; callers that need write-side constraints (a command
//! range narrower than the reported range, for instance) set
//! `prefer_function`. Sources are never merged: the first map holding the
//! DP code with a recognizable type tag wins.

use tracing::trace;

use crate::device::{Device, ResolveOptions};
use crate::dp_type::DpType;
use crate::models::{
    BitmapTypeDefinition, DataPointDefinition, EnumTypeDefinition, IntegerTypeDefinition, Scaling,
    TypeDefinition,
};
use crate::parser::{
    normalize_type, parse_bitmap_definition, parse_enum_definition, parse_integer_definition,
};

/// Find the metadata entry for `dp_code`.
pub fn find_definition<'a>(
    device: &'a Device,
    dp_code: &str,
    options: ResolveOptions,
) -> Option<DataPointDefinition<'a>> {
    let lookup = if options.prefer_function {
        [&device.function, &device.status_range]
    } else {
        [&device.status_range, &device.function]
    };

    for specs in lookup {
        let Some(spec) = specs.get(dp_code) else {
            continue;
        };
        if let Some(dp_type) = normalize_type(&spec.dp_type) {
            return Some(DataPointDefinition {
                dp_code: dp_code.to_string(),
                dp_type: Some(dp_type),
                specs: spec,
            });
        }
        trace!(
            device_id = %device.id,
            dp_code,
            "Ignoring unrecognized dp type {:?}",
            spec.dp_type
        );
    }

    None
}

/// Resolve a definition without type-specific constraints.
pub fn find_type_definition(
    device: &Device,
    dp_code: &str,
    options: ResolveOptions,
) -> Option<TypeDefinition> {
    find_definition(device, dp_code, options).map(|definition| TypeDefinition {
        dp_code: definition.dp_code,
        dp_type: definition.dp_type,
    })
}

pub fn find_enum_definition(
    device: &Device,
    dp_code: &str,
    options: ResolveOptions,
) -> Option<EnumTypeDefinition> {
    let definition = find_definition(device, dp_code, options)?;
    parse_enum_definition(&definition)
}

pub fn find_integer_definition(
    device: &Device,
    dp_code: &str,
    options: ResolveOptions,
    scaling: Scaling,
) -> Option<IntegerTypeDefinition> {
    let definition = find_definition(device, dp_code, options)?;
    parse_integer_definition(&definition, scaling)
}

pub fn find_bitmap_definition(
    device: &Device,
    dp_code: &str,
    options: ResolveOptions,
) -> Option<BitmapTypeDefinition> {
    let definition = find_definition(device, dp_code, options)?;
    parse_bitmap_definition(&definition)
}

/// Resolved DP type, if the DP is known to the device.
pub fn find_dp_type(device: &Device, dp_code: &str, options: ResolveOptions) -> Option<DpType> {
    find_definition(device, dp_code, options).and_then(|definition| definition.dp_type)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::device::DpSpec;

    fn device() -> Device {
        Device::new("device_id")
            .with_function(DpSpec::new(
                "percent_control",
                "Integer",
                r#"{"min": 0, "max": 100, "scale": 0, "step": 1}"#,
            ))
            .with_status_range(DpSpec::new(
                "percent_control",
                "Integer",
                r#"{"min": 0, "max": 1000, "scale": 1, "step": 1}"#,
            ))
            .with_function(DpSpec::new("mixed", "Enum", r#"{"range": ["a"]}"#))
            .with_status_range(DpSpec::new("mixed", "String", "{}"))
            .with_function(DpSpec::new("fallback", "bool", "{}"))
            .with_status_range(DpSpec::new("fallback", "unknown", "{}"))
    }

    #[test]
    fn test_status_range_preferred_by_default() {
        let device = device();
        let definition = find_integer_definition(
            &device,
            "percent_control",
            ResolveOptions::default(),
            Scaling::Decimal,
        )
        .unwrap();
        assert_eq!(definition.max, 1000);
        assert_eq!(definition.scale, 1);
    }

    #[test]
    fn test_prefer_function() {
        let device = device();
        let definition = find_integer_definition(
            &device,
            "percent_control",
            ResolveOptions::prefer_function(),
            Scaling::Decimal,
        )
        .unwrap();
        assert_eq!(definition.max, 100);
        assert_eq!(definition.scale, 0);
    }

    #[test]
    fn test_sources_are_not_merged() {
        let device = device();
        assert_eq!(
            find_dp_type(&device, "mixed", ResolveOptions::default()),
            Some(DpType::String)
        );
        assert_eq!(
            find_dp_type(&device, "mixed", ResolveOptions::prefer_function()),
            Some(DpType::Enum)
        );
        // An Enum parse over the status-range hit fails rather than
        // falling through to the function map.
        assert!(find_enum_definition(&device, "mixed", ResolveOptions::default()).is_none());
    }

    #[test]
    fn test_unrecognized_tag_falls_through() {
        let device = device();
        let definition = find_type_definition(&device, "fallback", ResolveOptions::default())
            .unwrap();
        assert_eq!(definition.dp_type, Some(DpType::Boolean));
    }

    #[test]
    fn test_missing_dp() {
        let device = device();
        assert!(find_definition(&device, "invalid", ResolveOptions::default()).is_none());
        assert!(find_type_definition(&device, "invalid", ResolveOptions::prefer_function())
            .is_none());
    }
}
