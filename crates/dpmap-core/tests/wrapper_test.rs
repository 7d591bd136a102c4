//! Wrapper tests against a full device description.
//!
//! Covers resolution, reads, writes and error signalling for every base
//! wrapper, plus the runtime dispatcher.

use std::path::PathBuf;

use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use serde_json::{json, Value};

use dpmap_core::{
    find_enum_definition, find_integer_definition, find_type_definition, AnyWrapper,
    BitmapWrapper, BooleanWrapper, DeviceWrapper, Device, DpCommand, DpType, DpValue,
    EnumWrapper, IntegerWrapper, JsonWrapper, RawWrapper, ResolveOptions, Scaling, StateClass,
    StringWrapper, WarningCache, WrapperError,
};

fn demo_device() -> Device {
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/demo_device.json");
    Device::from_json_file(path).unwrap()
}

/// Read, then check that null and missing statuses read as `None`.
fn assert_reads<W: DeviceWrapper>(wrapper: &W, dp_code: &str, expected: W::Value)
where
    W::Value: PartialEq + std::fmt::Debug,
{
    let mut device = demo_device();
    let warnings = WarningCache::new();
    assert_eq!(wrapper.read_device_status(&device, &warnings), Some(expected));

    device.status.insert(dp_code.to_string(), Value::Null);
    assert_eq!(wrapper.read_device_status(&device, &warnings), None);

    device.status.remove(dp_code);
    assert_eq!(wrapper.read_device_status(&device, &warnings), None);
}

#[test]
fn test_fixture_loads() {
    let device = demo_device();
    assert_eq!(device.id, "device_id");
    assert_eq!(device.function["demo_enum"].code, "demo_enum");
    assert_eq!(device.status_range.len(), 8);
}

#[test]
fn test_read_device_status() {
    let device = demo_device();

    let bitmap = BitmapWrapper::find_dpcode(&device, "demo_bitmap").unwrap();
    assert_reads(&bitmap, "demo_bitmap", 3);

    let boolean = BooleanWrapper::find_dpcode(&device, "demo_boolean").unwrap();
    assert_reads(&boolean, "demo_boolean", true);

    let enumeration = EnumWrapper::find_dpcode(&device, "demo_enum").unwrap();
    assert_reads(&enumeration, "demo_enum", "customize_scene".to_string());

    let integer = IntegerWrapper::find_dpcode(&device, "demo_integer").unwrap();
    assert_reads(&integer, "demo_integer", 12.3);

    let json = JsonWrapper::find_dpcode(&device, "demo_json").unwrap();
    let expected = json!({"h": 210, "s": 1000, "v": 1000});
    assert_reads(&json, "demo_json", expected.as_object().unwrap().clone());

    let raw = RawWrapper::find_dpcode(&device, "demo_raw").unwrap();
    assert_reads(
        &raw,
        "demo_raw",
        BASE64.decode("fwceBQF/DgACAX8UAAQB").unwrap(),
    );

    let string = StringWrapper::find_dpcode(&device, "demo_string").unwrap();
    assert_reads(&string, "demo_string", "a_string".to_string());
}

#[test]
fn test_get_update_commands() {
    let device = demo_device();

    let boolean = BooleanWrapper::find_dpcode(&device, "demo_boolean").unwrap();
    assert_eq!(
        boolean.get_update_commands(&device, false).unwrap(),
        vec![DpCommand::new("demo_boolean", false)]
    );

    let enumeration = EnumWrapper::find_dpcode(&device, "demo_enum").unwrap();
    assert_eq!(
        enumeration
            .get_update_commands(&device, "colour".to_string())
            .unwrap(),
        vec![DpCommand::new("demo_enum", "colour")]
    );

    let integer = IntegerWrapper::find_dpcode(&device, "demo_integer").unwrap();
    assert_eq!(
        integer.get_update_commands(&device, 11.3).unwrap(),
        vec![DpCommand::new("demo_integer", 113)]
    );
}

#[test]
fn test_update_command_shape() {
    let device = demo_device();
    let integer = IntegerWrapper::find_dpcode(&device, "demo_integer").unwrap();
    let commands = integer.get_update_commands(&device, 11.3).unwrap();
    assert_eq!(
        serde_json::to_value(&commands).unwrap(),
        json!([{"code": "demo_integer", "value": 113}])
    );
}

#[test]
fn test_get_update_commands_out_of_range() {
    let device = demo_device();

    let enumeration = EnumWrapper::find_dpcode(&device, "demo_enum").unwrap();
    assert!(matches!(
        enumeration.get_update_commands(&device, "hot".to_string()),
        Err(WrapperError::OutOfRange { .. })
    ));

    let integer = IntegerWrapper::find_dpcode(&device, "demo_integer").unwrap();
    let err = integer.get_update_commands(&device, 111.3).unwrap_err();
    assert_eq!(err, WrapperError::out_of_range("demo_integer", 111.3));

    // A non-boolean value for a Boolean DP
    let boolean = AnyWrapper::find_dpcode(&device, "demo_boolean").unwrap();
    assert!(matches!(
        boolean.get_update_commands(&device, DpValue::from("h")),
        Err(WrapperError::OutOfRange { .. })
    ));
}

#[test]
fn test_get_update_commands_not_implemented() {
    let device = demo_device();

    let bitmap = BitmapWrapper::find_dpcode(&device, "demo_bitmap").unwrap();
    assert!(matches!(
        bitmap.get_update_commands(&device, 1),
        Err(WrapperError::NotImplemented { .. })
    ));

    let raw = RawWrapper::find_dpcode(&device, "demo_raw").unwrap();
    assert!(matches!(
        raw.get_update_commands(&device, vec![0x7f]),
        Err(WrapperError::NotImplemented { .. })
    ));

    let string = StringWrapper::find_dpcode(&device, "demo_string").unwrap();
    assert!(matches!(
        string.get_update_commands(&device, "text".to_string()),
        Err(WrapperError::NotImplemented { .. })
    ));
}

#[test]
fn test_integer_details() {
    let device = demo_device();
    let integer = IntegerWrapper::find_dpcode(&device, "demo_integer").unwrap();
    assert_eq!(integer.max_value(), 100.0);
    assert_eq!(integer.min_value(), 0.0);
    assert_eq!(integer.value_step(), 0.1);
    assert_eq!(integer.native_unit(), Some("%"));
}

#[test]
fn test_missing_values_do_not_resolve() {
    let device = demo_device();
    let options = ResolveOptions::prefer_function();

    assert!(
        BitmapWrapper::find_dpcode_with(&device, "demo_bitmap_missing_values", options).is_none()
    );
    assert!(EnumWrapper::find_dpcode_with(&device, "demo_enum_missing_values", options).is_none());
    assert!(
        IntegerWrapper::find_dpcode_with(&device, "demo_integer_missing_values", options).is_none()
    );

    for dp_code in ["invalid", ""] {
        assert!(BooleanWrapper::find_dpcode(&device, dp_code).is_none());
        assert!(StringWrapper::find_dpcode(&device, dp_code).is_none());
        assert!(find_type_definition(&device, dp_code, ResolveOptions::default()).is_none());
    }
}

#[test]
fn test_type_definitions() {
    let device = demo_device();
    let options = ResolveOptions::default();

    let definition = find_type_definition(&device, "demo_json", options).unwrap();
    assert_eq!(definition.dp_type, Some(DpType::Json));

    let definition = find_enum_definition(&device, "demo_enum", options).unwrap();
    assert_eq!(definition.range, vec!["scene", "customize_scene", "colour"]);

    let definition =
        find_integer_definition(&device, "demo_integer_sum", options, Scaling::Decimal).unwrap();
    assert_eq!(definition.scale, 1);
    assert_eq!(definition.scale_value(150), 15.0);
    assert_eq!(definition.scale_value_back(15.0), 150);
    assert_eq!(definition.report_type.as_deref(), Some("sum"));
}

#[test]
fn test_dispatch_selects_delta_for_sum() {
    let device = demo_device();
    let mut wrapper = AnyWrapper::find_dpcode(&device, "demo_integer_sum").unwrap();
    wrapper.initialize(&device);
    assert!(matches!(wrapper, AnyWrapper::Delta(_)));
    assert_eq!(wrapper.state_class(), Some(StateClass::TotalIncreasing));
    assert_eq!(
        wrapper.read_device_status(&device, &WarningCache::new()),
        Some(DpValue::Number(0.0))
    );
}

#[test]
fn test_warning_cache_partitions_by_device() {
    let warnings = WarningCache::new();
    let mut first = demo_device();
    first.status.insert("demo_enum".into(), json!("hot"));
    let mut second = first.clone();
    second.id = "other_device".into();

    let wrapper = EnumWrapper::find_dpcode(&first, "demo_enum").unwrap();
    for _ in 0..3 {
        assert_eq!(wrapper.read_device_status(&first, &warnings), None);
        assert_eq!(wrapper.read_device_status(&second, &warnings), None);
    }
    assert_eq!(warnings.len(), 2);

    warnings.clear();
    assert!(warnings.is_empty());
}
