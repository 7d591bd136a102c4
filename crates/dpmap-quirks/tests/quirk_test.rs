//! Built-in quirks against recorded device descriptions.

use std::path::PathBuf;

use dpmap_core::{
    Device, DeviceWrapper, DpCommand, DpValue, StateClass, WarningCache, WrapperError,
};
use dpmap_quirks::{builtin_quirks, dp_code, DeviceQuirk, EntityCategory, HvacMode};

fn load(name: &str) -> Device {
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures")
        .join(name);
    Device::from_json_file(path).unwrap()
}

fn quirk_for(device: &Device) -> DeviceQuirk {
    builtin_quirks()
        .into_iter()
        .find(|quirk| quirk.matches(device))
        .unwrap()
}

#[test]
fn test_unknown_product_has_no_quirk() {
    let device = Device::new("id")
        .with_category("kt")
        .with_product_id("unknown");
    assert!(builtin_quirks().iter().all(|quirk| !quirk.matches(&device)));
}

#[test]
fn test_air_conditioner_metadata_patch() {
    let mut device = load("kt_f3goccgfj6qino4c.json");
    let quirk = quirk_for(&device);
    let warnings = WarningCache::new();

    // Nothing resolves before patching
    assert!(dpmap_core::IntegerWrapper::find_dpcode(&device, dp_code::TEMP_SET).is_none());

    assert_eq!(quirk.patch_device(&mut device), 28);

    let temp_set = dpmap_core::IntegerWrapper::find_dpcode(&device, dp_code::TEMP_SET).unwrap();
    assert_eq!(temp_set.read_device_status(&device, &warnings), Some(24.0));
    assert_eq!(temp_set.value_step(), 1.0);
    assert_eq!(temp_set.native_unit(), Some("℃"));
    assert_eq!(
        temp_set.get_update_commands(&device, 25.5).unwrap(),
        vec![DpCommand::new(dp_code::TEMP_SET, 255)]
    );
    assert!(matches!(
        temp_set.get_update_commands(&device, 90.0),
        Err(WrapperError::OutOfRange { .. })
    ));

    let mode = dpmap_core::EnumWrapper::find_dpcode(&device, dp_code::MODE).unwrap();
    assert_eq!(mode.options(), ["auto", "cold", "wet", "heat", "fan"]);
    assert_eq!(
        mode.read_device_status(&device, &warnings).as_deref(),
        Some("cold")
    );

    let switch = dpmap_core::BooleanWrapper::find_dpcode(&device, dp_code::SWITCH).unwrap();
    assert_eq!(switch.read_device_status(&device, &warnings), Some(true));

    let countdown =
        dpmap_core::IntegerWrapper::find_dpcode(&device, dp_code::COUNTDOWN_LEFT).unwrap();
    assert_eq!(countdown.read_device_status(&device, &warnings), Some(30.0));
    assert_eq!(countdown.native_unit(), Some("分钟"));
}

#[test]
fn test_thermostat_half_degrees() {
    let device = load("wk_iayz2wk1th0cmlml.json");
    let quirk = quirk_for(&device);
    let warnings = WarningCache::new();

    assert_eq!(quirk.climate_definitions.len(), 1);
    let climate = &quirk.climate_definitions[0];
    assert_eq!(climate.switch_only_hvac_mode, HvacMode::HeatCool);

    let target = climate.target_temperature.call(&device).unwrap();
    assert_eq!(target.read_device_status(&device, &warnings), Some(22.5));
    assert_eq!(target.min_value(), 5.0);
    assert_eq!(target.max_value(), 35.0);
    assert_eq!(target.value_step(), 5.0);
    assert_eq!(
        target.get_update_commands(&device, 23.0).unwrap(),
        vec![DpCommand::new(dp_code::TEMP_SET, 46)]
    );
    assert!(target.get_update_commands(&device, 40.0).is_err());

    let current = climate.current_temperature.call(&device).unwrap();
    assert_eq!(current.read_device_status(&device, &warnings), Some(21.5));

    let child_lock = &quirk.switch_definitions[0];
    assert_eq!(child_lock.base.entity_category, Some(EntityCategory::Config));
    let wrapper = child_lock.wrapper.call(&device).unwrap();
    assert_eq!(wrapper.read_device_status(&device, &warnings), Some(false));
}

#[test]
fn test_socket_sensors() {
    let device = load("cz_jti3ce2hzvsposgj.json");
    let quirk = quirk_for(&device);
    let warnings = WarningCache::new();

    let readings: Vec<(String, Option<DpValue>, Option<String>)> = quirk
        .sensor_definitions
        .iter()
        .map(|definition| {
            let wrapper = definition.wrapper.call(&device).unwrap();
            assert_eq!(definition.state_class, Some(StateClass::Measurement));
            (
                definition.key().to_string(),
                wrapper.read_device_status(&device, &warnings),
                wrapper.native_unit().map(str::to_string),
            )
        })
        .collect();

    assert_eq!(
        readings,
        vec![
            (
                "cur_current".to_string(),
                Some(DpValue::Number(215.0)),
                Some("mA".to_string())
            ),
            (
                "cur_power".to_string(),
                Some(DpValue::Number(50.3)),
                Some("W".to_string())
            ),
            (
                "cur_voltage".to_string(),
                Some(DpValue::Number(230.1)),
                Some("V".to_string())
            ),
        ]
    );

    let switch = &quirk.switch_definitions[0];
    assert_eq!(switch.key(), dp_code::SWITCH_1);
    assert_eq!(switch.base.translation_placeholders["index"], "1");
    assert!(switch.wrapper.call(&device).is_some());
}

#[test]
fn test_curtain_cover() {
    let device = load("cl_g1cp07dsqnbdbbki.json");
    let quirk = quirk_for(&device);
    let warnings = WarningCache::new();

    let cover = &quirk.cover_definitions[0];
    let state = cover.get_state.call(&device).unwrap();
    assert_eq!(
        state.read_device_status(&device, &warnings).as_deref(),
        Some("stop")
    );
    let set_state = cover.set_state.call(&device).unwrap();
    assert_eq!(
        set_state
            .get_update_commands(&device, "open".to_string())
            .unwrap(),
        vec![DpCommand::new(dp_code::CONTROL, "open")]
    );

    let position = cover.get_position.call(&device).unwrap();
    assert_eq!(position.dp_code(), dp_code::PERCENT_CONTROL);
    assert_eq!(position.read_device_status(&device, &warnings), Some(40.0));

    let select = &quirk.select_definitions[0];
    let wrapper = select.wrapper.call(&device).unwrap();
    assert_eq!(wrapper.options(), ["forward", "back"]);
    assert_eq!(select.state_translations["back"], "Back");
}
