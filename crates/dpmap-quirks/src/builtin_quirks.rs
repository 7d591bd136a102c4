//! Quirks for known products.

use dpmap_core::{CustomScaling, ResolveOptions, Scaling, StateClass};

use crate::builder::{DeviceQuirk, IntegerRange};
use crate::category::DeviceCategory;
use crate::dp_code;
use crate::entity::{
    ClimateDefinition, CoverDefinition, CoverDeviceClass, EntityCategory, HvacMode,
    SelectDefinition, SensorDefinition, SensorDeviceClass, SwitchDefinition, SwitchDeviceClass,
    WrapperFactory,
};

const CURTAIN_TRANSLATION: &str = "[%key:component::cover::entity_component::curtain::name%]";

/// Temperatures reported in half degrees.
pub const HALF_DEGREE_SCALING: Scaling = Scaling::Custom(CustomScaling {
    to_native: |raw| raw as f64 / 2.0,
    to_raw: |value| (value * 2.0).round() as i64,
});

/// All built-in quirks.
pub fn builtin_quirks() -> Vec<DeviceQuirk> {
    vec![
        curtain_g1cp07dsqnbdbbki(),
        curtain_lfkr93x0ukp5gaia(),
        socket_4mbgrfotynzmxdav(),
        socket_jti3ce2hzvsposgj(),
        air_conditioner_f3goccgfj6qino4c(),
        thermostat_iayz2wk1th0cmlml(),
        thermostat_sqkxklkleeasfk8w(),
    ]
}

fn motor_mode_select() -> SelectDefinition {
    SelectDefinition::new(dp_code::CONTROL_BACK_MODE)
        .with_translation("curtain_motor_mode", "Motor mode")
        .with_entity_category(EntityCategory::Config)
        .with_state_translation("forward", "Forward")
        .with_state_translation("back", "Back")
}

fn curtain_cover() -> CoverDefinition {
    CoverDefinition::new(dp_code::CONTROL)
        .with_translation("curtain", CURTAIN_TRANSLATION)
        .with_device_class(CoverDeviceClass::Curtain)
        .with_state(WrapperFactory::enumeration(dp_code::CONTROL))
}

fn measurement(key: &str, device_class: SensorDeviceClass) -> SensorDefinition {
    SensorDefinition::new(key)
        .with_device_class(device_class)
        .with_state_class(StateClass::Measurement)
}

/// Reports percent_state but never updates it; position comes from
/// percent_control instead.
fn curtain_g1cp07dsqnbdbbki() -> DeviceQuirk {
    DeviceQuirk::new()
        .applies_to(DeviceCategory::Cl, "g1cp07dsqnbdbbki")
        .add_cover(
            curtain_cover().with_position(WrapperFactory::integer(dp_code::PERCENT_CONTROL)),
        )
        .add_select(motor_mode_select())
}

/// Position DPs never update; state comes from control only.
fn curtain_lfkr93x0ukp5gaia() -> DeviceQuirk {
    DeviceQuirk::new()
        .applies_to(DeviceCategory::Cl, "lfkr93x0ukp5gaia")
        .add_cover(curtain_cover())
        .add_select(motor_mode_select())
        .add_sensor(
            SensorDefinition::new(dp_code::TIME_TOTAL)
                .with_translation("last_operation_duration", "Last operation duration")
                .with_entity_category(EntityCategory::Diagnostic),
        )
}

fn socket_sensors(quirk: DeviceQuirk) -> DeviceQuirk {
    quirk
        .add_sensor(measurement(dp_code::CUR_CURRENT, SensorDeviceClass::Current))
        .add_sensor(measurement(dp_code::CUR_POWER, SensorDeviceClass::Power))
        .add_sensor(measurement(dp_code::CUR_VOLTAGE, SensorDeviceClass::Voltage))
}

fn socket_4mbgrfotynzmxdav() -> DeviceQuirk {
    socket_sensors(DeviceQuirk::new().applies_to(DeviceCategory::Cz, "4mbgrfotyNzMxDAv"))
        .add_switch(
            SwitchDefinition::new(dp_code::SWITCH).with_device_class(SwitchDeviceClass::Outlet),
        )
}

fn socket_jti3ce2hzvsposgj() -> DeviceQuirk {
    socket_sensors(DeviceQuirk::new().applies_to(DeviceCategory::Cz, "jti3ce2hzvsposgj"))
        .add_switch(
            SwitchDefinition::new(dp_code::SWITCH_1)
                .with_translation("indexed_switch", "Switch {index}")
                .with_translation_placeholder("index", "1")
                .with_device_class(SwitchDeviceClass::Outlet),
        )
}

/// Ships without cloud metadata.
fn air_conditioner_f3goccgfj6qino4c() -> DeviceQuirk {
    DeviceQuirk::new()
        .applies_to(DeviceCategory::Kt, "f3goccgfj6qino4c")
        .add_dpid_boolean(1, dp_code::SWITCH)
        .add_dpid_integer(
            2,
            dp_code::TEMP_SET,
            IntegerRange::new(160, 880, 1, 10).with_unit("℃"),
        )
        .add_dpid_integer(
            3,
            dp_code::TEMP_CURRENT,
            IntegerRange::new(0, 600, 1, 1).with_unit("℃"),
        )
        .add_dpid_enum(4, dp_code::MODE, ["auto", "cold", "wet", "heat", "fan"])
        .add_dpid_enum(
            5,
            dp_code::FAN_SPEED_ENUM,
            ["auto", "low", "low_mid", "mid", "mid_high", "high", "mute", "turbo"],
        )
        .add_dpid_boolean(8, dp_code::ECO)
        .add_dpid_boolean(9, dp_code::DRYING)
        .add_dpid_boolean(12, dp_code::HEAT)
        .add_dpid_boolean(13, dp_code::LIGHT)
        .add_dpid_integer(
            22,
            dp_code::COUNTDOWN_LEFT,
            IntegerRange::new(0, 1440, 0, 1).with_unit("分钟"),
        )
        .add_dpid_enum(105, dp_code::TEMP_UNIT_CONVERT, ["c", "f"])
        .add_dpid_boolean(109, dp_code::SLEEP)
        .add_dpid_boolean(110, dp_code::HEALTH)
        .add_dpid_boolean(111, dp_code::CLEANING)
}

/// Reports temperatures in half degrees.
fn thermostat_iayz2wk1th0cmlml() -> DeviceQuirk {
    DeviceQuirk::new()
        .applies_to(DeviceCategory::Wk, "IAYz2WK1th0cMLmL")
        .add_climate(
            ClimateDefinition::new("wk", HvacMode::HeatCool)
                .with_current_temperature(WrapperFactory::integer_with(
                    dp_code::UPPER_TEMP,
                    ResolveOptions::default(),
                    HALF_DEGREE_SCALING,
                ))
                .with_target_temperature(WrapperFactory::integer_with(
                    dp_code::TEMP_SET,
                    ResolveOptions::default(),
                    HALF_DEGREE_SCALING,
                )),
        )
        .add_switch(
            SwitchDefinition::new(dp_code::CHILD_LOCK)
                .with_translation("child_lock", "Child lock")
                .with_entity_category(EntityCategory::Config),
        )
}

/// Ships without cloud metadata.
fn thermostat_sqkxklkleeasfk8w() -> DeviceQuirk {
    DeviceQuirk::new()
        .applies_to(DeviceCategory::Wk, "sqkxklkleeasfk8w")
        .add_dpid_enum(2, dp_code::MODE, ["auto"])
        .add_dpid_integer(
            16,
            dp_code::TEMP_SET,
            IntegerRange::new(500, 3200, 2, 50).with_unit("℃"),
        )
        .add_dpid_integer(
            17,
            dp_code::TEMP_SET_F,
            IntegerRange::new(41, 90, 0, 1).with_unit("℉"),
        )
        .add_dpid_integer(
            18,
            dp_code::UPPER_TEMP_F,
            IntegerRange::new(70, 104, 0, 1).with_unit("℉"),
        )
        .add_dpid_integer(
            19,
            dp_code::UPPER_TEMP,
            IntegerRange::new(20, 40, 0, 1).with_unit("℃"),
        )
        .add_dpid_integer(
            20,
            dp_code::LOWER_TEMP_F,
            IntegerRange::new(32, 70, 0, 1).with_unit("℉"),
        )
        .add_dpid_enum(23, dp_code::TEMP_UNIT_CONVERT, ["c", "f"])
        .add_dpid_integer(
            24,
            dp_code::TEMP_CURRENT,
            IntegerRange::new(-5000, 5000, 2, 50).with_unit("℃"),
        )
        .add_dpid_integer(
            26,
            dp_code::LOWER_TEMP,
            IntegerRange::new(0, 20, 0, 1).with_unit("℃"),
        )
        .add_dpid_integer(27, dp_code::TEMP_CORRECTION, IntegerRange::new(-9, 9, 0, 1))
        .add_dpid_integer(
            29,
            dp_code::TEMP_CURRENT_F,
            IntegerRange::new(-122, 122, 0, 1).with_unit("℉"),
        )
        .add_dpid_integer(
            34,
            dp_code::HUMIDITY,
            IntegerRange::new(0, 100, 0, 1).with_unit("%"),
        )
        .add_dpid_bitmap(45, dp_code::FAULT, ["e1", "e2", "e3"])
}
