//! Entity definitions declared by quirks.
//!
//! A definition describes one platform entity and carries the factories that
//! build its wrappers for a concrete device.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use dpmap_core::{
    resolve_wrapper, AnyWrapper, BooleanWrapper, Device, EnumWrapper, IntegerWrapper,
    ResolveOptions, Scaling, StateClass, WrapperKind,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HvacMode {
    Off,
    Heat,
    Cool,
    HeatCool,
    Auto,
    Dry,
    FanOnly,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CoverDeviceClass {
    Awning,
    Blind,
    Curtain,
    Damper,
    Door,
    Garage,
    Gate,
    Shade,
    Shutter,
    Window,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SensorDeviceClass {
    Current,
    Duration,
    Energy,
    Humidity,
    Power,
    Temperature,
    Voltage,
    WindDirection,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SwitchDeviceClass {
    Outlet,
    Switch,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityCategory {
    Config,
    Diagnostic,
}

/// Builds a wrapper for a device, or `None` if the device lacks the DP.
pub struct WrapperFactory<W>(Arc<dyn Fn(&Device) -> Option<W> + Send + Sync>);

impl<W> WrapperFactory<W> {
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(&Device) -> Option<W> + Send + Sync + 'static,
    {
        Self(Arc::new(f))
    }

    /// A factory that never produces a wrapper.
    pub fn none() -> Self {
        Self::new(|_| None)
    }

    pub fn call(&self, device: &Device) -> Option<W> {
        (self.0)(device)
    }
}

impl<W> Clone for WrapperFactory<W> {
    fn clone(&self) -> Self {
        Self(Arc::clone(&self.0))
    }
}

impl<W> fmt::Debug for WrapperFactory<W> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("WrapperFactory")
    }
}

impl WrapperFactory<BooleanWrapper> {
    pub fn boolean(dp_code: impl Into<String>) -> Self {
        let dp_code = dp_code.into();
        Self::new(move |device| BooleanWrapper::find_dpcode(device, &dp_code))
    }
}

impl WrapperFactory<EnumWrapper> {
    pub fn enumeration(dp_code: impl Into<String>) -> Self {
        Self::enumeration_with(dp_code, ResolveOptions::default())
    }

    pub fn enumeration_with(dp_code: impl Into<String>, options: ResolveOptions) -> Self {
        let dp_code = dp_code.into();
        Self::new(move |device| EnumWrapper::find_dpcode_with(device, &dp_code, options))
    }
}

impl WrapperFactory<IntegerWrapper> {
    pub fn integer(dp_code: impl Into<String>) -> Self {
        Self::integer_with(dp_code, ResolveOptions::default(), Scaling::Decimal)
    }

    pub fn integer_with(
        dp_code: impl Into<String>,
        options: ResolveOptions,
        scaling: Scaling,
    ) -> Self {
        let dp_code = dp_code.into();
        Self::new(move |device| {
            IntegerWrapper::find_dpcode_with(device, &dp_code, options)
                .map(|wrapper| wrapper.with_scaling(scaling))
        })
    }
}

impl WrapperFactory<AnyWrapper> {
    /// Wrapper chosen from the DP's resolved type.
    pub fn any(dp_code: impl Into<String>) -> Self {
        let dp_code = dp_code.into();
        Self::new(move |device| AnyWrapper::find_dpcode(device, &dp_code))
    }

    /// Wrapper of a fixed kind.
    pub fn kind(dp_code: impl Into<String>, kind: WrapperKind) -> Self {
        let dp_code = dp_code.into();
        Self::new(move |device| {
            resolve_wrapper(device, &dp_code, &kind, ResolveOptions::default())
        })
    }
}

/// Fields shared by every entity definition.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BaseDefinition {
    pub key: String,
    pub translation_key: Option<String>,
    pub translation_string: Option<String>,
    pub translation_placeholders: BTreeMap<String, String>,
    pub entity_category: Option<EntityCategory>,
}

impl BaseDefinition {
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            ..Default::default()
        }
    }
}

macro_rules! base_builders {
    ($($definition:ty),+ $(,)?) => {$(
        impl $definition {
            pub fn with_translation(
                mut self,
                translation_key: impl Into<String>,
                translation_string: impl Into<String>,
            ) -> Self {
                self.base.translation_key = Some(translation_key.into());
                self.base.translation_string = Some(translation_string.into());
                self
            }

            pub fn with_translation_placeholder(
                mut self,
                name: impl Into<String>,
                value: impl Into<String>,
            ) -> Self {
                self.base.translation_placeholders.insert(name.into(), value.into());
                self
            }

            pub fn with_entity_category(mut self, category: EntityCategory) -> Self {
                self.base.entity_category = Some(category);
                self
            }

            pub fn key(&self) -> &str {
                &self.base.key
            }
        }
    )+};
}

base_builders!(
    ClimateDefinition,
    CoverDefinition,
    SelectDefinition,
    SensorDefinition,
    SwitchDefinition,
);

/// Climate entity.
#[derive(Debug, Clone)]
pub struct ClimateDefinition {
    pub base: BaseDefinition,
    /// HVAC mode used when the device only has an on/off switch
    pub switch_only_hvac_mode: HvacMode,
    pub current_temperature: WrapperFactory<IntegerWrapper>,
    pub target_temperature: WrapperFactory<IntegerWrapper>,
}

impl ClimateDefinition {
    pub fn new(key: impl Into<String>, switch_only_hvac_mode: HvacMode) -> Self {
        Self {
            base: BaseDefinition::new(key),
            switch_only_hvac_mode,
            current_temperature: WrapperFactory::none(),
            target_temperature: WrapperFactory::none(),
        }
    }

    pub fn with_current_temperature(mut self, factory: WrapperFactory<IntegerWrapper>) -> Self {
        self.current_temperature = factory;
        self
    }

    pub fn with_target_temperature(mut self, factory: WrapperFactory<IntegerWrapper>) -> Self {
        self.target_temperature = factory;
        self
    }
}

/// Cover entity.
#[derive(Debug, Clone)]
pub struct CoverDefinition {
    pub base: BaseDefinition,
    pub device_class: Option<CoverDeviceClass>,
    pub get_state: WrapperFactory<EnumWrapper>,
    pub set_state: WrapperFactory<EnumWrapper>,
    pub get_position: WrapperFactory<IntegerWrapper>,
    pub set_position: WrapperFactory<IntegerWrapper>,
}

impl CoverDefinition {
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            base: BaseDefinition::new(key),
            device_class: None,
            get_state: WrapperFactory::none(),
            set_state: WrapperFactory::none(),
            get_position: WrapperFactory::none(),
            set_position: WrapperFactory::none(),
        }
    }

    pub fn with_device_class(mut self, device_class: CoverDeviceClass) -> Self {
        self.device_class = Some(device_class);
        self
    }

    /// Use the same Enum DP for reading and commanding the motor state.
    pub fn with_state(mut self, factory: WrapperFactory<EnumWrapper>) -> Self {
        self.get_state = factory.clone();
        self.set_state = factory;
        self
    }

    /// Use the same Integer DP for reading and setting the position.
    pub fn with_position(mut self, factory: WrapperFactory<IntegerWrapper>) -> Self {
        self.get_position = factory.clone();
        self.set_position = factory;
        self
    }
}

/// Select entity over an Enum DP.
#[derive(Debug, Clone)]
pub struct SelectDefinition {
    pub base: BaseDefinition,
    /// Display names of the enum options
    pub state_translations: BTreeMap<String, String>,
    pub wrapper: WrapperFactory<EnumWrapper>,
}

impl SelectDefinition {
    /// Select over the Enum DP named by `key`.
    pub fn new(key: impl Into<String>) -> Self {
        let key = key.into();
        Self {
            wrapper: WrapperFactory::enumeration(key.clone()),
            base: BaseDefinition::new(key),
            state_translations: BTreeMap::new(),
        }
    }

    pub fn with_state_translation(
        mut self,
        state: impl Into<String>,
        name: impl Into<String>,
    ) -> Self {
        self.state_translations.insert(state.into(), name.into());
        self
    }

    pub fn with_wrapper(mut self, factory: WrapperFactory<EnumWrapper>) -> Self {
        self.wrapper = factory;
        self
    }
}

/// Sensor entity.
#[derive(Debug, Clone)]
pub struct SensorDefinition {
    pub base: BaseDefinition,
    pub device_class: Option<SensorDeviceClass>,
    /// Overrides the wrapper's own state class
    pub state_class: Option<StateClass>,
    pub wrapper: WrapperFactory<AnyWrapper>,
}

impl SensorDefinition {
    /// Sensor over the DP named by `key`, wrapper picked from its type.
    pub fn new(key: impl Into<String>) -> Self {
        let key = key.into();
        Self {
            wrapper: WrapperFactory::any(key.clone()),
            base: BaseDefinition::new(key),
            device_class: None,
            state_class: None,
        }
    }

    pub fn with_device_class(mut self, device_class: SensorDeviceClass) -> Self {
        self.device_class = Some(device_class);
        self
    }

    pub fn with_state_class(mut self, state_class: StateClass) -> Self {
        self.state_class = Some(state_class);
        self
    }

    pub fn with_wrapper(mut self, factory: WrapperFactory<AnyWrapper>) -> Self {
        self.wrapper = factory;
        self
    }
}

/// Switch entity over a Boolean DP.
#[derive(Debug, Clone)]
pub struct SwitchDefinition {
    pub base: BaseDefinition,
    pub device_class: Option<SwitchDeviceClass>,
    pub wrapper: WrapperFactory<BooleanWrapper>,
}

impl SwitchDefinition {
    pub fn new(key: impl Into<String>) -> Self {
        let key = key.into();
        Self {
            wrapper: WrapperFactory::boolean(key.clone()),
            base: BaseDefinition::new(key),
            device_class: None,
        }
    }

    pub fn with_device_class(mut self, device_class: SwitchDeviceClass) -> Self {
        self.device_class = Some(device_class);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dpmap_core::DpSpec;

    fn device() -> Device {
        Device::new("device_id")
            .with_function(DpSpec::new("switch", "Boolean", "{}"))
            .with_function(DpSpec::new(
                "control",
                "Enum",
                r#"{"range": ["open", "stop", "close"]}"#,
            ))
            .with_status("switch", true)
            .with_status("control", "stop")
    }

    #[test]
    fn test_factory_none() {
        let factory: WrapperFactory<BooleanWrapper> = WrapperFactory::none();
        assert!(factory.call(&device()).is_none());
        assert_eq!(format!("{:?}", factory), "WrapperFactory");
    }

    #[test]
    fn test_default_wrappers_follow_key() {
        let device = device();
        let switch = SwitchDefinition::new("switch");
        assert_eq!(switch.wrapper.call(&device).unwrap().dp_code(), "switch");

        let select = SelectDefinition::new("control")
            .with_translation("curtain_control", "Control")
            .with_state_translation("open", "Open");
        assert_eq!(select.wrapper.call(&device).unwrap().options().len(), 3);
        assert_eq!(select.base.translation_key.as_deref(), Some("curtain_control"));

        // Wrong type for the key
        let select = SelectDefinition::new("switch");
        assert!(select.wrapper.call(&device).is_none());
    }

    #[test]
    fn test_cover_shares_state_factory() {
        let cover = CoverDefinition::new("control")
            .with_device_class(CoverDeviceClass::Curtain)
            .with_state(WrapperFactory::enumeration("control"));
        let device = device();
        assert!(cover.get_state.call(&device).is_some());
        assert!(cover.set_state.call(&device).is_some());
        assert!(cover.get_position.call(&device).is_none());
    }

    #[test]
    fn test_entity_enums_serialize_snake_case() {
        assert_eq!(
            serde_json::to_string(&HvacMode::HeatCool).unwrap(),
            "\"heat_cool\""
        );
        assert_eq!(
            serde_json::to_string(&EntityCategory::Diagnostic).unwrap(),
            "\"diagnostic\""
        );
    }
}
