//! Declarative quirk builder.
//!
//! ```text
//! DeviceQuirk::new()
//!     .applies_to(DeviceCategory::Wk, "sqkxklkleeasfk8w")
//!     .add_dpid_enum(2, "mode", ["auto"])
//!     .add_switch(SwitchDefinition::new("child_lock"))
//! ```

use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use tracing::{debug, trace};

use dpmap_core::{Device, DpSpec, DpType};

use crate::category::DeviceCategory;
use crate::entity::{
    ClimateDefinition, CoverDefinition, SelectDefinition, SensorDefinition, SwitchDefinition,
};

/// Numeric domain of an Integer DP declared by a quirk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntegerRange {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
    pub min: i64,
    pub max: i64,
    pub scale: u32,
    pub step: i64,
}

impl IntegerRange {
    pub fn new(min: i64, max: i64, scale: u32, step: i64) -> Self {
        Self {
            unit: None,
            min,
            max,
            scale,
            step,
        }
    }

    pub fn with_unit(mut self, unit: impl Into<String>) -> Self {
        self.unit = Some(unit.into());
        self
    }

    fn to_values(&self) -> Value {
        let mut values = Map::new();
        if let Some(unit) = &self.unit {
            values.insert("unit".into(), json!(unit));
        }
        values.insert("min".into(), json!(self.min));
        values.insert("max".into(), json!(self.max));
        values.insert("scale".into(), json!(self.scale));
        values.insert("step".into(), json!(self.step));
        Value::Object(values)
    }
}

/// DP metadata declared for a product whose cloud metadata is missing.
#[derive(Debug, Clone, PartialEq)]
pub struct DpidDefinition {
    /// Numeric DP id on the device
    pub dpid: u32,
    pub spec: DpSpec,
}

impl DpidDefinition {
    /// Bitmaps are read-only and only go to the status-range map.
    fn writable(&self) -> bool {
        self.spec.dp_type != DpType::Bitmap.as_str()
    }
}

/// Per-product declaration of entities and DP metadata.
#[derive(Debug, Clone, Default)]
pub struct DeviceQuirk {
    /// `(category, product_id)` pairs this quirk applies to
    pub targets: Vec<(DeviceCategory, String)>,
    pub climate_definitions: Vec<ClimateDefinition>,
    pub cover_definitions: Vec<CoverDefinition>,
    pub select_definitions: Vec<SelectDefinition>,
    pub sensor_definitions: Vec<SensorDefinition>,
    pub switch_definitions: Vec<SwitchDefinition>,
    pub dpid_definitions: Vec<DpidDefinition>,
}

impl DeviceQuirk {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn applies_to(mut self, category: DeviceCategory, product_id: impl Into<String>) -> Self {
        self.targets.push((category, product_id.into()));
        self
    }

    pub fn add_climate(mut self, definition: ClimateDefinition) -> Self {
        self.climate_definitions.push(definition);
        self
    }

    pub fn add_cover(mut self, definition: CoverDefinition) -> Self {
        self.cover_definitions.push(definition);
        self
    }

    pub fn add_select(mut self, definition: SelectDefinition) -> Self {
        self.select_definitions.push(definition);
        self
    }

    pub fn add_sensor(mut self, definition: SensorDefinition) -> Self {
        self.sensor_definitions.push(definition);
        self
    }

    pub fn add_switch(mut self, definition: SwitchDefinition) -> Self {
        self.switch_definitions.push(definition);
        self
    }

    fn add_dpid(mut self, dpid: u32, dp_code: &str, dp_type: DpType, values: Value) -> Self {
        self.dpid_definitions.push(DpidDefinition {
            dpid,
            spec: DpSpec::new(dp_code, dp_type.as_str(), values.to_string()),
        });
        self
    }

    pub fn add_dpid_boolean(self, dpid: u32, dp_code: &str) -> Self {
        self.add_dpid(dpid, dp_code, DpType::Boolean, json!({}))
    }

    pub fn add_dpid_integer(self, dpid: u32, dp_code: &str, range: IntegerRange) -> Self {
        self.add_dpid(dpid, dp_code, DpType::Integer, range.to_values())
    }

    pub fn add_dpid_enum<I, S>(self, dpid: u32, dp_code: &str, range: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let range: Vec<String> = range.into_iter().map(Into::into).collect();
        self.add_dpid(dpid, dp_code, DpType::Enum, json!({ "range": range }))
    }

    pub fn add_dpid_bitmap<I, S>(self, dpid: u32, dp_code: &str, labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let labels: Vec<String> = labels.into_iter().map(Into::into).collect();
        self.add_dpid(dpid, dp_code, DpType::Bitmap, json!({ "label": labels }))
    }

    /// Whether the quirk targets this device's category and product id.
    pub fn matches(&self, device: &Device) -> bool {
        let matched = self.targets.iter().any(|(category, product_id)| {
            category.as_str() == device.category && *product_id == device.product_id
        });
        trace!(
            device_id = %device.id,
            category = %device.category,
            product_id = %device.product_id,
            matched,
            "Quirk match"
        );
        matched
    }

    /// Insert the declared DP metadata into the device's maps.
    ///
    /// Entries the device already advertises are left untouched. Returns the
    /// number of entries inserted.
    pub fn patch_device(&self, device: &mut Device) -> usize {
        let mut inserted = 0;
        for definition in &self.dpid_definitions {
            let code = &definition.spec.code;
            let mut maps = vec![&mut device.status_range];
            if definition.writable() {
                maps.push(&mut device.function);
            }
            for specs in maps {
                if !specs.contains_key(code) {
                    specs.insert(code.clone(), definition.spec.clone());
                    inserted += 1;
                }
            }
        }
        debug!(device_id = %device.id, inserted, "Patched device metadata");
        inserted
    }

    /// Declared DP id of a DP code.
    pub fn dpid(&self, dp_code: &str) -> Option<u32> {
        self.dpid_definitions
            .iter()
            .find(|d| d.spec.code == dp_code)
            .map(|d| d.dpid)
    }
}
