//! Per-product Quirks
//!
//! A quirk declares, for specific `(category, product_id)` pairs, which
//! entities a device exposes and which wrappers back them. Products that ship
//! without cloud metadata also declare their DP metadata, which
//! [`DeviceQuirk::patch_device`] inserts into the device before resolution.
//!
//! Matching a device against a set of quirks is left to the caller:
//!
//! ```no_run
//! use dpmap_core::Device;
//! use dpmap_quirks::builtin_quirks;
//!
//! let mut device = Device::from_json_file("device.json").unwrap();
//! if let Some(quirk) = builtin_quirks().into_iter().find(|q| q.matches(&device)) {
//!     quirk.patch_device(&mut device);
//! }
//! ```

pub mod builder;
pub mod builtin_quirks;
pub mod category;
pub mod dp_code;
pub mod entity;

pub use builder::{DeviceQuirk, DpidDefinition, IntegerRange};
pub use builtin_quirks::{builtin_quirks, HALF_DEGREE_SCALING};
pub use category::DeviceCategory;
pub use entity::{
    BaseDefinition, ClimateDefinition, CoverDefinition, CoverDeviceClass, EntityCategory,
    HvacMode, SelectDefinition, SensorDefinition, SensorDeviceClass, SwitchDefinition,
    SwitchDeviceClass, WrapperFactory,
};
