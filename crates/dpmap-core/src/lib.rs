//! DP Type Resolution and Value Conversion
//!
//! Maps the vendor "data points" (DPs) reported by smart-home devices into
//! typed, unit-scaled values, and typed values back into update commands.
//!
//! ## Architecture
//!
//! ```text
//! Device (function / status_range / status)
//!     │
//!     ▼
//! DP Resolver ──→ Type Parser ──→ Type Definition
//!                                      │
//!                                      ▼
//!                          Value Wrapper ──read──→ native value
//!                                      └──write──→ [DpCommand]
//! ```
//!
//! - **Device**: the input contract, loadable from JSON
//! - **Resolver**: picks the metadata entry for a DP code
//! - **Parser**: decodes constraint blobs into type definitions
//! - **Wrappers**: bind a definition to one DP and convert values
//!
//! Read failures never surface as errors: a missing, malformed or invalid
//! value reads as `None`. Only writes fail, with [`WrapperError`].

pub mod device;
pub mod dp_type;
pub mod electricity;
pub mod error;
pub mod models;
pub mod parser;
pub mod remap;
pub mod resolver;
pub mod warnings;
pub mod wrapper;

// Re-exports for convenience
pub use device::{Device, DpCommand, DpSpec, ResolveOptions};
pub use dp_type::DpType;
pub use electricity::{ElectricityData, ElectricityField};
pub use error::{DefinitionError, DeviceError, WrapperError, WrapperResult};
pub use models::{
    BitmapTypeDefinition, CustomScaling, DataPointDefinition, EnumTypeDefinition,
    IntegerTypeDefinition, Scaling, TypeDefinition,
};
pub use parser::{
    normalize_type, parse_bitmap_definition, parse_enum_definition, parse_integer_definition,
};
pub use remap::RemapHelper;
pub use resolver::{
    find_bitmap_definition, find_definition, find_dp_type, find_enum_definition,
    find_integer_definition, find_type_definition,
};
pub use warnings::WarningCache;
pub use wrapper::{
    resolve_wrapper, AnyWrapper, BitmapBitWrapper, BitmapWrapper, BooleanWrapper,
    DeltaIntegerWrapper, DeviceWrapper, DpValue, ElectricityJsonWrapper, ElectricityRawWrapper,
    EnumWrapper, IntegerWrapper, JsonWrapper, RawWrapper, StateClass, StringWrapper,
    WindDirectionWrapper, WrapperKind,
};

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
