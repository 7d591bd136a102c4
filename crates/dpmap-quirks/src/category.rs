//! Product categories.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Category code of a product, as reported in `Device::category`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeviceCategory {
    /// Curtain
    Cl,
    /// Socket
    Cz,
    /// Light
    Dj,
    /// Switch
    Kg,
    /// Air conditioner
    Kt,
    /// Power strip
    Pc,
    /// Weather station
    Qxj,
    /// Thermostat
    Wk,
    /// Temperature and humidity sensor
    Wsdcg,
    /// Smart meter
    Zndb,
}

impl DeviceCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Cl => "cl",
            Self::Cz => "cz",
            Self::Dj => "dj",
            Self::Kg => "kg",
            Self::Kt => "kt",
            Self::Pc => "pc",
            Self::Qxj => "qxj",
            Self::Wk => "wk",
            Self::Wsdcg => "wsdcg",
            Self::Zndb => "zndb",
        }
    }

    pub fn try_parse(code: &str) -> Option<Self> {
        Some(match code {
            "cl" => Self::Cl,
            "cz" => Self::Cz,
            "dj" => Self::Dj,
            "kg" => Self::Kg,
            "kt" => Self::Kt,
            "pc" => Self::Pc,
            "qxj" => Self::Qxj,
            "wk" => Self::Wk,
            "wsdcg" => Self::Wsdcg,
            "zndb" => Self::Zndb,
            _ => return None,
        })
    }
}

impl fmt::Display for DeviceCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
