//! Packed binary electricity records.
//!
//! Big-endian layout, reported as a base64 `Raw` DP:
//!
//! ```text
//! legacy:      | voltage u16 | current u24 | power u24 |
//! versioned:   | ver (1|2) | flags | voltage u16 | current u24 | power u24 | ...
//! ```
//!
//! Voltage is in 0.1 V, current in mA and power in W.

use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use serde::Serialize;
use tracing::debug;

const LEGACY_LEN: usize = 8;
const VERSIONED_HEADER_LEN: usize = 2;

/// Which electricity quantity a wrapper exposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElectricityField {
    Current,
    Power,
    Voltage,
}

impl ElectricityField {
    /// Key of this quantity in JSON-encoded records.
    pub fn json_key(&self) -> &'static str {
        match self {
            Self::Current => "electricCurrent",
            Self::Power => "power",
            Self::Voltage => "voltage",
        }
    }
}

/// Decoded electricity record.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ElectricityData {
    /// mA
    pub current: f64,
    /// W
    pub power: f64,
    /// V
    pub voltage: f64,
}

fn read_be(bytes: &[u8]) -> u32 {
    bytes.iter().fold(0u32, |acc, b| (acc << 8) | u32::from(*b))
}

impl ElectricityData {
    /// Decode a record. Unknown or short payloads yield `None`.
    pub fn from_bytes(raw: &[u8]) -> Option<Self> {
        let offset = match raw.first() {
            Some(1 | 2) if raw.len() >= VERSIONED_HEADER_LEN + LEGACY_LEN => VERSIONED_HEADER_LEN,
            Some(_) if raw.len() >= LEGACY_LEN => 0,
            _ => {
                debug!("Electricity record too short: {} bytes", raw.len());
                return None;
            }
        };
        let body = &raw[offset..offset + LEGACY_LEN];

        Some(Self {
            voltage: f64::from(read_be(&body[0..2])) / 10.0,
            current: f64::from(read_be(&body[2..5])),
            power: f64::from(read_be(&body[5..8])),
        })
    }

    /// Decode a base64-encoded record.
    pub fn from_base64(encoded: &str) -> Option<Self> {
        match BASE64.decode(encoded) {
            Ok(raw) => Self::from_bytes(&raw),
            Err(e) => {
                debug!("Invalid base64 electricity record: {}", e);
                None
            }
        }
    }

    pub fn get(&self, field: ElectricityField) -> f64 {
        match field {
            ElectricityField::Current => self.current,
            ElectricityField::Power => self.power,
            ElectricityField::Voltage => self.voltage,
        }
    }
}
