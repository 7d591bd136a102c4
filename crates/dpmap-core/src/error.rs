//! Error types.

use crate::dp_type::DpType;

/// Errors returned when building update commands.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum WrapperError {
    /// The requested value lies outside the data point's declared domain.
    #[error("Value {value} is out of range for {dp_code}")]
    OutOfRange { dp_code: String, value: String },

    /// The wrapper has no encode path.
    #[error("Update commands are not implemented for {dp_code} ({kind})")]
    NotImplemented { dp_code: String, kind: &'static str },
}

impl WrapperError {
    pub fn out_of_range(dp_code: &str, value: impl std::fmt::Display) -> Self {
        Self::OutOfRange {
            dp_code: dp_code.to_string(),
            value: value.to_string(),
        }
    }

    pub fn not_implemented(dp_code: &str, kind: &'static str) -> Self {
        Self::NotImplemented {
            dp_code: dp_code.to_string(),
            kind,
        }
    }
}

pub type WrapperResult<T> = std::result::Result<T, WrapperError>;

/// Reasons a constraint blob could not be turned into a type definition.
#[derive(Debug, thiserror::Error)]
pub enum DefinitionError {
    #[error("Expected dp type {expected} for {dp_code}, got {actual:?}")]
    TypeMismatch {
        dp_code: String,
        expected: DpType,
        actual: Option<DpType>,
    },

    #[error("Invalid constraint values for {dp_code}: {source}")]
    InvalidValues {
        dp_code: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Scale {scale} of {dp_code} is too large")]
    InvalidScale { dp_code: String, scale: u32 },
}

/// Errors that can occur while loading a device description.
#[derive(Debug, thiserror::Error)]
pub enum DeviceError {
    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = WrapperError::out_of_range("temp_set", 111.3);
        assert_eq!(err.to_string(), "Value 111.3 is out of range for temp_set");

        let err = WrapperError::not_implemented("fault", "Bitmap");
        assert!(err.to_string().contains("not implemented"));
        assert!(err.to_string().contains("fault"));
    }

    #[test]
    fn test_type_mismatch_display() {
        let err = DefinitionError::TypeMismatch {
            dp_code: "mode".to_string(),
            expected: DpType::Enum,
            actual: Some(DpType::Integer),
        };
        assert_eq!(
            err.to_string(),
            "Expected dp type Enum for mode, got Some(Integer)"
        );
    }
}
