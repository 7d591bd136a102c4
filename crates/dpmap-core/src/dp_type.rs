//! Data point type tags.

use serde::{Deserialize, Serialize};

/// Declared type of a data point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DpType {
    Bitmap,
    Boolean,
    Enum,
    Integer,
    Json,
    Raw,
    String,
}

impl DpType {
    /// Canonical tag as reported by well-behaved devices.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Bitmap => "Bitmap",
            Self::Boolean => "Boolean",
            Self::Enum => "Enum",
            Self::Integer => "Integer",
            Self::Json => "Json",
            Self::Raw => "Raw",
            Self::String => "String",
        }
    }

    fn from_canonical(tag: &str) -> Option<Self> {
        match tag {
            "Bitmap" => Some(Self::Bitmap),
            "Boolean" => Some(Self::Boolean),
            "Enum" => Some(Self::Enum),
            "Integer" => Some(Self::Integer),
            "Json" => Some(Self::Json),
            "Raw" => Some(Self::Raw),
            "String" => Some(Self::String),
            _ => None,
        }
    }

    // The cloud sometimes reports lowercase or legacy tags.
    fn from_legacy(tag: &str) -> Option<Self> {
        match tag {
            "bitmap" => Some(Self::Bitmap),
            "bool" => Some(Self::Boolean),
            "enum" => Some(Self::Enum),
            "json" => Some(Self::Json),
            "raw" => Some(Self::Raw),
            "string" => Some(Self::String),
            "value" => Some(Self::Integer),
            _ => None,
        }
    }

    /// Parse a raw type tag, normalizing non-canonical vendor spellings.
    ///
    /// Returns `None` for unknown tags.
    pub fn try_parse(tag: &str) -> Option<Self> {
        Self::from_canonical(tag).or_else(|| Self::from_legacy(tag))
    }
}

impl std::fmt::Display for DpType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canonical_tags() {
        assert_eq!(DpType::try_parse("Boolean"), Some(DpType::Boolean));
        assert_eq!(DpType::try_parse("Enum"), Some(DpType::Enum));
        assert_eq!(DpType::try_parse("Integer"), Some(DpType::Integer));
        assert_eq!(DpType::try_parse("Json"), Some(DpType::Json));
        assert_eq!(DpType::try_parse("Raw"), Some(DpType::Raw));
        assert_eq!(DpType::try_parse("String"), Some(DpType::String));
        assert_eq!(DpType::try_parse("Bitmap"), Some(DpType::Bitmap));
    }

    #[test]
    fn test_legacy_tags() {
        assert_eq!(DpType::try_parse("bitmap"), Some(DpType::Bitmap));
        assert_eq!(DpType::try_parse("bool"), Some(DpType::Boolean));
        assert_eq!(DpType::try_parse("enum"), Some(DpType::Enum));
        assert_eq!(DpType::try_parse("json"), Some(DpType::Json));
        assert_eq!(DpType::try_parse("raw"), Some(DpType::Raw));
        assert_eq!(DpType::try_parse("string"), Some(DpType::String));
        assert_eq!(DpType::try_parse("value"), Some(DpType::Integer));
    }

    #[test]
    fn test_unknown_tag() {
        assert_eq!(DpType::try_parse("boolbool"), None);
        assert_eq!(DpType::try_parse(""), None);
        assert_eq!(DpType::try_parse("integer"), None);
    }

    #[test]
    fn test_display_is_canonical() {
        assert_eq!(DpType::try_parse("value").unwrap().to_string(), "Integer");
    }
}
