//! Linear remapping between a device range and a logical range.

use crate::models::IntegerTypeDefinition;

/// Maps values between a source (device) interval and a target interval.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RemapHelper {
    pub source_min: f64,
    pub source_max: f64,
    pub target_min: f64,
    pub target_max: f64,
}

impl RemapHelper {
    pub fn new(source_min: f64, source_max: f64, target_min: f64, target_max: f64) -> Self {
        Self {
            source_min,
            source_max,
            target_min,
            target_max,
        }
    }

    /// Use the raw `[min, max]` of an integer definition as source interval.
    pub fn from_type_definition(
        definition: &IntegerTypeDefinition,
        target_min: f64,
        target_max: f64,
    ) -> Self {
        Self::new(
            definition.min as f64,
            definition.max as f64,
            target_min,
            target_max,
        )
    }

    /// Source -> target.
    pub fn remap_value_to(&self, value: f64, reverse: bool) -> f64 {
        Self::remap_value(
            value,
            self.source_min,
            self.source_max,
            self.target_min,
            self.target_max,
            reverse,
        )
    }

    /// Target -> source.
    pub fn remap_value_from(&self, value: f64, reverse: bool) -> f64 {
        Self::remap_value(
            value,
            self.target_min,
            self.target_max,
            self.source_min,
            self.source_max,
            reverse,
        )
    }

    /// Linearly remap `value` from `[from_min, from_max]` to `[to_min, to_max]`.
    ///
    /// With `reverse`, the input is mirrored inside its interval first, so
    /// `from_min` maps to `to_max` and `from_max` to `to_min`.
    pub fn remap_value(
        value: f64,
        from_min: f64,
        from_max: f64,
        to_min: f64,
        to_max: f64,
        reverse: bool,
    ) -> f64 {
        let span = from_max - from_min;
        if span == 0.0 {
            return to_min;
        }
        let value = if reverse {
            from_max - value + from_min
        } else {
            value
        };
        ((value - from_min) / span) * (to_max - to_min) + to_min
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_remap_value() {
        assert_eq!(RemapHelper::remap_value(25.0, 0.0, 100.0, 0.0, 255.0, false), 63.75);
        assert_eq!(RemapHelper::remap_value(0.0, 0.0, 100.0, 0.0, 255.0, false), 0.0);
        assert_eq!(RemapHelper::remap_value(100.0, 0.0, 100.0, 0.0, 255.0, false), 255.0);
    }

    #[test]
    fn test_remap_value_reverse() {
        assert_eq!(RemapHelper::remap_value(25.0, 0.0, 100.0, 0.0, 255.0, true), 191.25);
        assert_eq!(RemapHelper::remap_value(0.0, 0.0, 100.0, 0.0, 255.0, true), 255.0);
        assert_eq!(RemapHelper::remap_value(100.0, 0.0, 100.0, 0.0, 255.0, true), 0.0);
    }

    #[test]
    fn test_degenerate_interval() {
        assert_eq!(RemapHelper::remap_value(5.0, 10.0, 10.0, 0.0, 100.0, false), 0.0);
    }

    #[test]
    fn test_from_type_definition() {
        let definition = IntegerTypeDefinition::new("percent_control", 0, 1000, 1, 1);
        let helper = RemapHelper::from_type_definition(&definition, 0.0, 100.0);
        assert_eq!(helper.remap_value_to(500.0, false), 50.0);
        assert_eq!(helper.remap_value_from(50.0, false), 500.0);
        assert_eq!(helper.remap_value_to(250.0, true), 75.0);
        assert_eq!(helper.remap_value_from(75.0, true), 250.0);
    }
}
