//! Extended Graphics State (ExtGState) for annotation transparency.
//!
//! # Example
//!
//! ```
//! use pdf_annotate::writer::graphics_state::ExtGStateBuilder;
//!
//! let gs = ExtGStateBuilder::new()
//!     .fill_alpha(0.5)
//!     .stroke_alpha(0.8)
//!     .build();
//! assert_eq!(gs.get("ca").and_then(|o| o.as_number()), Some(0.5));
//! ```

use crate::object::Object;
use std::collections::HashMap;

/// Stroke and fill opacity pair keying a graphics-state resource.
///
/// Alphas are compared bit-for-bit after folding `-0.0` into `0.0`, so two
/// states are shared only when both values are numerically equal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AlphaState {
    stroke_bits: u64,
    fill_bits: u64,
}

impl AlphaState {
    /// Create an alpha pair.
    pub fn new(stroke: f64, fill: f64) -> Self {
        Self {
            stroke_bits: alpha_bits(stroke),
            fill_bits: alpha_bits(fill),
        }
    }

    /// Stroke opacity (`CA`).
    pub fn stroke(&self) -> f64 {
        f64::from_bits(self.stroke_bits)
    }

    /// Fill opacity (`ca`).
    pub fn fill(&self) -> f64 {
        f64::from_bits(self.fill_bits)
    }

    /// True when either opacity is below 1 and a `gs` operator is needed.
    pub fn is_translucent(&self) -> bool {
        self.stroke() < 1.0 || self.fill() < 1.0
    }

    /// ExtGState dictionary for this pair.
    pub fn to_object(&self) -> Object {
        ExtGStateBuilder::new()
            .stroke_alpha(self.stroke())
            .fill_alpha(self.fill())
            .build()
    }
}

fn alpha_bits(alpha: f64) -> u64 {
    // -0.0 == 0.0 but their bit patterns differ
    if alpha == 0.0 {
        0.0f64.to_bits()
    } else {
        alpha.to_bits()
    }
}

/// Builder for Extended Graphics State dictionaries.
#[derive(Debug, Clone, Default)]
pub struct ExtGStateBuilder {
    /// Fill alpha (ca) - 0.0 to 1.0
    fill_alpha: Option<f64>,
    /// Stroke alpha (CA) - 0.0 to 1.0
    stroke_alpha: Option<f64>,
}

impl ExtGStateBuilder {
    /// Create a new ExtGState builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set fill alpha (opacity for fill operations).
    ///
    /// Value should be between 0.0 (fully transparent) and 1.0 (fully opaque).
    pub fn fill_alpha(mut self, alpha: f64) -> Self {
        self.fill_alpha = Some(alpha.clamp(0.0, 1.0));
        self
    }

    /// Set stroke alpha (opacity for stroke operations).
    pub fn stroke_alpha(mut self, alpha: f64) -> Self {
        self.stroke_alpha = Some(alpha.clamp(0.0, 1.0));
        self
    }

    /// Build the ExtGState dictionary as a PDF Object.
    pub fn build(&self) -> Object {
        let mut dict: HashMap<String, Object> = HashMap::new();
        dict.insert("Type".to_string(), Object::Name("ExtGState".to_string()));

        if let Some(alpha) = self.fill_alpha {
            dict.insert("ca".to_string(), Object::Real(alpha));
        }
        if let Some(alpha) = self.stroke_alpha {
            dict.insert("CA".to_string(), Object::Real(alpha));
        }

        Object::Dictionary(dict)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ext_gstate_builder_alpha() {
        let gs = ExtGStateBuilder::new().fill_alpha(0.5).stroke_alpha(0.8).build();

        if let Object::Dictionary(dict) = gs {
            assert_eq!(dict.get("ca"), Some(&Object::Real(0.5)));
            assert_eq!(dict.get("CA"), Some(&Object::Real(0.8)));
            assert_eq!(dict.get("Type"), Some(&Object::Name("ExtGState".to_string())));
        } else {
            panic!("Expected dictionary");
        }
    }

    #[test]
    fn test_alpha_is_clamped() {
        let gs = ExtGStateBuilder::new().fill_alpha(1.7).build();
        assert_eq!(gs.get("ca"), Some(&Object::Real(1.0)));
        assert!(gs.get("CA").is_none());
    }

    #[test]
    fn test_alpha_state_identity() {
        assert_eq!(AlphaState::new(0.5, 1.0), AlphaState::new(0.5, 1.0));
        assert_ne!(AlphaState::new(0.5, 1.0), AlphaState::new(1.0, 0.5));
        assert!(AlphaState::new(1.0, 0.3).is_translucent());
        assert!(!AlphaState::new(1.0, 1.0).is_translucent());
    }

    #[test]
    fn test_negative_zero_shares_state() {
        use std::collections::HashSet;

        assert_eq!(AlphaState::new(-0.0, 0.5), AlphaState::new(0.0, 0.5));
        let states: HashSet<_> = [AlphaState::new(0.0, -0.0), AlphaState::new(-0.0, 0.0)].into_iter().collect();
        assert_eq!(states.len(), 1);
        assert_eq!(AlphaState::new(-0.0, 1.0).stroke().to_bits(), 0.0f64.to_bits());
    }

    #[test]
    fn test_alpha_state_object() {
        let obj = AlphaState::new(0.25, 0.75).to_object();
        assert_eq!(obj.get("CA").and_then(|o| o.as_number()), Some(0.25));
        assert_eq!(obj.get("ca").and_then(|o| o.as_number()), Some(0.75));
    }
}
