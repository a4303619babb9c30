//! Configuration for annotation generation.

use crate::annotation_types::AnnotationFlags;
use crate::error::{Error, Result};
use serde::Deserialize;

/// Default leading factor between text baselines.
pub const DEFAULT_LINE_SPACING: f64 = 1.2;

/// Control-point ratio for approximating a quarter circle with a cubic Bezier.
pub const CIRCLE_KAPPA: f64 = 0.5522847498;

/// Annotation generation configuration.
///
/// Deserialization validates the values; configurations built with the
/// `with_*` methods are validated by [`crate::Annotator::with_config`].
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(try_from = "ConfigFields")]
pub struct AnnotatorConfig {
    /// Line spacing factor used when a style does not set one.
    pub line_spacing: f64,

    /// Bezier control-point ratio for circles.
    pub circle_kappa: f64,

    /// Flate-compress appearance streams.
    pub compress_streams: bool,

    /// Flags written when the metadata does not set any.
    pub default_flags: AnnotationFlags,
}

impl Default for AnnotatorConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl AnnotatorConfig {
    /// Create new configuration with defaults.
    pub fn new() -> Self {
        Self {
            line_spacing: DEFAULT_LINE_SPACING,
            circle_kappa: CIRCLE_KAPPA,
            compress_streams: false,
            default_flags: AnnotationFlags::PRINT,
        }
    }

    /// Set the default line spacing factor.
    pub fn with_line_spacing(mut self, spacing: f64) -> Self {
        self.line_spacing = spacing;
        self
    }

    /// Set the circle control-point ratio.
    pub fn with_circle_kappa(mut self, kappa: f64) -> Self {
        self.circle_kappa = kappa;
        self
    }

    /// Enable stream compression.
    pub fn with_compress_streams(mut self, enable: bool) -> Self {
        self.compress_streams = enable;
        self
    }

    /// Set the default annotation flags.
    pub fn with_default_flags(mut self, flags: AnnotationFlags) -> Self {
        self.default_flags = flags;
        self
    }

    /// Check that line spacing is positive and kappa lies in `(0, 1]`.
    ///
    /// # Examples
    ///
    /// ```
    /// use pdf_annotate::AnnotatorConfig;
    ///
    /// assert!(AnnotatorConfig::new().validate().is_ok());
    /// assert!(AnnotatorConfig::new().with_line_spacing(-2.0).validate().is_err());
    /// ```
    pub fn validate(&self) -> Result<()> {
        if !self.line_spacing.is_finite() || self.line_spacing <= 0.0 {
            return Err(Error::InvalidConfig(format!(
                "line spacing must be positive, got {}",
                self.line_spacing
            )));
        }
        if !(self.circle_kappa > 0.0 && self.circle_kappa <= 1.0) {
            return Err(Error::InvalidConfig(format!(
                "circle kappa must be in (0, 1], got {}",
                self.circle_kappa
            )));
        }
        Ok(())
    }
}

/// Unvalidated field set read by serde.
#[derive(Deserialize)]
#[serde(default, deny_unknown_fields)]
struct ConfigFields {
    line_spacing: f64,
    circle_kappa: f64,
    compress_streams: bool,
    default_flags: AnnotationFlags,
}

impl Default for ConfigFields {
    fn default() -> Self {
        let config = AnnotatorConfig::new();
        Self {
            line_spacing: config.line_spacing,
            circle_kappa: config.circle_kappa,
            compress_streams: config.compress_streams,
            default_flags: config.default_flags,
        }
    }
}

impl TryFrom<ConfigFields> for AnnotatorConfig {
    type Error = Error;

    fn try_from(fields: ConfigFields) -> Result<Self> {
        let config = AnnotatorConfig {
            line_spacing: fields.line_spacing,
            circle_kappa: fields.circle_kappa,
            compress_streams: fields.compress_streams,
            default_flags: fields.default_flags,
        };
        config.validate()?;
        Ok(config)
    }
}
