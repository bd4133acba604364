//! Serializable export configuration.
//!
//! An [`ExportConfig`] describes one export independently of the screen that
//! triggered it: which variant, whether the chosen background is baked in,
//! and the output format. It serializes to JSON so a browser host can hand
//! it across the wasm boundary.
//!
//! # Example
//!
//! ```
//! use logoshift::{ExportConfig, ExportFormat, Variant};
//!
//! let config = ExportConfig::new(Variant::Black, ExportFormat::Svg).with_background(true);
//! let json = config.to_json().unwrap();
//! assert_eq!(ExportConfig::from_json(&json).unwrap(), config);
//! ```

use serde::{Deserialize, Serialize};

use crate::color::Background;
use crate::encode::ExportFormat;
use crate::transform::Variant;

/// Settings for a single export.
///
/// # JSON Format
///
/// ```json
/// {
///   "variant": "black",
///   "includeBackground": true,
///   "format": "svg"
/// }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportConfig {
    /// Which logo variant to export.
    #[serde(default)]
    pub variant: Variant,

    /// Whether the chosen background color is painted behind the logo.
    #[serde(default)]
    pub include_background: bool,

    /// Output format.
    #[serde(default)]
    pub format: ExportFormat,
}

impl ExportConfig {
    pub fn new(variant: Variant, format: ExportFormat) -> Self {
        Self {
            variant,
            include_background: false,
            format,
        }
    }

    pub fn with_background(mut self, include: bool) -> Self {
        self.include_background = include;
        self
    }

    /// The background actually used for this export.
    ///
    /// Returns `chosen` when the background is included and
    /// [`Background::Transparent`] otherwise.
    pub fn background(&self, chosen: Background) -> Background {
        if self.include_background {
            chosen
        } else {
            Background::Transparent
        }
    }

    /// Suggested download name: `<stem>_<variant>_<with_bg|transparent>.<ext>`.
    pub fn file_name(&self, stem: &str) -> String {
        let bg = if self.include_background {
            "with_bg"
        } else {
            "transparent"
        };
        format!(
            "{}_{}_{}.{}",
            stem,
            self.variant.label(),
            bg,
            self.format.extension()
        )
    }

    /// Serializes the config to a JSON string.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Serializes the config to a pretty-printed JSON string.
    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Deserializes a config from a JSON string.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Color;

    #[test]
    fn config_serialization_roundtrip() {
        let config = ExportConfig::new(Variant::Custom(Color::new(0x11, 0x22, 0x33)), ExportFormat::Pdf)
            .with_background(true);

        let json = config.to_json().unwrap();
        let restored = ExportConfig::from_json(&json).unwrap();
        assert_eq!(restored, config);
    }

    #[test]
    fn config_json_format() {
        let config = ExportConfig::new(Variant::Threshold, ExportFormat::Jpeg).with_background(true);
        let json = config.to_json_pretty().unwrap();

        assert!(json.contains("\"variant\": \"bw\""));
        assert!(json.contains("\"includeBackground\": true"));
        assert!(json.contains("\"format\": \"jpg\""));
    }

    #[test]
    fn empty_config_deserializes_to_defaults() {
        let config = ExportConfig::from_json("{}").unwrap();
        assert_eq!(config, ExportConfig::default());
        assert_eq!(config.variant, Variant::Original);
        assert!(!config.include_background);
        assert_eq!(config.format, ExportFormat::Png);
    }

    #[test]
    fn invalid_variant_is_rejected() {
        assert!(ExportConfig::from_json(r#"{"variant":"sepia"}"#).is_err());
    }

    #[test]
    fn background_resolution() {
        let chosen = Background::Solid(Color::BLACK);
        let config = ExportConfig::new(Variant::White, ExportFormat::Png);
        assert_eq!(config.background(chosen), Background::Transparent);
        assert_eq!(config.with_background(true).background(chosen), chosen);
    }

    #[test]
    fn file_names() {
        let config = ExportConfig::new(Variant::Threshold, ExportFormat::Svg);
        assert_eq!(config.file_name("logo"), "logo_bw_transparent.svg");

        let config = ExportConfig::new(Variant::Black, ExportFormat::Jpeg).with_background(true);
        assert_eq!(config.file_name("logo"), "logo_black_with_bg.jpg");

        let config = ExportConfig::new(Variant::Original, ExportFormat::Png).with_background(true);
        assert_eq!(config.file_name("logo"), "logo_color_with_bg.png");
    }
}
