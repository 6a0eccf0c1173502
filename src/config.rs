//! Engine configuration.
//!
//! Every field has a product default, so an empty document is a valid
//! configuration. Cell sizes and zoom thresholds are product constants; they
//! are configurable only so a deployment with a different geographic scope
//! can re-derive them.

use crate::color::ColorScale;
use crate::error::{EngineError, Result};
use crate::index::CellSizes;
use crate::render::{Emphasis, RenderMode};
use crate::zoom::ZoomThresholds;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Engine configuration
///
/// # Example
///
/// ```rust
/// use obsgrid::config::Config;
/// use obsgrid::render::RenderMode;
///
/// let config = Config::default();
/// assert_eq!(config.cell_sizes.small, 0.02);
///
/// let json = r#"{
///     "default_mode": "realtime",
///     "zoom_thresholds": { "markers_above": 14.0 }
/// }"#;
/// let config = Config::from_json_str(json).unwrap();
/// assert_eq!(config.default_mode, RenderMode::Realtime);
/// assert_eq!(config.zoom_thresholds.small_above, 10.0);
/// ```
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Config {
    /// Cell side length in degrees for each resolution
    #[serde(default)]
    pub cell_sizes: CellSizes,

    /// Zoom levels separating the tiers
    #[serde(default)]
    pub zoom_thresholds: ZoomThresholds,

    /// Mode a fresh engine starts in
    #[serde(default)]
    pub default_mode: RenderMode,

    /// Count to color mapping
    #[serde(default)]
    pub palette: ColorScale,

    /// Fill opacity and stroke weight for resting and active shapes
    #[serde(default)]
    pub emphasis: Emphasis,
}

impl Config {
    pub fn with_cell_sizes(mut self, cell_sizes: CellSizes) -> Self {
        self.cell_sizes = cell_sizes;
        self
    }

    pub fn with_zoom_thresholds(mut self, thresholds: ZoomThresholds) -> Self {
        self.zoom_thresholds = thresholds;
        self
    }

    pub fn with_default_mode(mut self, mode: RenderMode) -> Self {
        self.default_mode = mode;
        self
    }

    pub fn with_palette(mut self, palette: ColorScale) -> Self {
        self.palette = palette;
        self
    }

    pub fn with_emphasis(mut self, emphasis: Emphasis) -> Self {
        self.emphasis = emphasis;
        self
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        self.cell_sizes.validate()?;
        self.zoom_thresholds.validate()?;
        self.palette.validate()?;

        let e = &self.emphasis;
        let opacities = [e.base_fill_opacity, e.active_fill_opacity];
        if opacities
            .iter()
            .any(|o| !o.is_finite() || !(0.0..=1.0).contains(o))
        {
            return Err(EngineError::InvalidConfig(
                "Fill opacities must lie in [0, 1]".to_string(),
            ));
        }
        let weights = [e.base_stroke_weight, e.active_stroke_weight];
        if weights.iter().any(|w| !w.is_finite() || *w < 0.0) {
            return Err(EngineError::InvalidConfig(
                "Stroke weights must be finite and non-negative".to_string(),
            ));
        }
        Ok(())
    }

    /// Load configuration from JSON string
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Config = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration as JSON string
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Load configuration from TOML string (requires toml feature)
    #[cfg(feature = "toml")]
    pub fn from_toml_str(toml_str: &str) -> Result<Self> {
        let config: Config = toml::from_str(toml_str)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a file, choosing the parser by extension.
    ///
    /// `.toml` files need the `toml` feature; anything else is read as JSON.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)?;
        let is_toml = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("toml"));

        let result = if is_toml {
            Self::parse_toml(&contents)
        } else {
            Self::from_json_str(&contents)
        };
        if let Err(e) = &result {
            log::warn!("Rejected configuration {}: {}", path.display(), e);
        }
        result
    }

    #[cfg(feature = "toml")]
    fn parse_toml(contents: &str) -> Result<Self> {
        Self::from_toml_str(contents)
    }

    #[cfg(not(feature = "toml"))]
    fn parse_toml(_contents: &str) -> Result<Self> {
        Err(EngineError::InvalidConfig(
            "TOML configuration requires the `toml` feature".to_string(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_default_is_valid() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn test_empty_json_uses_defaults() {
        let config = Config::from_json_str("{}").unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_json_round_trip() {
        let config = Config::default().with_default_mode(RenderMode::Realtime);
        let json = config.to_json().unwrap();
        assert_eq!(Config::from_json_str(&json).unwrap(), config);
    }

    #[test]
    fn test_rejects_invalid_values() {
        let json = r#"{ "cell_sizes": { "small": -1.0 } }"#;
        assert!(matches!(
            Config::from_json_str(json),
            Err(EngineError::InvalidCellSize(_))
        ));

        let json = r#"{ "zoom_thresholds": { "small_above": 13.0 } }"#;
        assert!(matches!(
            Config::from_json_str(json),
            Err(EngineError::InvalidConfig(_))
        ));

        let bad = Config::default().with_emphasis(Emphasis {
            active_fill_opacity: 1.5,
            ..Emphasis::default()
        });
        assert!(bad.validate().is_err());
    }

    #[test]
    fn test_malformed_json_is_an_error() {
        assert!(matches!(
            Config::from_json_str("{ nope"),
            Err(EngineError::Json(_))
        ));
    }

    #[test]
    fn test_load_json_file() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, r#"{{ "default_mode": "realtime" }}"#).unwrap();
        let config = Config::load(file.path()).unwrap();
        assert_eq!(config.default_mode, RenderMode::Realtime);
    }

    #[test]
    fn test_load_missing_file() {
        assert!(matches!(
            Config::load("/definitely/not/here.json"),
            Err(EngineError::Io(_))
        ));
    }

    #[cfg(feature = "toml")]
    #[test]
    fn test_load_toml_file() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(file, "default_mode = \"realtime\"").unwrap();
        writeln!(file, "[cell_sizes]").unwrap();
        writeln!(file, "small = 0.01").unwrap();
        let config = Config::load(file.path()).unwrap();
        assert_eq!(config.default_mode, RenderMode::Realtime);
        assert_eq!(config.cell_sizes.small, 0.01);
        assert_eq!(config.cell_sizes.medium, 0.05);
    }
}
