//! Engine builder for flexible configuration
//!
//! This module provides a builder pattern for creating engines with a custom
//! configuration, starting mode and starting zoom.

use crate::config::Config;
use crate::engine::LodEngine;
use crate::error::Result;
use crate::render::RenderMode;
use std::path::Path;

/// Builder for engine configuration.
#[derive(Debug, Default)]
pub struct EngineBuilder {
    config: Config,
    mode: Option<RenderMode>,
    initial_zoom: Option<f64>,
}

impl EngineBuilder {
    /// Create a new builder with the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the engine configuration.
    pub fn config(mut self, config: Config) -> Self {
        self.config = config;
        self
    }

    /// Read the configuration from a JSON or TOML file.
    pub fn config_file<P: AsRef<Path>>(mut self, path: P) -> Result<Self> {
        self.config = Config::load(path)?;
        Ok(self)
    }

    /// Start in `mode` instead of the configured default.
    pub fn mode(mut self, mode: RenderMode) -> Self {
        self.mode = Some(mode);
        self
    }

    /// Zoom level to assume until the first settle event arrives.
    pub fn initial_zoom(mut self, zoom: f64) -> Self {
        self.initial_zoom = Some(zoom);
        self
    }

    /// Build the engine. Fails only on an invalid configuration.
    pub fn build(self) -> Result<LodEngine> {
        self.config.validate()?;
        let mut engine = LodEngine::from_parts(self.config, self.initial_zoom.unwrap_or(0.0));
        if let Some(mode) = self.mode {
            engine.set_mode(mode);
        }
        Ok(engine)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::CellSizes;
    use crate::zoom::ZoomTier;

    #[test]
    fn test_builder_default() {
        let engine = EngineBuilder::new().build().unwrap();
        assert_eq!(engine.mode(), RenderMode::Aggregate);
        assert_eq!(engine.tier(), ZoomTier::ExtraLarge);
    }

    #[test]
    fn test_builder_overrides() {
        let engine = EngineBuilder::new()
            .config(Config::default().with_default_mode(RenderMode::Aggregate))
            .mode(RenderMode::Realtime)
            .initial_zoom(11.0)
            .build()
            .unwrap();
        assert_eq!(engine.mode(), RenderMode::Realtime);
        assert_eq!(engine.tier(), ZoomTier::Small);
    }

    #[test]
    fn test_builder_rejects_invalid_config() {
        let config = Config::default().with_cell_sizes(CellSizes {
            small: 1.0,
            medium: 0.5,
            large: 2.0,
            extra_large: 3.0,
        });
        assert!(EngineBuilder::new().config(config).build().is_err());
    }

    #[test]
    fn test_builder_with_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("obsgrid.json");
        std::fs::write(&path, r#"{ "default_mode": "realtime" }"#).unwrap();

        let engine = EngineBuilder::new()
            .config_file(&path)
            .unwrap()
            .build()
            .unwrap();
        assert_eq!(engine.mode(), RenderMode::Realtime);
    }
}
