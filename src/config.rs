//! Top-level configuration.
//!
//! Centralized, explicitly constructed configuration for the core
//! components; the UI builds one of these at startup and passes it down.

use crate::enrich::EnrichmentConfig;
use crate::Result;
use std::path::PathBuf;

/// Configuration for the note-taking core
#[derive(Clone, Debug)]
pub struct CoreConfig {
    /// Enrichment service configuration
    pub enrichment: EnrichmentConfig,

    /// Location of the local note database
    pub db_path: PathBuf,

    /// Waveform canvas size handed to the render driver
    pub canvas_width: f32,
    pub canvas_height: f32,
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            enrichment: EnrichmentConfig::default(),
            db_path: PathBuf::from("./data/voxnote.sqlite"),
            canvas_width: 320.0,
            canvas_height: 80.0,
        }
    }
}

impl CoreConfig {
    /// Set the enrichment configuration
    pub fn with_enrichment(mut self, enrichment: EnrichmentConfig) -> Self {
        self.enrichment = enrichment;
        self
    }

    /// Set the database location
    pub fn with_db_path(mut self, db_path: impl Into<PathBuf>) -> Self {
        self.db_path = db_path.into();
        self
    }

    /// Set the waveform canvas size
    pub fn with_canvas(mut self, width: f32, height: f32) -> Self {
        self.canvas_width = width;
        self.canvas_height = height;
        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        self.enrichment.validate()?;
        if self.canvas_width <= 0.0 || self.canvas_height <= 0.0 {
            return Err(crate::VoxnoteError::ConfigError(format!(
                "canvas size must be positive, got {}x{}",
                self.canvas_width, self.canvas_height
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        assert!(CoreConfig::default().validate().is_ok());
    }

    #[test]
    fn test_builder_chain() {
        let config = CoreConfig::default()
            .with_db_path("/tmp/notes.sqlite")
            .with_canvas(640.0, 120.0)
            .with_enrichment(EnrichmentConfig::default().with_api_key("sk-test"));

        assert_eq!(config.db_path, PathBuf::from("/tmp/notes.sqlite"));
        assert!(config.enrichment.is_enabled());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_rejects_degenerate_canvas() {
        let config = CoreConfig::default().with_canvas(0.0, 80.0);
        assert!(config.validate().is_err());
    }
}
