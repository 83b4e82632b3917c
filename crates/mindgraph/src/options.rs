use crate::{Error, Result};
use mindgraph_core::IdStrategy;
use mindgraph_render::graphviz::{DEFAULT_ARTIFACT_NAME, DEFAULT_DPI};
use mindgraph_render::{DEFAULT_THEME, ImageFormat, RenderOptions};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Caller-facing configuration for one generator.
///
/// Every field has a default, so a JSON config file only needs the keys it changes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorOptions {
    /// Theme name; unknown names fall back to the default theme.
    pub theme: String,
    /// Layout name; unknown names fall back to `horizontal`.
    pub layout: String,
    pub dpi: u32,
    /// Base name of the transient render artifact.
    pub output_filename: String,
    pub format: ImageFormat,
    pub id_strategy: IdStrategy,
    /// Directory holding `dot`/`neato`. Falls back to `MINDGRAPH_GRAPHVIZ_BIN_DIR`, then `PATH`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub graphviz_bin_dir: Option<PathBuf>,
}

impl Default for GeneratorOptions {
    fn default() -> Self {
        Self {
            theme: DEFAULT_THEME.to_string(),
            layout: "horizontal".to_string(),
            dpi: DEFAULT_DPI,
            output_filename: DEFAULT_ARTIFACT_NAME.to_string(),
            format: ImageFormat::Png,
            id_strategy: IdStrategy::Text,
            graphviz_bin_dir: None,
        }
    }
}

impl GeneratorOptions {
    pub fn with_theme(mut self, theme: impl Into<String>) -> Self {
        self.theme = theme.into();
        self
    }

    pub fn with_layout(mut self, layout: impl Into<String>) -> Self {
        self.layout = layout.into();
        self
    }

    pub fn with_dpi(mut self, dpi: u32) -> Self {
        self.dpi = dpi;
        self
    }

    pub fn with_format(mut self, format: ImageFormat) -> Self {
        self.format = format;
        self
    }

    pub fn with_id_strategy(mut self, id_strategy: IdStrategy) -> Self {
        self.id_strategy = id_strategy;
        self
    }

    pub fn with_output_filename(mut self, output_filename: impl Into<String>) -> Self {
        self.output_filename = output_filename.into();
        self
    }

    /// Loads options from a JSON file; missing keys keep their defaults.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        let options: Self = serde_json::from_str(&text).map_err(|e| Error::InvalidOptions {
            message: format!("{}: {e}", path.display()),
        })?;
        options.validate()?;
        Ok(options)
    }

    pub fn validate(&self) -> Result<()> {
        if self.dpi == 0 {
            return Err(Error::InvalidOptions {
                message: "dpi must be a positive integer".to_string(),
            });
        }
        Ok(())
    }

    pub(crate) fn render_options(&self) -> RenderOptions {
        RenderOptions {
            dpi: self.dpi,
            format: self.format,
            artifact_name: self.output_filename.clone(),
            artifact_dir: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let options = GeneratorOptions::default();
        assert_eq!(options.theme, "dark");
        assert_eq!(options.layout, "horizontal");
        assert_eq!(options.dpi, 300);
        assert_eq!(options.output_filename, "mind_map");
        assert_eq!(options.format, ImageFormat::Png);
        assert_eq!(options.id_strategy, IdStrategy::Text);
        assert!(options.validate().is_ok());
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let options: GeneratorOptions =
            serde_json::from_str(r#"{"layout": "radial", "id_strategy": "parent_path"}"#).unwrap();
        assert_eq!(options.layout, "radial");
        assert_eq!(options.id_strategy, IdStrategy::ParentPath);
        assert_eq!(options.theme, "dark");
        assert_eq!(options.dpi, 300);
    }

    #[test]
    fn zero_dpi_is_rejected() {
        let err = GeneratorOptions::default().with_dpi(0).validate().unwrap_err();
        assert!(matches!(err, Error::InvalidOptions { .. }));
    }

    #[test]
    fn config_file_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("mindgraph.json");
        std::fs::write(&path, r#"{"theme": "green", "dpi": 150, "format": "svg"}"#).unwrap();
        let options = GeneratorOptions::from_json_file(&path).unwrap();
        assert_eq!(options.theme, "green");
        assert_eq!(options.dpi, 150);
        assert_eq!(options.format, ImageFormat::Svg);

        std::fs::write(&path, r#"{"dpi": 0}"#).unwrap();
        assert!(GeneratorOptions::from_json_file(&path).is_err());
    }
}
