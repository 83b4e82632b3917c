#![forbid(unsafe_code)]

//! `mindgraph` turns a concept tree (title → categories → nested subcategories) into a styled
//! mind map image plus the structural metadata a client needs to rebuild it interactively.
//!
//! Pipeline: validate → normalize → resolve theme/layout → write DOT → Graphviz → package.
//!
//! ```no_run
//! use mindgraph::{GeneratorOptions, MindMapGenerator, MindMapSpec};
//!
//! let spec = MindMapSpec::from_json_str(r#"{
//!     "title": {"text": "Brains vs Computers", "description": "..."},
//!     "categories": [{"text": "Neurons", "description": "..."}]
//! }"#)?;
//! let generator = MindMapGenerator::new(GeneratorOptions::default().with_layout("radial"));
//! let result = generator.generate(&spec)?;
//! println!("{}", serde_json::to_string(&result.metadata).unwrap());
//! # Ok::<(), mindgraph::Error>(())
//! ```

pub mod options;
pub mod package;

pub use mindgraph_core::{
    CategoryLegend, ConceptNode, IdStrategy, MindMapMetadata, MindMapSpec, NormalizedMindMap,
    derive_id, generate_colors,
};
pub use mindgraph_render::{
    GraphRenderer, GraphvizRenderer, ImageFormat, LayoutEngine, LayoutMode, RenderConfig, resolve,
};
pub use options::GeneratorOptions;
pub use package::{MindMapResult, package, package_metadata_only};

use mindgraph_core::NormalizeOptions;
use serde_json::Value;
use std::sync::Arc;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Input tree problems: re-generate the input rather than retrying.
    #[error(transparent)]
    Spec(#[from] mindgraph_core::Error),
    /// Engine problems: retry later or degrade to metadata-only output.
    #[error(transparent)]
    Render(#[from] mindgraph_render::Error),
    #[error("invalid generator options: {message}")]
    InvalidOptions { message: String },
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// The tree parsed but has the wrong shape (missing field, wrong type, empty text).
    pub fn is_malformed_spec(&self) -> bool {
        matches!(self, Self::Spec(e) if e.is_malformed_spec())
    }

    /// Any problem with the input itself, including text that is not JSON at all.
    pub fn is_input_error(&self) -> bool {
        matches!(self, Self::Spec(_))
    }

    pub fn is_render_unavailable(&self) -> bool {
        matches!(self, Self::Render(e) if e.is_render_unavailable())
    }
}

pub type Result<T> = std::result::Result<T, Error>;

/// Bundles options and a renderer. Holds no per-request state, so one instance can serve
/// concurrent requests.
#[derive(Clone)]
pub struct MindMapGenerator {
    options: GeneratorOptions,
    renderer: Arc<dyn GraphRenderer + Send + Sync>,
}

impl Default for MindMapGenerator {
    fn default() -> Self {
        Self::new(GeneratorOptions::default())
    }
}

impl std::fmt::Debug for MindMapGenerator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MindMapGenerator")
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

impl MindMapGenerator {
    /// Uses Graphviz from `options.graphviz_bin_dir`, else `MINDGRAPH_GRAPHVIZ_BIN_DIR`, else `PATH`.
    pub fn new(options: GeneratorOptions) -> Self {
        let renderer = match &options.graphviz_bin_dir {
            Some(dir) => GraphvizRenderer::new().with_bin_dir(Some(dir.clone())),
            None => GraphvizRenderer::from_env(),
        };
        Self {
            options,
            renderer: Arc::new(renderer),
        }
    }

    pub fn with_renderer(mut self, renderer: Arc<dyn GraphRenderer + Send + Sync>) -> Self {
        self.renderer = renderer;
        self
    }

    pub fn options(&self) -> &GeneratorOptions {
        &self.options
    }

    /// Theme/layout resolution for the configured names (with fallback applied).
    pub fn config(&self) -> RenderConfig {
        resolve(&self.options.theme, &self.options.layout)
    }

    pub fn normalize(&self, spec: &MindMapSpec) -> Result<NormalizedMindMap> {
        Ok(mindgraph_core::normalize(
            spec,
            NormalizeOptions {
                id_strategy: self.options.id_strategy,
            },
        )?)
    }

    /// DOT source for `spec`, without invoking any engine.
    pub fn dot(&self, spec: &MindMapSpec) -> Result<String> {
        self.options.validate()?;
        let graph = self.normalize(spec)?;
        Ok(mindgraph_render::to_dot(
            &graph,
            &self.config(),
            self.options.dpi,
        ))
    }

    /// Runs the full pipeline. Malformed input fails before anything is rendered.
    pub fn generate(&self, spec: &MindMapSpec) -> Result<MindMapResult> {
        self.options.validate()?;
        let graph = self.normalize(spec)?;
        let config = self.config();
        let bytes = mindgraph_render::render(
            &graph,
            &config,
            &self.options.render_options(),
            self.renderer.as_ref(),
        )?;
        Ok(package(
            &bytes,
            self.options.format,
            graph.metadata,
            config.theme_name(),
            config.layout_name(),
        ))
    }

    /// Like [`MindMapGenerator::generate`], but an unavailable renderer yields a metadata-only
    /// result instead of an error. Input errors and other render errors still fail.
    pub fn generate_or_degrade(&self, spec: &MindMapSpec) -> Result<MindMapResult> {
        match self.generate(spec) {
            Err(err) if err.is_render_unavailable() => {
                tracing::warn!(error = %err, "renderer unavailable; returning metadata only");
                let graph = self.normalize(spec)?;
                let config = self.config();
                Ok(package_metadata_only(
                    self.options.format,
                    graph.metadata,
                    config.theme_name(),
                    config.layout_name(),
                ))
            }
            other => other,
        }
    }

    /// Validates an untyped value (e.g. parsed model output) and runs the pipeline.
    pub fn generate_value(&self, value: &Value) -> Result<MindMapResult> {
        let spec = MindMapSpec::from_value(value)?;
        self.generate(&spec)
    }

    /// Runtime-agnostic async wrapper. The work is synchronous (including the Graphviz process),
    /// so callers on an async runtime should impose their own deadline or run it on a blocking
    /// pool.
    pub async fn generate_async(&self, spec: &MindMapSpec) -> Result<MindMapResult> {
        self.generate(spec)
    }
}

/// One-shot convenience: generate a mind map with `options`.
pub fn create_mind_map(spec: &MindMapSpec, options: GeneratorOptions) -> Result<MindMapResult> {
    MindMapGenerator::new(options).generate(spec)
}
