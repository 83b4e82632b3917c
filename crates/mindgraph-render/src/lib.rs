#![forbid(unsafe_code)]

//! Layout/theme resolution and Graphviz rendering for normalized mind maps.

pub mod config;
pub mod dot;
pub mod error;
pub mod graphviz;
pub mod theme;

pub use config::{LayoutEngine, LayoutMode, RenderConfig, resolve};
pub use dot::to_dot;
pub use error::{Error, Result};
pub use graphviz::{
    DEFAULT_DPI, GRAPHVIZ_BIN_DIR_ENV, GraphRenderer, GraphvizRenderer, ImageFormat,
    RenderOptions,
};
pub use theme::{DEFAULT_THEME, Theme};

use mindgraph_core::NormalizedMindMap;

/// Draws a normalized mind map with `renderer`, returning the encoded image bytes.
pub fn render(
    graph: &NormalizedMindMap,
    config: &RenderConfig,
    options: &RenderOptions,
    renderer: &dyn GraphRenderer,
) -> Result<Vec<u8>> {
    let dot = to_dot(graph, config, options.dpi);
    let bytes = renderer.render_dot(&dot, config.engine, options)?;
    tracing::debug!(
        bytes = bytes.len(),
        theme = config.theme_name(),
        layout = config.layout_name(),
        "rendered mind map"
    );
    Ok(bytes)
}
