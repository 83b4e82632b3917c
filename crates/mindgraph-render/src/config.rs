//! Theme + layout resolution.
//!
//! Everything layout-dependent is decided here, once, and handed to the DOT writer as an
//! immutable [`RenderConfig`].

use crate::theme::{Theme, default_theme, theme_by_name};
use mindgraph_core::ROOT_ID;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LayoutMode {
    /// Ranked, left to right.
    #[default]
    Horizontal,
    /// Ranked, top to bottom, with roomier nodes and heavier strokes.
    Vertical,
    /// Relaxation layout anchored at the root.
    Radial,
    /// Relaxation layout with invisible spreading edges.
    Force,
}

impl LayoutMode {
    pub const ALL: [LayoutMode; 4] = [
        LayoutMode::Horizontal,
        LayoutMode::Vertical,
        LayoutMode::Radial,
        LayoutMode::Force,
    ];

    pub fn from_name(name: &str) -> Option<Self> {
        let name = name.trim();
        Self::ALL
            .into_iter()
            .find(|m| m.as_str().eq_ignore_ascii_case(name))
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Horizontal => "horizontal",
            Self::Vertical => "vertical",
            Self::Radial => "radial",
            Self::Force => "force",
        }
    }

    pub fn engine(self) -> LayoutEngine {
        match self {
            Self::Horizontal | Self::Vertical => LayoutEngine::Dot,
            Self::Radial | Self::Force => LayoutEngine::Neato,
        }
    }

    pub fn rank_dir(self) -> Option<RankDir> {
        match self {
            Self::Horizontal => Some(RankDir::LeftRight),
            Self::Vertical => Some(RankDir::TopBottom),
            Self::Radial | Self::Force => None,
        }
    }
}

impl std::fmt::Display for LayoutMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Graphviz layout program.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayoutEngine {
    Dot,
    Neato,
}

impl LayoutEngine {
    pub fn program(self) -> &'static str {
        match self {
            Self::Dot => "dot",
            Self::Neato => "neato",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RankDir {
    LeftRight,
    TopBottom,
}

impl RankDir {
    pub fn as_dot(self) -> &'static str {
        match self {
            Self::LeftRight => "LR",
            Self::TopBottom => "TB",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct GraphStyle {
    pub background: &'static str,
    pub font_color: &'static str,
    pub font_name: &'static str,
    pub margin: f64,
    pub overlap: bool,
    pub splines: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NodeStyle {
    pub shape: &'static str,
    pub style: &'static str,
    pub fill: &'static str,
    pub stroke: &'static str,
    pub font_color: &'static str,
    pub font_name: &'static str,
    pub font_size: f64,
    /// Graphviz `margin`, `"x,y"` in inches.
    pub margin: &'static str,
    pub width: f64,
    pub height: f64,
    pub pen_width: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EdgeStyle {
    pub color: &'static str,
    pub font_color: &'static str,
    pub font_name: &'static str,
    pub font_size: f64,
    pub pen_width: f64,
    /// Preferred edge length (relaxation engines only).
    pub len: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RenderConfig {
    pub theme: Theme,
    pub layout: LayoutMode,
    pub engine: LayoutEngine,
    pub rank_dir: Option<RankDir>,
    pub graph: GraphStyle,
    /// Defaults shared by category and subcategory nodes.
    pub node: NodeStyle,
    pub root: NodeStyle,
    pub edge: EdgeStyle,
    /// Pen width of root-to-category edges.
    pub category_edge_pen_width: f64,
    /// Node the relaxation engine should treat as the layout center.
    pub layout_root: Option<&'static str>,
    /// Chain every node to the next one (in creation order) with invisible, non-constraining
    /// edges to spread the relaxation layout out.
    pub spread_edges: bool,
}

impl RenderConfig {
    pub fn theme_name(&self) -> &'static str {
        self.theme.name
    }

    pub fn layout_name(&self) -> &'static str {
        self.layout.as_str()
    }
}

const FONT_NAME: &str = "Arial";

/// Resolves a theme and layout by name. Unknown names fall back to the default theme and the
/// horizontal layout; this never fails.
pub fn resolve(theme: &str, layout: &str) -> RenderConfig {
    let resolved_theme = theme_by_name(theme).unwrap_or_else(|| {
        tracing::warn!(requested = theme, fallback = default_theme().name, "unknown theme");
        default_theme()
    });
    let resolved_layout = LayoutMode::from_name(layout).unwrap_or_else(|| {
        tracing::warn!(requested = layout, fallback = "horizontal", "unknown layout");
        LayoutMode::Horizontal
    });
    resolve_with(*resolved_theme, resolved_layout)
}

/// Builds the config for an already-resolved theme and layout.
pub fn resolve_with(theme: Theme, layout: LayoutMode) -> RenderConfig {
    let roomy = layout == LayoutMode::Vertical;
    let (node_margin, pen_width, edge_len) = if roomy {
        ("0.6,0.5", 2.0, 0.8)
    } else {
        ("0.4,0.3", 1.5, 0.05)
    };

    let node = NodeStyle {
        shape: "box",
        style: "rounded,filled",
        fill: theme.node_fill,
        stroke: theme.node_fill,
        font_color: theme.text,
        font_name: FONT_NAME,
        font_size: 14.0,
        margin: node_margin,
        width: 3.0,
        height: 0.6,
        pen_width,
    };

    let root = NodeStyle {
        fill: theme.root_fill,
        stroke: theme.root_fill,
        font_color: theme.root_text,
        font_size: 18.0,
        width: 3.5,
        height: 1.5,
        pen_width: 2.0,
        ..node.clone()
    };

    let edge = EdgeStyle {
        color: theme.edge,
        font_color: theme.text,
        font_name: FONT_NAME,
        font_size: 12.0,
        pen_width,
        len: edge_len,
    };

    tracing::debug!(theme = theme.name, layout = layout.as_str(), "resolved render config");

    RenderConfig {
        theme,
        layout,
        engine: layout.engine(),
        rank_dir: layout.rank_dir(),
        graph: GraphStyle {
            background: theme.background,
            font_color: theme.text,
            font_name: FONT_NAME,
            margin: 0.2,
            overlap: false,
            splines: true,
        },
        node,
        root,
        edge,
        category_edge_pen_width: 2.0,
        layout_root: (layout == LayoutMode::Radial).then_some(ROOT_ID),
        spread_edges: layout == LayoutMode::Force,
    }
}
