//! Flattens a concept tree into drawable nodes, edges and client metadata.

use crate::id::{IdStrategy, ROOT_ID};
use crate::palette::generate_colors;
use crate::spec::{ConceptNode, MindMapSpec};
use crate::{Error, Result};
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Descriptions up to this many characters are shown in full on the node.
pub const DESCRIPTION_DISPLAY_LIMIT: usize = 60;
const TRUNCATED_PREFIX_LEN: usize = 57;
const ELLIPSIS: &str = "...";

const ROOT_FONT_SIZE: f64 = 18.0;
const CATEGORY_FONT_SIZE: f64 = 16.0;
const MIN_FONT_SIZE: f64 = 12.0;
const FONT_STEP_PER_LEVEL: f64 = 0.5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeKind {
    Root,
    Category,
    Subcategory,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderedNode {
    pub id: String,
    pub kind: NodeKind,
    /// 0 for the root, 1 for categories, and so on.
    pub depth: usize,
    pub text: String,
    /// Description as drawn on the node (possibly truncated).
    pub label_description: String,
    /// Full description, used for the hover tooltip.
    pub tooltip: String,
    /// Category lineage color. `None` for the root, which takes its fill from the theme.
    pub color: Option<String>,
    pub font_size: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenderedEdge {
    pub source: String,
    pub target: String,
    pub tooltip: String,
    /// Root-to-category edges are drawn thicker.
    pub emphasized: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryLegend {
    pub id: String,
    pub text: String,
    pub color: String,
}

/// Structural part of the result, used by clients to rebuild an interactive graph.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MindMapMetadata {
    pub all_nodes: Vec<String>,
    pub node_relationships: Vec<(String, String)>,
    pub categories: Vec<CategoryLegend>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NormalizedMindMap {
    pub nodes: Vec<RenderedNode>,
    pub edges: Vec<RenderedEdge>,
    pub metadata: MindMapMetadata,
}

impl NormalizedMindMap {
    pub fn root(&self) -> &RenderedNode {
        &self.nodes[0]
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NormalizeOptions {
    pub id_strategy: IdStrategy,
}

/// On-node form of a description: unchanged up to the display limit, otherwise a prefix plus
/// `...`. The full text is kept separately as the tooltip.
///
/// Lengths are counted in characters, not bytes.
pub fn display_description(description: &str) -> String {
    if description.chars().count() <= DESCRIPTION_DISPLAY_LIMIT {
        return description.to_string();
    }
    let mut out: String = description.chars().take(TRUNCATED_PREFIX_LEN).collect();
    out.push_str(ELLIPSIS);
    out
}

fn font_size_for_depth(depth: usize) -> f64 {
    match depth {
        0 => ROOT_FONT_SIZE,
        1 => CATEGORY_FONT_SIZE,
        d => (CATEGORY_FONT_SIZE - FONT_STEP_PER_LEVEL * (d - 1) as f64).max(MIN_FONT_SIZE),
    }
}

/// Validates untyped input and normalizes it.
pub fn normalize_value(value: &Value, options: NormalizeOptions) -> Result<NormalizedMindMap> {
    let spec = MindMapSpec::from_value(value)?;
    normalize(&spec, options)
}

/// Normalizes a typed spec.
///
/// The whole tree is checked before anything is emitted, so a failure never yields partial
/// output. Traversal is depth-first in input sibling order; the same input always produces the
/// same node and relationship ordering.
pub fn normalize(spec: &MindMapSpec, options: NormalizeOptions) -> Result<NormalizedMindMap> {
    check_labels(spec)?;

    let mut acc = Accumulator::with_capacity(spec.node_count());
    acc.push_root(&spec.title);

    let colors = generate_colors(spec.categories.len(), None);

    struct Frame<'a> {
        concept: &'a ConceptNode,
        parent_id: String,
        depth: usize,
        color: &'a str,
    }

    let mut stack: Vec<Frame<'_>> = Vec::new();
    for (category, color) in spec.categories.iter().zip(colors.iter()).rev() {
        stack.push(Frame {
            concept: category,
            parent_id: ROOT_ID.to_string(),
            depth: 1,
            color,
        });
    }

    while let Some(frame) = stack.pop() {
        let id = options
            .id_strategy
            .node_id(&frame.parent_id, &frame.concept.text);
        acc.push_child(frame.concept, &id, &frame.parent_id, frame.depth, frame.color);

        for child in frame.concept.subcategories.iter().rev() {
            stack.push(Frame {
                concept: child,
                parent_id: id.clone(),
                depth: frame.depth + 1,
                color: frame.color,
            });
        }
    }

    tracing::debug!(
        nodes = acc.nodes.len(),
        edges = acc.edges.len(),
        categories = acc.metadata.categories.len(),
        "normalized mind map"
    );

    Ok(NormalizedMindMap {
        nodes: acc.nodes,
        edges: acc.edges,
        metadata: acc.metadata,
    })
}

fn check_labels(spec: &MindMapSpec) -> Result<()> {
    if spec.title.text.trim().is_empty() {
        return Err(Error::malformed("title.text", "text must not be empty"));
    }

    // Pre-order, so the reported path is the first offending node in input order.
    let mut stack: Vec<(&ConceptNode, String)> = spec
        .categories
        .iter()
        .enumerate()
        .rev()
        .map(|(i, category)| (category, format!("categories[{i}]")))
        .collect();
    while let Some((node, path)) = stack.pop() {
        if node.text.trim().is_empty() {
            return Err(Error::malformed(
                format!("{path}.text"),
                "text must not be empty",
            ));
        }
        for (i, child) in node.subcategories.iter().enumerate().rev() {
            stack.push((child, format!("{path}.subcategories[{i}]")));
        }
    }
    Ok(())
}

struct Accumulator {
    nodes: Vec<RenderedNode>,
    edges: Vec<RenderedEdge>,
    metadata: MindMapMetadata,
    seen: FxHashMap<String, String>,
}

impl Accumulator {
    fn with_capacity(node_count: usize) -> Self {
        Self {
            nodes: Vec::with_capacity(node_count),
            edges: Vec::with_capacity(node_count.saturating_sub(1)),
            metadata: MindMapMetadata {
                all_nodes: Vec::with_capacity(node_count),
                node_relationships: Vec::with_capacity(node_count.saturating_sub(1)),
                categories: Vec::new(),
            },
            seen: FxHashMap::default(),
        }
    }

    fn push_root(&mut self, title: &ConceptNode) {
        self.nodes.push(RenderedNode {
            id: ROOT_ID.to_string(),
            kind: NodeKind::Root,
            depth: 0,
            text: title.text.clone(),
            label_description: display_description(&title.description),
            tooltip: title.description.clone(),
            color: None,
            font_size: font_size_for_depth(0),
        });
        self.metadata.all_nodes.push(ROOT_ID.to_string());
    }

    fn push_child(
        &mut self,
        concept: &ConceptNode,
        id: &str,
        parent_id: &str,
        depth: usize,
        color: &str,
    ) {
        match self.seen.get(id) {
            Some(prev) if prev != &concept.text => {
                tracing::warn!(id, first = %prev, second = %concept.text, "node id collision between distinct labels");
            }
            Some(_) => {
                tracing::warn!(id, text = %concept.text, "repeated label maps to an existing node");
            }
            None => {
                self.seen.insert(id.to_string(), concept.text.clone());
            }
        }

        let kind = if depth == 1 {
            NodeKind::Category
        } else {
            NodeKind::Subcategory
        };

        self.nodes.push(RenderedNode {
            id: id.to_string(),
            kind,
            depth,
            text: concept.text.clone(),
            label_description: display_description(&concept.description),
            tooltip: concept.description.clone(),
            color: Some(color.to_string()),
            font_size: font_size_for_depth(depth),
        });
        self.edges.push(RenderedEdge {
            source: parent_id.to_string(),
            target: id.to_string(),
            tooltip: format!("Connection: {}", concept.text),
            emphasized: kind == NodeKind::Category,
        });
        self.metadata.all_nodes.push(id.to_string());
        self.metadata
            .node_relationships
            .push((parent_id.to_string(), id.to_string()));
        if kind == NodeKind::Category {
            self.metadata.categories.push(CategoryLegend {
                id: id.to_string(),
                text: concept.text.clone(),
                color: color.to_string(),
            });
        }
    }
}
