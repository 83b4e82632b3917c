//! DOT document emission.

use crate::config::{EdgeStyle, NodeStyle, RenderConfig};
use mindgraph_core::{NodeKind, NormalizedMindMap, RenderedEdge, RenderedNode};
use std::fmt::Write as _;

const GRAPH_NAME: &str = "mind_map";

/// Quotes a DOT string (`"..."`), escaping quotes and backslashes.
fn quote(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    for ch in s.chars() {
        match ch {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => {}
            _ => out.push(ch),
        }
    }
    out.push('"');
    out
}

fn num(v: f64) -> String {
    format!("{v}")
}

/// Ordered `key=value` list for one statement.
#[derive(Default)]
struct Attrs(Vec<(&'static str, String)>);

impl Attrs {
    fn str(mut self, key: &'static str, value: &str) -> Self {
        self.0.push((key, quote(value)));
        self
    }

    fn num(mut self, key: &'static str, value: f64) -> Self {
        self.0.push((key, quote(&num(value))));
        self
    }

    /// Raw value, already valid DOT (HTML labels).
    fn raw(mut self, key: &'static str, value: String) -> Self {
        self.0.push((key, value));
        self
    }

    fn write_to(&self, out: &mut String) {
        if self.0.is_empty() {
            return;
        }
        out.push_str(" [");
        for (i, (k, v)) in self.0.iter().enumerate() {
            if i > 0 {
                out.push(' ');
            }
            let _ = write!(out, "{k}={v}");
        }
        out.push(']');
    }
}

/// HTML-like label: bold title row plus a description row.
fn html_label(text: &str, description: &str) -> String {
    format!(
        "<<table border='0' cellpadding='5'><tr><td><b>{}</b></td></tr><tr><td>{}</td></tr></table>>",
        htmlize::escape_text(text),
        htmlize::escape_text(description)
    )
}

fn node_defaults(style: &NodeStyle) -> Attrs {
    Attrs::default()
        .str("shape", style.shape)
        .str("style", style.style)
        .str("fillcolor", style.fill)
        .str("color", style.stroke)
        .str("fontcolor", style.font_color)
        .str("fontname", style.font_name)
        .num("fontsize", style.font_size)
        .str("margin", style.margin)
        .num("height", style.height)
        .num("width", style.width)
        .num("penwidth", style.pen_width)
}

fn edge_defaults(style: &EdgeStyle) -> Attrs {
    Attrs::default()
        .str("color", style.color)
        .str("fontcolor", style.font_color)
        .str("fontname", style.font_name)
        .num("fontsize", style.font_size)
        .num("penwidth", style.pen_width)
        .num("len", style.len)
}

fn node_attrs(node: &RenderedNode, config: &RenderConfig) -> Attrs {
    let label = html_label(&node.text, &node.label_description);
    match node.kind {
        NodeKind::Root => {
            let root = &config.root;
            Attrs::default()
                .raw("label", label)
                .str("shape", root.shape)
                .str("style", root.style)
                .str("fillcolor", root.fill)
                .str("color", root.stroke)
                .str("fontcolor", root.font_color)
                .num("fontsize", root.font_size)
                .num("width", root.width)
                .num("height", root.height)
                .num("penwidth", root.pen_width)
                .str("tooltip", &node.tooltip)
        }
        NodeKind::Category | NodeKind::Subcategory => {
            let color = node.color.as_deref().unwrap_or(config.node.fill);
            Attrs::default()
                .raw("label", label)
                .str("fillcolor", color)
                .str("color", color)
                .num("fontsize", node.font_size)
                .str("tooltip", &node.tooltip)
        }
    }
}

fn edge_attrs(edge: &RenderedEdge, config: &RenderConfig) -> Attrs {
    let attrs = Attrs::default();
    let attrs = if edge.emphasized {
        attrs.num("penwidth", config.category_edge_pen_width)
    } else {
        attrs
    };
    attrs.str("tooltip", &edge.tooltip)
}

fn write_edge(out: &mut String, source: &str, target: &str, attrs: Attrs) {
    let _ = write!(out, "\t{} -> {}", quote(source), quote(target));
    attrs.write_to(out);
    out.push('\n');
}

/// Writes the DOT document for a normalized mind map.
///
/// `dpi` only affects rasterization; the graph topology and attributes are otherwise identical.
/// Tree edges carry their label as a tooltip only. With `spread_edges`, invisible
/// non-constraining edges chain the nodes in creation order after the tree edges.
pub fn to_dot(graph: &NormalizedMindMap, config: &RenderConfig, dpi: u32) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "digraph {GRAPH_NAME} {{");

    let mut graph_attrs = Attrs::default();
    if let Some(rank_dir) = config.rank_dir {
        graph_attrs = graph_attrs.str("rankdir", rank_dir.as_dot());
    }
    graph_attrs = graph_attrs
        .str("bgcolor", config.graph.background)
        .str("fontcolor", config.graph.font_color)
        .str("fontname", config.graph.font_name)
        .num("margin", config.graph.margin)
        .str("overlap", if config.graph.overlap { "true" } else { "false" })
        .str("splines", if config.graph.splines { "true" } else { "false" })
        .str("dpi", &dpi.to_string());
    if let Some(root) = config.layout_root {
        graph_attrs = graph_attrs.str("root", root);
    }
    out.push_str("\tgraph");
    graph_attrs.write_to(&mut out);
    out.push('\n');

    out.push_str("\tnode");
    node_defaults(&config.node).write_to(&mut out);
    out.push('\n');

    out.push_str("\tedge");
    edge_defaults(&config.edge).write_to(&mut out);
    out.push('\n');

    for node in &graph.nodes {
        let _ = write!(out, "\t{}", quote(&node.id));
        node_attrs(node, config).write_to(&mut out);
        out.push('\n');
    }

    for edge in &graph.edges {
        write_edge(&mut out, &edge.source, &edge.target, edge_attrs(edge, config));
    }

    if config.spread_edges {
        for pair in graph.metadata.all_nodes.windows(2) {
            write_edge(
                &mut out,
                &pair[0],
                &pair[1],
                Attrs::default()
                    .str("style", "invis")
                    .str("constraint", "false"),
            );
        }
    }

    out.push_str("}\n");
    out
}
