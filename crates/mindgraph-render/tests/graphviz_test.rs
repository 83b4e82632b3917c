use mindgraph_core::{MindMapSpec, NormalizeOptions, normalize};
use mindgraph_render::{
    GraphvizRenderer, ImageFormat, LayoutEngine, LayoutMode, RenderOptions, render, resolve,
};
use std::path::PathBuf;

const PNG_MAGIC: &[u8] = b"\x89PNG\r\n\x1a\n";

fn workspace_root() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join("..")
}

fn expanded() -> mindgraph_core::NormalizedMindMap {
    let path = workspace_root()
        .join("fixtures")
        .join("mindmap")
        .join("expanded.json");
    let text = std::fs::read_to_string(&path).expect("fixture");
    let spec = MindMapSpec::from_json_str(&text).expect("parse ok");
    normalize(&spec, NormalizeOptions::default()).expect("normalize ok")
}

fn graphviz_or_skip() -> Option<GraphvizRenderer> {
    let renderer = GraphvizRenderer::from_env();
    if renderer.is_available(LayoutEngine::Dot) && renderer.is_available(LayoutEngine::Neato) {
        Some(renderer)
    } else {
        eprintln!("skipping: Graphviz (dot/neato) not installed");
        None
    }
}

#[test]
fn renders_png_for_every_layout() {
    let Some(renderer) = graphviz_or_skip() else {
        return;
    };
    let graph = expanded();
    let tmp = tempfile::tempdir().expect("tempdir");

    for layout in LayoutMode::ALL {
        let config = resolve("dark", layout.as_str());
        let options = RenderOptions {
            dpi: 72,
            artifact_dir: Some(tmp.path().to_path_buf()),
            ..RenderOptions::default()
        };
        let bytes = render(&graph, &config, &options, &renderer)
            .unwrap_or_else(|e| panic!("{layout}: {e}"));
        assert!(bytes.starts_with(PNG_MAGIC), "{layout}: not a PNG");
    }

    let leftovers: Vec<_> = std::fs::read_dir(tmp.path()).unwrap().collect();
    assert!(leftovers.is_empty(), "artifacts leaked: {leftovers:?}");
}

#[test]
fn renders_svg() {
    let Some(renderer) = graphviz_or_skip() else {
        return;
    };
    let graph = expanded();
    let options = RenderOptions {
        format: ImageFormat::Svg,
        ..RenderOptions::default()
    };
    let bytes = render(&graph, &resolve("light", "vertical"), &options, &renderer).expect("svg");
    let svg = String::from_utf8(bytes).expect("utf-8 svg");
    assert!(svg.contains("<svg"));
    assert!(svg.contains("Expanded Mind Map"));
}

#[test]
fn higher_dpi_produces_larger_png() {
    let Some(renderer) = graphviz_or_skip() else {
        return;
    };
    let graph = expanded();
    let config = resolve("dark", "horizontal");
    let size = |dpi: u32| {
        let options = RenderOptions {
            dpi,
            ..RenderOptions::default()
        };
        let png = render(&graph, &config, &options, &renderer).expect("png");
        // IHDR width, big-endian, right after the 8-byte magic and 8-byte chunk header.
        u32::from_be_bytes([png[16], png[17], png[18], png[19]])
    };
    assert!(size(144) > size(72));
}
