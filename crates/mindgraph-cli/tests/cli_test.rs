use assert_cmd::prelude::*;
use mindgraph::{GraphvizRenderer, LayoutEngine};
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

fn repo_root() -> PathBuf {
    let manifest_dir = Path::new(env!("CARGO_MANIFEST_DIR"));
    manifest_dir
        .parent()
        .and_then(|p| p.parent())
        .expect("expected crates/<name> layout")
        .to_path_buf()
}

fn fixture(name: &str) -> PathBuf {
    let path = repo_root().join("fixtures").join("mindmap").join(name);
    assert!(path.exists(), "fixture missing: {}", path.display());
    path
}

/// Same lookup as the binary: `MINDGRAPH_GRAPHVIZ_BIN_DIR`, then `PATH`.
fn graphviz_available() -> bool {
    let renderer = GraphvizRenderer::from_env();
    renderer.is_available(LayoutEngine::Dot) && renderer.is_available(LayoutEngine::Neato)
}

fn mindgraph() -> Command {
    Command::new(assert_cmd::cargo_bin!("mindgraph"))
}

#[test]
fn normalize_prints_graph_json() {
    let output = mindgraph()
        .args(["normalize", fixture("brains_vs_computers.json").to_str().unwrap()])
        .output()
        .expect("run mindgraph");
    assert!(output.status.success());

    let value: serde_json::Value = serde_json::from_slice(&output.stdout).expect("json");
    assert_eq!(value["nodes"].as_array().unwrap().len(), 4);
    assert_eq!(value["edges"].as_array().unwrap().len(), 3);
    assert_eq!(value["metadata"]["all_nodes"][0], "center");
    assert_eq!(value["metadata"]["categories"].as_array().unwrap().len(), 2);
}

#[test]
fn normalize_metadata_only() {
    let output = mindgraph()
        .args([
            "normalize",
            "--metadata",
            fixture("expanded.json").to_str().unwrap(),
        ])
        .output()
        .expect("run mindgraph");
    assert!(output.status.success());

    let value: serde_json::Value = serde_json::from_slice(&output.stdout).expect("json");
    assert_eq!(value["all_nodes"].as_array().unwrap().len(), 17);
    assert_eq!(value["node_relationships"].as_array().unwrap().len(), 16);
    assert!(value.get("nodes").is_none());
}

#[test]
fn normalize_accepts_model_completions() {
    let output = mindgraph()
        .args([
            "normalize",
            "--completion",
            "--metadata",
            fixture("completion.txt").to_str().unwrap(),
        ])
        .output()
        .expect("run mindgraph");
    assert!(output.status.success());

    let value: serde_json::Value = serde_json::from_slice(&output.stdout).expect("json");
    assert_eq!(value["all_nodes"].as_array().unwrap().len(), 4);
}

#[test]
fn malformed_input_exits_with_input_error() {
    let output = mindgraph()
        .args([
            "normalize",
            fixture("malformed_missing_description.json").to_str().unwrap(),
        ])
        .output()
        .expect("run mindgraph");
    assert_eq!(output.status.code(), Some(2));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("categories[1].description"),
        "stderr: {stderr}"
    );
}

#[test]
fn dot_writes_layout_specific_source() {
    let tmp = tempfile::tempdir().expect("tempdir");
    let out = tmp.path().join("map.dot");

    mindgraph()
        .args([
            "dot",
            "--layout",
            "radial",
            "--theme",
            "light",
            "--out",
            out.to_str().unwrap(),
            fixture("brains_vs_computers.json").to_str().unwrap(),
        ])
        .assert()
        .success();

    let dot = fs::read_to_string(&out).expect("read dot");
    assert!(dot.starts_with("digraph mind_map {"));
    assert!(dot.contains("root=\"center\""));
    assert!(dot.contains("bgcolor=\"#FFFFFF\""));
}

#[test]
fn flags_override_config_file() {
    let tmp = tempfile::tempdir().expect("tempdir");
    let config = tmp.path().join("mindgraph.json");
    fs::write(&config, r#"{"layout": "vertical", "dpi": 150}"#).expect("write config");

    let output = mindgraph()
        .args([
            "dot",
            "--config",
            config.to_str().unwrap(),
            "--dpi",
            "72",
            fixture("brains_vs_computers.json").to_str().unwrap(),
        ])
        .output()
        .expect("run mindgraph");
    assert!(output.status.success());

    let dot = String::from_utf8(output.stdout).expect("utf8");
    assert!(dot.contains("rankdir=\"TB\""));
    assert!(dot.contains("dpi=\"72\""));
}

#[test]
fn zero_dpi_is_rejected() {
    let output = mindgraph()
        .args([
            "dot",
            "--dpi",
            "0",
            fixture("brains_vs_computers.json").to_str().unwrap(),
        ])
        .output()
        .expect("run mindgraph");
    assert_eq!(output.status.code(), Some(1));
}

#[test]
fn missing_engine_is_reported_or_degraded() {
    let tmp = tempfile::tempdir().expect("tempdir");
    let empty_bin = tmp.path().join("no-graphviz");
    fs::create_dir(&empty_bin).expect("mkdir");
    let out = tmp.path().join("map.png");

    let output = mindgraph()
        .args([
            "render",
            "--graphviz-bin-dir",
            empty_bin.to_str().unwrap(),
            "--out",
            out.to_str().unwrap(),
            fixture("brains_vs_computers.json").to_str().unwrap(),
        ])
        .output()
        .expect("run mindgraph");
    assert_eq!(output.status.code(), Some(3));
    assert!(!out.exists());

    let output = mindgraph()
        .args([
            "render",
            "--graphviz-bin-dir",
            empty_bin.to_str().unwrap(),
            "--allow-metadata-only",
            "--json",
            "-",
            "--out",
            out.to_str().unwrap(),
            fixture("brains_vs_computers.json").to_str().unwrap(),
        ])
        .output()
        .expect("run mindgraph");
    assert!(output.status.success());
    assert!(!out.exists());

    let value: serde_json::Value = serde_json::from_slice(&output.stdout).expect("json");
    assert!(value["image"].is_null());
    assert_eq!(value["metadata"]["all_nodes"].as_array().unwrap().len(), 4);
}

#[test]
fn render_png_with_default_out_path() {
    if !graphviz_available() {
        eprintln!("skipping: Graphviz (dot/neato) not installed");
        return;
    }

    let tmp = tempfile::tempdir().expect("tempdir");
    let input = tmp.path().join("brains.json");
    fs::copy(fixture("brains_vs_computers.json"), &input).expect("copy fixture");
    let sidecar = tmp.path().join("brains.result.json");

    mindgraph()
        .args([
            "render",
            "--dpi",
            "72",
            "--json",
            sidecar.to_str().unwrap(),
            input.to_str().unwrap(),
        ])
        .assert()
        .success();

    let bytes = fs::read(input.with_extension("png")).expect("read png");
    assert!(bytes.starts_with(b"\x89PNG\r\n\x1a\n"), "output is not a PNG");

    let value: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&sidecar).expect("read sidecar")).expect("json");
    assert_eq!(value["format"], "png");
    assert_eq!(value["theme"], "dark");
    assert!(value["image"].as_str().is_some_and(|s| !s.is_empty()));
}

#[test]
fn render_svg_for_each_layout() {
    if !graphviz_available() {
        eprintln!("skipping: Graphviz (dot/neato) not installed");
        return;
    }

    let tmp = tempfile::tempdir().expect("tempdir");
    for layout in ["horizontal", "vertical", "radial", "force"] {
        let out = tmp.path().join(format!("{layout}.svg"));
        mindgraph()
            .args([
                "render",
                "--format",
                "svg",
                "--layout",
                layout,
                "--out",
                out.to_str().unwrap(),
                fixture("expanded.json").to_str().unwrap(),
            ])
            .assert()
            .success();

        let svg = fs::read_to_string(&out).expect("read svg");
        assert!(svg.contains("<svg"), "{layout}: output is not SVG");
    }
}
