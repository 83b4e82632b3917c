//! Graphviz process backend.

use crate::config::LayoutEngine;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::io::{ErrorKind, Read, Write};
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use tempfile::NamedTempFile;

/// Environment variable naming a directory that holds the Graphviz executables.
pub const GRAPHVIZ_BIN_DIR_ENV: &str = "MINDGRAPH_GRAPHVIZ_BIN_DIR";

pub const DEFAULT_DPI: u32 = 300;
pub const DEFAULT_ARTIFACT_NAME: &str = "mind_map";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImageFormat {
    #[default]
    Png,
    Svg,
}

impl ImageFormat {
    pub fn extension(self) -> &'static str {
        match self {
            Self::Png => "png",
            Self::Svg => "svg",
        }
    }
}

impl std::str::FromStr for ImageFormat {
    type Err = ();

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "png" => Ok(Self::Png),
            "svg" => Ok(Self::Svg),
            _ => Err(()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderOptions {
    pub dpi: u32,
    pub format: ImageFormat,
    /// Base name of the transient output file. A unique suffix is always appended.
    pub artifact_name: String,
    /// Where the transient file is created; the system temp dir when `None`.
    pub artifact_dir: Option<PathBuf>,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            dpi: DEFAULT_DPI,
            format: ImageFormat::Png,
            artifact_name: DEFAULT_ARTIFACT_NAME.to_string(),
            artifact_dir: None,
        }
    }
}

/// Something that can lay out and draw a DOT document.
pub trait GraphRenderer {
    fn render_dot(
        &self,
        dot: &str,
        engine: LayoutEngine,
        options: &RenderOptions,
    ) -> Result<Vec<u8>>;
}

/// Runs the Graphviz command-line tools (`dot`, `neato`).
#[derive(Debug, Clone, Default)]
pub struct GraphvizRenderer {
    bin_dir: Option<PathBuf>,
}

impl GraphvizRenderer {
    /// Looks executables up on `PATH`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Honors [`GRAPHVIZ_BIN_DIR_ENV`] when set and non-empty.
    pub fn from_env() -> Self {
        let bin_dir = std::env::var_os(GRAPHVIZ_BIN_DIR_ENV)
            .filter(|v| !v.is_empty())
            .map(PathBuf::from);
        Self { bin_dir }
    }

    pub fn with_bin_dir(mut self, bin_dir: Option<PathBuf>) -> Self {
        self.bin_dir = bin_dir;
        self
    }

    fn program(&self, engine: LayoutEngine) -> PathBuf {
        match &self.bin_dir {
            Some(dir) => dir.join(engine.program()),
            None => PathBuf::from(engine.program()),
        }
    }

    /// `true` when `<engine> -V` runs successfully.
    pub fn is_available(&self, engine: LayoutEngine) -> bool {
        Command::new(self.program(engine))
            .arg("-V")
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .is_ok_and(|s| s.success())
    }

    fn run(&self, dot: &str, engine: LayoutEngine, format: ImageFormat, out: &Path) -> Result<()> {
        let unavailable = |reason: String| Error::RenderUnavailable {
            engine: engine.program().to_string(),
            reason,
        };

        let mut child = Command::new(self.program(engine))
            .arg(format!("-T{}", format.extension()))
            .arg("-o")
            .arg(out)
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| match e.kind() {
                ErrorKind::NotFound => {
                    unavailable("executable not found (is Graphviz installed?)".to_string())
                }
                _ => unavailable(format!("failed to start: {e}")),
            })?;

        if let Some(mut stdin) = child.stdin.take() {
            // A write failure here usually means the engine exited early; its status and
            // stderr below say why.
            if let Err(e) = stdin.write_all(dot.as_bytes()) {
                tracing::debug!(error = %e, "failed to write DOT to layout engine");
            }
        }

        let output = child
            .wait_with_output()
            .map_err(|e| unavailable(format!("failed to wait for process: {e}")))?;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let stderr = stderr.trim();
            return Err(unavailable(if stderr.is_empty() {
                format!("exited with {}", output.status)
            } else {
                format!("exited with {}: {stderr}", output.status)
            }));
        }
        Ok(())
    }
}

/// Keeps the caller-supplied base name usable as a file name prefix.
fn artifact_prefix(name: &str) -> String {
    let sanitized: String = name
        .trim()
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' || c == '.' {
                c
            } else {
                '_'
            }
        })
        .collect();
    let base = match sanitized.trim_matches('.') {
        "" => DEFAULT_ARTIFACT_NAME,
        base => base,
    };
    format!("{base}-")
}

fn create_artifact(options: &RenderOptions) -> std::io::Result<NamedTempFile> {
    let prefix = artifact_prefix(&options.artifact_name);
    let suffix = format!(".{}", options.format.extension());
    let mut builder = tempfile::Builder::new();
    builder.prefix(&prefix).suffix(&suffix);
    match &options.artifact_dir {
        Some(dir) => builder.tempfile_in(dir),
        None => builder.tempfile(),
    }
}

/// Removes the artifact. Failure is logged, never returned.
fn release_artifact(artifact: NamedTempFile) {
    let path = artifact.path().to_path_buf();
    if let Err(source) = artifact.close() {
        let err = Error::ArtifactCleanup { path, source };
        tracing::warn!(error = %err, "render artifact cleanup failed");
    }
}

impl GraphRenderer for GraphvizRenderer {
    fn render_dot(
        &self,
        dot: &str,
        engine: LayoutEngine,
        options: &RenderOptions,
    ) -> Result<Vec<u8>> {
        let artifact = create_artifact(options)?;
        tracing::debug!(
            engine = engine.program(),
            format = options.format.extension(),
            dpi = options.dpi,
            artifact = %artifact.path().display(),
            "invoking layout engine"
        );

        let result = self
            .run(dot, engine, options.format, artifact.path())
            .and_then(|()| read_artifact(artifact.path(), engine));

        release_artifact(artifact);
        result
    }
}

fn read_artifact(path: &Path, engine: LayoutEngine) -> Result<Vec<u8>> {
    // Re-open by path: the engine replaced the file contents behind our handle.
    let mut bytes = Vec::new();
    std::fs::File::open(path)?.read_to_end(&mut bytes)?;
    if bytes.is_empty() {
        return Err(Error::RenderUnavailable {
            engine: engine.program().to_string(),
            reason: "engine produced an empty image".to_string(),
        });
    }
    Ok(bytes)
}
