use std::path::PathBuf;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The layout engine could not produce an image. Not retried here.
    #[error("graph renderer `{engine}` unavailable: {reason}")]
    RenderUnavailable { engine: String, reason: String },

    #[error("render artifact I/O error: {0}")]
    Artifact(#[from] std::io::Error),

    /// Only ever logged: the image was already read into memory when this happens.
    #[error("failed to remove render artifact {}: {source}", path.display())]
    ArtifactCleanup {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl Error {
    pub fn is_render_unavailable(&self) -> bool {
        matches!(self, Self::RenderUnavailable { .. })
    }
}
