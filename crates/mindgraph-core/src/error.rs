pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The concept tree is missing a required field or has the wrong shape at `path`.
    #[error("Malformed mind map spec at `{path}`: {reason}")]
    MalformedSpec { path: String, reason: String },

    #[error("Mind map JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("No JSON object found in model completion")]
    NoJsonObject,
}

impl Error {
    pub(crate) fn malformed(path: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::MalformedSpec {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// `true` for errors caused by the shape of the input (as opposed to its encoding).
    pub fn is_malformed_spec(&self) -> bool {
        matches!(self, Self::MalformedSpec { .. })
    }
}
