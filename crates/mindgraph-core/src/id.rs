//! Stable node identifiers.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt::Write as _;

/// Id of the single root node. It is constant (not hash-derived) because every category edge and
/// the radial layout anchor refer to it.
pub const ROOT_ID: &str = "center";

const ID_PREFIX: &str = "node_";
const ID_HEX_LEN: usize = 8;

/// Derives a short, attribute-safe node id from label text.
///
/// The id depends on `text` only: the same label anywhere in a render maps to the same id, and
/// matching is case-sensitive. Distinct labels may collide in principle (32 bits of digest).
pub fn derive_id(text: &str) -> String {
    let digest = Sha256::digest(text.as_bytes());
    let mut out = String::with_capacity(ID_PREFIX.len() + ID_HEX_LEN);
    out.push_str(ID_PREFIX);
    for byte in digest.iter().take(ID_HEX_LEN / 2) {
        let _ = write!(out, "{byte:02x}");
    }
    out
}

/// How ids are assigned to non-root nodes during normalization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IdStrategy {
    /// `derive_id(text)`. Equal labels share one id (and one graph node).
    #[default]
    Text,
    /// Scopes the digest to the parent id, so equal labels under different parents stay distinct.
    ParentPath,
}

impl IdStrategy {
    pub fn node_id(self, parent_id: &str, text: &str) -> String {
        match self {
            Self::Text => derive_id(text),
            Self::ParentPath => derive_id(&format!("{parent_id}/{text}")),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::ParentPath => "parent_path",
        }
    }
}

impl std::str::FromStr for IdStrategy {
    type Err = ();

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "text" => Ok(Self::Text),
            "parent_path" | "parent-path" | "path" => Ok(Self::ParentPath),
            _ => Err(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn derive_id_is_stable() {
        assert_eq!(derive_id("Neural Networks"), derive_id("Neural Networks"));
    }

    #[test]
    fn derive_id_is_case_sensitive() {
        assert_ne!(derive_id("Neural Networks"), derive_id("neural networks"));
    }

    #[test]
    fn derive_id_shape() {
        for text in ["", "Neural Networks", "a \"quoted\" <label> & more", "日本語"] {
            let id = derive_id(text);
            assert!(id.starts_with("node_"), "{id}");
            assert_eq!(id.len(), 13, "{id}");
            assert!(
                id["node_".len()..]
                    .chars()
                    .all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()),
                "{id}"
            );
        }
    }

    #[test]
    fn empty_text_has_deterministic_id() {
        assert_eq!(derive_id(""), derive_id(""));
        assert_ne!(derive_id(""), ROOT_ID);
    }

    #[test]
    fn parent_path_strategy_separates_equal_labels() {
        let a = IdStrategy::ParentPath.node_id("node_aaaa0000", "Examples");
        let b = IdStrategy::ParentPath.node_id("node_bbbb1111", "Examples");
        assert_ne!(a, b);
        assert_eq!(
            IdStrategy::Text.node_id("node_aaaa0000", "Examples"),
            IdStrategy::Text.node_id("node_bbbb1111", "Examples")
        );
    }

    #[test]
    fn id_strategy_from_str() {
        assert_eq!("text".parse::<IdStrategy>(), Ok(IdStrategy::Text));
        assert_eq!(" Parent-Path ".parse::<IdStrategy>(), Ok(IdStrategy::ParentPath));
        assert!("bogus".parse::<IdStrategy>().is_err());
    }
}
