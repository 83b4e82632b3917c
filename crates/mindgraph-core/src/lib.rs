#![forbid(unsafe_code)]

//! Concept-tree model and the pure stages of the mind map pipeline (headless).
//!
//! Design goals:
//! - never trust the input tree: validate at the boundary, fail before any output
//! - deterministic outputs (same input, same ids, same ordering)
//! - no I/O

pub mod error;
pub mod id;
pub mod normalize;
pub mod palette;
pub mod spec;

pub use error::{Error, Result};
pub use id::{IdStrategy, ROOT_ID, derive_id};
pub use normalize::{
    CategoryLegend, MindMapMetadata, NodeKind, NormalizeOptions, NormalizedMindMap, RenderedEdge,
    RenderedNode, normalize, normalize_value,
};
pub use palette::generate_colors;
pub use spec::{ConceptNode, MindMapSpec};
