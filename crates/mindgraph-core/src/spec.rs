//! Concept tree input model.
//!
//! Input normally comes from an LLM completion, so nothing is trusted: every field is checked
//! here and failures carry the path of the offending field.

use crate::{Error, Result};
use regex::Regex;
use serde::Serialize;
use serde_json::{Map, Value};
use std::sync::OnceLock;

/// One concept in the tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConceptNode {
    pub text: String,
    pub description: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub subcategories: Vec<ConceptNode>,
}

impl ConceptNode {
    pub fn new(text: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            description: description.into(),
            subcategories: Vec::new(),
        }
    }

    pub fn with_subcategories(mut self, subcategories: Vec<ConceptNode>) -> Self {
        self.subcategories = subcategories;
        self
    }

    /// Number of nodes in this subtree, including `self`.
    pub fn node_count(&self) -> usize {
        let mut count = 0;
        let mut stack = vec![self];
        while let Some(node) = stack.pop() {
            count += 1;
            stack.extend(&node.subcategories);
        }
        count
    }
}

/// Root of a mind map: the title plus its direct children.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MindMapSpec {
    pub title: ConceptNode,
    pub categories: Vec<ConceptNode>,
}

impl MindMapSpec {
    pub fn new(title: ConceptNode, categories: Vec<ConceptNode>) -> Self {
        Self { title, categories }
    }

    /// Total node count of the rendered graph (root included).
    pub fn node_count(&self) -> usize {
        1 + self
            .categories
            .iter()
            .map(ConceptNode::node_count)
            .sum::<usize>()
    }

    /// Validates an untyped value into a typed spec.
    pub fn from_value(value: &Value) -> Result<Self> {
        let root = value
            .as_object()
            .ok_or_else(|| Error::malformed("$", format!("expected an object, got {}", kind(value))))?;

        let title = required(root, "title", "title")?;
        let title = parse_concept(title, "title", false)?;

        let categories = required(root, "categories", "categories")?;
        let categories = parse_children(categories, "categories")?;

        Ok(Self { title, categories })
    }

    /// Parses JSON text. Falls back to JSON5 so single-quoted, trailing-comma output (common in
    /// model completions) is accepted too.
    pub fn from_json_str(text: &str) -> Result<Self> {
        let value = match serde_json::from_str::<Value>(text) {
            Ok(v) => v,
            Err(json_err) => match json5::from_str::<Value>(text) {
                Ok(v) => {
                    tracing::debug!(error = %json_err, "mind map input is not strict JSON; parsed as JSON5");
                    v
                }
                Err(_) => return Err(Error::Json(json_err)),
            },
        };
        Self::from_value(&value)
    }

    /// Extracts the outermost `{ ... }` block from a model completion (which may be wrapped in
    /// prose or a Markdown fence) and parses it.
    pub fn from_llm_completion(completion: &str) -> Result<Self> {
        let block = extract_json_object(completion).ok_or(Error::NoJsonObject)?;
        Self::from_json_str(block)
    }
}

fn json_object_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?s)\{.*\}").expect("valid regex"))
}

/// Returns the span from the first `{` to the last `}`, if any.
pub fn extract_json_object(text: &str) -> Option<&str> {
    json_object_re().find(text).map(|m| m.as_str())
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

fn required<'a>(obj: &'a Map<String, Value>, key: &str, path: &str) -> Result<&'a Value> {
    match obj.get(key) {
        None | Some(Value::Null) => Err(Error::malformed(path, "missing required field")),
        Some(v) => Ok(v),
    }
}

fn required_str<'a>(obj: &'a Map<String, Value>, key: &str, path: &str) -> Result<&'a str> {
    let value = required(obj, key, path)?;
    value
        .as_str()
        .ok_or_else(|| Error::malformed(path, format!("expected a string, got {}", kind(value))))
}

fn parse_children(value: &Value, path: &str) -> Result<Vec<ConceptNode>> {
    let items = value
        .as_array()
        .ok_or_else(|| Error::malformed(path, format!("expected an array, got {}", kind(value))))?;
    items
        .iter()
        .enumerate()
        .map(|(i, item)| parse_concept(item, &format!("{path}[{i}]"), true))
        .collect()
}

fn parse_concept(value: &Value, path: &str, with_children: bool) -> Result<ConceptNode> {
    let obj = value
        .as_object()
        .ok_or_else(|| Error::malformed(path, format!("expected an object, got {}", kind(value))))?;

    let text_path = format!("{path}.text");
    let text = required_str(obj, "text", &text_path)?;
    if text.trim().is_empty() {
        return Err(Error::malformed(text_path, "text must not be empty"));
    }
    let description = required_str(obj, "description", &format!("{path}.description"))?;

    let subcategories = if with_children {
        match obj.get("subcategories") {
            None | Some(Value::Null) => Vec::new(),
            Some(children) => parse_children(children, &format!("{path}.subcategories"))?,
        }
    } else {
        Vec::new()
    };

    Ok(ConceptNode {
        text: text.to_string(),
        description: description.to_string(),
        subcategories,
    })
}
