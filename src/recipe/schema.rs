//! Variable schema derived from the shape of a recipe config.
//!
//! Every key of the document becomes a property: nested mappings become
//! `{"type": "object", "properties": {...}}`, sequences become
//! `{"type": "array"}` and scalars accept anything (`{}`). `@schema` tags in
//! the comment above a key (or above its nested block) are JSON objects
//! merged over the derived schema, tag fields winning. `@option` tags expose
//! the key as a [`RecipeOption`].
//!
//! A comment placed above the first entry of a nested block belongs to the
//! block: `foo:\n  # @option Bar\n  bar: 1` declares an option on `/foo`,
//! not `/foo/bar`. To tag that first entry alone, move it after a sibling.
//!
//! Property names use the same key normalisation as the decoded vars, so
//! `~` becomes `null` and `0x10` becomes `16` in both.

use crate::RECIPE_CONFIG_PATH;
use crate::document::{Node, NodeKind, Tags};
use crate::error::SchemaError;
use crate::merge::merge_values;
use crate::recipe::model::{RecipeOption, join_pointer};
use serde_json::{Map, Value, json};
use tracing::debug;

const SCHEMA_TAG: &str = "schema";
const OPTION_TAG: &str = "option";

/// Schema and declared options of one document.
#[derive(Clone, Debug, PartialEq)]
pub struct DerivedSchema {
    pub schema: Value,
    /// Options in document order; a key precedes the keys nested under it.
    pub options: Vec<RecipeOption>,
}

/// Derive the variable schema of a parsed document.
///
/// The reserved config section is skipped entirely. Deriving twice from the
/// same tree yields the same result.
pub fn derive_schema(document: &Node) -> Result<DerivedSchema, SchemaError> {
    let mut options = Vec::new();
    let schema = derive_level(document, "", &mut options)?;
    Ok(DerivedSchema { schema, options })
}

fn derive_level(
    node: &Node,
    path: &str,
    options: &mut Vec<RecipeOption>,
) -> Result<Value, SchemaError> {
    let mut properties = Map::new();
    let mut pending_key: Option<&Node> = None;

    for child in &node.children {
        let Some(key) = pending_key.take() else {
            match child.kind {
                NodeKind::Scalar => pending_key = Some(child),
                // Only reachable for the document root.
                NodeKind::Mapping => return derive_level(child, "/", options),
                NodeKind::Sequence => return Ok(array_schema()),
                other => return Err(unsupported(path, other)),
            }
            continue;
        };

        let name = key.key_text();
        let key_path = join_pointer(path, &name);
        if key_path == RECIPE_CONFIG_PATH {
            continue;
        }

        // Reserve the option slot so a parent lands before its children.
        let slot = options.len();
        let mut schema = match child.kind {
            NodeKind::Scalar => json!({}),
            NodeKind::Mapping => derive_level(child, &key_path, options)?,
            NodeKind::Sequence => array_schema(),
            other => return Err(unsupported(&key_path, other)),
        };

        let tags = annotations(key, child);
        for fragment in tags.filter(SCHEMA_TAG) {
            let fragment: Map<String, Value> =
                serde_json::from_str(fragment).map_err(|source| SchemaError::InvalidTag {
                    path: key_path.clone(),
                    source,
                })?;
            merge_values(&mut schema, fragment).map_err(|source| SchemaError::MergeFailed {
                path: key_path.clone(),
                source,
            })?;
        }

        if let Some(label) = tags.filter(OPTION_TAG).next() {
            debug!(path = %key_path, label, "recipe option declared");
            options.insert(
                slot,
                RecipeOption {
                    label: label.to_string(),
                    path: key_path.clone(),
                    schema: schema.clone(),
                },
            );
        }

        properties.insert(name, schema);
    }

    Ok(json!({
        "type": "object",
        "properties": properties,
    }))
}

// Tags above the key, then tags above its value.
fn annotations(key: &Node, value: &Node) -> Tags {
    if value.head_comment.is_empty() {
        key.tags()
    } else {
        Tags::parse(&format!("{}\n{}", key.head_comment, value.head_comment))
    }
}

fn array_schema() -> Value {
    json!({"type": "array"})
}

fn unsupported(path: &str, kind: NodeKind) -> SchemaError {
    SchemaError::UnsupportedNodeKind {
        path: path.to_string(),
        kind: kind.as_str(),
    }
}
