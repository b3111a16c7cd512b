//! Error taxonomy for recipe loading.
//!
//! Every variant carries the config file or the in-document path that caused
//! it so callers can surface the failure without further context.

use std::path::PathBuf;
use thiserror::Error;

/// Failure while loading or walking recipes.
#[derive(Debug, Error)]
pub enum RecipeError {
    #[error("recipe config \"{}\" not found ({reason})", path.display())]
    NotFound { path: PathBuf, reason: String },

    #[error("unable to read \"{}\": {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("empty recipe config \"{}\"", path.display())]
    Empty { path: PathBuf },

    #[error("invalid recipe config \"{}\" ({source})", path.display())]
    Invalid {
        path: PathBuf,
        #[source]
        source: yaml_rust2::scanner::ScanError,
    },

    #[error("incorrect recipe config \"{}\" ({message})", path.display())]
    Incorrect { path: PathBuf, message: String },

    #[error(
        "recipe config \"{}\": field '{field}' failed on the '{constraint}' constraint",
        path.display()
    )]
    Validation {
        path: PathBuf,
        field: &'static str,
        constraint: &'static str,
    },

    #[error("recipe config \"{}\": {source}", path.display())]
    Schema {
        path: PathBuf,
        #[source]
        source: SchemaError,
    },

    #[error("recipe \"{name}\" not found")]
    RecipeNotFound { name: String },

    #[error("recipe \"{recipe}\" schema does not compile: {message}")]
    InvalidSchema { recipe: String, message: String },

    #[error("recipe \"{recipe}\" vars failed validation:\n{}", violations.join("\n"))]
    InvalidVars {
        recipe: String,
        violations: Vec<String>,
    },
}

/// Failure while deriving a schema from a document tree.
#[derive(Debug, Error)]
pub enum SchemaError {
    #[error("invalid recipe schema tag at \"{path}\": {source}")]
    InvalidTag {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("unable to merge recipe schema tag at \"{path}\": {source}")]
    MergeFailed {
        path: String,
        #[source]
        source: MergeError,
    },

    #[error("unknown node kind {kind} at \"{path}\"")]
    UnsupportedNodeKind { path: String, kind: &'static str },
}

/// Failure while deep-merging two values.
#[derive(Debug, Error)]
pub enum MergeError {
    #[error("cannot merge into a {found} (expected an object)")]
    NotAnObject { found: &'static str },
}

/// Failure while decoding document text into a generic value tree.
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("yaml: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("unsupported {found} mapping key")]
    Key { found: &'static str },

    #[error("number {found} has no JSON form")]
    Number { found: String },
}
