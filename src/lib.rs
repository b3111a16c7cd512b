//! Recipe loading for project scaffolding.
//!
//! A repository is a directory of recipes; each recipe directory carries a
//! `.manala.yaml` config. [`RecipeLoader`] walks repositories and assembles
//! [`Recipe`]s: description, variable defaults, a JSON Schema derived from the
//! config's shape, sync units and declared options.

pub mod document;
pub mod error;
pub mod merge;
pub mod recipe;
pub mod repository;
pub mod validator;

pub use error::{DecodeError, MergeError, RecipeError, SchemaError};
pub use recipe::{
    DerivedSchema, Recipe, RecipeConfig, RecipeLoader, RecipeOption, SyncUnit, assemble,
    derive_schema, parse_sync_unit,
};
pub use repository::Repository;
pub use validator::validate_vars;

use anyhow::{Result, bail};
use std::env;
use std::path::{Path, PathBuf};

/// Config file name inside every recipe directory.
pub const RECIPE_CONFIG_FILE: &str = ".manala.yaml";
/// Top-level config key reserved for the loader.
pub const RECIPE_CONFIG_KEY: &str = "manala";
/// Schema path of [`RECIPE_CONFIG_KEY`]; never part of vars, schema or options.
pub const RECIPE_CONFIG_PATH: &str = "/manala";

const ENV_REPOSITORY: &str = "MANALA_REPOSITORY";

/// Resolve the repository to work on.
///
/// Precedence: the explicit path, then `MANALA_REPOSITORY`, then the current
/// directory. The chosen directory must exist.
pub fn resolve_repository(explicit: Option<&Path>) -> Result<Repository> {
    let dir = match explicit {
        Some(path) => path.to_path_buf(),
        None => match env::var(ENV_REPOSITORY) {
            Ok(hint) if !hint.trim().is_empty() => PathBuf::from(hint),
            _ => env::current_dir()?,
        },
    };

    if !dir.is_dir() {
        bail!(
            "Unable to locate recipe repository {}. Pass --repository or set {ENV_REPOSITORY}.",
            dir.display()
        );
    }
    Ok(Repository::local(dir))
}
