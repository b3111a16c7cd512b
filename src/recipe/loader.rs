//! Recipe assembly from config files, and repository walking.

use crate::document;
use crate::error::RecipeError;
use crate::merge::kind_name;
use crate::recipe::config::RecipeConfig;
use crate::recipe::model::Recipe;
use crate::recipe::schema::derive_schema;
use crate::repository::Repository;
use crate::{RECIPE_CONFIG_FILE, RECIPE_CONFIG_KEY};
use serde_json::Value;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::{debug, trace};

/// Loads recipes out of a repository directory.
#[derive(Clone, Copy, Debug, Default)]
pub struct RecipeLoader;

impl RecipeLoader {
    pub fn new() -> Self {
        Self
    }

    /// Path of the config file inside a recipe directory.
    ///
    /// Fails with [`RecipeError::NotFound`] when the file is missing or is a
    /// directory.
    pub fn config_file(&self, dir: &Path) -> Result<PathBuf, RecipeError> {
        let path = dir.join(RECIPE_CONFIG_FILE);
        match fs::metadata(&path) {
            Ok(meta) if meta.is_dir() => Err(RecipeError::NotFound {
                path,
                reason: "is a directory".to_string(),
            }),
            Ok(_) => Ok(path),
            Err(err) if err.kind() == ErrorKind::NotFound => Err(RecipeError::NotFound {
                path,
                reason: "no such file".to_string(),
            }),
            Err(source) => Err(RecipeError::Io { path, source }),
        }
    }

    /// Find the recipe called `name`.
    ///
    /// Walks the whole repository, so a broken sibling recipe fails the
    /// lookup too. If several recipes share the name, the last one visited
    /// wins.
    pub fn load<'r>(
        &self,
        name: &str,
        repository: &'r Repository,
    ) -> Result<Recipe<'r>, RecipeError> {
        let mut found = None;
        self.walk(repository, |recipe| {
            if recipe.name() == name {
                found = Some(recipe);
            }
        })?;
        found.ok_or_else(|| RecipeError::RecipeNotFound {
            name: name.to_string(),
        })
    }

    /// Load every recipe of `repository` and hand each to `visit`.
    ///
    /// Candidates are the top-level directories not starting with `.`,
    /// visited in file name order. The first load failure aborts the walk.
    pub fn walk<'r, F>(&self, repository: &'r Repository, mut visit: F) -> Result<(), RecipeError>
    where
        F: FnMut(Recipe<'r>),
    {
        let io_error = |source| RecipeError::Io {
            path: repository.dir().to_path_buf(),
            source,
        };

        let mut candidates = Vec::new();
        for entry in fs::read_dir(repository.dir()).map_err(io_error)? {
            let entry = entry.map_err(io_error)?;
            let name = entry.file_name().to_string_lossy().into_owned();
            if name.starts_with('.') {
                trace!(name = %name, "skipping dot entry");
                continue;
            }
            if !entry.file_type().map_err(io_error)?.is_dir() {
                trace!(name = %name, "skipping non-directory entry");
                continue;
            }
            candidates.push((name, entry.path()));
        }
        candidates.sort_by(|(left, _), (right, _)| left.cmp(right));

        for (name, dir) in candidates {
            let recipe = self.load_dir(&name, &dir, repository)?;
            visit(recipe);
        }
        Ok(())
    }

    /// Load the recipe stored in `dir`.
    pub fn load_dir<'r>(
        &self,
        name: &str,
        dir: &Path,
        repository: &'r Repository,
    ) -> Result<Recipe<'r>, RecipeError> {
        let path = self.config_file(dir)?;
        debug!(name, path = %path.display(), "loading recipe");
        let text = fs::read_to_string(&path).map_err(|source| RecipeError::Io {
            path: path.clone(),
            source,
        })?;
        assemble(name, dir, repository, &path, &text)
    }
}

/// Build a recipe from the text of its config file.
///
/// `path` is only used to give errors their context. Nothing partial is
/// returned: any decode, validation or schema failure aborts.
pub fn assemble<'r>(
    name: &str,
    dir: &Path,
    repository: &'r Repository,
    path: &Path,
    text: &str,
) -> Result<Recipe<'r>, RecipeError> {
    let document = document::parse(text)
        .map_err(|source| RecipeError::Invalid {
            path: path.to_path_buf(),
            source,
        })?
        .ok_or_else(|| RecipeError::Empty {
            path: path.to_path_buf(),
        })?;

    let incorrect = |message: String| RecipeError::Incorrect {
        path: path.to_path_buf(),
        message,
    };
    let mut vars = match document::decode(text).map_err(|err| incorrect(err.to_string()))? {
        Value::Object(map) => map,
        other => {
            return Err(incorrect(format!(
                "expected a mapping at document root, found {}",
                kind_name(&other)
            )));
        }
    };

    let config = RecipeConfig::from_section(vars.remove(RECIPE_CONFIG_KEY))
        .map_err(|err| incorrect(format!("{RECIPE_CONFIG_KEY}: {err}")))?;
    config
        .validate()
        .map_err(|violation| RecipeError::Validation {
            path: path.to_path_buf(),
            field: violation.field,
            constraint: violation.constraint,
        })?;

    let mut recipe = Recipe::new(name, config.description, dir, repository);
    recipe.merge_vars(vars);
    recipe.add_sync_units(config.sync);

    let derived = derive_schema(&document).map_err(|source| RecipeError::Schema {
        path: path.to_path_buf(),
        source,
    })?;
    recipe.set_schema(derived.schema);
    recipe.add_options(derived.options);

    Ok(recipe)
}
