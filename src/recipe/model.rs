use crate::merge::merge_objects;
use crate::repository::Repository;
use serde::Serialize;
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};

/// One file or directory to place into a project.
///
/// Both ends are always populated; a lone source syncs onto itself.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SyncUnit {
    pub source: String,
    pub destination: String,
}

impl SyncUnit {
    pub fn new(source: impl Into<String>, destination: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            destination: destination.into(),
        }
    }

    pub fn mirrored(path: impl Into<String>) -> Self {
        let path = path.into();
        Self {
            destination: path.clone(),
            source: path,
        }
    }
}

/// A recipe variable surfaced for interactive editing.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct RecipeOption {
    pub label: String,
    /// JSON Pointer to the variable inside the recipe vars (`/foo/bar`).
    pub path: String,
    pub schema: Value,
}

/// A scaffold template loaded from one repository subdirectory.
#[derive(Clone, Debug)]
pub struct Recipe<'r> {
    name: String,
    description: String,
    dir: PathBuf,
    repository: &'r Repository,
    vars: Map<String, Value>,
    schema: Value,
    sync_units: Vec<SyncUnit>,
    options: Vec<RecipeOption>,
}

impl<'r> Recipe<'r> {
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        dir: impl Into<PathBuf>,
        repository: &'r Repository,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            dir: dir.into(),
            repository,
            vars: Map::new(),
            schema: Value::Object(Map::new()),
            sync_units: Vec::new(),
            options: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn repository(&self) -> &'r Repository {
        self.repository
    }

    pub fn vars(&self) -> &Map<String, Value> {
        &self.vars
    }

    /// Deep-merge `vars` over the current vars; incoming leaves win.
    pub fn merge_vars(&mut self, vars: Map<String, Value>) {
        merge_objects(&mut self.vars, vars);
    }

    pub fn schema(&self) -> &Value {
        &self.schema
    }

    pub fn sync_units(&self) -> &[SyncUnit] {
        &self.sync_units
    }

    /// Append units as given; order and duplicates are kept.
    pub fn add_sync_units(&mut self, units: impl IntoIterator<Item = SyncUnit>) {
        self.sync_units.extend(units);
    }

    pub fn options(&self) -> &[RecipeOption] {
        &self.options
    }

    /// Current value of the variable an option points at.
    pub fn option_value(&self, option: &RecipeOption) -> Option<&Value> {
        let mut segments = pointer_segments(&option.path);
        let first = segments.next()?;
        let mut current = self.vars.get(&first)?;
        for segment in segments {
            current = match current {
                Value::Object(map) => map.get(&segment)?,
                Value::Array(items) => items.get(segment.parse::<usize>().ok()?)?,
                _ => return None,
            };
        }
        Some(current)
    }

    pub(crate) fn set_schema(&mut self, schema: Value) {
        self.schema = schema;
    }

    pub(crate) fn add_options(&mut self, options: impl IntoIterator<Item = RecipeOption>) {
        self.options.extend(options);
    }
}

/// Append `key` to a JSON Pointer, escaping `~` and `/`.
pub(crate) fn join_pointer(parent: &str, key: &str) -> String {
    let token = key.replace('~', "~0").replace('/', "~1");
    if parent.ends_with('/') {
        format!("{parent}{token}")
    } else {
        format!("{parent}/{token}")
    }
}

fn pointer_segments(pointer: &str) -> impl Iterator<Item = String> + '_ {
    pointer
        .split('/')
        .skip(1)
        .map(|token| token.replace("~1", "/").replace("~0", "~"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn object(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            other => panic!("expected object, got {other}"),
        }
    }

    #[test]
    fn merge_vars_layers_with_override() {
        let repository = Repository::local("/tmp/repository");
        let mut recipe = Recipe::new("foo", "Foo", "/tmp/repository/foo", &repository);
        recipe.merge_vars(object(json!({"a": {"x": 1, "y": 2}})));
        recipe.merge_vars(object(json!({"a": {"y": 3, "z": 4}})));
        assert_eq!(
            Value::Object(recipe.vars().clone()),
            json!({"a": {"x": 1, "y": 3, "z": 4}})
        );
    }

    #[test]
    fn add_sync_units_keeps_order_and_duplicates() {
        let repository = Repository::local("/tmp/repository");
        let mut recipe = Recipe::new("foo", "Foo", "/tmp/repository/foo", &repository);
        recipe.add_sync_units([SyncUnit::mirrored("a"), SyncUnit::new("b", "c")]);
        recipe.add_sync_units([SyncUnit::mirrored("a")]);
        assert_eq!(
            recipe.sync_units(),
            [
                SyncUnit::mirrored("a"),
                SyncUnit::new("b", "c"),
                SyncUnit::mirrored("a")
            ]
        );
    }

    #[test]
    fn pointers_escape_and_resolve_keys() {
        assert_eq!(join_pointer("/", "foo"), "/foo");
        assert_eq!(join_pointer("/foo", "a/b~c"), "/foo/a~1b~0c");

        let repository = Repository::local("/tmp/repository");
        let mut recipe = Recipe::new("foo", "Foo", "/tmp/repository/foo", &repository);
        recipe.merge_vars(object(json!({"foo": {"a/b~c": [10, 20]}})));
        let option = RecipeOption {
            label: "Second".to_string(),
            path: "/foo/a~1b~0c/1".to_string(),
            schema: json!({}),
        };
        assert_eq!(recipe.option_value(&option), Some(&json!(20)));
    }
}
