//! Typed view of the reserved `manala` section of a recipe config.

use crate::recipe::model::SyncUnit;
use serde::Deserialize;
use serde_json::Value;

#[derive(Clone, Debug, Default, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct RecipeConfig {
    pub description: String,
    #[serde(deserialize_with = "deserialize_sync")]
    pub sync: Vec<SyncUnit>,
}

/// A field of [`RecipeConfig`] that failed its constraint.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ConfigViolation {
    pub field: &'static str,
    pub constraint: &'static str,
}

impl RecipeConfig {
    /// Decode the section value; a missing or null section decodes to the
    /// defaults and is left for [`RecipeConfig::validate`] to reject.
    pub fn from_section(section: Option<Value>) -> Result<Self, serde_json::Error> {
        match section {
            None | Some(Value::Null) => Ok(Self::default()),
            Some(value) => serde_json::from_value(value),
        }
    }

    pub fn validate(&self) -> Result<(), ConfigViolation> {
        if self.description.trim().is_empty() {
            return Err(ConfigViolation {
                field: "description",
                constraint: "required",
            });
        }
        Ok(())
    }
}

/// Sync declarations as written: `"src"`, `"src dst"`, or a mapping.
#[derive(Clone, Debug, Deserialize)]
#[serde(untagged)]
enum SyncDeclaration {
    Text(String),
    Pair {
        source: String,
        #[serde(default)]
        destination: Option<String>,
    },
}

impl SyncDeclaration {
    fn into_unit(self) -> SyncUnit {
        match self {
            SyncDeclaration::Text(raw) => parse_sync_unit(&raw),
            SyncDeclaration::Pair {
                source,
                destination: Some(destination),
            } => SyncUnit::new(source, destination),
            SyncDeclaration::Pair {
                source,
                destination: None,
            } => SyncUnit::mirrored(source),
        }
    }
}

/// Split `"source destination"` on the first space; a lone path syncs onto
/// itself.
pub fn parse_sync_unit(raw: &str) -> SyncUnit {
    match raw.split_once(' ') {
        Some((source, destination)) if !destination.trim().is_empty() => {
            SyncUnit::new(source, destination.trim())
        }
        Some((source, _)) => SyncUnit::mirrored(source),
        None => SyncUnit::mirrored(raw),
    }
}

fn deserialize_sync<'de, D>(deserializer: D) -> Result<Vec<SyncUnit>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let declarations = Option::<Vec<SyncDeclaration>>::deserialize(deserializer)?;
    Ok(declarations
        .unwrap_or_default()
        .into_iter()
        .map(SyncDeclaration::into_unit)
        .collect())
}
