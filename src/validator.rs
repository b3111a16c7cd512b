//! Validation of variable trees against a recipe's derived schema.

use crate::error::RecipeError;
use crate::recipe::Recipe;
use jsonschema::JSONSchema;
use serde_json::Value;

/// Check `vars` against the schema of `recipe`.
///
/// Reports every violation, each prefixed with the JSON Pointer of the
/// offending value.
pub fn validate_vars(recipe: &Recipe<'_>, vars: &Value) -> Result<(), RecipeError> {
    let compiled =
        JSONSchema::compile(recipe.schema()).map_err(|err| RecipeError::InvalidSchema {
            recipe: recipe.name().to_string(),
            message: err.to_string(),
        })?;

    let violations: Vec<String> = match compiled.validate(vars) {
        Ok(()) => return Ok(()),
        Err(errors) => errors
            .map(|err| {
                let location = err.instance_path.to_string();
                let location = if location.is_empty() {
                    "/".to_string()
                } else {
                    location
                };
                format!("{location}: {err}")
            })
            .collect(),
    };

    Err(RecipeError::InvalidVars {
        recipe: recipe.name().to_string(),
        violations,
    })
}
