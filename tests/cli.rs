// manala-recipe behavior guard rails: listing, dumping and validating recipes
// of a fixture repository.
mod support;

use anyhow::{Context, Result};
use serde_json::Value;
use std::process::{Command, Output};
use support::{FixtureRepository, LOAD_CONFIG};

const OPTIONS_CONFIG: &str = r#"manala:
  description: Options
  sync:
    - templates/foo.tmpl foo.txt
foo:
  name: foo
  # @option Foo bar
  # @schema {"enum": ["bar", "baz"]}
  bar: bar
"#;

fn manala_recipe(fixture: &FixtureRepository, args: &[&str]) -> Result<Output> {
    Command::new(env!("CARGO_BIN_EXE_manala-recipe"))
        .arg("--repository")
        .arg(fixture.path())
        .args(args)
        .env_remove("MANALA_REPOSITORY")
        .env_remove("RUST_LOG")
        .output()
        .context("failed to run manala-recipe")
}

#[test]
fn list_prints_recipes_in_name_order() -> Result<()> {
    let fixture = FixtureRepository::new()?;
    fixture.recipe("options", OPTIONS_CONFIG)?;
    fixture.recipe("load", LOAD_CONFIG)?;

    let output = manala_recipe(&fixture, &["list"])?;
    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));
    assert_eq!(
        String::from_utf8(output.stdout)?,
        "load: Load\noptions: Options\n"
    );
    Ok(())
}

#[test]
fn show_dumps_recipe_as_json() -> Result<()> {
    let fixture = FixtureRepository::new()?;
    fixture.recipe("options", OPTIONS_CONFIG)?;

    let output = manala_recipe(&fixture, &["show", "options"])?;
    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));
    let dump: Value = serde_json::from_slice(&output.stdout)?;
    assert_eq!(dump["description"], "Options");
    assert_eq!(dump["vars"]["foo"]["bar"], "bar");
    assert_eq!(dump["sync"][0]["source"], "templates/foo.tmpl");
    assert_eq!(dump["sync"][0]["destination"], "foo.txt");
    assert_eq!(dump["options"][0]["path"], "/foo/bar");
    assert_eq!(
        dump["schema"]["properties"]["foo"]["properties"]["bar"]["enum"][1],
        "baz"
    );
    Ok(())
}

#[test]
fn validate_layers_vars_file_over_defaults() -> Result<()> {
    let fixture = FixtureRepository::new()?;
    fixture.recipe("options", OPTIONS_CONFIG)?;
    let good = fixture.file("good.yaml", "foo:\n  bar: baz\n")?;
    let bad = fixture.file("bad.yaml", "foo:\n  bar: qux\n")?;

    let output = manala_recipe(
        &fixture,
        &["validate", "options", "--vars", &good.display().to_string()],
    )?;
    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));
    assert_eq!(String::from_utf8(output.stdout)?, "options: vars valid\n");

    let output = manala_recipe(
        &fixture,
        &["validate", "options", "--vars", &bad.display().to_string()],
    )?;
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("/foo/bar"), "stderr was: {stderr}");
    Ok(())
}

#[test]
fn unknown_recipe_exits_non_zero() -> Result<()> {
    let fixture = FixtureRepository::new()?;
    fixture.recipe("load", LOAD_CONFIG)?;

    let output = manala_recipe(&fixture, &["show", "missing"])?;
    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("recipe \"missing\" not found"),
        "stderr was: {stderr}"
    );
    Ok(())
}
