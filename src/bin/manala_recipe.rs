//! Inspect the recipes of a repository.
//!
//! Usage:
//!   manala-recipe --repository path/to/recipes list
//!   manala-recipe show php
//!   manala-recipe validate php --vars project.yaml

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use manala::{RecipeLoader, resolve_repository, validate_vars};
use serde_json::{Value, json};
use std::fs;
use std::path::PathBuf;
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "manala-recipe")]
#[command(about = "List, show and validate recipes of a repository")]
struct Cli {
    /// Recipe repository directory; defaults to $MANALA_REPOSITORY, then the
    /// current directory.
    #[arg(long, global = true)]
    repository: Option<PathBuf>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print every recipe name with its description.
    List,
    /// Dump a recipe as JSON.
    Show { name: String },
    /// Layer a YAML vars file over the recipe vars and validate the result.
    Validate {
        name: String,
        #[arg(long)]
        vars: PathBuf,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    if let Err(err) = run() {
        eprintln!("{err:#}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    let repository = resolve_repository(cli.repository.as_deref())?;
    let loader = RecipeLoader::new();

    match cli.command {
        Command::List => {
            let mut lines = Vec::new();
            loader
                .walk(&repository, |recipe| {
                    lines.push(format!("{}: {}", recipe.name(), recipe.description()));
                })
                .with_context(|| format!("walking repository {}", repository.source()))?;
            for line in lines {
                println!("{line}");
            }
        }
        Command::Show { name } => {
            let recipe = loader
                .load(&name, &repository)
                .with_context(|| format!("loading recipe {name}"))?;
            let dump = json!({
                "name": recipe.name(),
                "description": recipe.description(),
                "dir": recipe.dir().display().to_string(),
                "repository": recipe.repository().source(),
                "vars": recipe.vars(),
                "schema": recipe.schema(),
                "sync": recipe.sync_units(),
                "options": recipe.options(),
            });
            println!("{}", serde_json::to_string_pretty(&dump)?);
        }
        Command::Validate { name, vars } => {
            let mut recipe = loader
                .load(&name, &repository)
                .with_context(|| format!("loading recipe {name}"))?;
            let raw = fs::read_to_string(&vars)
                .with_context(|| format!("reading vars file {}", vars.display()))?;
            let overrides = match manala::document::decode(&raw)
                .with_context(|| format!("parsing vars file {}", vars.display()))?
            {
                Value::Object(map) => map,
                Value::Null => Default::default(),
                _ => anyhow::bail!("vars file {} must hold a mapping", vars.display()),
            };
            recipe.merge_vars(overrides);
            validate_vars(&recipe, &Value::Object(recipe.vars().clone()))?;
            info!(recipe = recipe.name(), "vars validated");
            println!("{}: vars valid", recipe.name());
        }
    }

    Ok(())
}
