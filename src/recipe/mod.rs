//! Recipes: scaffold templates described by a `.manala.yaml` config.
//!
//! The config document does double duty. Its reserved `manala` section
//! configures the loader (description, files to sync); everything else is
//! the recipe's variable defaults, and the shape of those defaults (refined
//! by `@schema` comment tags) becomes the schema project vars are validated
//! against.

pub mod config;
pub mod loader;
pub mod model;
pub mod schema;

pub use config::{ConfigViolation, RecipeConfig, parse_sync_unit};
pub use loader::{RecipeLoader, assemble};
pub use model::{Recipe, RecipeOption, SyncUnit};
pub use schema::{DerivedSchema, derive_schema};
