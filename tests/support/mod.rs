#![allow(dead_code)]

use anyhow::{Context, Result};
use manala::{RECIPE_CONFIG_FILE, Repository};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

// Recipe repository laid out in a temp dir; removed on drop.
pub struct FixtureRepository {
    temp: TempDir,
}

impl FixtureRepository {
    pub fn new() -> Result<Self> {
        let temp = TempDir::new().context("failed to allocate temp repository")?;
        Ok(Self { temp })
    }

    pub fn path(&self) -> &Path {
        self.temp.path()
    }

    pub fn repository(&self) -> Repository {
        Repository::local(self.temp.path())
    }

    /// Create `name/` holding `config` as its recipe config.
    pub fn recipe(&self, name: &str, config: &str) -> Result<PathBuf> {
        let dir = self.dir(name)?;
        fs::write(dir.join(RECIPE_CONFIG_FILE), config)
            .with_context(|| format!("failed to write config for {name}"))?;
        Ok(dir)
    }

    /// Create an empty `name/` directory.
    pub fn dir(&self, name: &str) -> Result<PathBuf> {
        let dir = self.temp.path().join(name);
        fs::create_dir_all(&dir)
            .with_context(|| format!("failed to create {}", dir.display()))?;
        Ok(dir)
    }

    pub fn file(&self, name: &str, contents: &str) -> Result<PathBuf> {
        let path = self.temp.path().join(name);
        fs::write(&path, contents)
            .with_context(|| format!("failed to write {}", path.display()))?;
        Ok(path)
    }
}

pub const LOAD_CONFIG: &str = "manala:\n  description: Load\nfoo: bar\n";
