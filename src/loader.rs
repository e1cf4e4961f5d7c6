use std::fs;
use std::path::{Path, PathBuf};

use serde_json::Value;
use tracing::info;

use crate::config::ActivityConfig;
use crate::error::LoadError;
use crate::migrations::normalize;

/// Where raw activity JSON comes from.
pub trait ActivitySource {
    fn fetch(&self) -> Result<Value, LoadError>;

    /// Fetch and normalize. Only the fetch can fail.
    fn load(&self) -> Result<ActivityConfig, LoadError> {
        self.fetch().map(|raw| normalize(&raw))
    }
}

#[derive(Debug, Clone)]
pub struct FileActivitySource {
    path: PathBuf,
}

impl FileActivitySource {
    pub fn with_path<P: AsRef<Path>>(p: P) -> Self {
        Self {
            path: p.as_ref().to_path_buf(),
        }
    }

    /// Relative paths are looked up under `base` when it is given.
    pub fn resolve<P: AsRef<Path>>(p: P, base: Option<&Path>) -> Self {
        let p = p.as_ref();
        match base {
            Some(base) if p.is_relative() && !p.exists() => Self::with_path(base.join(p)),
            _ => Self::with_path(p),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ActivitySource for FileActivitySource {
    fn fetch(&self) -> Result<Value, LoadError> {
        let bytes = fs::read(&self.path).map_err(|e| LoadError::io(&self.path, e))?;
        let raw = serde_json::from_slice(&bytes).map_err(|e| LoadError::json(&self.path, e))?;
        info!(path = %self.path.display(), "activity config loaded");
        Ok(raw)
    }
}

/// Raw JSON already in memory.
#[derive(Debug, Clone)]
pub struct StaticActivitySource {
    raw: Value,
}

impl StaticActivitySource {
    pub fn new(raw: Value) -> Self {
        Self { raw }
    }
}

impl ActivitySource for StaticActivitySource {
    fn fetch(&self) -> Result<Value, LoadError> {
        Ok(self.raw.clone())
    }
}
