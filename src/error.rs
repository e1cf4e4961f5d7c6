use std::path::PathBuf;

/// Errors fetching raw activity JSON. These are the only hard failures a
/// student can see, reported before any session exists.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("could not read activity config from {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("activity config at {path} is not valid JSON: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

impl LoadError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub fn json(path: impl Into<PathBuf>, source: serde_json::Error) -> Self {
        Self::Json {
            path: path.into(),
            source,
        }
    }
}

/// A normalized config that cannot be drawn. Shown as an error screen.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("config is missing required fields: {}", .0.join(", "))]
    MissingFields(Vec<&'static str>),
}
