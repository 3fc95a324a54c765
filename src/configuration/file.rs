use super::{document, Bindings, Configuration, ConfigurationEntry};
use crate::error::ConfigError;
use serde_json::Value as Json;
use std::path::{Path, PathBuf};
use std::sync::Arc;

#[cfg(feature = "logging")]
use tracing::debug;

/// Document formats, chosen by file extension
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Format {
    Json,
    Toml,
}

impl Format {
    fn of(path: &Path) -> Option<Format> {
        match path.extension()?.to_str()? {
            "json" => Some(Format::Json),
            "toml" => Some(Format::Toml),
            _ => None,
        }
    }

    fn parse(self, text: &str) -> Result<Json, String> {
        match self {
            Format::Json => serde_json::from_str(text).map_err(|e| e.to_string()),
            Format::Toml => toml::from_str(text).map_err(|e| e.to_string()),
        }
    }
}

/// Configuration read from a `.json` or `.toml` file.
///
/// The file is read every time [`Configuration::entry`] is called.
#[derive(Debug, Clone)]
pub struct FileConfiguration {
    bindings: Arc<Bindings>,
    path: PathBuf,
}

impl FileConfiguration {
    pub fn new(bindings: Arc<Bindings>, path: impl Into<PathBuf>) -> Self {
        Self {
            bindings,
            path: path.into(),
        }
    }

    #[inline]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read(&self) -> Result<Json, ConfigError> {
        if !self.path.exists() {
            return Err(ConfigError::Missing {
                path: self.path.clone(),
            });
        }

        let format = Format::of(&self.path).ok_or_else(|| ConfigError::UnsupportedFormat {
            path: self.path.clone(),
        })?;

        let text = std::fs::read_to_string(&self.path).map_err(|source| ConfigError::Io {
            path: self.path.clone(),
            source,
        })?;

        format.parse(&text).map_err(|reason| ConfigError::Syntax {
            path: self.path.clone(),
            reason,
        })
    }
}

impl Configuration for FileConfiguration {
    fn entry(&self) -> Result<ConfigurationEntry, ConfigError> {
        #[cfg(feature = "logging")]
        debug!(
            target: "container_config",
            path = %self.path.display(),
            "Loading configuration file"
        );

        let document = self.read()?;
        document::compile(&self.bindings, &self.path, &document)
    }
}

/// Configuration from an in-memory document.
///
/// `source` names the document in errors.
#[derive(Debug, Clone)]
pub struct ArrayConfiguration {
    bindings: Arc<Bindings>,
    source: PathBuf,
    document: Json,
}

impl ArrayConfiguration {
    pub fn new(bindings: Arc<Bindings>, source: impl Into<PathBuf>, document: Json) -> Self {
        Self {
            bindings,
            source: source.into(),
            document,
        }
    }
}

impl Configuration for ArrayConfiguration {
    fn entry(&self) -> Result<ConfigurationEntry, ConfigError> {
        document::compile(&self.bindings, &self.source, &self.document)
    }
}
