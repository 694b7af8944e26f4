//! Configuration management for unicampi.
//!
//! Settings are read from `unicampi.yaml` in the working directory when it
//! exists. Every key is optional:
//!
//! ```yaml
//! data-file: offerings.jsonl
//! id-field: code
//! required-fields: [term]
//! separator: "\n"
//! ```

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tokio::fs;
use unicampi_query::locator::DEFAULT_SEPARATOR;

use crate::error::{Error, Result};

/// Name of the configuration file looked up in the working directory.
pub const CONFIG_FILE_NAME: &str = "unicampi.yaml";

/// Snapshot read when no data file is configured.
pub const DEFAULT_DATA_FILE: &str = "records.jsonl";

/// Record field used as the entry id when none is configured.
pub const DEFAULT_ID_FIELD: &str = "id";

/// Configuration file structure for unicampi
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default, rename_all = "kebab-case", deny_unknown_fields)]
pub struct UnicampiConfig {
    /// JSONL snapshot queried by `query` and `find`
    pub data_file: PathBuf,

    /// Record field holding the entry id
    pub id_field: String,

    /// Query keys that must be given before records are listed
    pub required_fields: Vec<String>,

    /// Separator used by `locate` to split text into segments
    pub separator: String,
}

impl Default for UnicampiConfig {
    fn default() -> Self {
        Self {
            data_file: PathBuf::from(DEFAULT_DATA_FILE),
            id_field: DEFAULT_ID_FIELD.to_string(),
            required_fields: Vec::new(),
            separator: DEFAULT_SEPARATOR.to_string(),
        }
    }
}

impl UnicampiConfig {
    /// Load configuration from a file
    ///
    /// # Errors
    ///
    /// Returns `Error::Io` if the file cannot be read and `Error::Config` if
    /// it is not valid configuration YAML.
    pub async fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).await?;
        Self::parse(&content)
    }

    /// Parse configuration from YAML text. Empty text yields the defaults.
    ///
    /// # Errors
    ///
    /// Returns `Error::Config` on invalid YAML, unknown keys or an empty
    /// separator.
    pub fn parse(content: &str) -> Result<Self> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        let config: Self =
            serde_yaml::from_str(content).map_err(|e| Error::Config(e.to_string()))?;
        if config.separator.is_empty() {
            return Err(Error::Config("separator must not be empty".to_string()));
        }
        Ok(config)
    }

    /// Load `unicampi.yaml` from `dir`, or the defaults if there is none.
    ///
    /// # Errors
    ///
    /// See [`load`](Self::load).
    pub async fn discover(dir: &Path) -> Result<Self> {
        let path = dir.join(CONFIG_FILE_NAME);
        if fs::try_exists(&path).await? {
            tracing::debug!(path = %path.display(), "loading configuration");
            Self::load(&path).await
        } else {
            Ok(Self::default())
        }
    }
}
