//! Build-time configuration for Kudos.
//!
//! The global feature toggles live in a `kudos.toml` next to the crate being
//! compiled. They are read once per compilation and consulted as booleans.

use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};
use thiserror::Error as ThisError;

/// File name looked up by [`KudosConfig::load_from_dir`].
pub const CONFIG_FILE_NAME: &str = "kudos.toml";

///
/// ConfigError
///

#[derive(Debug, ThisError)]
#[remain::sorted]
pub enum ConfigError {
    #[error("failed to read config file '{path}': {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
}

///
/// KudosConfig
/// top-level document, everything lives under the `[kudos]` table
///

#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct KudosConfig {
    pub kudos: Options,
}

impl KudosConfig {
    /// Parse a config document from TOML text.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    /// Load a config document from an explicit path.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        Self::from_toml_str(&text)
    }

    /// Load `kudos.toml` from a directory, falling back to defaults when the
    /// file does not exist.
    pub fn load_from_dir(dir: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = dir.as_ref().join(CONFIG_FILE_NAME);
        if !path.exists() {
            return Ok(Self::default());
        }

        Self::load(path)
    }

    #[must_use]
    pub const fn options(&self) -> Options {
        self.kudos
    }
}

///
/// Options
///
/// Global feature toggles. Per-class marker flags can switch the adapter and
/// reader features on for a single class; they can never switch the
/// validator back on once it is disabled here.
///

#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct Options {
    pub disable_validator: bool,
    pub reflective_adapter: bool,
    pub streaming_reader: bool,
}

impl Options {
    #[must_use]
    pub const fn validator_enabled(self) -> bool {
        !self.disable_validator
    }

    #[must_use]
    pub const fn with_streaming_reader(mut self, enabled: bool) -> Self {
        self.streaming_reader = enabled;
        self
    }

    #[must_use]
    pub const fn with_reflective_adapter(mut self, enabled: bool) -> Self {
        self.reflective_adapter = enabled;
        self
    }

    #[must_use]
    pub const fn with_validator_disabled(mut self, disabled: bool) -> Self {
        self.disable_validator = disabled;
        self
    }
}

///
/// TESTS
///
