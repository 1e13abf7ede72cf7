//! Configuration for the sysconf database.
//!
//! Settings live in a TOML file and may be overridden from the environment.
//! Every key is optional; an empty file yields the defaults, and unknown keys
//! are rejected so typos do not pass silently.

use camino::{Utf8Path, Utf8PathBuf};
use log::debug;
use serde::Deserialize;
use sysconf_common::{Charmap, EnvProvider, normalise_locale};

use crate::database::Settings;
use crate::error::{Result, SysconfError};

/// Environment variable enabling raw `-C` values.
pub const C_VALUES_ENV: &str = "SYSCONF_C_VALUES";

/// Environment variable naming the output charset.
pub const CHARMAP_ENV: &str = "SYSCONF_CHARMAP";

/// Sysconf configuration file contents.
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct SysconfConfig {
    /// Read untranslated `-C` values instead of localised ones.
    pub c_values: bool,
    /// Charset label overriding the one named by the message locale.
    ///
    /// Blank values are treated as absent.
    pub charmap: Option<String>,
    /// Path of the file-backed templates store.
    pub templates_db: Option<Utf8PathBuf>,
    /// Path of the file-backed config store.
    pub config_db: Option<Utf8PathBuf>,
}

impl SysconfConfig {
    /// Parse configuration from TOML text.
    ///
    /// # Errors
    ///
    /// Returns [`SysconfError::ConfigParse`] for malformed TOML or unknown
    /// keys.
    ///
    /// # Examples
    ///
    /// ```
    /// use sysconf::SysconfConfig;
    ///
    /// let config = SysconfConfig::from_toml_str("c_values = true\n").expect("valid config");
    /// assert!(config.c_values);
    /// assert!(config.charmap.is_none());
    /// ```
    pub fn from_toml_str(source: &str) -> Result<Self> {
        Ok(toml::from_str(source)?)
    }

    /// Read and parse the configuration file at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`SysconfError::ConfigRead`] when the file cannot be read and
    /// [`SysconfError::ConfigParse`] when it is invalid.
    pub fn load_from(path: &Utf8Path) -> Result<Self> {
        let source = std::fs::read_to_string(path).map_err(|source| SysconfError::ConfigRead {
            path: path.to_owned(),
            source,
        })?;
        debug!(target: "sysconf::config", "loaded configuration from {path}");
        Self::from_toml_str(&source)
    }

    /// Apply `SYSCONF_*` overrides read through `env`.
    #[must_use]
    pub fn with_env_overrides(mut self, env: &dyn EnvProvider) -> Self {
        if let Some(value) = env.var(C_VALUES_ENV) {
            self.c_values = is_truthy(&value);
        }
        if let Some(label) = normalise_locale(env.var(CHARMAP_ENV).as_deref()) {
            self.charmap = Some(label.to_owned());
        }
        self
    }

    /// Runtime settings derived from this configuration.
    #[must_use]
    pub fn settings(&self) -> Settings {
        Settings {
            c_values: self.c_values,
            ..Settings::default()
        }
    }

    /// Charmap to render values in.
    ///
    /// The configured label wins when it names a known charset; otherwise the
    /// codeset of the message locale in `env` is used.
    #[must_use]
    pub fn charmap(&self, env: &dyn EnvProvider) -> Option<Charmap> {
        normalise_locale(self.charmap.as_deref())
            .and_then(Charmap::for_label)
            .or_else(|| Charmap::from_env(env))
    }
}

fn is_truthy(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}
