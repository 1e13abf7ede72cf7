//! Platform directory lookup.
//!
//! The trait lets tests substitute fixed directories for the user's real
//! data and configuration locations.

use std::path::PathBuf;

use camino::Utf8PathBuf;
use directories_next::ProjectDirs;

use crate::error::{Result, ToolError};

/// File name of the templates store inside the data directory.
pub const TEMPLATES_FILE: &str = "templates.json";

/// File name of the config store inside the data directory.
pub const CONFIG_FILE: &str = "config.json";

/// File name of the configuration file inside the config directory.
pub const SETTINGS_FILE: &str = "sysconf.toml";

/// Source of the per-user directories sysconf reads and writes.
#[cfg_attr(test, mockall::automock)]
pub trait BaseDirs {
    /// Directory holding the database files.
    fn sysconf_data_dir(&self) -> Option<PathBuf>;

    /// Directory holding `sysconf.toml`.
    fn sysconf_config_dir(&self) -> Option<PathBuf>;
}

/// [`BaseDirs`] backed by the platform conventions.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemBaseDirs;

impl SystemBaseDirs {
    fn project() -> Option<ProjectDirs> {
        ProjectDirs::from("", "", "sysconf")
    }
}

impl BaseDirs for SystemBaseDirs {
    fn sysconf_data_dir(&self) -> Option<PathBuf> {
        Self::project().map(|dirs| dirs.data_dir().to_path_buf())
    }

    fn sysconf_config_dir(&self) -> Option<PathBuf> {
        Self::project().map(|dirs| dirs.config_dir().to_path_buf())
    }
}

/// Default location of the `store` database file.
///
/// # Errors
///
/// Returns [`ToolError::NoDefaultPath`] when the data directory is unknown
/// and [`ToolError::NonUtf8Path`] when it is not valid UTF-8.
pub fn default_store_path(dirs: &dyn BaseDirs, store: &'static str) -> Result<Utf8PathBuf> {
    let base = dirs
        .sysconf_data_dir()
        .ok_or(ToolError::NoDefaultPath { store })?;
    let base = utf8(base)?;
    let file = if store == sysconf::database::TEMPLATES_STORE {
        TEMPLATES_FILE
    } else {
        CONFIG_FILE
    };
    Ok(base.join(file))
}

/// Default location of the configuration file, if one can be named.
///
/// # Errors
///
/// Returns [`ToolError::NonUtf8Path`] when the config directory is not valid
/// UTF-8.
pub fn default_settings_path(dirs: &dyn BaseDirs) -> Result<Option<Utf8PathBuf>> {
    dirs.sysconf_config_dir()
        .map(|base| utf8(base).map(|dir| dir.join(SETTINGS_FILE)))
        .transpose()
}

fn utf8(path: PathBuf) -> Result<Utf8PathBuf> {
    Utf8PathBuf::from_path_buf(path).map_err(|path| ToolError::NonUtf8Path {
        path: path.display().to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use sysconf::database::{CONFIG_STORE, TEMPLATES_STORE};

    #[rstest]
    #[case::templates(TEMPLATES_STORE, "/home/test/.local/share/sysconf/templates.json")]
    #[case::config(CONFIG_STORE, "/home/test/.local/share/sysconf/config.json")]
    fn store_paths_live_in_the_data_dir(#[case] store: &'static str, #[case] expected: &str) {
        let mut dirs = MockBaseDirs::new();
        dirs.expect_sysconf_data_dir()
            .returning(|| Some(PathBuf::from("/home/test/.local/share/sysconf")));

        let path = default_store_path(&dirs, store).expect("path should resolve");

        assert_eq!(path, Utf8PathBuf::from(expected));
    }

    #[test]
    fn missing_data_dir_is_reported() {
        let mut dirs = MockBaseDirs::new();
        dirs.expect_sysconf_data_dir().return_const(None);

        let err = default_store_path(&dirs, CONFIG_STORE).expect_err("no data dir");

        assert!(matches!(err, ToolError::NoDefaultPath { store } if store == CONFIG_STORE));
    }

    #[test]
    fn settings_path_is_optional() {
        let mut dirs = MockBaseDirs::new();
        dirs.expect_sysconf_config_dir().return_const(None);

        let path = default_settings_path(&dirs).expect("absent dir is not an error");

        assert!(path.is_none());
    }

    #[cfg(unix)]
    #[test]
    fn non_utf8_data_dir_is_rejected() {
        use std::ffi::OsString;
        use std::os::unix::ffi::OsStringExt;

        let mut dirs = MockBaseDirs::new();
        dirs.expect_sysconf_data_dir().return_once(|| {
            Some(PathBuf::from(OsString::from_vec(vec![
                b'/', b't', b'm', b'p', b'/', 0xff,
            ])))
        });

        let err = default_store_path(&dirs, TEMPLATES_STORE).expect_err("not UTF-8");

        assert!(matches!(err, ToolError::NonUtf8Path { .. }), "unexpected error: {err}");
    }
}
