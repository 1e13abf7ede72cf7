//! Shared locale and charset utilities for the sysconf workspace.

pub mod encoding;
pub mod i18n;
pub mod test_support;

pub use encoding::Charmap;
pub use i18n::{EnvProvider, LocaleCandidates, SystemEnv, locale_variants, normalise_locale};
