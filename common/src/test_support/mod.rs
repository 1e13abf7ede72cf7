//! Shared test helpers for sysconf crates.
//!
//! Locale resolution reads the environment through [`EnvProvider`], so tests
//! can describe an environment as a map instead of mutating the process
//! environment. Tests that must exercise [`crate::i18n::SystemEnv`] should use
//! `temp_env` to scope their changes.

use std::collections::HashMap;

use crate::i18n::EnvProvider;

/// Map-backed environment for deterministic locale tests.
///
/// # Examples
///
/// ```
/// use sysconf_common::i18n::{EnvProvider, message_locale};
/// use sysconf_common::test_support::StubEnv;
///
/// let env = StubEnv::from_pairs([("LANG", "cy_GB.UTF-8")]);
/// assert_eq!(env.var("LANG").as_deref(), Some("cy_GB.UTF-8"));
/// assert_eq!(message_locale(&env), "cy_GB.UTF-8");
/// ```
#[derive(Clone, Debug, Default)]
pub struct StubEnv {
    vars: HashMap<String, String>,
}

impl StubEnv {
    /// Build an environment from key/value pairs.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            vars: pairs
                .into_iter()
                .map(|(key, value)| (key.into(), value.into()))
                .collect(),
        }
    }

    /// Set `key` to `value`, returning the updated environment.
    #[must_use]
    pub fn with(mut self, key: &str, value: &str) -> Self {
        self.vars.insert(key.to_owned(), value.to_owned());
        self
    }
}

impl EnvProvider for StubEnv {
    fn var(&self, key: &str) -> Option<String> {
        self.vars.get(key).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::i18n::{LocaleCandidates, SystemEnv};
    use rstest::rstest;

    #[rstest]
    fn later_values_replace_earlier_ones() {
        let env = StubEnv::from_pairs([("LANG", "fr_FR")]).with("LANG", "de_DE");

        assert_eq!(env.var("LANG").as_deref(), Some("de_DE"));
        assert!(env.var("LC_ALL").is_none());
    }

    #[rstest]
    fn system_environment_feeds_candidates() {
        temp_env::with_vars(
            [
                ("LC_ALL", None),
                ("LC_MESSAGES", Some("es_ES.UTF-8")),
                ("LANG", Some("C")),
                ("LANGUAGE", Some("ca")),
            ],
            || {
                let candidates = LocaleCandidates::from_env(&SystemEnv);

                assert!(
                    candidates
                        .iter()
                        .eq(["ca", "es_es.utf-8", "es_es", "es.utf-8", "es"]),
                    "unexpected candidates {candidates}"
                );
            },
        );
    }
}
