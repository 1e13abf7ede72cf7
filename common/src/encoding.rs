//! Charmap handling for localised template values.
//!
//! Template files may carry fields such as `Description-ru.KOI8-R`, declaring
//! the charset the translation was written in. Values are held as Unicode
//! text once loaded, so a conversion succeeds when the text can be expressed
//! both in the declared charset and in the charset of the active terminal.
//! Labels follow the WHATWG encoding registry, which accepts the spellings
//! found in locale names (`UTF-8`, `utf8`, `ISO-8859-15`, `KOI8-R`, ...).

use std::fmt;

use encoding_rs::Encoding;
use log::trace;

use crate::i18n::{EnvProvider, locale_codeset, message_locale};

/// The charset output is rendered in.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct Charmap {
    active: &'static Encoding,
}

impl fmt::Debug for Charmap {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("Charmap")
            .field("active", &self.active.name())
            .finish()
    }
}

impl Charmap {
    /// Look up a charmap by label, returning `None` for unknown labels.
    ///
    /// ```
    /// use sysconf_common::encoding::Charmap;
    ///
    /// assert_eq!(Charmap::for_label("utf8").map(|map| map.name()), Some("UTF-8"));
    /// assert!(Charmap::for_label("no-such-charset").is_none());
    /// ```
    #[must_use]
    pub fn for_label(label: &str) -> Option<Self> {
        Encoding::for_label(label.trim().as_bytes()).map(|active| Self { active })
    }

    /// Derive the charmap from a locale string such as `fr_FR.UTF-8`.
    ///
    /// Locales without a codeset (including `C` and `POSIX`) yield `None`,
    /// which disables charset conversion during field resolution.
    #[must_use]
    pub fn from_locale(locale: &str) -> Option<Self> {
        locale_codeset(locale).and_then(|codeset| Self::for_label(&codeset))
    }

    /// Derive the charmap from the message locale in the environment.
    #[must_use]
    pub fn from_env(env: &dyn EnvProvider) -> Option<Self> {
        Self::from_locale(&message_locale(env))
    }

    /// Canonical name of the active charset.
    #[must_use]
    pub fn name(&self) -> &'static str {
        self.active.name()
    }

    /// Convert `value`, declared to be in the charset labelled `from`, to the
    /// active charset.
    ///
    /// Returns `None` when `from` is not a known label or when a character of
    /// `value` cannot be represented in either charset.
    ///
    /// ```
    /// use sysconf_common::encoding::Charmap;
    ///
    /// let latin1 = Charmap::for_label("ISO-8859-1").expect("known label");
    /// assert_eq!(latin1.convert("utf-8", "déjà vu").as_deref(), Some("déjà vu"));
    /// assert_eq!(latin1.convert("utf-8", "日本語"), None);
    /// ```
    #[must_use]
    pub fn convert(&self, from: &str, value: &str) -> Option<String> {
        let Some(source) = Encoding::for_label(from.trim().as_bytes()) else {
            trace!(target: "encoding", "unknown charset label `{from}`");
            return None;
        };

        if !representable(source, value) {
            trace!(target: "encoding", "value is not representable in {}", source.name());
            return None;
        }

        if !representable(self.active, value) {
            trace!(target: "encoding", "value is not representable in {}", self.name());
            return None;
        }

        Some(value.to_owned())
    }
}

/// Whether `value` survives an encode/decode round trip through `encoding`.
fn representable(encoding: &'static Encoding, value: &str) -> bool {
    // UTF-16 labels encode to UTF-8 per the encoding standard; every Unicode
    // scalar value is representable in them.
    let encoder = encoding.output_encoding();
    let (bytes, _, unmappable) = encoder.encode(value);
    if unmappable {
        return false;
    }
    let (decoded, malformed) = encoder.decode_without_bom_handling(&bytes);
    !malformed && decoded == value
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::StubEnv;
    use rstest::rstest;

    #[rstest]
    #[case("fr_FR.UTF-8", Some("UTF-8"))]
    #[case("de_DE.ISO-8859-15@euro", Some("ISO-8859-15"))]
    #[case("ru_RU.KOI8-R", Some("KOI8-R"))]
    #[case("fr_FR", None)]
    #[case("C", None)]
    #[case("xx_XX.bogus", None)]
    fn derives_charmap_from_locale(#[case] locale: &str, #[case] expected: Option<&str>) {
        assert_eq!(Charmap::from_locale(locale).map(|map| map.name()), expected);
    }

    #[rstest]
    fn reads_codeset_from_environment() {
        let env = StubEnv::from_pairs([("LC_ALL", "pt_BR.utf8")]);

        assert_eq!(Charmap::from_env(&env).map(|map| map.name()), Some("UTF-8"));
    }

    #[rstest]
    #[case("UTF-8", "utf-8", "Привет", Some("Привет"))]
    #[case("KOI8-R", "utf-8", "Привет", Some("Привет"))]
    #[case("ISO-8859-1", "koi8-r", "Привет", None)]
    #[case("UTF-8", "koi8-r", "Привет", Some("Привет"))]
    #[case("UTF-8", "iso-8859-1", "Привет", None)]
    #[case("UTF-8", "no-such-label", "plain", None)]
    fn converts_when_representable(
        #[case] active: &str,
        #[case] from: &str,
        #[case] value: &str,
        #[case] expected: Option<&str>,
    ) {
        let charmap = Charmap::for_label(active).expect("test charmap should be known");

        assert_eq!(charmap.convert(from, value).as_deref(), expected);
    }
}
