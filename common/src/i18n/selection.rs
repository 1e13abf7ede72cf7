use std::fmt;

use log::debug;

use super::locales::{locale_variants, parse_locale};

/// Environment variable listing preferred languages, colon separated.
pub const LANGUAGE_ENV: &str = "LANGUAGE";

/// Variables consulted, in order, for the message locale.
pub const MESSAGE_LOCALE_ENV: [&str; 3] = ["LC_ALL", "LC_MESSAGES", "LANG"];

/// Locale used when the environment names none.
pub const DEFAULT_MESSAGE_LOCALE: &str = "C";

/// Read-only environment access used for locale resolution.
pub trait EnvProvider {
    /// Fetch the environment variable value for `key`.
    fn var(&self, key: &str) -> Option<String>;
}

/// Environment provider backed by the process environment.
#[derive(Debug, Default, Copy, Clone)]
pub struct SystemEnv;

impl EnvProvider for SystemEnv {
    fn var(&self, key: &str) -> Option<String> {
        std::env::var(key).ok()
    }
}

/// Resolve the message locale the way the C library does for `LC_MESSAGES`.
///
/// The first non-empty value among `LC_ALL`, `LC_MESSAGES`, and `LANG` wins;
/// `C` is returned when none is set.
#[must_use]
pub fn message_locale(env: &dyn EnvProvider) -> String {
    MESSAGE_LOCALE_ENV
        .iter()
        .find_map(|key| normalise_locale(env.var(key).as_deref()).map(str::to_owned))
        .unwrap_or_else(|| DEFAULT_MESSAGE_LOCALE.to_owned())
}

/// Return the codeset named by the message locale, if any.
///
/// ```
/// use sysconf_common::i18n::locale_codeset;
///
/// assert_eq!(locale_codeset("fr_FR.UTF-8@euro").as_deref(), Some("UTF-8"));
/// assert_eq!(locale_codeset("C"), None);
/// ```
#[must_use]
pub fn locale_codeset(locale: &str) -> Option<String> {
    parse_locale(locale)
        .and_then(|parts| parts.codeset_name().map(str::to_owned))
}

/// Ordered, lower-cased locale suffixes consulted when resolving a field.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct LocaleCandidates(Vec<String>);

impl LocaleCandidates {
    /// Build a candidate list from already expanded suffixes.
    ///
    /// Every entry is lower-cased so callers can pass locale spellings as they
    /// appear in the environment.
    #[must_use]
    pub fn new<I, S>(candidates: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self(
            candidates
                .into_iter()
                .map(|candidate| candidate.as_ref().to_lowercase())
                .collect(),
        )
    }

    /// Derive the candidate list from a message locale and an optional
    /// language preference list.
    ///
    /// Entries from the preference list come first, in list order, followed
    /// by the expansion of the message locale.
    ///
    /// ```
    /// use sysconf_common::i18n::LocaleCandidates;
    ///
    /// let candidates = LocaleCandidates::from_locales("de_DE.UTF-8", Some("fr:en"));
    /// let expected = ["fr", "en", "de_de.utf-8", "de_de", "de.utf-8", "de"];
    /// assert!(candidates.iter().eq(expected));
    /// ```
    #[must_use]
    pub fn from_locales(message_locale: &str, languages: Option<&str>) -> Self {
        let preferred = normalise_locale(languages)
            .into_iter()
            .flat_map(|list| list.split(':'))
            .flat_map(locale_variants);

        Self::new(preferred.chain(locale_variants(message_locale)))
    }

    /// Resolve the candidate list from the environment.
    #[must_use]
    pub fn from_env(env: &dyn EnvProvider) -> Self {
        let locale = message_locale(env);
        let languages = env.var(LANGUAGE_ENV);
        let candidates = Self::from_locales(&locale, languages.as_deref());
        debug!(
            target: "i18n::selection",
            "resolved locale candidates {candidates} from `{locale}`",
        );
        candidates
    }

    /// Iterate over the candidates in priority order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    /// Number of candidates.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether no candidate was derived.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for LocaleCandidates {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "[{}]", self.0.join(", "))
    }
}

/// Trim whitespace and discard empty locale values.
#[must_use]
pub fn normalise_locale(input: Option<&str>) -> Option<&str> {
    input
        .map(str::trim)
        .and_then(|value| if value.is_empty() { None } else { Some(value) })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::StubEnv;
    use rstest::rstest;

    #[rstest]
    #[case(&[], "C")]
    #[case(&[("LANG", "de_DE.UTF-8")], "de_DE.UTF-8")]
    #[case(&[("LANG", "de_DE"), ("LC_MESSAGES", "fr_FR")], "fr_FR")]
    #[case(&[("LANG", "de_DE"), ("LC_MESSAGES", "fr_FR"), ("LC_ALL", "es_ES")], "es_ES")]
    #[case(&[("LANG", "de_DE"), ("LC_ALL", "  ")], "de_DE")]
    fn resolves_message_locale_precedence(
        #[case] vars: &[(&str, &str)],
        #[case] expected: &str,
    ) {
        let env = StubEnv::from_pairs(vars.iter().copied());

        assert_eq!(message_locale(&env), expected);
    }

    #[rstest]
    fn preference_list_precedes_message_locale() {
        let env = StubEnv::from_pairs([("LANG", "fr_FR.UTF-8@euro"), ("LANGUAGE", "pt_BR:de")]);

        let candidates = LocaleCandidates::from_env(&env);

        let expected = [
            "pt_br", "pt", "de", "fr_fr.utf-8@euro", "fr_fr@euro", "fr.utf-8@euro", "fr@euro",
            "fr_fr.utf-8", "fr_fr", "fr.utf-8", "fr",
        ];
        assert!(
            candidates.iter().eq(expected),
            "unexpected candidates {candidates}"
        );
    }

    #[rstest]
    #[case(None)]
    #[case(Some(""))]
    #[case(Some(" "))]
    fn blank_preference_list_is_ignored(#[case] languages: Option<&str>) {
        let candidates = LocaleCandidates::from_locales("C", languages);

        assert!(candidates.iter().eq(["c"]));
    }

    #[rstest]
    fn empty_preference_entries_contribute_nothing() {
        let candidates = LocaleCandidates::from_locales("C", Some("fr::de"));

        assert!(candidates.iter().eq(["fr", "de", "c"]));
    }

    #[rstest]
    fn explicit_candidates_are_lower_cased() {
        let candidates = LocaleCandidates::new(["fr.UTF-8", "FR", "en"]);

        assert_eq!(candidates.len(), 3);
        assert!(candidates.iter().eq(["fr.utf-8", "fr", "en"]));
    }

    #[rstest]
    #[case("fr_FR.UTF-8", Some("UTF-8"))]
    #[case("ja_JP.eucJP", Some("eucJP"))]
    #[case("fr_FR", None)]
    #[case("C", None)]
    #[case("", None)]
    fn extracts_codeset(#[case] locale: &str, #[case] expected: Option<&str>) {
        assert_eq!(locale_codeset(locale).as_deref(), expected);
    }
}
