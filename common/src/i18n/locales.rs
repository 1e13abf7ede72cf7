//! Locale name expansion following the GNU libc search order.
//!
//! A raw locale such as `fr_FR.UTF-8@euro` is split into its language,
//! territory, codeset, and modifier components. The components are then
//! recombined into every less specific spelling so template fields can be
//! looked up from the most precise suffix down to the bare language.

/// Components of a raw locale string.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct LocaleParts<'a> {
    /// Language, for example `fr`.
    pub language: &'a str,
    /// Territory including the leading `_`, for example `_FR`.
    pub territory: Option<&'a str>,
    /// Codeset including the leading `.`, for example `.UTF-8`.
    pub codeset: Option<&'a str>,
    /// Modifier including the leading `@`, for example `@euro`.
    pub modifier: Option<&'a str>,
}

impl LocaleParts<'_> {
    /// Returns the codeset without its leading dot.
    #[must_use]
    pub fn codeset_name(&self) -> Option<&str> {
        self.codeset.map(|codeset| &codeset[1..])
    }
}

fn is_segment_char(ch: char) -> bool {
    !matches!(ch, '_' | '@' | '.')
}

/// Locate the modifier: an `@` followed by at least one character that is not
/// a `.`. Returns the byte range of the modifier within `raw`.
fn find_modifier(raw: &str) -> Option<(usize, usize)> {
    raw.char_indices()
        .filter(|(_, ch)| *ch == '@')
        .find_map(|(start, _)| {
            let rest = &raw[start + 1..];
            let len = rest.find('.').unwrap_or(rest.len());
            (len > 0).then_some((start, start + 1 + len))
        })
}

/// Remove the modifier from `raw`, returning it alongside the remaining text.
fn take_modifier(raw: &str) -> (Option<&str>, String) {
    match find_modifier(raw) {
        Some((start, end)) => (
            Some(&raw[start..end]),
            format!("{}{}", &raw[..start], &raw[end..]),
        ),
        None => (None, raw.to_owned()),
    }
}

/// Match `language`, optional `_TERRITORY`, optional `.CODESET` at the start of
/// a modifier-free locale string. Anything after an unmatched segment is
/// ignored.
fn match_segments(text: &str) -> Option<(&str, Option<&str>, Option<&str>)> {
    let language_len = text.find(|ch| !is_segment_char(ch)).unwrap_or(text.len());
    if language_len == 0 {
        return None;
    }
    let language = &text[..language_len];
    let mut rest = &text[language_len..];

    let mut territory = None;
    if let Some(after) = rest.strip_prefix('_') {
        let len = after.find(|ch| !is_segment_char(ch)).unwrap_or(after.len());
        if len > 0 {
            territory = Some(&rest[..=len]);
            rest = &rest[len + 1..];
        }
    }

    let codeset = rest
        .strip_prefix('.')
        .filter(|after| !after.is_empty())
        .map(|_| rest);

    Some((language, territory, codeset))
}

/// Insert `territory` after the leading language segment of `locale`.
fn add_territory(locale: &str, territory: &str) -> String {
    let split = locale.find(|ch| !is_segment_char(ch)).unwrap_or(locale.len());
    format!("{}{territory}{}", &locale[..split], &locale[split..])
}

/// Insert `codeset` before any `@` or `.` in `locale`.
fn add_codeset(locale: &str, codeset: &str) -> String {
    let split = locale.find(['@', '.']).unwrap_or(locale.len());
    format!("{}{codeset}{}", &locale[..split], &locale[split..])
}

/// Expand a raw locale into its ordered list of lookup spellings.
///
/// The nesting is modifier, then territory, then codeset, with the more
/// specific variant always first:
///
/// ```
/// use sysconf_common::i18n::locale_variants;
///
/// assert_eq!(
///     locale_variants("de_AT@euro"),
///     vec!["de_AT@euro", "de@euro", "de_AT", "de"],
/// );
/// ```
///
/// Case is preserved; callers lower-case the final candidate list.
#[must_use]
pub fn locale_variants(raw: &str) -> Vec<String> {
    let (modifier, remainder) = take_modifier(raw);
    let Some((language, territory, codeset)) = match_segments(&remainder) else {
        return Vec::new();
    };

    let mut variants = match modifier {
        Some(modifier) => vec![format!("{language}{modifier}"), language.to_owned()],
        None => vec![language.to_owned()],
    };

    if let Some(territory) = territory {
        variants = variants
            .into_iter()
            .flat_map(|variant| [add_territory(&variant, territory), variant])
            .collect();
    }

    if let Some(codeset) = codeset {
        variants = variants
            .into_iter()
            .flat_map(|variant| [add_codeset(&variant, codeset), variant])
            .collect();
    }

    variants
}

/// Parse a raw locale into its components, borrowing from `raw`.
///
/// Unlike [`locale_variants`] this keeps the original spelling of each part,
/// which is what codeset detection needs.
#[must_use]
pub fn parse_locale(raw: &str) -> Option<LocaleParts<'_>> {
    let (start, end) = find_modifier(raw).unwrap_or((raw.len(), raw.len()));
    let modifier = (start < end).then(|| &raw[start..end]);
    // The codeset may sit on either side of the modifier; only the leading
    // segment up to the modifier is needed for language and territory.
    let head = &raw[..start];
    let tail = &raw[end..];
    let (language, territory, codeset) = match_segments(head)?;
    let codeset = codeset.or_else(|| {
        tail.strip_prefix('.')
            .filter(|after| !after.is_empty())
            .map(|_| tail)
    });
    Some(LocaleParts {
        language,
        territory,
        codeset,
        modifier,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("fr", &["fr"])]
    #[case("C", &["C"])]
    #[case("fr_FR", &["fr_FR", "fr"])]
    #[case("fr.UTF-8", &["fr.UTF-8", "fr"])]
    #[case("fr@euro", &["fr@euro", "fr"])]
    #[case("pt_BR.UTF-8", &["pt_BR.UTF-8", "pt_BR", "pt.UTF-8", "pt"])]
    #[case(
        "fr_FR.UTF-8@euro",
        &[
            "fr_FR.UTF-8@euro",
            "fr_FR@euro",
            "fr.UTF-8@euro",
            "fr@euro",
            "fr_FR.UTF-8",
            "fr_FR",
            "fr.UTF-8",
            "fr",
        ]
    )]
    #[case(
        "sr_RS@latin.UTF-8",
        &[
            "sr_RS.UTF-8@latin",
            "sr_RS@latin",
            "sr.UTF-8@latin",
            "sr@latin",
            "sr_RS.UTF-8",
            "sr_RS",
            "sr.UTF-8",
            "sr",
        ]
    )]
    fn expands_in_libc_order(#[case] raw: &str, #[case] expected: &[&str]) {
        assert_eq!(locale_variants(raw), expected);
    }

    #[rstest]
    #[case("")]
    #[case("_FR")]
    #[case(".UTF-8")]
    #[case("@euro")]
    fn rejects_locales_without_language(#[case] raw: &str) {
        assert!(locale_variants(raw).is_empty());
    }

    #[rstest]
    #[case("fr_.UTF-8", &["fr"])]
    #[case("fr_FR_X", &["fr_FR", "fr"])]
    #[case("fr.", &["fr"])]
    fn ignores_incomplete_segments(#[case] raw: &str, #[case] expected: &[&str]) {
        assert_eq!(locale_variants(raw), expected);
    }

    #[rstest]
    fn parses_every_component() {
        let parts = parse_locale("fr_FR.ISO-8859-15@euro").expect("locale should parse");

        assert_eq!(parts.language, "fr");
        assert_eq!(parts.territory, Some("_FR"));
        assert_eq!(parts.codeset, Some(".ISO-8859-15"));
        assert_eq!(parts.codeset_name(), Some("ISO-8859-15"));
        assert_eq!(parts.modifier, Some("@euro"));
    }

    #[rstest]
    fn parses_codeset_after_modifier() {
        let parts = parse_locale("sr_RS@latin.UTF-8").expect("locale should parse");

        assert_eq!(parts.codeset_name(), Some("UTF-8"));
        assert_eq!(parts.modifier, Some("@latin"));
    }
}
