//! Locale discovery for localised template fields.
//!
//! Templates store translations under suffixed field names such as
//! `description-fr` or `choices-pt_br.utf-8`. This module derives the ordered
//! list of suffixes to try for the current process: the colon separated
//! `LANGUAGE` preference list first, then the message locale from `LC_ALL`,
//! `LC_MESSAGES`, or `LANG`. Each locale is expanded into its less specific
//! spellings following the order the GNU C library searches message
//! catalogues.

mod locales;
mod selection;

pub use locales::{LocaleParts, locale_variants, parse_locale};
pub use selection::{
    DEFAULT_MESSAGE_LOCALE, EnvProvider, LANGUAGE_ENV, LocaleCandidates, MESSAGE_LOCALE_ENV,
    SystemEnv, locale_codeset, message_locale, normalise_locale,
};
