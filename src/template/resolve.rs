//! Localised field lookup.
//!
//! With translation wanted, each locale candidate is tried in turn: first an
//! exact `field-lang` key, then any `field-lang.CHARSET` key whose value the
//! active charmap can represent. English ends the search, since English text
//! normally sits in the unsuffixed field. Without translation a `field-c`
//! value is preferred. Either way the plain field comes next, then the field
//! with any suffix after its first `-` removed.

use log::trace;

use crate::database::Database;

const ENGLISH: &str = "en";

pub(super) fn resolve_field(db: &Database, template: &str, field: &str) -> String {
    let field = field.to_lowercase();
    let store = db.templates();

    if db.wants_i18n() {
        if let Some(value) = translated(db, template, &field) {
            return value;
        }
    } else if !field.ends_with("-c") {
        if let Some(value) = store.field(template, &format!("{field}-c")) {
            return value;
        }
    }

    if let Some(value) = store.field(template, &field) {
        return value;
    }

    if let Some((base, _)) = field.split_once('-') {
        if let Some(value) = store.field(template, base) {
            trace!(target: "sysconf::template", "{template}: {field} falls back to {base}");
            return value;
        }
    }

    String::new()
}

fn translated(db: &Database, template: &str, field: &str) -> Option<String> {
    let store = db.templates();

    for candidate in db.locale_candidates().iter() {
        let lang = if candidate == "c" { ENGLISH } else { candidate };
        let localised = format!("{field}-{lang}");

        if let Some(value) = store.field(template, &localised) {
            return Some(value);
        }

        if let Some(charmap) = db.charmap() {
            // Anchored at the start of the key: a substring match would also
            // pick up `extended_{field}-{lang}.*` entries.
            let prefix = format!("{localised}.");
            let converted = store
                .fields(template)
                .unwrap_or_default()
                .into_iter()
                .filter_map(|key| {
                    let charset = key.strip_prefix(&prefix)?.to_owned();
                    let value = store.field(template, &key)?;
                    charmap.convert(&charset, &value)
                })
                .next();
            if converted.is_some() {
                return converted;
            }
        }

        if lang == ENGLISH {
            break;
        }
    }

    trace!(target: "sysconf::template", "{template}: no translation of {field}");
    None
}
