//! Templates: typed, localisable entries of the templates store.
//!
//! Every template is paired with a question of the same name in the config
//! store. [`Template::factory`] keeps that pairing intact and repairs it when
//! a template lists owners whose questions have gone missing.

mod loader;
mod resolve;

use std::fmt;
use std::rc::Rc;

use camino::Utf8Path;
use log::warn;

use crate::database::Database;
use crate::error::{Result, SysconfError};
use crate::question::Question;
use crate::store::UNKNOWN_OWNER;

pub use loader::{KNOWN_FIELDS, Stanza, parse_stanzas};

/// Field holding the template's type.
pub const TYPE_FIELD: &str = "type";

/// Handle over one item of the templates store.
///
/// Handles are cached per [`Database`]: [`Template::factory`] and
/// [`Template::get`] hand out clones of the same canonical handle.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Template {
    name: Rc<str>,
}

impl Template {
    /// Create the template `name`, or reuse it when it already exists.
    ///
    /// An empty owner is recorded as `unknown`. Reusing a template adds
    /// `owner` to its question and recreates any question the template lists
    /// as an owner but the config store no longer holds, logging a warning for
    /// each one.
    ///
    /// # Errors
    ///
    /// Returns [`SysconfError::StoreRejected`] when either store refuses to
    /// record an owner.
    pub fn factory(db: &mut Database, name: &str, owner: &str, item_type: &str) -> Result<Self> {
        let owner = if owner.is_empty() { UNKNOWN_OWNER } else { owner };

        if let Some(owners) = db.templates().owners(name) {
            reuse(db, name, owner, item_type, &owners)?;
            return Ok(Self::wrap(db, name));
        }

        if db.config().exists(name) {
            if let Some(question) = Question::get(db, name) {
                question.add_owner(db, owner, item_type)?;
            }
        } else {
            let question = Question::factory(db, name, owner, item_type)?;
            question.set_template(db, name);
        }

        let templates = db.templates_mut();
        if templates.add_owner(name, name, item_type).is_none() {
            return Err(SysconfError::StoreRejected {
                store: templates.name().to_owned(),
                item: name.to_owned(),
                owner: name.to_owned(),
            });
        }
        templates.set_field(name, TYPE_FIELD, item_type);

        Ok(Self::wrap(db, name))
    }

    /// Look up an existing template.
    pub fn get(db: &mut Database, name: &str) -> Option<Self> {
        if let Some(template) = db.cached_template(name) {
            return Some(template);
        }
        if !db.templates().exists(name) {
            return None;
        }
        Some(Self::wrap(db, name))
    }

    fn wrap(db: &mut Database, name: &str) -> Self {
        db.cache_template(Self { name: Rc::from(name) })
    }

    /// Name of the template.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Whether `other` is the same cached handle.
    #[must_use]
    pub fn is_same_handle(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.name, &other.name)
    }

    /// Read `field`, localised according to the database settings.
    ///
    /// Never fails: a field with no usable value reads as an empty string.
    #[must_use]
    pub fn field(&self, db: &Database, field: &str) -> String {
        resolve::resolve_field(db, &self.name, field)
    }

    /// Write `field` exactly as named; no locale suffix is added.
    pub fn set_field(&self, db: &mut Database, field: &str, value: &str) -> Option<String> {
        db.templates_mut().set_field(&self.name, field, value)
    }

    /// Names of every stored field, locale-suffixed variants included.
    #[must_use]
    pub fn fields(&self, db: &Database) -> Vec<String> {
        db.templates().fields(&self.name).unwrap_or_default()
    }

    /// Remove every stored field.
    pub fn clear_all(&self, db: &mut Database) {
        for field in self.fields(db) {
            db.templates_mut().remove_field(&self.name, &field);
        }
    }

    /// Load every stanza in `text`, attributing new questions to `owner`.
    ///
    /// `source` names the input in error messages. Stanzas before a failing
    /// one stay loaded.
    ///
    /// # Errors
    ///
    /// Returns a parse error naming the stanza when a line is malformed, a
    /// field repeats, or a stanza has no `Template:` line, and propagates
    /// [`SysconfError::StoreRejected`] from [`Template::factory`].
    pub fn load(db: &mut Database, text: &str, source: &str, owner: &str) -> Result<Vec<Self>> {
        loader::load(db, text, source, owner)
    }

    /// Load a template file. See [`Template::load`].
    ///
    /// # Errors
    ///
    /// Returns [`SysconfError::Read`] when the file cannot be read, and
    /// otherwise the errors of [`Template::load`].
    pub fn load_file(db: &mut Database, path: &Utf8Path, owner: &str) -> Result<Vec<Self>> {
        let text = std::fs::read_to_string(path).map_err(|source| SysconfError::Read {
            path: path.to_owned(),
            source,
        })?;
        loader::load(db, &text, path.as_str(), owner)
    }
}

impl fmt::Display for Template {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(&self.name)
    }
}

fn reuse(
    db: &mut Database,
    name: &str,
    owner: &str,
    item_type: &str,
    owners: &[String],
) -> Result<()> {
    if let Some(question) = Question::get(db, name) {
        question.add_owner(db, owner, item_type)?;
    }

    for question_name in owners {
        if Question::get(db, question_name).is_some() {
            continue;
        }
        warn!(
            target: "sysconf::template",
            "possible database corruption: re-adding missing question {question_name}"
        );
        let question = Question::factory(db, question_name, owner, item_type)?;
        question.set_template(db, name);
    }
    Ok(())
}
