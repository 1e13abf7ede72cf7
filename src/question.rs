//! Questions: the user-facing prompts bound to templates.
//!
//! Only the parts templates depend on live here. A question is an item in the
//! config store whose `template` field names the template it presents.

use std::fmt;
use std::rc::Rc;

use log::trace;

use crate::database::Database;
use crate::error::{Result, SysconfError};
use crate::store::UNKNOWN_OWNER;

/// Field of a question naming its template.
pub const TEMPLATE_FIELD: &str = "template";

/// Handle over one item of the config store.
///
/// Handles are cached per [`Database`], so every lookup of the same name
/// yields a clone of one canonical handle.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Question {
    name: Rc<str>,
}

impl Question {
    /// Create the question `name` or add `owner` to the existing one.
    ///
    /// An empty owner is recorded as `unknown`.
    ///
    /// # Errors
    ///
    /// Returns [`SysconfError::StoreRejected`] when the config store refuses
    /// the owner.
    pub fn factory(db: &mut Database, name: &str, owner: &str, item_type: &str) -> Result<Self> {
        let owner = if owner.is_empty() { UNKNOWN_OWNER } else { owner };
        add_owner_to(db, name, owner, item_type)?;
        trace!(target: "sysconf::question", "question {name} owned by {owner}");
        Ok(db.cache_question(Self { name: Rc::from(name) }))
    }

    /// Look up an existing question.
    ///
    /// The config store is consulted on every call, so a cached handle whose
    /// item has since been removed is not returned.
    pub fn get(db: &mut Database, name: &str) -> Option<Self> {
        if !db.config().exists(name) {
            return None;
        }
        if let Some(question) = db.cached_question(name) {
            return Some(question);
        }
        Some(db.cache_question(Self { name: Rc::from(name) }))
    }

    /// Name of the question.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Add `owner` to this question.
    ///
    /// # Errors
    ///
    /// Returns [`SysconfError::StoreRejected`] when the config store refuses
    /// the owner.
    pub fn add_owner(&self, db: &mut Database, owner: &str, item_type: &str) -> Result<()> {
        add_owner_to(db, &self.name, owner, item_type)
    }

    /// Bind this question to the template called `template`.
    pub fn set_template(&self, db: &mut Database, template: &str) {
        db.config_mut().set_field(&self.name, TEMPLATE_FIELD, template);
    }

    /// Name of the template this question presents.
    #[must_use]
    pub fn template(&self, db: &Database) -> Option<String> {
        db.config().field(&self.name, TEMPLATE_FIELD)
    }

    /// Owners of this question.
    #[must_use]
    pub fn owners(&self, db: &Database) -> Vec<String> {
        db.config().owners(&self.name).unwrap_or_default()
    }

    /// Whether `other` is the same cached handle.
    #[must_use]
    pub fn is_same_handle(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.name, &other.name)
    }
}

impl fmt::Display for Question {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(&self.name)
    }
}

fn add_owner_to(db: &mut Database, name: &str, owner: &str, item_type: &str) -> Result<()> {
    let config = db.config_mut();
    if config.add_owner(name, owner, item_type).is_some() {
        return Ok(());
    }
    Err(SysconfError::StoreRejected {
        store: config.name().to_owned(),
        item: name.to_owned(),
        owner: owner.to_owned(),
    })
}
