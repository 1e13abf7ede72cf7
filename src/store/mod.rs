//! Item stores: the backend contract and its implementations.
//!
//! An item store maps item names to [`Item`] records. Every backend honours
//! the same contract: reads of a missing item or field return `None` (or an
//! empty list) rather than failing, and the first [`ItemStore::add_owner`]
//! call creates the item with empty field, flag, and variable maps.
//!
//! Backends compose through the trait rather than by inheritance. The
//! [`FileStore`] wraps a [`MemoryStore`] as its cache, and [`copy_item`]
//! moves a whole item between any two stores.

mod copy;
mod file;
mod memory;

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::error::Result;

pub use copy::{TemplateTypes, copy_item};
pub use file::FileStore;
pub use memory::MemoryStore;

/// Owner recorded when an item names none.
pub const UNKNOWN_OWNER: &str = "unknown";

/// A named record held by an [`ItemStore`].
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(default)]
pub struct Item {
    /// Packages or modules that registered interest in the item.
    pub owners: BTreeSet<String>,
    /// Typed fields, keyed by lower-cased name including any locale suffix.
    pub fields: BTreeMap<String, String>,
    /// Operational flags such as `seen`.
    pub flags: BTreeMap<String, String>,
    /// Substitution variables.
    pub variables: BTreeMap<String, String>,
}

/// Contract every configuration backend satisfies.
///
/// Mutators return the affected name or value on success and `None` when the
/// backend cannot apply the change (for example because the item does not
/// exist, or a read-only backend refuses writes).
#[cfg_attr(test, mockall::automock)]
pub trait ItemStore {
    /// Name of the store, used in diagnostics.
    fn name(&self) -> &str;

    /// Names of every item held by the store, in sorted order.
    fn items(&self) -> Vec<String>;

    /// Whether `item` exists.
    fn exists(&self, item: &str) -> bool;

    /// Owners of `item`, or `None` when it does not exist.
    fn owners(&self, item: &str) -> Option<Vec<String>>;

    /// Register `owner` on `item`, creating the item when absent.
    ///
    /// `item_type` is advisory: backends that index items by type may use it.
    /// Returns the owner on success.
    fn add_owner(&mut self, item: &str, owner: &str, item_type: &str) -> Option<String>;

    /// Remove `owner` from `item`; the item is deleted with its last owner.
    /// Returns the owner on success.
    fn remove_owner(&mut self, item: &str, owner: &str) -> Option<String>;

    /// Value of `field` on `item`.
    fn field(&self, item: &str, field: &str) -> Option<String>;

    /// Set `field` on an existing `item`, returning the stored value.
    fn set_field(&mut self, item: &str, field: &str, value: &str) -> Option<String>;

    /// Remove `field` from `item`, returning the removed value.
    fn remove_field(&mut self, item: &str, field: &str) -> Option<String>;

    /// Field names of `item`, or `None` when it does not exist.
    fn fields(&self, item: &str) -> Option<Vec<String>>;

    /// Value of `flag` on `item`.
    fn flag(&self, item: &str, flag: &str) -> Option<String>;

    /// Set `flag` on an existing `item`, returning the stored value.
    fn set_flag(&mut self, item: &str, flag: &str, value: &str) -> Option<String>;

    /// Flag names of `item`, or `None` when it does not exist.
    fn flags(&self, item: &str) -> Option<Vec<String>>;

    /// Value of `variable` on `item`.
    fn variable(&self, item: &str, variable: &str) -> Option<String>;

    /// Set `variable` on an existing `item`, returning the stored value.
    fn set_variable(&mut self, item: &str, variable: &str, value: &str) -> Option<String>;

    /// Variable names of `item`, or `None` when it does not exist.
    fn variables(&self, item: &str) -> Option<Vec<String>>;

    /// Flush pending changes to durable storage.
    ///
    /// Backends without persistence keep the default no-op.
    ///
    /// # Errors
    ///
    /// Returns the backend's persistence failure.
    fn shutdown(&mut self) -> Result<()> {
        Ok(())
    }
}
