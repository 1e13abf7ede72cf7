use std::collections::BTreeMap;

use log::trace;

use super::{Item, ItemStore};

/// In-memory item store.
///
/// Field names are lower-cased on every access so `Description-FR` and
/// `description-fr` address the same key. Flag and variable names are kept
/// as given.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MemoryStore {
    name: String,
    items: BTreeMap<String, Item>,
}

impl MemoryStore {
    /// Create an empty store called `name`.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            items: BTreeMap::new(),
        }
    }

    /// Create a store from existing items.
    #[must_use]
    pub fn with_items(name: impl Into<String>, items: BTreeMap<String, Item>) -> Self {
        Self {
            name: name.into(),
            items,
        }
    }

    /// Borrow a whole item.
    #[must_use]
    pub fn item(&self, item: &str) -> Option<&Item> {
        self.items.get(item)
    }

    /// Borrow every item, keyed by name.
    #[must_use]
    pub fn as_map(&self) -> &BTreeMap<String, Item> {
        &self.items
    }

    fn item_mut(&mut self, item: &str) -> Option<&mut Item> {
        self.items.get_mut(item)
    }
}

fn keys(map: &BTreeMap<String, String>) -> Vec<String> {
    map.keys().cloned().collect()
}

impl ItemStore for MemoryStore {
    fn name(&self) -> &str {
        &self.name
    }

    fn items(&self) -> Vec<String> {
        self.items.keys().cloned().collect()
    }

    fn exists(&self, item: &str) -> bool {
        self.items.contains_key(item)
    }

    fn owners(&self, item: &str) -> Option<Vec<String>> {
        self.item(item)
            .map(|entry| entry.owners.iter().cloned().collect())
    }

    fn add_owner(&mut self, item: &str, owner: &str, item_type: &str) -> Option<String> {
        let entry = self.items.entry(item.to_owned()).or_insert_with(|| {
            trace!(target: "sysconf::store", "{}: creating {item} ({item_type})", self.name);
            Item::default()
        });
        entry.owners.insert(owner.to_owned());
        Some(owner.to_owned())
    }

    fn remove_owner(&mut self, item: &str, owner: &str) -> Option<String> {
        let entry = self.item_mut(item)?;
        if !entry.owners.remove(owner) {
            return None;
        }
        if entry.owners.is_empty() {
            trace!(target: "sysconf::store", "{}: removing {item} with its last owner", self.name);
            self.items.remove(item);
        }
        Some(owner.to_owned())
    }

    fn field(&self, item: &str, field: &str) -> Option<String> {
        self.item(item)?.fields.get(&field.to_lowercase()).cloned()
    }

    fn set_field(&mut self, item: &str, field: &str, value: &str) -> Option<String> {
        let entry = self.item_mut(item)?;
        entry.fields.insert(field.to_lowercase(), value.to_owned());
        Some(value.to_owned())
    }

    fn remove_field(&mut self, item: &str, field: &str) -> Option<String> {
        self.item_mut(item)?.fields.remove(&field.to_lowercase())
    }

    fn fields(&self, item: &str) -> Option<Vec<String>> {
        self.item(item).map(|entry| keys(&entry.fields))
    }

    fn flag(&self, item: &str, flag: &str) -> Option<String> {
        self.item(item)?.flags.get(flag).cloned()
    }

    fn set_flag(&mut self, item: &str, flag: &str, value: &str) -> Option<String> {
        let entry = self.item_mut(item)?;
        entry.flags.insert(flag.to_owned(), value.to_owned());
        Some(value.to_owned())
    }

    fn flags(&self, item: &str) -> Option<Vec<String>> {
        self.item(item).map(|entry| keys(&entry.flags))
    }

    fn variable(&self, item: &str, variable: &str) -> Option<String> {
        self.item(item)?.variables.get(variable).cloned()
    }

    fn set_variable(&mut self, item: &str, variable: &str, value: &str) -> Option<String> {
        let entry = self.item_mut(item)?;
        entry.variables.insert(variable.to_owned(), value.to_owned());
        Some(value.to_owned())
    }

    fn variables(&self, item: &str) -> Option<Vec<String>> {
        self.item(item).map(|entry| keys(&entry.variables))
    }
}
