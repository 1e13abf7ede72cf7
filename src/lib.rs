//! Configuration database for interactive installers.
//!
//! Items live in [`store::ItemStore`] backends. Each item has owners, typed
//! fields, flags, and variables. [`Template`]s wrap items of the templates
//! store and read their fields in the user's language, with a
//! glibc-compatible locale fallback order. Every template is paired with a
//! [`Question`] in the config store.
//!
//! All operations take an explicit [`Database`] context, which owns both
//! stores, the handle caches, and the i18n switch.
//!
//! ```
//! use sysconf::{Database, Template};
//! use sysconf_common::LocaleCandidates;
//!
//! let mut db = Database::in_memory()
//!     .with_locale_candidates(LocaleCandidates::new(["fr", "en"]));
//! let text = "Template: demo/host\nType: string\nDescription: Host\nDescription-fr: Hôte\n";
//! let templates = Template::load(&mut db, text, "demo.templates", "demo").expect("valid templates");
//!
//! assert_eq!(templates.len(), 1);
//! assert_eq!(templates[0].field(&db, "description"), "Hôte");
//! ```

pub mod config;
pub mod database;
pub mod error;
pub mod question;
pub mod store;
pub mod template;

pub use config::SysconfConfig;
pub use database::{Database, Settings};
pub use error::{Result, SysconfError};
pub use question::Question;
pub use store::{FileStore, Item, ItemStore, MemoryStore, copy_item};
pub use template::Template;
