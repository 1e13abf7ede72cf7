//! The context object threaded through template and question operations.
//!
//! A [`Database`] owns the two stores every template operation touches: the
//! `templates` store holding template items, and the `config` store holding
//! the questions bound to them. It also carries the runtime i18n switch, the
//! handle caches for templates and questions, and the locale candidates used
//! by localised field reads.

use std::cell::OnceCell;
use std::collections::HashMap;
use std::fmt;

use log::debug;
use sysconf_common::{Charmap, EnvProvider, LocaleCandidates, SystemEnv};

use crate::error::Result;
use crate::question::Question;
use crate::store::{ItemStore, MemoryStore, TemplateTypes, copy_item};
use crate::template::Template;

/// Name given to the store holding template items.
pub const TEMPLATES_STORE: &str = "templates";

/// Name given to the store holding questions.
pub const CONFIG_STORE: &str = "config";

/// Runtime switches consulted by localised field reads.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Settings {
    /// Process-wide translation switch. When off, untranslated values win.
    pub i18n: bool,
    /// Prefer raw `-C` values over translations.
    pub c_values: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            i18n: true,
            c_values: false,
        }
    }
}

impl Settings {
    /// Whether localised values should be looked up.
    #[must_use]
    pub const fn wants_i18n(&self) -> bool {
        self.i18n && !self.c_values
    }
}

/// Stores, caches, and locale state shared by template operations.
pub struct Database {
    templates: Box<dyn ItemStore>,
    config: Box<dyn ItemStore>,
    settings: Settings,
    charmap: Option<Charmap>,
    env: Box<dyn EnvProvider>,
    locales: OnceCell<LocaleCandidates>,
    template_handles: HashMap<String, Template>,
    question_handles: HashMap<String, Question>,
}

impl fmt::Debug for Database {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("Database")
            .field("templates", &self.templates.name())
            .field("config", &self.config.name())
            .field("settings", &self.settings)
            .field("charmap", &self.charmap)
            .field("locales", &self.locales.get())
            .finish_non_exhaustive()
    }
}

impl Database {
    /// Build a context over the given stores.
    ///
    /// Locale candidates are read lazily from the process environment unless
    /// [`Database::with_env`] or [`Database::with_locale_candidates`] say
    /// otherwise. No charmap is active until [`Database::with_charmap`] sets
    /// one.
    #[must_use]
    pub fn new(templates: Box<dyn ItemStore>, config: Box<dyn ItemStore>) -> Self {
        Self {
            templates,
            config,
            settings: Settings::default(),
            charmap: None,
            env: Box::new(SystemEnv),
            locales: OnceCell::new(),
            template_handles: HashMap::new(),
            question_handles: HashMap::new(),
        }
    }

    /// Build a context over two empty in-memory stores.
    #[must_use]
    pub fn in_memory() -> Self {
        Self::new(
            Box::new(MemoryStore::new(TEMPLATES_STORE)),
            Box::new(MemoryStore::new(CONFIG_STORE)),
        )
    }

    /// Replace the runtime settings.
    #[must_use]
    pub fn with_settings(mut self, settings: Settings) -> Self {
        self.settings = settings;
        self
    }

    /// Fix the locale candidates instead of reading the environment.
    #[must_use]
    pub fn with_locale_candidates(mut self, candidates: LocaleCandidates) -> Self {
        self.locales = OnceCell::from(candidates);
        self
    }

    /// Set the charmap used to convert charset-qualified fields.
    #[must_use]
    pub fn with_charmap(mut self, charmap: Option<Charmap>) -> Self {
        self.charmap = charmap;
        self
    }

    /// Read locale variables through `env` rather than the process
    /// environment.
    #[must_use]
    pub fn with_env(mut self, env: impl EnvProvider + 'static) -> Self {
        self.env = Box::new(env);
        self
    }

    /// The templates store.
    #[must_use]
    pub fn templates(&self) -> &dyn ItemStore {
        self.templates.as_ref()
    }

    /// The templates store, mutably.
    pub fn templates_mut(&mut self) -> &mut dyn ItemStore {
        self.templates.as_mut()
    }

    /// The config store holding questions.
    #[must_use]
    pub fn config(&self) -> &dyn ItemStore {
        self.config.as_ref()
    }

    /// The config store, mutably.
    pub fn config_mut(&mut self) -> &mut dyn ItemStore {
        self.config.as_mut()
    }

    /// Current runtime settings.
    #[must_use]
    pub const fn settings(&self) -> Settings {
        self.settings
    }

    /// Turn translation on or off for every subsequent field read.
    pub fn set_i18n(&mut self, enabled: bool) {
        self.settings.i18n = enabled;
    }

    /// Whether translation is switched on.
    #[must_use]
    pub const fn i18n(&self) -> bool {
        self.settings.i18n
    }

    /// Whether localised values should be looked up.
    #[must_use]
    pub const fn wants_i18n(&self) -> bool {
        self.settings.wants_i18n()
    }

    /// Active charmap, if any.
    #[must_use]
    pub const fn charmap(&self) -> Option<Charmap> {
        self.charmap
    }

    /// Locale candidates, resolved from the environment on first use.
    pub fn locale_candidates(&self) -> &LocaleCandidates {
        self.locales
            .get_or_init(|| LocaleCandidates::from_env(self.env.as_ref()))
    }

    /// Copy a config item into `dest`, keeping its template type.
    ///
    /// # Errors
    ///
    /// Returns [`crate::SysconfError::StoreRejected`] when `dest` refuses one
    /// of the item's owners.
    pub fn copy_item_to(&self, item: &str, dest: &mut dyn ItemStore) -> Result<()> {
        copy_item(item, self.config(), dest, self)
    }

    /// Persist both stores.
    ///
    /// # Errors
    ///
    /// Propagates the first persistence failure.
    pub fn shutdown(&mut self) -> Result<()> {
        debug!(target: "sysconf::store", "shutting down {} and {}", self.templates.name(), self.config.name());
        self.templates.shutdown()?;
        self.config.shutdown()
    }

    /// Hand back the templates and config stores.
    #[must_use]
    pub fn into_stores(self) -> (Box<dyn ItemStore>, Box<dyn ItemStore>) {
        (self.templates, self.config)
    }

    pub(crate) fn cached_template(&self, name: &str) -> Option<Template> {
        self.template_handles.get(name).cloned()
    }

    pub(crate) fn cache_template(&mut self, template: Template) -> Template {
        self.template_handles
            .entry(template.name().to_owned())
            .or_insert(template)
            .clone()
    }

    pub(crate) fn cached_question(&self, name: &str) -> Option<Question> {
        self.question_handles.get(name).cloned()
    }

    pub(crate) fn cache_question(&mut self, question: Question) -> Question {
        self.question_handles
            .entry(question.name().to_owned())
            .or_insert(question)
            .clone()
    }
}

impl Default for Database {
    fn default() -> Self {
        Self::in_memory()
    }
}

impl TemplateTypes for Database {
    fn template_type(&self, template: &str) -> Option<String> {
        if !self.templates.exists(template) {
            return None;
        }
        Some(self.templates.field(template, "type").unwrap_or_default())
    }
}
