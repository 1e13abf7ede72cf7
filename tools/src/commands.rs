//! Subcommand execution.
//!
//! [`run`] resolves the configuration file and the database paths, opens the
//! file-backed stores, and dispatches to the subcommand. Environment and
//! platform directories are injected so tests can drive every command
//! without touching the user's real database.

use std::io::Write;

use camino::{Utf8Path, Utf8PathBuf};
use log::{debug, info, warn};
use sysconf::database::{CONFIG_STORE, TEMPLATES_STORE};
use sysconf::{Database, FileStore, ItemStore, SysconfConfig, Template};
use sysconf_common::{EnvProvider, LocaleCandidates};

use crate::cli::{Cli, Command, CopyArgs, GlobalArgs, LoadArgs, ShowArgs};
use crate::dirs::{BaseDirs, default_settings_path, default_store_path};
use crate::error::{Result, ToolError};
use crate::output::{TemplateReport, copy_summary, format_human, format_json, load_summary};

/// Locations of the two database files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorePaths {
    /// Templates database file.
    pub templates: Utf8PathBuf,
    /// Config (questions) database file.
    pub config: Utf8PathBuf,
}

/// Execute the parsed command line, writing results to `out`.
///
/// # Errors
///
/// Returns the first configuration, database, or output failure.
pub fn run(
    cli: &Cli,
    env: &dyn EnvProvider,
    dirs: &dyn BaseDirs,
    out: &mut dyn Write,
) -> Result<()> {
    let config = resolve_config(&cli.global, dirs, env)?;

    match &cli.command {
        Command::Load(args) => {
            let paths = resolve_paths(&cli.global, &config, dirs)?;
            run_load(args, &paths, &config, env, out)
        }
        Command::Show(args) => {
            let paths = resolve_paths(&cli.global, &config, dirs)?;
            run_show(args, &paths, config, env, out)
        }
        Command::Copy(args) => {
            let templates = resolve_templates_path(&cli.global, &config, dirs)?;
            run_copy(args, &templates, out)
        }
    }
}

/// Read the configuration file and apply environment overrides.
///
/// An explicit `--config` file must exist. The default file in the platform
/// config directory is optional.
///
/// # Errors
///
/// Returns a database error when the file cannot be read or parsed.
pub fn resolve_config(
    global: &GlobalArgs,
    dirs: &dyn BaseDirs,
    env: &dyn EnvProvider,
) -> Result<SysconfConfig> {
    let path = match &global.config {
        Some(path) => Some(path.clone()),
        None => default_settings_path(dirs)?.filter(|path| path.is_file()),
    };
    let config = match path {
        Some(path) => SysconfConfig::load_from(&path)?,
        None => SysconfConfig::default(),
    };
    Ok(config.with_env_overrides(env))
}

/// Pick the database files: command line, then configuration, then the
/// platform data directory.
///
/// # Errors
///
/// Returns [`ToolError::NoDefaultPath`] when a path is needed and the data
/// directory is unknown.
pub fn resolve_paths(
    global: &GlobalArgs,
    config: &SysconfConfig,
    dirs: &dyn BaseDirs,
) -> Result<StorePaths> {
    let templates = resolve_templates_path(global, config, dirs)?;
    let config_path = match global.config_db.as_ref().or(config.config_db.as_ref()) {
        Some(path) => path.clone(),
        None => default_store_path(dirs, CONFIG_STORE)?,
    };
    Ok(StorePaths {
        templates,
        config: config_path,
    })
}

fn resolve_templates_path(
    global: &GlobalArgs,
    config: &SysconfConfig,
    dirs: &dyn BaseDirs,
) -> Result<Utf8PathBuf> {
    match global.templates_db.as_ref().or(config.templates_db.as_ref()) {
        Some(path) => Ok(path.clone()),
        None => default_store_path(dirs, TEMPLATES_STORE),
    }
}

/// Open both file-backed stores as a [`Database`].
///
/// # Errors
///
/// Returns a database error when either file exists but cannot be loaded.
pub fn open_database(
    paths: &StorePaths,
    config: &SysconfConfig,
    env: &dyn EnvProvider,
) -> Result<Database> {
    let templates = FileStore::open(TEMPLATES_STORE, paths.templates.clone())?;
    let questions = FileStore::open(CONFIG_STORE, paths.config.clone())?;
    let candidates = LocaleCandidates::from_env(env);
    debug!(target: "sysconf::tools", "locale candidates: {candidates}");

    Ok(Database::new(Box::new(templates), Box::new(questions))
        .with_settings(config.settings())
        .with_locale_candidates(candidates)
        .with_charmap(config.charmap(env)))
}

fn run_load(
    args: &LoadArgs,
    paths: &StorePaths,
    config: &SysconfConfig,
    env: &dyn EnvProvider,
    out: &mut dyn Write,
) -> Result<()> {
    let mut db = open_database(paths, config, env)?;
    let mut loaded = 0;
    for file in &args.files {
        let templates = Template::load_file(&mut db, file, &args.owner)?;
        info!(target: "sysconf::tools", "loaded {} templates from {file}", templates.len());
        loaded += templates.len();
    }
    db.shutdown()?;

    writeln!(out, "{}", load_summary(loaded, args.files.len()))?;
    Ok(())
}

fn run_show(
    args: &ShowArgs,
    paths: &StorePaths,
    mut config: SysconfConfig,
    env: &dyn EnvProvider,
    out: &mut dyn Write,
) -> Result<()> {
    config.c_values |= args.c_values;
    let mut db = open_database(paths, &config, env)?;
    let template =
        Template::get(&mut db, &args.template).ok_or_else(|| ToolError::TemplateNotFound {
            name: args.template.clone(),
            path: paths.templates.clone(),
        })?;

    let report = args
        .requested_fields()
        .into_iter()
        .fold(TemplateReport::new(template.name()), |report, field| {
            report.with_field(field, template.field(&db, field))
        });

    let rendered = if args.json {
        format_json(&report)?
    } else {
        format_human(&report)
    };
    writeln!(out, "{}", rendered.trim_end())?;
    Ok(())
}

fn run_copy(args: &CopyArgs, templates: &Utf8Path, out: &mut dyn Write) -> Result<()> {
    let source = FileStore::open(CONFIG_STORE, args.from.clone())?;
    let mut dest = FileStore::open(CONFIG_STORE, args.to.clone())?;
    let db = Database::new(
        Box::new(FileStore::open(TEMPLATES_STORE, templates.to_owned())?),
        Box::new(source),
    );

    let items = if args.items.is_empty() {
        db.config().items()
    } else {
        args.items.clone()
    };

    let mut copied = 0;
    let mut skipped = 0;
    for item in &items {
        if !db.config().exists(item) {
            warn!(target: "sysconf::tools", "{item} is not in {}; skipping", args.from);
            continue;
        }
        if dest.exists(item) {
            debug!(target: "sysconf::tools", "{item} already present in {}", args.to);
            skipped += 1;
            continue;
        }
        db.copy_item_to(item, &mut dest)?;
        copied += 1;
    }
    dest.save()?;

    writeln!(out, "{}", copy_summary(copied, skipped))?;
    Ok(())
}
