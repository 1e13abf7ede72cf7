//! CLI argument definitions for the `sysconf` tool.
//!
//! Parsing lives here so the binary stays focused on wiring the database to
//! standard output.

use camino::Utf8PathBuf;
use clap::{Args, Parser, Subcommand};

/// Fields shown by `sysconf show` when none are requested.
pub const DEFAULT_SHOW_FIELDS: [&str; 5] = [
    "type",
    "description",
    "extended_description",
    "choices",
    "default",
];

/// Manage the sysconf configuration database.
#[derive(Parser, Debug)]
#[command(name = "sysconf")]
#[command(version, about)]
#[command(after_help = concat!(
    "EXAMPLES:\n",
    "  Load the templates shipped by a package:\n",
    "    $ sysconf load --owner webserver webserver.templates\n\n",
    "  Show a template in the current language:\n",
    "    $ sysconf show webserver/port\n\n",
    "  Show untranslated values as JSON:\n",
    "    $ sysconf show webserver/port --c-values --json\n\n",
    "  Back up every question to another database:\n",
    "    $ sysconf copy --from config.json --to backup.json",
))]
pub struct Cli {
    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Command,

    /// Options shared by every subcommand.
    #[command(flatten)]
    pub global: GlobalArgs,
}

/// Options accepted before or after any subcommand.
#[derive(Args, Debug, Clone, Default)]
pub struct GlobalArgs {
    /// Configuration file [default: platform config directory].
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<Utf8PathBuf>,

    /// Templates database file [default: from configuration].
    #[arg(long, global = true, value_name = "FILE")]
    pub templates_db: Option<Utf8PathBuf>,

    /// Config (questions) database file [default: from configuration].
    #[arg(long, global = true, value_name = "FILE")]
    pub config_db: Option<Utf8PathBuf>,

    /// Increase log verbosity (repeatable: -v, -vv).
    #[arg(
        short,
        long = "verbose",
        global = true,
        action = clap::ArgAction::Count,
        conflicts_with = "quiet"
    )]
    pub verbosity: u8,

    /// Only report errors.
    #[arg(short, long, global = true, conflicts_with = "verbosity")]
    pub quiet: bool,
}

/// Available subcommands.
#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Load template files into the database.
    Load(LoadArgs),

    /// Show the fields of a template.
    Show(ShowArgs),

    /// Copy questions between two database files.
    Copy(CopyArgs),
}

/// Arguments for `sysconf load`.
#[derive(Args, Debug, Clone)]
pub struct LoadArgs {
    /// Owner recorded on the questions created for the templates.
    #[arg(short, long, value_name = "OWNER")]
    pub owner: String,

    /// Template files to load, in order.
    #[arg(required = true, value_name = "FILE")]
    pub files: Vec<Utf8PathBuf>,
}

/// Arguments for `sysconf show`.
#[derive(Args, Debug, Clone)]
pub struct ShowArgs {
    /// Template to show.
    #[arg(value_name = "TEMPLATE")]
    pub template: String,

    /// Field to show (can be repeated) [default: the standard fields].
    #[arg(short, long = "field", value_name = "FIELD")]
    pub fields: Vec<String>,

    /// Show untranslated `-C` values.
    #[arg(long)]
    pub c_values: bool,

    /// Output in JSON format for scripting.
    #[arg(long)]
    pub json: bool,
}

impl ShowArgs {
    /// Fields to show, in order.
    ///
    /// # Examples
    ///
    /// ```
    /// use sysconf_tools::cli::{DEFAULT_SHOW_FIELDS, ShowArgs};
    ///
    /// let args = ShowArgs {
    ///     template: "demo/host".to_owned(),
    ///     fields: Vec::new(),
    ///     c_values: false,
    ///     json: false,
    /// };
    /// assert_eq!(args.requested_fields(), DEFAULT_SHOW_FIELDS);
    /// ```
    #[must_use]
    pub fn requested_fields(&self) -> Vec<&str> {
        if self.fields.is_empty() {
            return DEFAULT_SHOW_FIELDS.to_vec();
        }
        self.fields.iter().map(String::as_str).collect()
    }
}

/// Arguments for `sysconf copy`.
#[derive(Args, Debug, Clone)]
pub struct CopyArgs {
    /// Database file to copy from.
    #[arg(long, value_name = "FILE")]
    pub from: Utf8PathBuf,

    /// Database file to copy into.
    #[arg(long, value_name = "FILE")]
    pub to: Utf8PathBuf,

    /// Items to copy [default: every item].
    #[arg(value_name = "ITEM")]
    pub items: Vec<String>,
}

#[cfg(test)]
#[path = "cli_tests.rs"]
mod tests;
