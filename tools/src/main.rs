//! `sysconf` command-line entrypoint.
//!
//! Loads template files into the configuration database, shows template
//! fields in the user's language, and copies questions between databases.

use std::io::Write;

use clap::Parser;
use sysconf_common::SystemEnv;
use sysconf_tools::cli::Cli;
use sysconf_tools::commands::run;
use sysconf_tools::dirs::SystemBaseDirs;
use sysconf_tools::error::Result;
use sysconf_tools::logging::{install, level_for};

fn main() {
    let cli = Cli::parse();
    install(level_for(cli.global.verbosity, cli.global.quiet));

    let result = {
        let mut stdout = std::io::stdout().lock();
        run(&cli, &SystemEnv, &SystemBaseDirs, &mut stdout)
    };
    let exit_code = exit_code_for(result, &mut std::io::stderr());
    if exit_code != 0 {
        std::process::exit(exit_code);
    }
}

fn exit_code_for(result: Result<()>, stderr: &mut dyn Write) -> i32 {
    match result {
        Ok(()) => 0,
        Err(err) => {
            let _ignored = writeln!(stderr, "error: {err}");
            1
        }
    }
}
