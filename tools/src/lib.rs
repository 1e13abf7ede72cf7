//! Command-line front end for the sysconf configuration database.
//!
//! The `sysconf` binary loads template files, shows localised template
//! fields, and copies questions between database files. The pieces live in
//! this library so they can be tested without spawning the binary.
//!
//! # Modules
//!
//! - [`cli`] - Command-line argument definitions
//! - [`commands`] - Subcommand execution against file-backed stores
//! - [`dirs`] - Platform directory lookup
//! - [`error`] - Tool error type
//! - [`logging`] - Stderr log subscriber honouring `-v` and `-q`
//! - [`output`] - Human and JSON rendering

pub mod cli;
pub mod commands;
pub mod dirs;
pub mod error;
pub mod logging;
pub mod output;
