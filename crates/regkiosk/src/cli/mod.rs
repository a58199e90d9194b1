//! Command-line interface for regkiosk.
//!
//! This module provides the CLI structure and command handlers for the
//! `regdesk` binary.

mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

pub use commands::{
    ConfigCommand, DeleteCommand, DepartmentArg, ExportCommand, ListCommand, RegisterCommand,
    SearchCommand, WipeCommand,
};

/// A stroke replay script: strokes of `[x, y]` screen points.
pub type StrokeScript = Vec<Vec<[f64; 2]>>;

/// regdesk - Registration kiosk
///
/// Captures registrations with a signed-on-glass signature, rejects
/// duplicates, and lists, searches, and exports the stored records.
#[derive(Debug, Parser)]
#[command(name = "regdesk")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to custom configuration file
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Increase verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// The command to execute
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Register a person
    Register(RegisterCommand),

    /// List stored registrations
    List(ListCommand),

    /// Search stored registrations
    Search(SearchCommand),

    /// Export registrations as CSV
    Export(ExportCommand),

    /// Delete one registration
    Delete(DeleteCommand),

    /// Delete every registration
    Wipe(WipeCommand),

    /// View or validate configuration
    #[command(subcommand)]
    Config(ConfigCommand),
}

impl Cli {
    /// Get the verbosity level based on flags.
    #[must_use]
    pub fn verbosity(&self) -> crate::logging::Verbosity {
        if self.quiet {
            crate::logging::Verbosity::Quiet
        } else {
            match self.verbose {
                0 => crate::logging::Verbosity::Normal,
                1 => crate::logging::Verbosity::Verbose,
                _ => crate::logging::Verbosity::Trace,
            }
        }
    }
}
