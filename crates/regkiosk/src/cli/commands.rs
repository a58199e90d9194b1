//! CLI command definitions.
//!
//! This module defines the structure of all CLI subcommands.

use std::path::PathBuf;

use clap::{Args, Subcommand, ValueEnum};

use crate::registrant::Department;

/// Register command arguments.
#[derive(Debug, Args)]
pub struct RegisterCommand {
    /// Given name
    #[arg(long)]
    pub first: String,

    /// Middle name
    #[arg(long, default_value = "")]
    pub middle: String,

    /// Family name
    #[arg(long)]
    pub last: String,

    /// Department
    #[arg(long, value_enum)]
    pub department: DepartmentArg,

    /// Section
    #[arg(long, default_value = "")]
    pub section: String,

    /// Strokes JSON file replayed through the signature pad
    /// (an array of strokes, each an array of [x, y] screen points)
    #[arg(long, value_name = "FILE")]
    pub signature: PathBuf,
}

/// List command arguments.
#[derive(Debug, Args)]
pub struct ListCommand {
    /// Output as JSON
    #[arg(short, long)]
    pub json: bool,
}

/// Search command arguments.
#[derive(Debug, Args)]
pub struct SearchCommand {
    /// The search term (matches names, department, and section)
    pub term: String,

    /// Output as JSON
    #[arg(short, long)]
    pub json: bool,
}

/// Export command arguments.
#[derive(Debug, Args)]
pub struct ExportCommand {
    /// Write the CSV here instead of the dated default name
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,
}

/// Delete command arguments.
#[derive(Debug, Args)]
pub struct DeleteCommand {
    /// Registration key of the record to delete
    pub id: String,

    /// Skip the confirmation prompt
    #[arg(short, long)]
    pub yes: bool,
}

/// Wipe command arguments.
#[derive(Debug, Args)]
pub struct WipeCommand {
    /// Skip the confirmation prompt
    #[arg(short, long)]
    pub yes: bool,
}

/// Configuration commands.
#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Show current configuration
    Show {
        /// Output as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// Show the configuration file path
    Path,

    /// Validate configuration
    Validate {
        /// Path to configuration file to validate
        #[arg(short, long)]
        file: Option<PathBuf>,
    },
}

/// Department argument for the register command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum DepartmentArg {
    /// Administration
    Admin,
    /// Engineering
    Engineering,
    /// Finance
    Finance,
    /// Human resources
    Hr,
    /// Information technology
    It,
    /// Operations
    Operations,
}

impl From<DepartmentArg> for Department {
    fn from(arg: DepartmentArg) -> Self {
        match arg {
            DepartmentArg::Admin => Self::Admin,
            DepartmentArg::Engineering => Self::Engineering,
            DepartmentArg::Finance => Self::Finance,
            DepartmentArg::Hr => Self::Hr,
            DepartmentArg::It => Self::It,
            DepartmentArg::Operations => Self::Operations,
        }
    }
}
