//! CLI argument definitions.
//!
//! This module defines all CLI arguments using clap's derive macros.
//! The main entry point is the [`Cli`] struct.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// verwatch - Track installed and latest versions of your software.
#[derive(Debug, Parser)]
#[command(name = "verwatch")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to the software list (overrides VERWATCH_FILE)
    #[arg(short, long, global = true)]
    pub file: Option<PathBuf>,

    /// Seconds before a version command is killed
    #[arg(long, global = true, value_name = "SECS")]
    pub command_timeout: Option<f64>,

    /// Seconds before a version page fetch gives up
    #[arg(long, global = true, value_name = "SECS")]
    pub fetch_timeout: Option<f64>,

    /// Run version commands without a shell
    #[arg(long, global = true)]
    pub direct: bool,

    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// List tracked software
    List,

    /// Show installed and latest versions
    Check(CheckArgs),

    /// Stop tracking a program
    Remove(RemoveArgs),
}

/// Arguments for the `check` command.
#[derive(Debug, Clone, clap::Args)]
pub struct CheckArgs {
    /// Only check this entry
    pub name: Option<String>,
}

/// Arguments for the `remove` command.
#[derive(Debug, Clone, clap::Args)]
pub struct RemoveArgs {
    /// Name of the entry to remove
    pub name: String,
}
