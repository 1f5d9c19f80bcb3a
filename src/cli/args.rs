//! CLI argument definitions using clap

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Parser, Subcommand, ValueHint};

/// Document copy lineage rules and record hierarchies
#[derive(Parser, Debug)]
#[command(name = "doclineage")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Debug output (-d info, -dd debug, -ddd trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub debug: u8,

    /// Config file layered over the global config
    #[arg(short, long, global = true, value_hint = ValueHint::FilePath)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Show which copy kinds a document kind may produce
    Kinds {
        /// Source copy kind (original, sao-y, sao-luc, trich-sao, ...)
        kind: String,
    },

    /// Show the record hierarchy as a tree
    Tree {
        /// Snapshot file
        #[arg(value_hint = ValueHint::FilePath)]
        snapshot: PathBuf,
    },

    /// Print the label path of every record
    Paths {
        /// Snapshot file
        #[arg(value_hint = ValueHint::FilePath)]
        snapshot: PathBuf,
    },

    /// List records without children
    Leaves {
        /// Snapshot file
        #[arg(value_hint = ValueHint::FilePath)]
        snapshot: PathBuf,
    },

    /// Check whether a record may be moved under a new parent
    Move {
        /// Snapshot file
        #[arg(value_hint = ValueHint::FilePath)]
        snapshot: PathBuf,
        /// Record to move
        id: String,
        /// New parent (omit for top level)
        parent: Option<String>,
    },

    /// Create a copy of a document (in memory, nothing is written back)
    Copy {
        /// Snapshot file
        #[arg(value_hint = ValueHint::FilePath)]
        snapshot: PathBuf,
        /// Source document id
        source: String,
        /// Copy kind to produce
        kind: String,
        /// Name of the signer
        #[arg(long = "by")]
        copied_by: String,
        /// Signing title of the signer
        #[arg(long, default_value = "")]
        title: String,
        /// Recipient (repeatable)
        #[arg(long = "to")]
        recipients: Vec<String>,
        /// Extracted content, required for extract copies
        #[arg(long)]
        extract: Option<String>,
        /// Copy date (default: today)
        #[arg(long)]
        date: Option<NaiveDate>,
    },

    /// List the copies descending from an original
    Copies {
        /// Snapshot file
        #[arg(value_hint = ValueHint::FilePath)]
        snapshot: PathBuf,
        /// Original document id
        original: String,
    },

    /// Manage settings
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },

    /// Generate shell completions
    Completion {
        /// Shell type
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show effective settings
    Show,
    /// Print a commented config template
    Template,
    /// Show the global config file location
    Path,
}
