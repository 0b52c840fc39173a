//! CLI argument definitions using clap

use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand, ValueHint};

/// Composite tree toolkit: arena-backed hierarchies with visitor-driven structural extension
#[derive(Parser, Debug)]
#[command(name = "rstree")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Increase verbosity (-d, -dd, -ddd)
    #[arg(short = 'd', long = "debug", global = true, action = ArgAction::Count)]
    pub debug: u8,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Show hierarchy as tree diagram
    Tree {
        /// Outline file (default: configured outline)
        #[arg(value_hint = ValueHint::FilePath)]
        file: Option<PathBuf>,
    },

    /// Print values in traversal order
    Traverse {
        /// Outline file (default: configured outline)
        #[arg(value_hint = ValueHint::FilePath)]
        file: Option<PathBuf>,

        /// Only the tree rooted at this value
        #[arg(short, long)]
        root: Option<i64>,

        /// Separator between values (default: configured separator)
        #[arg(short, long)]
        separator: Option<String>,
    },

    /// List childless values per tree
    Leaves {
        /// Outline file (default: configured outline)
        #[arg(value_hint = ValueHint::FilePath)]
        file: Option<PathBuf>,
    },

    /// Show root-to-leaf paths linearly
    Paths {
        /// Outline file (default: configured outline)
        #[arg(value_hint = ValueHint::FilePath)]
        file: Option<PathBuf>,
    },

    /// Show node counts and depth per tree
    Stats {
        /// Outline file (default: configured outline)
        #[arg(value_hint = ValueHint::FilePath)]
        file: Option<PathBuf>,
    },

    /// Run the built-in attach-and-traverse demonstration
    Demo,

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

/// Config subcommands
#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show merged config
    Show,

    /// Create config template
    Init,

    /// Show config paths
    Path,
}
