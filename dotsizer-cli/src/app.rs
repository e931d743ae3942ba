use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

/// dotsizer - attribute the bytes of a .NET module to its types, members and resources
#[derive(Debug, Parser)]
#[command(name = "dotsizer", version, about, long_about = None)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOptions,

    #[command(subcommand)]
    pub command: Command,
}

/// Options shared across all subcommands.
#[derive(Debug, Parser)]
pub struct GlobalOptions {
    /// Emit output as JSON instead of human-readable text.
    #[arg(long, global = true)]
    pub json: bool,

    /// Enable verbose (debug-level) logging output.
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

/// How sizes are printed in text output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum Units {
    /// Kilobytes with up to two decimals.
    #[default]
    Kb,
    /// Exact byte counts.
    Bytes,
    /// Share of the module size.
    Percent,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Print the size tree of a module.
    Tree {
        /// Path to the metadata snapshot (JSON).
        #[arg(value_name = "SNAPSHOT")]
        path: PathBuf,

        /// Module file whose length the tree is reconciled against. Defaults to the
        /// snapshot's recorded file size.
        #[arg(long, value_name = "FILE")]
        assembly: Option<PathBuf>,

        /// Fold nodes smaller than this many bytes into "... <Filtered> ..." entries.
        #[arg(long, value_name = "BYTES")]
        threshold: Option<u64>,

        /// Only print nodes up to this depth below the module. Applies to --json output too.
        #[arg(long, value_name = "N")]
        depth: Option<usize>,

        /// Size units: kb, bytes, or percent.
        #[arg(long, value_enum, default_value_t = Units::Kb)]
        units: Units,

        /// JSON file overriding the per-kind overhead constants.
        #[arg(long, value_name = "FILE")]
        cost_model: Option<PathBuf>,
    },

    /// List the largest individual elements of a module.
    Top {
        /// Path to the metadata snapshot (JSON).
        #[arg(value_name = "SNAPSHOT")]
        path: PathBuf,

        /// Module file whose length the tree is reconciled against.
        #[arg(long, value_name = "FILE")]
        assembly: Option<PathBuf>,

        /// Number of elements to list.
        #[arg(short = 'n', long, default_value_t = 20)]
        count: usize,

        /// JSON file overriding the per-kind overhead constants.
        #[arg(long, value_name = "FILE")]
        cost_model: Option<PathBuf>,
    },

    /// Summarize several modules, analyzed in parallel.
    Batch {
        /// Paths to metadata snapshots (JSON) that record their file size.
        #[arg(value_name = "SNAPSHOT", required = true, num_args = 1..)]
        paths: Vec<PathBuf>,

        /// JSON file overriding the per-kind overhead constants.
        #[arg(long, value_name = "FILE")]
        cost_model: Option<PathBuf>,
    },
}
