//! CLI argument definitions using clap derive

use clap::{Parser, Subcommand, ValueEnum};

use crate::cli::commands::{
    browse::BrowseArgs, completions::CompletionsArgs, config::ConfigCommands, form::FormArgs,
    list::ListArgs, show::ShowArgs, validate::ValidateArgs,
};

#[derive(Parser)]
#[command(name = "schemahub")]
#[command(author, version, about = "Browse JSON Schemas and fill forms generated from them")]
#[command(long_about = "Load JSON Schema documents from local files or a GitHub repository listing, \
search and select one, fill in a form generated from it, and export the data as generated.json.")]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[command(flatten)]
    pub global: GlobalOpts,
}

#[derive(clap::Args, Clone, Debug)]
pub struct GlobalOpts {
    /// Output format
    #[arg(long, short = 'f', global = true, default_value = "auto")]
    pub format: OutputFormat,

    /// Suppress non-essential output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Enable verbose output (debug logging on stderr)
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Interactive session: load, search, select, fill and export
    Browse(BrowseArgs),

    /// Load schemas and print the (filtered) list
    List(ListArgs),

    /// Show the form fields generated from a schema
    Show(ShowArgs),

    /// Fill a form for one schema and export generated.json
    Form(FormArgs),

    /// Validate a data file against a schema
    Validate(ValidateArgs),

    /// View configuration
    #[command(subcommand)]
    Config(ConfigCommands),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Table on a terminal, tab-separated otherwise
    #[default]
    Auto,
    /// Bordered table
    Table,
    /// Tab-separated values (for piping)
    Tsv,
    /// JSON format (for programming)
    Json,
    /// Just names, one per line
    Name,
}
