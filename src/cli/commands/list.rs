//! `schemahub list` command - load schemas and print the filtered list

use console::{style, Term};
use miette::{IntoDiagnostic, Result};
use serde::Serialize;
use tabled::{builder::Builder, settings::Style};

use crate::cli::commands::utils::{load_hub, SourceArgs};
use crate::cli::helpers::{format_short_id, truncate_str};
use crate::cli::{GlobalOpts, OutputFormat};
use crate::core::SchemaEntry;

#[derive(clap::Args, Debug)]
pub struct ListArgs {
    #[command(flatten)]
    pub sources: SourceArgs,

    /// Case-insensitive substring filter on file names
    #[arg(long, short = 's', default_value = "")]
    pub search: String,

    /// Show only count
    #[arg(long)]
    pub count: bool,
}

#[derive(Serialize)]
struct ListRow<'a> {
    id: String,
    name: &'a str,
    title: Option<&'a str>,
}

/// Run the list command
pub fn run(args: ListArgs, global: &GlobalOpts) -> Result<()> {
    let config = args.sources.config();
    let mut hub = load_hub(&args.sources, &config, global, true)?;
    hub.set_search(args.search.clone());
    let visible = hub.visible();

    if args.count {
        println!("{}", visible.len());
        return Ok(());
    }

    let format = match global.format {
        OutputFormat::Auto if Term::stdout().is_term() => OutputFormat::Table,
        OutputFormat::Auto => OutputFormat::Tsv,
        other => other,
    };

    match format {
        OutputFormat::Json => {
            let rows: Vec<ListRow> = visible.iter().map(|e| row(e)).collect();
            println!("{}", serde_json::to_string_pretty(&rows).into_diagnostic()?);
        }
        OutputFormat::Name => {
            for entry in &visible {
                println!("{}", entry.name);
            }
        }
        OutputFormat::Tsv => {
            for entry in &visible {
                println!("{}\t{}\t{}", entry.id, entry.name, entry.title().unwrap_or(""));
            }
        }
        OutputFormat::Table | OutputFormat::Auto => {
            if visible.is_empty() {
                if !global.quiet {
                    println!("{}", style("No schemas found.").dim());
                }
                return Ok(());
            }

            let mut builder = Builder::default();
            builder.push_record(["#", "ID", "NAME", "TITLE"]);
            for (i, entry) in visible.iter().enumerate() {
                builder.push_record([
                    (i + 1).to_string(),
                    format_short_id(&entry.id),
                    entry.name.clone(),
                    truncate_str(entry.title().unwrap_or(""), 40),
                ]);
            }
            println!("{}", builder.build().with(Style::rounded()));

            if !global.quiet {
                println!();
                println!(
                    "{} of {} schema(s) shown",
                    style(visible.len()).cyan(),
                    hub.registry().len()
                );
            }
        }
    }

    Ok(())
}

fn row(entry: &SchemaEntry) -> ListRow<'_> {
    ListRow {
        id: entry.id.to_string(),
        name: &entry.name,
        title: entry.title(),
    }
}
