//! `schemahub show` command - print the form generated from a schema

use console::style;
use miette::{IntoDiagnostic, Result};
use std::path::PathBuf;

use crate::cli::helpers::truncate_str;
use crate::cli::GlobalOpts;
use crate::schema::fields::{extract_fields, FieldKind, FieldSpec};
use crate::source::read_schema_file;

#[derive(clap::Args, Debug)]
pub struct ShowArgs {
    /// Schema file
    pub file: PathBuf,

    /// Print the parsed schema as JSON instead of the field summary
    #[arg(long)]
    pub raw: bool,
}

pub fn run(args: ShowArgs, global: &GlobalOpts) -> Result<()> {
    let entry = read_schema_file(&args.file)?;

    if args.raw {
        println!("{}", serde_json::to_string_pretty(&entry.schema).into_diagnostic()?);
        return Ok(());
    }

    let title = entry.title().unwrap_or(&entry.name);
    println!("{}", style(title).bold());
    println!("{}", "=".repeat(title.chars().count()));
    if let Some(desc) = entry.description() {
        println!("{}\n", desc);
    }

    let fields = extract_fields(&entry.schema);
    let mut rows = Vec::new();
    flatten(&fields, &mut rows);

    println!("{:<28} {:<16} {:<5} {}", "FIELD", "TYPE", "REQ", "DESCRIPTION");
    println!("{}", "-".repeat(80));
    for field in &rows {
        let path = if field.path.is_empty() {
            field.name.clone()
        } else {
            field.path.join(".")
        };
        println!(
            "{:<28} {:<16} {:<5} {}",
            truncate_str(&path, 28),
            field.kind.label(),
            if field.required { "yes" } else { "" },
            truncate_str(field.description.as_deref().unwrap_or(""), 38)
        );
    }

    let enums: Vec<_> = rows
        .iter()
        .filter_map(|f| match &f.kind {
            FieldKind::Enum { values } => Some((f, values)),
            FieldKind::Array { item } => match item.as_ref() {
                FieldKind::Enum { values } => Some((f, values)),
                _ => None,
            },
            _ => None,
        })
        .collect();
    if !enums.is_empty() {
        println!("\nEnum Values:");
        for (field, values) in enums {
            let vals: Vec<String> = values
                .iter()
                .map(|v| v.as_str().map(String::from).unwrap_or_else(|| v.to_string()))
                .collect();
            println!("  {}: {}", field.path.join("."), vals.join(", "));
        }
    }

    if !global.quiet {
        println!(
            "\n{}",
            style("Use --raw for the full JSON schema, or `schemahub form` to fill it in").dim()
        );
    }
    Ok(())
}

/// Nested object fields are listed after their parent
fn flatten<'a>(fields: &'a [FieldSpec], out: &mut Vec<&'a FieldSpec>) {
    for field in fields {
        out.push(field);
        if let FieldKind::Object { fields: inner } = &field.kind {
            flatten(inner, out);
        }
    }
}
