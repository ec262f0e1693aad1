//! `schemahub validate` command - check form data against a schema

use console::style;
use miette::Result;
use std::path::PathBuf;

use crate::cli::GlobalOpts;
use crate::schema::FormValidator;
use crate::source::local::{file_name, parse_json, read_text};
use crate::source::read_schema_file;

#[derive(clap::Args, Debug)]
pub struct ValidateArgs {
    /// Schema file
    pub schema: PathBuf,

    /// JSON data file, e.g. a previous generated.json
    pub data: PathBuf,
}

pub fn run(args: ValidateArgs, global: &GlobalOpts) -> Result<()> {
    let entry = read_schema_file(&args.schema)?;
    let validator = FormValidator::compile(&entry.name, &entry.schema)?;

    let data_name = file_name(&args.data);
    let data = parse_json(&data_name, &read_text(&args.data)?)?;

    validator
        .validate(&data)
        .into_result(&entry.name, &data)?;

    if !global.quiet {
        println!(
            "{} {} is valid against {}",
            style("✓").green(),
            style(&data_name).cyan(),
            style(&entry.name).cyan()
        );
    }
    Ok(())
}
