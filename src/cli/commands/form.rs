//! `schemahub form` command - fill one schema's form and export it

use console::style;
use miette::Result;
use serde_json::{Map, Value};
use std::path::PathBuf;

use crate::cli::helpers::hint;
use crate::cli::GlobalOpts;
use crate::core::Config;
use crate::export;
use crate::schema::{FormSession, FormWizard};
use crate::source::local::{file_name, parse_json, read_text};
use crate::source::read_schema_file;

#[derive(clap::Args, Debug)]
pub struct FormArgs {
    /// Schema file
    pub file: PathBuf,

    /// Start from existing form data instead of an empty form
    #[arg(long, short = 'd', value_name = "FILE")]
    pub data: Option<PathBuf>,

    /// Directory that receives generated.json (overrides config)
    #[arg(long, short = 'o', value_name = "DIR")]
    pub output: Option<PathBuf>,

    /// Fill and validate without writing generated.json
    #[arg(long)]
    pub no_export: bool,
}

pub fn run(args: FormArgs, global: &GlobalOpts) -> Result<()> {
    let entry = read_schema_file(&args.file)?;

    let data = match &args.data {
        Some(path) => parse_json(&file_name(path), &read_text(path)?)?,
        None => Value::Object(Map::new()),
    };

    let mut form = FormSession::new(&entry, data)?;
    FormWizard::new().run(&mut form)?;

    if !args.no_export {
        let dir = args.output.clone().unwrap_or_else(|| Config::load().output_dir());
        let path = export::write_export(&dir, form.data())?;
        println!(
            "{} Wrote {}",
            style("✓").green(),
            style(path.display()).cyan()
        );
    }

    if let Err(e) = form.finish() {
        eprintln!("{:?}", miette::Report::new(e));
        hint("Exported data does not satisfy the schema yet.", global.quiet);
    }

    Ok(())
}
