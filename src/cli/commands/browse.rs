//! `schemahub browse` command - the interactive session
//!
//! One loop around a [`Hub`]: redraw the schema list and form area, show
//! queued notices, then ask for the next action. Failures inside the loop
//! become notices; only a broken prompt ends the session.

use console::style;
use dialoguer::{theme::ColorfulTheme, Input, Select};
use miette::Result;
use std::path::PathBuf;

use crate::cli::commands::utils::{load_hub, SourceArgs};
use crate::cli::helpers::{print_notices, truncate_str};
use crate::cli::GlobalOpts;
use crate::core::{Hub, Notice, RenderView};
use crate::error::HubError;
use crate::export::to_json_text;
use crate::schema::FormWizard;

#[derive(clap::Args, Debug)]
pub struct BrowseArgs {
    #[command(flatten)]
    pub sources: SourceArgs,

    /// Directory that receives generated.json (overrides config)
    #[arg(long, short = 'o', value_name = "DIR")]
    pub output: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Action {
    Upload,
    Search,
    Select,
    Fill,
    Export,
    Quit,
}

impl Action {
    const ALL: [Action; 6] = [
        Action::Upload,
        Action::Search,
        Action::Select,
        Action::Fill,
        Action::Export,
        Action::Quit,
    ];

    fn label(&self) -> &'static str {
        match self {
            Action::Upload => "Upload JSON Schema",
            Action::Search => "Search schemas",
            Action::Select => "Select schema",
            Action::Fill => "Fill form",
            Action::Export => "Download JSON (generated.json)",
            Action::Quit => "Quit",
        }
    }
}

pub fn run(args: BrowseArgs, global: &GlobalOpts) -> Result<()> {
    let config = args.sources.config();
    let output_dir = args.output.clone().unwrap_or_else(|| config.output_dir());
    let hub = load_hub(&args.sources, &config, global, false)?;

    Session {
        hub,
        output_dir,
        theme: ColorfulTheme::default(),
        wizard: FormWizard::new(),
        quiet: global.quiet,
    }
    .run()
}

struct Session {
    hub: Hub,
    output_dir: PathBuf,
    theme: ColorfulTheme,
    wizard: FormWizard,
    quiet: bool,
}

impl Session {
    fn run(mut self) -> Result<()> {
        loop {
            self.draw();
            print_notices(&self.hub.take_notices(), self.quiet);

            let labels: Vec<&str> = Action::ALL.iter().map(|a| a.label()).collect();
            let choice = Select::with_theme(&self.theme)
                .with_prompt("Action")
                .items(&labels)
                .default(0)
                .interact()
                .map_err(HubError::from)?;

            let outcome = match Action::ALL[choice] {
                Action::Quit => return Ok(()),
                Action::Upload => self.upload(),
                Action::Search => self.search(),
                Action::Select => self.select(),
                Action::Fill => self.fill(),
                Action::Export => self.export(),
            };

            match outcome {
                Ok(()) => {}
                Err(HubError::Prompt(e)) => return Err(HubError::Prompt(e).into()),
                Err(e) => {
                    tracing::debug!(error = %e, "action failed");
                    if !matches!(e, HubError::Parse(_) | HubError::Io { .. }) {
                        print_notices(&[Notice::error(e.to_string())], self.quiet);
                    }
                }
            }
        }
    }

    fn draw(&self) {
        println!();
        println!("{}", style("JSON Schema Hub").bold().underlined());
        if !self.hub.search_term().is_empty() {
            println!("{} {}", style("search:").dim(), style(self.hub.search_term()).yellow());
        }

        let visible = self.hub.visible();
        if visible.is_empty() {
            println!("{}", style("  (no schemas)").dim());
        }
        for entry in &visible {
            let marker = if self.hub.is_selected(entry.id) {
                style("▶").cyan().to_string()
            } else {
                " ".to_string()
            };
            let title = entry
                .title()
                .map(|t| format!("  {}", style(truncate_str(t, 40)).dim()))
                .unwrap_or_default();
            println!("{} {}{}", marker, entry.name, title);
        }

        println!("{}", style("─".repeat(50)).dim());
        match self.hub.render() {
            RenderView::Placeholder(message) => println!("{}", style(message).dim()),
            RenderView::Form { entry, fields, data } => {
                println!(
                    "{} {} ({} field(s))",
                    style("form:").dim(),
                    style(&entry.name).bold(),
                    fields.len()
                );
                println!("{}", to_json_text(data));
            }
        }
    }

    fn upload(&mut self) -> Result<(), HubError> {
        let path: String = Input::with_theme(&self.theme)
            .with_prompt("Schema file")
            .interact_text()?;
        self.hub.upload_file(&PathBuf::from(path.trim())).map(|_| ())
    }

    fn search(&mut self) -> Result<(), HubError> {
        let term: String = Input::with_theme(&self.theme)
            .with_prompt("Search")
            .with_initial_text(self.hub.search_term())
            .allow_empty(true)
            .interact_text()?;
        self.hub.set_search(term);
        Ok(())
    }

    fn select(&mut self) -> Result<(), HubError> {
        let (ids, names): (Vec<_>, Vec<_>) = self
            .hub
            .visible()
            .iter()
            .map(|e| (e.id, e.name.clone()))
            .unzip();

        if ids.is_empty() {
            println!("{}", style("No schemas match the current search.").dim());
            return Ok(());
        }

        let current = self
            .hub
            .selection()
            .and_then(|sel| ids.iter().position(|id| *id == sel))
            .unwrap_or(0);

        let choice = Select::with_theme(&self.theme)
            .with_prompt("Schema")
            .items(&names)
            .default(current)
            .interact()?;

        self.hub.select(ids[choice]).map(|_| ())
    }

    fn fill(&mut self) -> Result<(), HubError> {
        let mut form = self.hub.open_form()?;
        self.wizard.run(&mut form)?;
        self.hub.update_form_data(form.into_data());
        Ok(())
    }

    fn export(&mut self) -> Result<(), HubError> {
        let path = self.hub.export(&self.output_dir)?;
        println!("{} Wrote {}", style("✓").green(), style(path.display()).cyan());
        Ok(())
    }
}
