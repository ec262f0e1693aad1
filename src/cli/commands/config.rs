//! `schemahub config` command - inspect configuration

use clap::Subcommand;
use console::style;
use miette::Result;
use std::path::Path;

use crate::core::config::LOCAL_CONFIG_FILE;
use crate::core::Config;

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show current configuration values
    Show(ShowArgs),

    /// Show paths to configuration files
    Path,

    /// List all available configuration keys
    Keys,
}

#[derive(clap::Args, Debug)]
pub struct ShowArgs {
    /// Show only this key's value
    pub key: Option<String>,
}

/// Valid configuration keys
const VALID_KEYS: &[(&str, &str)] = &[
    ("listing_url", "Repository directory listing used by --remote"),
    ("output_dir", "Directory that receives generated.json"),
    ("github_token", "Bearer token for the listing host (rate limits)"),
    ("user_agent", "User-Agent header for remote requests"),
];

/// Run a config subcommand
pub fn run(cmd: ConfigCommands) -> Result<()> {
    match cmd {
        ConfigCommands::Show(args) => run_show(args),
        ConfigCommands::Path => run_path(),
        ConfigCommands::Keys => run_keys(),
    }
}

fn run_show(args: ShowArgs) -> Result<()> {
    let config = Config::load();

    if let Some(key) = &args.key {
        return match get_config_value(&config, key) {
            Some(v) => {
                println!("{}", v);
                Ok(())
            }
            None => Err(miette::miette!(
                "Unknown key '{}' (see `schemahub config keys`)",
                key
            )),
        };
    }

    println!("{}", style("Effective Configuration").bold().underlined());
    println!();
    for (key, _) in VALID_KEYS {
        let value = get_config_value(&config, key).unwrap_or_default();
        println!("  {:<14} {}", style(key).cyan(), value);
    }

    println!();
    println!("{}", style("Config Sources (in priority order):").dim());
    println!("  1. Command-line flags (--listing-url, --output)");
    println!("  2. Environment variables (SCHEMAHUB_LISTING_URL, SCHEMAHUB_OUTPUT_DIR, SCHEMAHUB_GITHUB_TOKEN)");
    println!("  3. Working directory config ({})", LOCAL_CONFIG_FILE);
    println!("  4. Global config (~/.config/schemahub/config.yaml)");

    Ok(())
}

/// Effective value of a key; the token is masked
fn get_config_value(config: &Config, key: &str) -> Option<String> {
    match key {
        "listing_url" => Some(config.listing_url().to_string()),
        "output_dir" => Some(config.output_dir().display().to_string()),
        "github_token" => Some(
            config
                .github_token
                .as_ref()
                .map(|_| "********".to_string())
                .unwrap_or_else(|| "(not set)".to_string()),
        ),
        "user_agent" => Some(config.user_agent().to_string()),
        _ => None,
    }
}

fn run_path() -> Result<()> {
    println!("{}", style("Configuration file paths:").bold());
    println!();
    match Config::global_config_path() {
        Some(path) => print_path("Global:", &path),
        None => println!("  {} {}", style("Global:").cyan(), style("(no home directory)").dim()),
    }
    print_path("Local:", &Config::local_config_path());
    Ok(())
}

fn print_path(label: &str, path: &Path) {
    println!("  {:<8} {}", style(label).cyan(), path.display());
    if path.exists() {
        println!("           {}", style("(exists)").green());
    } else {
        println!("           {}", style("(not created)").dim());
    }
}

fn run_keys() -> Result<()> {
    println!("{}", style("Available configuration keys:").bold());
    println!();
    for (key, description) in VALID_KEYS {
        println!("  {:<14} {}", style(key).cyan(), description);
    }
    Ok(())
}
