use clap::Parser;
use miette::Result;
use schemahub::cli::{Cli, Commands, GlobalOpts};
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    // Reset SIGPIPE to default behavior (terminate silently) for proper Unix piping.
    #[cfg(unix)]
    {
        unsafe {
            libc::signal(libc::SIGPIPE, libc::SIG_DFL);
        }
    }
    miette::set_hook(Box::new(|_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .terminal_links(true)
                .unicode(true)
                .context_lines(2)
                .tab_width(4)
                .build(),
        )
    }))?;

    let cli = Cli::parse();
    let global = cli.global;
    init_tracing(&global);

    match cli.command {
        Commands::Browse(args) => schemahub::cli::commands::browse::run(args, &global),
        Commands::List(args) => schemahub::cli::commands::list::run(args, &global),
        Commands::Show(args) => schemahub::cli::commands::show::run(args, &global),
        Commands::Form(args) => schemahub::cli::commands::form::run(args, &global),
        Commands::Validate(args) => schemahub::cli::commands::validate::run(args, &global),
        Commands::Config(cmd) => schemahub::cli::commands::config::run(cmd),
        Commands::Completions(args) => schemahub::cli::commands::completions::run(args),
    }
}

/// Log to stderr; RUST_LOG wins over --verbose
fn init_tracing(global: &GlobalOpts) {
    let default_level = if global.verbose { "schemahub=debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
