use clap::Parser;
use tracing_subscriber::EnvFilter;

use verse_solver::cli::{self, Cli, Commands};

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging based on verbosity flag
    let filter = if cli.verbose {
        EnvFilter::new("verse_solver=debug,info")
    } else {
        EnvFilter::new("verse_solver=warn")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .init();

    match cli.command {
        Commands::List(args) => cli::list::run(args, &cli.db, cli.format, cli.verbose)?,
        Commands::Import(args) => cli::import::run(args, &cli.db, cli.format, cli.verbose)?,
        Commands::Export(args) => cli::export::run(args, &cli.db, cli.format, cli.verbose)?,
        Commands::Rename(args) => cli::rename::run(args, &cli.db, cli.format, cli.verbose)?,
        Commands::Remove(args) => cli::remove::run(args, &cli.db, cli.format, cli.verbose)?,
        Commands::Join(args) => cli::join::run(args, &cli.db, cli.format, cli.verbose)?,
        Commands::Compare(args) => cli::compare::run(args, &cli.db, cli.format, cli.verbose)?,
        Commands::Detect(args) => cli::detect::run(args, &cli.db, cli.format, cli.verbose)?,
    }

    Ok(())
}
