use std::path::Path;

use clap::Args;

use crate::cli::OutputFormat;

#[derive(Args)]
pub struct RenameArgs {
    /// Current scheme name (or alias)
    #[arg(required = true)]
    pub scheme: String,

    /// New name
    #[arg(required = true)]
    pub new_name: String,
}

pub fn run(args: RenameArgs, db: &Path, _format: OutputFormat, _verbose: bool) -> anyhow::Result<()> {
    let mut store = crate::cli::load_store(db)?;
    store.rename_scheme(&args.scheme, &args.new_name)?;
    crate::cli::save_store(&store, db)?;
    println!("Renamed scheme {} to {}", args.scheme, args.new_name);
    Ok(())
}
