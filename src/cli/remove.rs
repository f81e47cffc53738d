use std::path::Path;

use clap::Args;

use crate::cli::OutputFormat;

#[derive(Args)]
pub struct RemoveArgs {
    /// Scheme names or mapping selectors (from/to[/N]) to remove.
    /// Mappings must be removed before their endpoint schemes.
    #[arg(required = true)]
    pub names: Vec<String>,
}

pub fn run(args: RemoveArgs, db: &Path, _format: OutputFormat, _verbose: bool) -> anyhow::Result<()> {
    let mut store = crate::cli::load_store(db)?;
    for name in &args.names {
        if name.contains('/') {
            store.remove_mapping(name)?;
        } else {
            store.remove_scheme(name)?;
        }
    }
    crate::cli::save_store(&store, db)?;
    println!("Removed {} entries from {}", args.names.len(), db.display());
    Ok(())
}
