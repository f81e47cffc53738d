use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use clap::Args;

use crate::cli::OutputFormat;
use crate::store::set::SchemeStore;

#[derive(Args)]
pub struct ExportArgs {
    /// Output store file
    #[arg(required = true)]
    pub output: PathBuf,

    /// Scheme names or mapping selectors to export; everything when
    /// omitted
    pub names: Vec<String>,
}

pub fn run(args: ExportArgs, db: &Path, _format: OutputFormat, verbose: bool) -> anyhow::Result<()> {
    let store = crate::cli::load_store(db)?;

    if args.names.is_empty() {
        crate::cli::save_store(&store, &args.output)?;
        println!(
            "Exported {} schemes and {} mappings to {}",
            store.schemes().len(),
            store.mappings().len(),
            args.output.display()
        );
        return Ok(());
    }

    // Resolve the selection first; mapping endpoints are always included
    // so the exported store stays self-contained.
    let mut scheme_names: BTreeSet<String> = BTreeSet::new();
    let mut mappings = Vec::new();
    for name in &args.names {
        if name.contains('/') {
            let mapping = store.find_mapping(name)?;
            scheme_names.insert(mapping.from_scheme().name().to_string());
            scheme_names.insert(mapping.to_scheme().name().to_string());
            mappings.push(mapping);
        } else {
            scheme_names.insert(store.find_scheme(name)?.name().to_string());
        }
    }

    let mut selection = SchemeStore::new();
    for scheme in store.schemes() {
        if scheme_names.contains(scheme.name()) {
            selection.add_scheme(scheme.as_ref().clone())?;
        }
    }
    for mapping in mappings {
        if verbose {
            eprintln!(
                "Exporting mapping {}/{} ({} rules)",
                mapping.from_scheme().name(),
                mapping.to_scheme().name(),
                mapping.rule_count()
            );
        }
        selection.add_mapping(mapping.as_ref().clone())?;
    }

    crate::cli::save_store(&selection, &args.output)?;
    println!(
        "Exported {} schemes and {} mappings to {}",
        selection.schemes().len(),
        selection.mappings().len(),
        args.output.display()
    );
    Ok(())
}
