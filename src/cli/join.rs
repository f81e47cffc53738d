use std::path::Path;

use clap::Args;

use crate::algebra::compose::join_all;
use crate::cli::OutputFormat;
use crate::core::mapping::VersificationMapping;

#[derive(Args)]
pub struct JoinArgs {
    /// Mapping selectors to compose left to right; each consecutive pair
    /// must share its intermediate scheme
    #[arg(required = true, num_args = 2..)]
    pub mappings: Vec<String>,
}

pub fn run(args: JoinArgs, db: &Path, _format: OutputFormat, verbose: bool) -> anyhow::Result<()> {
    let mut store = crate::cli::load_store(db)?;

    let resolved: Vec<std::sync::Arc<VersificationMapping>> = args
        .mappings
        .iter()
        .map(|selector| store.find_mapping(selector))
        .collect::<Result<_, _>>()?;
    let refs: Vec<&VersificationMapping> = resolved.iter().map(|m| m.as_ref()).collect();

    let joined = join_all(&refs)?;
    if verbose {
        eprintln!(
            "Composed {} mappings into {} -> {} ({} rules)",
            refs.len(),
            joined.from_scheme().name(),
            joined.to_scheme().name(),
            joined.rule_count()
        );
    }

    let summary = format!(
        "{}/{} ({} rules)",
        joined.from_scheme().name(),
        joined.to_scheme().name(),
        joined.rule_count()
    );
    store.add_mapping(joined)?;
    crate::cli::save_store(&store, db)?;

    println!("Stored joined mapping {summary}");
    Ok(())
}
