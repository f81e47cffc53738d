use std::path::Path;

use clap::Args;

use crate::algebra::compare::{compare_mappings, compare_schemes};
use crate::cli::OutputFormat;

#[derive(Args)]
pub struct CompareArgs {
    /// First scheme name or mapping selector
    #[arg(required = true)]
    pub left: String,

    /// Second scheme name or mapping selector
    #[arg(required = true)]
    pub right: String,
}

pub fn run(args: CompareArgs, db: &Path, format: OutputFormat, _verbose: bool) -> anyhow::Result<()> {
    let store = crate::cli::load_store(db)?;

    match (args.left.contains('/'), args.right.contains('/')) {
        (true, true) => {
            let left = store.find_mapping(&args.left)?;
            let right = store.find_mapping(&args.right)?;
            let histogram = compare_mappings(&left, &right)?;

            match format {
                OutputFormat::Text => {
                    for (variant, count) in &histogram {
                        println!("{variant}: {count}");
                    }
                }
                OutputFormat::Json => {
                    let output: serde_json::Map<String, serde_json::Value> = histogram
                        .iter()
                        .map(|(variant, count)| (variant.to_string(), (*count).into()))
                        .collect();
                    println!("{}", serde_json::to_string_pretty(&output)?);
                }
                OutputFormat::Tsv => {
                    println!("variant\tcount");
                    for (variant, count) in &histogram {
                        println!("{variant}\t{count}");
                    }
                }
            }
        }
        (false, false) => {
            let left = store.find_scheme(&args.left)?;
            let right = store.find_scheme(&args.right)?;
            let relation = compare_schemes(left, right);

            match format {
                OutputFormat::Text => println!("{relation}"),
                OutputFormat::Json => {
                    let output = serde_json::json!({
                        "left": left.name(),
                        "right": right.name(),
                        "relation": format!("{relation:?}"),
                    });
                    println!("{}", serde_json::to_string_pretty(&output)?);
                }
                OutputFormat::Tsv => {
                    println!("left\tright\trelation");
                    println!("{}\t{}\t{relation:?}", left.name(), right.name());
                }
            }
        }
        _ => anyhow::bail!(
            "Cannot compare a scheme with a mapping: {} vs {}",
            args.left,
            args.right
        ),
    }

    Ok(())
}
