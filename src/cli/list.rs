use std::collections::HashMap;
use std::path::Path;

use clap::Args;

use crate::cli::OutputFormat;
use crate::core::mapping::VersificationMapping;
use crate::core::scheme::VersificationScheme;

#[derive(Args)]
pub struct ListArgs {
    /// Scheme names or mapping selectors (from/to[/N]); everything when
    /// omitted
    pub names: Vec<String>,
}

pub fn run(args: ListArgs, db: &Path, format: OutputFormat, _verbose: bool) -> anyhow::Result<()> {
    let store = crate::cli::load_store(db)?;

    // Resolve what to print: (label, entry) pairs
    let mut schemes: Vec<&VersificationScheme> = Vec::new();
    let mut mappings: Vec<(String, std::sync::Arc<VersificationMapping>)> = Vec::new();

    if args.names.is_empty() {
        for scheme in store.schemes() {
            schemes.push(scheme);
        }
        let mut counters: HashMap<String, usize> = HashMap::new();
        for mapping in store.mappings() {
            let prefix = format!(
                "{}/{}",
                mapping.from_scheme().name(),
                mapping.to_scheme().name()
            );
            let counter = counters.entry(prefix.clone()).or_insert(0);
            *counter += 1;
            mappings.push((format!("{prefix}/{counter}"), mapping.clone()));
        }
    } else {
        for name in &args.names {
            if name.contains('/') {
                mappings.push((name.clone(), store.find_mapping(name)?));
            } else {
                schemes.push(store.find_scheme(name)?);
            }
        }
    }

    match format {
        OutputFormat::Text => {
            for scheme in &schemes {
                print_scheme_text(scheme);
            }
            for (label, mapping) in &mappings {
                print_mapping_text(label, mapping);
            }
        }
        OutputFormat::Json => {
            let output = serde_json::json!({
                "schemes": schemes.iter().map(|s| scheme_json(s)).collect::<Vec<_>>(),
                "mappings": mappings
                    .iter()
                    .map(|(label, m)| mapping_json(label, m))
                    .collect::<Vec<_>>(),
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Tsv => {
            println!("kind\tname\tverses_or_rules\tdescription");
            for scheme in &schemes {
                println!(
                    "scheme\t{}\t{}\t{}",
                    scheme.name(),
                    scheme.verse_count(),
                    scheme.description().unwrap_or("")
                );
            }
            for (label, mapping) in &mappings {
                println!("mapping\t{label}\t{}\t", mapping.rule_count());
            }
        }
    }

    Ok(())
}

fn print_scheme_text(scheme: &VersificationScheme) {
    println!(
        "{}: {} ({} verses)",
        scheme.name(),
        scheme.description().unwrap_or("(No description)"),
        scheme.verse_count()
    );
    for alias in scheme.aliases() {
        println!("\tAlias: {alias}");
    }
}

fn print_mapping_text(label: &str, mapping: &VersificationMapping) {
    println!("{label}: {} rules", mapping.rule_count());
    let stats = mapping.occurrence_stats();
    println!(
        "\t{}: {} of {} verses",
        mapping.from_scheme().name(),
        stats.from_mapped,
        mapping.from_scheme().verse_count()
    );
    println!(
        "\t{}: {} of {} verses",
        mapping.to_scheme().name(),
        stats.to_mapped,
        mapping.to_scheme().verse_count()
    );
}

fn scheme_json(scheme: &VersificationScheme) -> serde_json::Value {
    serde_json::json!({
        "name": scheme.name(),
        "description": scheme.description(),
        "aliases": scheme.aliases(),
        "verse_count": scheme.verse_count(),
    })
}

fn mapping_json(label: &str, mapping: &VersificationMapping) -> serde_json::Value {
    let stats = mapping.occurrence_stats();
    serde_json::json!({
        "selector": label,
        "from": mapping.from_scheme().name(),
        "to": mapping.to_scheme().name(),
        "rule_count": mapping.rule_count(),
        "from_mapped": stats.from_mapped.total(),
        "to_mapped": stats.to_mapped.total(),
    })
}
