use std::path::{Path, PathBuf};

use clap::{Args, Subcommand};

use crate::cli::OutputFormat;
use crate::core::scheme::VersificationScheme;
use crate::core::standard::KJV;
use crate::matching::coverage::parse_reference_lines;

#[derive(Args)]
pub struct ImportArgs {
    #[command(subcommand)]
    pub source: ImportSource,
}

#[derive(Subcommand)]
pub enum ImportSource {
    /// Import the hard-coded KJV versification
    Kjv {
        /// Scheme name to store it under
        #[arg(long, default_value = "KJV")]
        name: String,
    },

    /// Import a scheme from a verse listing (one "<book> <chapter>:<verse>"
    /// per line, in the edition's own order)
    Coverage {
        /// Scheme name
        name: String,

        /// Listing file
        file: PathBuf,

        /// Optional description
        #[arg(long)]
        description: Option<String>,

        /// Alternate names for the scheme (repeatable)
        #[arg(long = "alias")]
        aliases: Vec<String>,
    },
}

pub fn run(args: ImportArgs, db: &Path, _format: OutputFormat, verbose: bool) -> anyhow::Result<()> {
    let mut store = crate::cli::load_store(db)?;

    let scheme = match args.source {
        ImportSource::Kjv { name } => VersificationScheme::from_standard_versification(name, &KJV)?,
        ImportSource::Coverage {
            name,
            file,
            description,
            aliases,
        } => {
            let text = std::fs::read_to_string(&file)?;
            let references = parse_reference_lines(&text)?;
            if verbose {
                eprintln!(
                    "Read {} references from {}",
                    references.len(),
                    file.display()
                );
            }
            VersificationScheme::from_reference_list(name, description, aliases, references)?
        }
    };

    let name = scheme.name().to_string();
    let verse_count = scheme.verse_count();
    store.add_scheme(scheme)?;
    crate::cli::save_store(&store, db)?;

    println!("Imported scheme {name} ({verse_count} verses) into {}", db.display());
    Ok(())
}
