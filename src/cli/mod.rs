//! Command-line interface for verse-solver.
//!
//! This module implements the CLI using clap. Available commands:
//!
//! - **list**: Print scheme and mapping summaries from a store
//! - **import**: Add schemes to a store (hard-coded KJV, coverage listings)
//! - **export**: Write selected schemes/mappings to a new store file
//! - **rename**: Rename a scheme, rewriting its mappings
//! - **remove**: Remove schemes or mappings
//! - **join**: Compose a chain of mappings
//! - **compare**: Compare two schemes, or two mappings verse by verse
//! - **detect**: Rank schemes by how well they match observed verses
//!
//! ## Usage
//!
//! ```text
//! # Seed a store with the hard-coded KJV scheme
//! verse-solver --db v11n.json import kjv
//!
//! # Which scheme does this document use?
//! verse-solver --db v11n.json detect observed.txt
//!
//! # Compose mappings A->B and B->C into A->C
//! verse-solver --db v11n.json join A/B B/C
//!
//! # Audit two mapping tables for the same scheme pair
//! verse-solver --db v11n.json compare A/B/1 A/B/2 --format json
//! ```

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};

use crate::store::set::SchemeStore;

pub mod compare;
pub mod detect;
pub mod export;
pub mod import;
pub mod join;
pub mod list;
pub mod remove;
pub mod rename;

#[derive(Parser)]
#[command(name = "verse-solver")]
#[command(version)]
#[command(about = "Model, compare and detect Bible versification schemes")]
#[command(
    long_about = "verse-solver maintains a database of versification schemes (which verse \
                  addresses exist in a bible edition) and mappings between them.\n\nIt can \
                  detect which known scheme a document most closely follows, compose and \
                  audit verse mappings, and round-trip everything through a JSON store."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Versification store file
    #[arg(long, global = true, default_value = "versifications.json")]
    pub db: PathBuf,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Output format
    #[arg(short, long, global = true, default_value = "text")]
    pub format: OutputFormat,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Print scheme and mapping summaries
    List(list::ListArgs),

    /// Import schemes into the store
    Import(import::ImportArgs),

    /// Export schemes and mappings to a new store file
    Export(export::ExportArgs),

    /// Rename a scheme
    Rename(rename::RenameArgs),

    /// Remove schemes or mappings
    Remove(remove::RemoveArgs),

    /// Compose a chain of mappings into one
    Join(join::JoinArgs),

    /// Compare two schemes or two mappings
    Compare(compare::CompareArgs),

    /// Detect which scheme matches observed verse coverage
    Detect(detect::DetectArgs),
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
    Tsv,
}

/// Load the store, or start empty when the file does not exist yet.
pub(crate) fn load_store(path: &Path) -> anyhow::Result<SchemeStore> {
    if path.exists() {
        Ok(SchemeStore::load_from_file(path)?)
    } else {
        Ok(SchemeStore::new())
    }
}

/// Save the store. Called only after an operation fully succeeded, so a
/// failing command never leaves a partially mutated store behind.
pub(crate) fn save_store(store: &SchemeStore, path: &Path) -> anyhow::Result<()> {
    store.save_to_file(path)?;
    Ok(())
}
