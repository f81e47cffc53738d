//! # verse-solver
//!
//! A library for modeling, comparing and detecting Bible versification
//! schemes.
//!
//! Different bible editions split text into chapters and verses
//! differently: Psalm superscriptions counted as verse 1 in one tradition
//! and as a title pseudo-verse in another, deuterocanonical books present
//! or absent, verses merged or split. Each such numbering convention is a
//! **versification scheme**: an ordered catalogue of canonical verse
//! addresses.
//!
//! `verse-solver` models schemes and the **mappings** that translate
//! addresses between them, provides an algebra to compose and compare
//! mappings, and ships a **detector** that ranks known schemes by how
//! well they match the addresses a document actually uses.
//!
//! ## Features
//!
//! - **Exact structural matching**: all comparison is based on which
//!   chapter/verse addresses exist; no fuzzy or linguistic matching
//! - **Mapping composition**: join mapping chains through shared
//!   intermediate schemes, with run-aware de-duplication
//! - **Mapping auditing**: per-verse classification of how two mapping
//!   tables for the same scheme pair disagree
//! - **Two detector modes**: exact verse-label membership, or a coarse
//!   counts-only fallback
//! - **Round-trip persistence**: a validated JSON store of named schemes
//!   and mappings
//!
//! ## Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use verse_solver::core::scheme::VersificationScheme;
//! use verse_solver::core::standard::KJV;
//! use verse_solver::matching::coverage::ObservedCoverage;
//! use verse_solver::matching::engine::{MatchOptions, SchemeMatcher};
//!
//! // Seed a candidate scheme from the hard-coded KJV table
//! let kjv = Arc::new(VersificationScheme::from_standard_versification("KJV", &KJV).unwrap());
//!
//! // Which scheme does this document follow?
//! let observed = ObservedCoverage::from_text("Gen 1:1\nGen 1:2\nPs 23:1\n").unwrap();
//! let matcher = SchemeMatcher::new(&[kjv]).unwrap();
//! let report = matcher.run(&observed, &MatchOptions::default());
//!
//! println!(
//!     "{} (missing {} chapters, {} verses)",
//!     report.best().name(),
//!     report.best().missing_chapter_count(),
//!     report.best().missing_verse_count()
//! );
//! ```
//!
//! ## Modules
//!
//! - [`core`]: Books, references, schemes, mappings and standard tables
//! - [`algebra`]: Mapping composition and comparison
//! - [`matching`]: The two scheme detectors
//! - [`store`]: The scheme store and its JSON persistence
//! - [`cli`]: Command-line interface implementation

pub mod algebra;
pub mod cli;
pub mod core;
pub mod matching;
pub mod store;
pub mod utils;

// Re-export commonly used types for convenience
pub use crate::core::book::BookId;
pub use crate::core::mapping::VersificationMapping;
pub use crate::core::reference::{Reference, VerseLabel};
pub use crate::core::scheme::VersificationScheme;
pub use crate::matching::coverage::ObservedCoverage;
pub use crate::matching::engine::{MatchReport, SchemeMatcher};
pub use crate::store::set::SchemeStore;
