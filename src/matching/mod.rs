//! Scheme detection: rank candidate schemes by structural closeness to
//! the addresses a document actually uses.
//!
//! Two detector variants exist:
//!
//! - [`engine::SchemeMatcher`]: the exact mode, comparing verse-label
//!   membership chapter by chapter. Candidates are ranked ascending by
//!   `(missing chapters, missing verses, scheme verse count)`.
//! - [`counts::CountsMatcher`]: the approximate fallback, comparing only
//!   per-book chapter/verse counts, with a configurable priority between
//!   chapter and verse mismatches.
//!
//! All matching is structural: which addresses exist. There is no fuzzy
//! or linguistic matching.
//!
//! ## Example
//!
//! ```rust,no_run
//! use verse_solver::core::scheme::VersificationScheme;
//! use verse_solver::core::standard::KJV;
//! use verse_solver::matching::coverage::ObservedCoverage;
//! use verse_solver::matching::engine::{MatchOptions, SchemeMatcher};
//! use std::sync::Arc;
//!
//! let kjv = Arc::new(VersificationScheme::from_standard_versification("KJV", &KJV).unwrap());
//! let observed = ObservedCoverage::from_text("Gen 1:1\nGen 1:2\n").unwrap();
//!
//! let matcher = SchemeMatcher::new(&[kjv]).unwrap();
//! let report = matcher.run(&observed, &MatchOptions::default());
//! println!(
//!     "{} (missing {}+{})",
//!     report.best().name(),
//!     report.best().missing_chapter_count(),
//!     report.best().missing_verse_count()
//! );
//! ```

pub mod counts;
pub mod coverage;
pub mod engine;

pub use counts::{ChapterMode, CountsMatcher, CountsReport};
pub use coverage::{ObservedCoverage, SchemeCoverage};
pub use engine::{MatchError, MatchOptions, MatchReport, SchemeMatcher};
