//! The mapping algebra: composition and comparison.
//!
//! - [`compose::join`]: chain two mappings through a shared intermediate
//!   scheme
//! - [`compose::join_all`]: left-to-right composition of a whole chain
//! - [`compose::best_agreement`]: consensus of several candidate mappings
//!   for the same scheme pair
//! - [`compare::compare_schemes`]: classify how two raw address sets
//!   relate
//! - [`compare::compare_mappings`]: per-verse classification of how two
//!   mappings disagree, as a frequency histogram
//!
//! Schemes and mappings are plain immutable data; the algebra is free
//! functions over them.

pub mod compare;
pub mod compose;

pub use compare::{compare_mappings, compare_schemes, MappingVerseVariant, SchemeRelation};
pub use compose::{best_agreement, join, join_all};
