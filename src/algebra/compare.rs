//! Scheme and mapping comparison.

use std::collections::{BTreeMap, HashSet};
use std::fmt;

use thiserror::Error;

use crate::core::mapping::VersificationMapping;
use crate::core::reference::Reference;
use crate::core::scheme::VersificationScheme;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CompareError {
    #[error(
        "Mappings need to have the same source and target scheme to be compared ({left} vs {right})"
    )]
    EndpointMismatch { left: String, right: String },
}

/// How the raw address sets of two schemes relate, ignoring mappings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SchemeRelation {
    /// Equal length, equal set, index-wise equal
    SameVersesSameOrder,
    /// Equal as sets but not index-wise equal
    SameVersesDifferentOrder,
    /// Right scheme's verses are all contained in the left scheme
    RightSubsetOfLeft,
    /// Left scheme's verses are all contained in the right scheme
    LeftSubsetOfRight,
    /// Nonempty, non-subset overlap of the given size
    Intersecting { common: usize },
    /// No verse in common
    Disjoint,
}

impl fmt::Display for SchemeRelation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SameVersesSameOrder => write!(f, "Schemes contain same verses in same order"),
            Self::SameVersesDifferentOrder => write!(f, "Schemes contain same verses"),
            Self::RightSubsetOfLeft => write!(f, "Right scheme is a subset of left scheme"),
            Self::LeftSubsetOfRight => write!(f, "Left scheme is a subset of right scheme"),
            Self::Intersecting { common } => {
                write!(f, "Schemes have {common} verses in common")
            }
            Self::Disjoint => write!(f, "Schemes are disjoint"),
        }
    }
}

/// Classify how the address sets of two schemes relate.
#[must_use]
pub fn compare_schemes(left: &VersificationScheme, right: &VersificationScheme) -> SchemeRelation {
    let left_set: HashSet<&Reference> = left.references().collect();
    let right_set: HashSet<&Reference> = right.references().collect();

    if left.verse_count() == right.verse_count() && left_set == right_set {
        let same_order = left.references().zip(right.references()).all(|(l, r)| l == r);
        if same_order {
            return SchemeRelation::SameVersesSameOrder;
        }
        return SchemeRelation::SameVersesDifferentOrder;
    }
    if right_set.is_subset(&left_set) {
        return SchemeRelation::RightSubsetOfLeft;
    }
    if left_set.is_subset(&right_set) {
        return SchemeRelation::LeftSubsetOfRight;
    }
    let common = left_set.intersection(&right_set).count();
    if common == 0 {
        SchemeRelation::Disjoint
    } else {
        SchemeRelation::Intersecting { common }
    }
}

/// How two mappings sharing endpoints treat one source verse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum MappingVerseVariant {
    /// Neither mapping maps the verse
    BothUnmapped,
    /// Only the right mapping maps the verse
    LeftUnmapped,
    /// Only the left mapping maps the verse
    RightUnmapped,
    /// Both map to the same single verse
    SameSingleVerse,
    /// Both map to the same multi-verse list in the same order
    SameOrder,
    /// Same target set, different order
    SameVerses,
    /// Left targets are a strict subset of right targets
    LeftSubset,
    /// Right targets are a strict subset of left targets
    RightSubset,
    /// Target sets overlap without containment
    Intersecting,
    /// No target in common
    Disjoint,
}

impl MappingVerseVariant {
    /// Classify one pair of target lists. Every pair falls into exactly
    /// one variant; there is no unclassified escape.
    #[must_use]
    pub fn classify(left: &[Reference], right: &[Reference]) -> Self {
        if left.is_empty() && right.is_empty() {
            return Self::BothUnmapped;
        }
        if left.is_empty() {
            return Self::LeftUnmapped;
        }
        if right.is_empty() {
            return Self::RightUnmapped;
        }
        if left == right {
            if left.len() == 1 {
                return Self::SameSingleVerse;
            }
            return Self::SameOrder;
        }
        if left.len() == 1 && right.len() == 1 {
            return Self::Disjoint;
        }
        let left_set: HashSet<&Reference> = left.iter().collect();
        let right_set: HashSet<&Reference> = right.iter().collect();
        if left_set == right_set {
            return Self::SameVerses;
        }
        if right_set.is_subset(&left_set) {
            return Self::RightSubset;
        }
        if left_set.is_subset(&right_set) {
            return Self::LeftSubset;
        }
        if left_set.intersection(&right_set).next().is_some() {
            Self::Intersecting
        } else {
            Self::Disjoint
        }
    }
}

impl fmt::Display for MappingVerseVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::BothUnmapped => "BOTH_UNMAPPED",
            Self::LeftUnmapped => "LEFT_UNMAPPED",
            Self::RightUnmapped => "RIGHT_UNMAPPED",
            Self::SameSingleVerse => "SAME_SINGLE_VERSE",
            Self::SameOrder => "SAME_ORDER",
            Self::SameVerses => "SAME_VERSES",
            Self::LeftSubset => "LEFT_SUBSET",
            Self::RightSubset => "RIGHT_SUBSET",
            Self::Intersecting => "INTERSECTING",
            Self::Disjoint => "DISJOINT",
        };
        f.write_str(name)
    }
}

/// Compare two mappings for the same scheme pair, verse by verse.
///
/// The resulting histogram counts every source verse exactly once. This
/// is the diagnostic used to audit whether two independently produced
/// mapping tables for the same scheme pair agree.
pub fn compare_mappings(
    left: &VersificationMapping,
    right: &VersificationMapping,
) -> Result<BTreeMap<MappingVerseVariant, usize>, CompareError> {
    if left.from_scheme().name() != right.from_scheme().name()
        || left.to_scheme().name() != right.to_scheme().name()
    {
        return Err(CompareError::EndpointMismatch {
            left: format!("{}/{}", left.from_scheme().name(), left.to_scheme().name()),
            right: format!(
                "{}/{}",
                right.from_scheme().name(),
                right.to_scheme().name()
            ),
        });
    }

    let mut histogram = BTreeMap::new();
    for reference in left.from_scheme().references() {
        let l = left.lookup(reference).unwrap_or_default();
        let r = right.lookup(reference).unwrap_or_default();
        *histogram
            .entry(MappingVerseVariant::classify(l, r))
            .or_insert(0) += 1;
    }
    Ok(histogram)
}
