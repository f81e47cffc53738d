use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use thiserror::Error;

use crate::core::reference::Reference;
use crate::core::scheme::VersificationScheme;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MappingError {
    #[error("Empty target list specified for {reference} (omit the rule instead)")]
    EmptyRule { reference: Reference },

    #[error("Rule for verse {reference} that does not exist in source scheme {scheme}")]
    UnknownSource { reference: Reference, scheme: String },

    #[error("Rule maps to verse {reference} that does not exist in target scheme {scheme}")]
    UnknownTarget { reference: Reference, scheme: String },
}

/// A directed, partial, possibly multi-valued relation translating verse
/// addresses from one scheme into another.
///
/// A reference absent from the rule map is equivalent to one mapped to
/// the empty sequence; both mean "no correspondence exists". Lookups for
/// any member of the source scheme are always defined and never panic.
///
/// Mappings are immutable after [`build`](Self::build).
#[derive(Debug, Clone)]
pub struct VersificationMapping {
    from: Arc<VersificationScheme>,
    to: Arc<VersificationScheme>,
    rules: HashMap<Reference, Vec<Reference>>,
}

impl VersificationMapping {
    /// Build a mapping, validating every rule against both schemes.
    ///
    /// Rules whose source reference is not a member of `from`, whose
    /// targets are not members of `to`, or whose target list is empty
    /// are contract violations and rejected.
    pub fn build(
        from: Arc<VersificationScheme>,
        to: Arc<VersificationScheme>,
        rules: HashMap<Reference, Vec<Reference>>,
    ) -> Result<Self, MappingError> {
        for (source, targets) in &rules {
            if targets.is_empty() {
                return Err(MappingError::EmptyRule {
                    reference: source.clone(),
                });
            }
            if !from.contains(source) {
                return Err(MappingError::UnknownSource {
                    reference: source.clone(),
                    scheme: from.name().to_string(),
                });
            }
            for target in targets {
                if !to.contains(target) {
                    return Err(MappingError::UnknownTarget {
                        reference: target.clone(),
                        scheme: to.name().to_string(),
                    });
                }
            }
        }
        Ok(Self { from, to, rules })
    }

    /// The identity mapping: every reference shared by both schemes maps
    /// to itself; references absent from `to` stay unmapped.
    pub fn identity(
        from: Arc<VersificationScheme>,
        to: Arc<VersificationScheme>,
    ) -> Result<Self, MappingError> {
        let rules = from
            .references()
            .filter(|r| to.contains(r))
            .map(|r| (r.clone(), vec![r.clone()]))
            .collect();
        Self::build(from, to, rules)
    }

    #[must_use]
    pub fn from_scheme(&self) -> &Arc<VersificationScheme> {
        &self.from
    }

    #[must_use]
    pub fn to_scheme(&self) -> &Arc<VersificationScheme> {
        &self.to
    }

    #[must_use]
    pub fn rule_count(&self) -> usize {
        self.rules.len()
    }

    /// Find the targets for a verse reference.
    ///
    /// Returns `None` if the reference is not part of the source scheme,
    /// an empty slice if the verse has no correspondence in the target
    /// scheme, and the ordered target list otherwise.
    #[must_use]
    pub fn lookup(&self, reference: &Reference) -> Option<&[Reference]> {
        if !self.from.contains(reference) {
            return None;
        }
        Some(
            self.rules
                .get(reference)
                .map(Vec::as_slice)
                .unwrap_or_default(),
        )
    }

    /// Iterate the mapped source references in the source scheme's
    /// canonical order.
    pub fn rules_in_order(&self) -> impl Iterator<Item = (&Reference, &[Reference])> {
        self.from
            .references()
            .filter_map(|r| self.rules.get(r).map(|targets| (r, targets.as_slice())))
    }

    /// Per-endpoint multiplicity statistics: how often each source verse
    /// maps and how often each target verse is mapped to.
    #[must_use]
    pub fn occurrence_stats(&self) -> MappingStats {
        let mut from_counts: HashMap<&Reference, usize> = HashMap::new();
        let mut to_counts: HashMap<&Reference, usize> = HashMap::new();
        for (source, targets) in &self.rules {
            for target in targets {
                *from_counts.entry(source).or_default() += 1;
                *to_counts.entry(target).or_default() += 1;
            }
        }
        MappingStats {
            from_mapped: MultiplicityHistogram::from_counts(from_counts.values().copied()),
            to_mapped: MultiplicityHistogram::from_counts(to_counts.values().copied()),
        }
    }
}

/// Mapped-verse statistics for both endpoints of a mapping.
#[derive(Debug, Clone)]
pub struct MappingStats {
    pub from_mapped: MultiplicityHistogram,
    pub to_mapped: MultiplicityHistogram,
}

/// Distribution of how many times verses occur in mapping rules:
/// `groups[k]` counts the verses occurring `k + 1` times.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MultiplicityHistogram {
    groups: Vec<usize>,
}

impl MultiplicityHistogram {
    fn from_counts(counts: impl Iterator<Item = usize>) -> Self {
        let mut groups: Vec<usize> = Vec::new();
        for count in counts {
            if count == 0 {
                continue;
            }
            if groups.len() < count {
                groups.resize(count, 0);
            }
            groups[count - 1] += 1;
        }
        Self { groups }
    }

    /// Number of distinct verses occurring at least once.
    #[must_use]
    pub fn total(&self) -> usize {
        self.groups.iter().sum()
    }

    #[must_use]
    pub fn groups(&self) -> &[usize] {
        &self.groups
    }
}

impl fmt::Display for MultiplicityHistogram {
    /// Renders as `"<total> (<once>+<twice>+...)"`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (", self.total())?;
        for (i, group) in self.groups.iter().enumerate() {
            if i > 0 {
                write!(f, "+")?;
            }
            write!(f, "{group}")?;
        }
        write!(f, ")")
    }
}
