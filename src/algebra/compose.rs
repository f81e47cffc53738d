//! Mapping composition ("join").

use std::collections::HashMap;

use thiserror::Error;

use crate::core::mapping::{MappingError, VersificationMapping};
use crate::core::reference::Reference;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ComposeError {
    #[error("Cannot join, versification mismatch: {left_to} != {right_from}")]
    SchemeMismatch { left_to: String, right_from: String },

    #[error("At least one mapping is required")]
    EmptyChain,

    #[error("Mappings need to have the same source and target scheme ({left} vs {right})")]
    EndpointMismatch { left: String, right: String },

    #[error("Intermediate verse {reference} is not part of scheme {scheme}")]
    ForeignReference { reference: Reference, scheme: String },

    #[error(transparent)]
    Mapping(#[from] MappingError),
}

/// Compose two mappings sharing an intermediate scheme into one.
///
/// For every source verse the target lists of its intermediate verses
/// are concatenated in order; any maximal run of consecutive equal
/// targets is collapsed to a single occurrence. Non-consecutive repeats
/// stay: a target verse revisited after other verses may carry meaningful
/// ordering information, while the same target reached twice in a row via
/// different intermediate verses is redundant. Verses whose resulting
/// list is empty are omitted from the new mapping's domain.
pub fn join(
    m1: &VersificationMapping,
    m2: &VersificationMapping,
) -> Result<VersificationMapping, ComposeError> {
    if m1.to_scheme().name() != m2.from_scheme().name() {
        return Err(ComposeError::SchemeMismatch {
            left_to: m1.to_scheme().name().to_string(),
            right_from: m2.from_scheme().name().to_string(),
        });
    }

    let mut rules: HashMap<Reference, Vec<Reference>> = HashMap::new();
    for source in m1.from_scheme().references() {
        let Some(intermediates) = m1.lookup(source) else {
            continue;
        };
        let mut targets: Vec<Reference> = Vec::new();
        for intermediate in intermediates {
            let hop = m2
                .lookup(intermediate)
                .ok_or_else(|| ComposeError::ForeignReference {
                    reference: intermediate.clone(),
                    scheme: m2.from_scheme().name().to_string(),
                })?;
            for target in hop {
                if targets.last() != Some(target) {
                    targets.push(target.clone());
                }
            }
        }
        if !targets.is_empty() {
            rules.insert(source.clone(), targets);
        }
    }

    Ok(VersificationMapping::build(
        m1.from_scheme().clone(),
        m2.to_scheme().clone(),
        rules,
    )?)
}

/// Compose a chain of mappings left to right.
///
/// Scheme compatibility of every consecutive pair is checked up front,
/// before any composition happens.
pub fn join_all(mappings: &[&VersificationMapping]) -> Result<VersificationMapping, ComposeError> {
    let (first, rest) = mappings.split_first().ok_or(ComposeError::EmptyChain)?;
    for pair in mappings.windows(2) {
        if pair[0].to_scheme().name() != pair[1].from_scheme().name() {
            return Err(ComposeError::SchemeMismatch {
                left_to: pair[0].to_scheme().name().to_string(),
                right_from: pair[1].from_scheme().name().to_string(),
            });
        }
    }
    let mut result = (*first).clone();
    for next in rest {
        result = join(&result, next)?;
    }
    Ok(result)
}

/// Build the consensus of several candidate mappings for the same scheme
/// pair.
///
/// Per source verse, the target lists of all candidates that map it are
/// intersected, keeping the first candidate's order. Returns `Ok(None)`
/// when some verse has contradictory candidates (non-empty lists with an
/// empty intersection) — there is no agreeing mapping in that case.
pub fn best_agreement(
    candidates: &[&VersificationMapping],
) -> Result<Option<VersificationMapping>, ComposeError> {
    let (first, rest) = candidates.split_first().ok_or(ComposeError::EmptyChain)?;
    for candidate in rest {
        if candidate.from_scheme().name() != first.from_scheme().name()
            || candidate.to_scheme().name() != first.to_scheme().name()
        {
            return Err(ComposeError::EndpointMismatch {
                left: format!(
                    "{}/{}",
                    first.from_scheme().name(),
                    first.to_scheme().name()
                ),
                right: format!(
                    "{}/{}",
                    candidate.from_scheme().name(),
                    candidate.to_scheme().name()
                ),
            });
        }
    }

    let mut rules: HashMap<Reference, Vec<Reference>> = HashMap::new();
    for source in first.from_scheme().references() {
        let mut agreed: Option<Vec<Reference>> = None;
        for candidate in candidates {
            let targets = candidate.lookup(source).unwrap_or_default();
            if targets.is_empty() {
                continue;
            }
            match &mut agreed {
                None => agreed = Some(targets.to_vec()),
                Some(current) => {
                    current.retain(|r| targets.contains(r));
                    if current.is_empty() {
                        return Ok(None);
                    }
                }
            }
        }
        if let Some(targets) = agreed {
            rules.insert(source.clone(), targets);
        }
    }

    Ok(Some(VersificationMapping::build(
        first.from_scheme().clone(),
        first.to_scheme().clone(),
        rules,
    )?))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::core::book::BookId;
    use crate::core::scheme::VersificationScheme;

    fn r(verse: &str) -> Reference {
        Reference::parse_parts(BookId::Gen, 1, verse).unwrap()
    }

    fn gen_scheme(name: &str, verses: u32) -> Arc<VersificationScheme> {
        let refs = (1..=verses).map(|v| r(&v.to_string())).collect();
        Arc::new(VersificationScheme::from_reference_list(name, None, Vec::new(), refs).unwrap())
    }

    fn mapping(
        from: &Arc<VersificationScheme>,
        to: &Arc<VersificationScheme>,
        rules: &[(&str, &[&str])],
    ) -> VersificationMapping {
        let rules = rules
            .iter()
            .map(|(source, targets)| (r(source), targets.iter().map(|t| r(t)).collect()))
            .collect();
        VersificationMapping::build(from.clone(), to.clone(), rules).unwrap()
    }

    #[test]
    fn test_join_basic() {
        let a = gen_scheme("A", 3);
        let b = gen_scheme("B", 3);
        let c = gen_scheme("C", 3);
        let m1 = mapping(&a, &b, &[("1", &["2"]), ("2", &["3"])]);
        let m2 = mapping(&b, &c, &[("2", &["1"]), ("3", &["2", "3"])]);

        let joined = join(&m1, &m2).unwrap();
        assert_eq!(joined.from_scheme().name(), "A");
        assert_eq!(joined.to_scheme().name(), "C");
        assert_eq!(joined.lookup(&r("1")), Some(&[r("1")][..]));
        assert_eq!(joined.lookup(&r("2")), Some(&[r("2"), r("3")][..]));
        // Verse 3 had no rule: omitted from the joined domain
        assert_eq!(joined.lookup(&r("3")), Some(&[][..]));
    }

    #[test]
    fn test_join_scheme_mismatch() {
        let a = gen_scheme("A", 2);
        let b = gen_scheme("B", 2);
        let c = gen_scheme("C", 2);
        let m1 = mapping(&a, &b, &[("1", &["1"])]);
        let m2 = mapping(&c, &a, &[("1", &["1"])]);
        assert!(matches!(
            join(&m1, &m2),
            Err(ComposeError::SchemeMismatch { .. })
        ));
    }

    #[test]
    fn test_join_collapses_consecutive_duplicates_only() {
        let a = gen_scheme("A", 2);
        let b = gen_scheme("B", 3);
        let c = gen_scheme("C", 3);

        // a1 -> [b1, b1], b1 -> [c1]: the run collapses to [c1]
        let m1 = mapping(&a, &b, &[("1", &["1", "1"])]);
        let m2 = mapping(&b, &c, &[("1", &["1"])]);
        assert_eq!(join(&m1, &m2).unwrap().lookup(&r("1")), Some(&[r("1")][..]));

        // a1 -> [b1, b2, b1], b1 -> [c1], b2 -> [c2]: the repeated c1 is
        // NOT collapsed because c2 breaks the run
        let m1 = mapping(&a, &b, &[("1", &["1", "2", "1"])]);
        let m2 = mapping(&b, &c, &[("1", &["1"]), ("2", &["2"])]);
        assert_eq!(
            join(&m1, &m2).unwrap().lookup(&r("1")),
            Some(&[r("1"), r("2"), r("1")][..])
        );
    }

    #[test]
    fn test_join_with_identity_is_noop() {
        let a = gen_scheme("A", 3);
        let b = gen_scheme("B", 3);
        let m = mapping(&a, &b, &[("1", &["2", "3"]), ("3", &["1"])]);
        let id = VersificationMapping::identity(b.clone(), b.clone()).unwrap();

        let joined = join(&m, &id).unwrap();
        for verse in ["1", "2", "3"] {
            assert_eq!(joined.lookup(&r(verse)), m.lookup(&r(verse)));
        }
    }

    #[test]
    fn test_join_all_is_associative_on_results() {
        let a = gen_scheme("A", 3);
        let b = gen_scheme("B", 3);
        let c = gen_scheme("C", 3);
        let d = gen_scheme("D", 3);
        let m1 = mapping(&a, &b, &[("1", &["1", "2"]), ("2", &["3"])]);
        let m2 = mapping(&b, &c, &[("1", &["2"]), ("2", &["2", "3"]), ("3", &["1"])]);
        let m3 = mapping(&c, &d, &[("1", &["1"]), ("2", &["2"]), ("3", &["3"])]);

        let left = join(&join(&m1, &m2).unwrap(), &m3).unwrap();
        let right = join(&m1, &join(&m2, &m3).unwrap()).unwrap();
        for verse in ["1", "2", "3"] {
            assert_eq!(left.lookup(&r(verse)), right.lookup(&r(verse)));
        }
    }

    #[test]
    fn test_join_all_checks_chain_before_composing() {
        let a = gen_scheme("A", 2);
        let b = gen_scheme("B", 2);
        let c = gen_scheme("C", 2);
        let m1 = mapping(&a, &b, &[("1", &["1"])]);
        let m2 = mapping(&a, &c, &[("1", &["1"])]);
        assert!(matches!(
            join_all(&[&m1, &m2]),
            Err(ComposeError::SchemeMismatch { .. })
        ));
        assert!(matches!(join_all(&[]), Err(ComposeError::EmptyChain)));
    }

    #[test]
    fn test_best_agreement_single_candidate() {
        let a = gen_scheme("A", 3);
        let b = gen_scheme("B", 3);
        let m = mapping(&a, &b, &[("1", &["1", "2"])]);
        let agreed = best_agreement(&[&m]).unwrap().unwrap();
        assert_eq!(agreed.lookup(&r("1")), m.lookup(&r("1")));
        assert_eq!(agreed.rule_count(), m.rule_count());
    }

    #[test]
    fn test_best_agreement_intersects() {
        let a = gen_scheme("A", 3);
        let b = gen_scheme("B", 3);
        let m1 = mapping(&a, &b, &[("1", &["1", "2"]), ("2", &["2"])]);
        let m2 = mapping(&a, &b, &[("1", &["2", "3"])]);

        let agreed = best_agreement(&[&m1, &m2]).unwrap().unwrap();
        assert_eq!(agreed.lookup(&r("1")), Some(&[r("2")][..]));
        // Only m1 maps verse 2; its targets survive untouched
        assert_eq!(agreed.lookup(&r("2")), Some(&[r("2")][..]));
    }

    #[test]
    fn test_best_agreement_contradiction() {
        let a = gen_scheme("A", 2);
        let b = gen_scheme("B", 2);
        let m1 = mapping(&a, &b, &[("1", &["1"])]);
        let m2 = mapping(&a, &b, &[("1", &["2"])]);
        assert!(best_agreement(&[&m1, &m2]).unwrap().is_none());
    }

    #[test]
    fn test_best_agreement_endpoint_mismatch() {
        let a = gen_scheme("A", 2);
        let b = gen_scheme("B", 2);
        let c = gen_scheme("C", 2);
        let m1 = mapping(&a, &b, &[("1", &["1"])]);
        let m2 = mapping(&a, &c, &[("1", &["1"])]);
        assert!(matches!(
            best_agreement(&[&m1, &m2]),
            Err(ComposeError::EndpointMismatch { .. })
        ));
    }
}
