//! End-to-end detector scenarios over the library API.

use std::sync::Arc;

use verse_solver::core::book::BookId;
use verse_solver::core::scheme::VersificationScheme;
use verse_solver::core::standard::KJV;
use verse_solver::matching::coverage::ObservedCoverage;
use verse_solver::matching::engine::{MatchOptions, SchemeMatcher};

fn gen_scheme(name: &str, verses_in_ch1: u16) -> Arc<VersificationScheme> {
    Arc::new(
        VersificationScheme::from_verse_counts(
            name,
            None,
            Vec::new(),
            &[(BookId::Gen, &[verses_in_ch1])],
        )
        .unwrap(),
    )
}

/// Observed Genesis 1:1-5. Candidate A covers exactly those verses,
/// B covers all of Genesis 1, C only verses 1-3. Expected ranking:
/// A (exact), then B (superset), then C (2 missing verses).
#[test]
fn test_exact_fit_beats_superset_beats_partial() {
    let a = gen_scheme("A", 5);
    let b = gen_scheme("B", 31);
    let c = gen_scheme("C", 3);

    let observed = ObservedCoverage::from_text("Gen 1:1\nGen 1:2\nGen 1:3\nGen 1:4\nGen 1:5\n")
        .unwrap();

    // Candidate order must not affect the ranking
    for candidates in [
        vec![a.clone(), b.clone(), c.clone()],
        vec![c.clone(), a.clone(), b.clone()],
        vec![b.clone(), c.clone(), a.clone()],
    ] {
        let matcher = SchemeMatcher::new(&candidates).unwrap();
        let report = matcher.run(&observed, &MatchOptions::default());
        let names: Vec<&str> = report.ranked().iter().map(|s| s.name()).collect();
        assert_eq!(names, vec!["A", "B", "C"]);

        assert!(report.best().is_full_cover());
        assert_eq!(report.ranked()[1].missing_verse_count(), 0);
        assert_eq!(report.ranked()[2].missing_verse_count(), 2);
    }
}

/// A full-cover scheme must rank first among all full-cover candidates,
/// with ties broken by the smallest total verse count.
#[test]
fn test_full_cover_ranks_first_smallest_wins() {
    let observed = ObservedCoverage::from_text("Gen 1:1\nGen 1:2\n").unwrap();

    let kjv = Arc::new(VersificationScheme::from_standard_versification("KJV", &KJV).unwrap());
    let tight = gen_scheme("Tight", 2);
    let partial = gen_scheme("Partial", 1);

    let matcher = SchemeMatcher::new(&[kjv, partial, tight]).unwrap();
    let report = matcher.run(&observed, &MatchOptions::default());

    assert_eq!(report.best().name(), "Tight");
    assert_eq!(report.ranked()[1].name(), "KJV");
    assert_eq!(report.ranked()[2].name(), "Partial");
}

/// Verse labels match exactly; a document using "1a" does not match a
/// scheme that only has "1".
#[test]
fn test_labels_are_not_coerced() {
    let plain = gen_scheme("Plain", 2);
    let lettered = Arc::new(
        VersificationScheme::from_reference_list(
            "Lettered",
            None,
            Vec::new(),
            verse_solver::matching::coverage::parse_reference_lines("Gen 1:1a\nGen 1:2\n").unwrap(),
        )
        .unwrap(),
    );

    let observed = ObservedCoverage::from_text("Gen 1:1a\n").unwrap();
    let matcher = SchemeMatcher::new(&[plain, lettered]).unwrap();
    let report = matcher.run(&observed, &MatchOptions::default());

    assert_eq!(report.best().name(), "Lettered");
    assert_eq!(report.ranked()[1].missing_verse_count(), 1);
}
