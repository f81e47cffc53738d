//! The exact-mode scheme detector.

use std::collections::BTreeSet;
use std::sync::Arc;

use thiserror::Error;

use crate::core::scheme::VersificationScheme;
use crate::matching::coverage::{ObservedCoverage, SchemeCoverage};

/// Maximum number of runner-up schemes shown after the best match.
pub const MAX_RUNNER_UPS: usize = 10;

/// Runner-ups stop printing once they miss this many more chapters than
/// the best match. Display truncation only; ranking covers everything.
pub const RUNNER_UP_CHAPTER_SLACK: usize = 2;

/// Runner-ups stop printing once they miss this many more verses than
/// the best match.
pub const RUNNER_UP_VERSE_SLACK: usize = 5;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MatchError {
    #[error("No candidate schemes configured")]
    NoCandidates,
}

/// Options for a detector run.
#[derive(Debug, Clone, Default)]
pub struct MatchOptions {
    /// Restrict candidate schemes to the books the document uses before
    /// counting, so large schemes are not penalized for books the
    /// document never touches.
    pub limit_books: bool,
}

/// One candidate's structural distance from the observed coverage.
#[derive(Debug, Clone)]
pub struct SchemeScore {
    name: String,
    missing_chapters: Vec<String>,
    missing_verses: Vec<String>,
    verse_count: usize,
}

impl SchemeScore {
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Observed chapters the scheme lacks entirely, as
    /// `"<book> <chapter>"` strings.
    #[must_use]
    pub fn missing_chapters(&self) -> &[String] {
        &self.missing_chapters
    }

    /// Observed addresses falling into an existing chapter but absent
    /// from its verse set.
    #[must_use]
    pub fn missing_verses(&self) -> &[String] {
        &self.missing_verses
    }

    #[must_use]
    pub fn missing_chapter_count(&self) -> usize {
        self.missing_chapters.len()
    }

    #[must_use]
    pub fn missing_verse_count(&self) -> usize {
        self.missing_verses.len()
    }

    /// Total verse count of the candidate scheme.
    #[must_use]
    pub fn verse_count(&self) -> usize {
        self.verse_count
    }

    /// Whether the scheme covers every observed address.
    #[must_use]
    pub fn is_full_cover(&self) -> bool {
        self.missing_chapters.is_empty() && self.missing_verses.is_empty()
    }

    fn rank_key(&self) -> (usize, usize, usize) {
        (
            self.missing_chapters.len(),
            self.missing_verses.len(),
            self.verse_count,
        )
    }
}

/// The detector's ranked result over all candidates.
#[derive(Debug, Clone)]
pub struct MatchReport {
    ranked: Vec<SchemeScore>,
    observed_verse_count: usize,
}

impl MatchReport {
    /// All candidates, best first. Ranking is ascending by
    /// `(missing chapters, missing verses, scheme verse count)`: fewer
    /// missing chapters dominates, then fewer missing verses, then the
    /// smaller scheme wins (tightest fit, not the largest superset).
    #[must_use]
    pub fn ranked(&self) -> &[SchemeScore] {
        &self.ranked
    }

    /// The best match. The candidate list is non-empty by construction.
    #[must_use]
    pub fn best(&self) -> &SchemeScore {
        &self.ranked[0]
    }

    /// The runner-ups to display: up to [`MAX_RUNNER_UPS`], stopping
    /// early once a candidate falls too far behind the best match.
    #[must_use]
    pub fn runner_ups(&self) -> &[SchemeScore] {
        let best = self.best();
        let mut end = 1;
        for (i, score) in self.ranked.iter().enumerate().skip(1) {
            if i > MAX_RUNNER_UPS {
                break;
            }
            end = i + 1;
            if score.missing_chapter_count()
                > best.missing_chapter_count() + RUNNER_UP_CHAPTER_SLACK
                || score.missing_verse_count() > best.missing_verse_count() + RUNNER_UP_VERSE_SLACK
            {
                break;
            }
        }
        &self.ranked[1..end]
    }

    /// Look up explicitly requested schemes by name. Unknown names are
    /// returned in the second list; they are reported, not fatal.
    #[must_use]
    pub fn selected<'a>(&self, names: &'a [String]) -> (Vec<&SchemeScore>, Vec<&'a str>) {
        let mut found = Vec::new();
        let mut unknown = Vec::new();
        for name in names {
            match self.ranked.iter().find(|s| s.name() == *name) {
                Some(score) => found.push(score),
                None => unknown.push(name.as_str()),
            }
        }
        (found, unknown)
    }

    /// Number of distinct observed addresses the report was built from.
    #[must_use]
    pub fn observed_verse_count(&self) -> usize {
        self.observed_verse_count
    }
}

/// Ranks candidate schemes by how well they cover observed addresses.
pub struct SchemeMatcher {
    candidates: Vec<SchemeCoverage>,
}

impl SchemeMatcher {
    /// Create a matcher over candidate schemes. An empty candidate list
    /// is a configuration error.
    pub fn new(schemes: &[Arc<VersificationScheme>]) -> Result<Self, MatchError> {
        if schemes.is_empty() {
            return Err(MatchError::NoCandidates);
        }
        Ok(Self {
            candidates: schemes
                .iter()
                .map(|scheme| SchemeCoverage::of(scheme))
                .collect(),
        })
    }

    /// Score every candidate against the observed coverage and rank them.
    #[must_use]
    pub fn run(&self, observed: &ObservedCoverage, options: &MatchOptions) -> MatchReport {
        let used_books: BTreeSet<_> = observed.books().collect();

        let mut ranked: Vec<SchemeScore> = self
            .candidates
            .iter()
            .map(|candidate| {
                let mut candidate = candidate.clone();
                if options.limit_books {
                    candidate.limit_to_books(&used_books);
                }
                score_candidate(&candidate, observed)
            })
            .collect();
        ranked.sort_by_key(SchemeScore::rank_key);

        MatchReport {
            ranked,
            observed_verse_count: observed.distinct_verse_count(),
        }
    }
}

fn score_candidate(candidate: &SchemeCoverage, observed: &ObservedCoverage) -> SchemeScore {
    let mut missing_chapters = Vec::new();
    let mut missing_verses = Vec::new();

    for book in observed.books() {
        let Some(chapters) = observed.chapters(book) else {
            continue;
        };
        for (&chapter, labels) in chapters {
            match candidate.chapter_verses(book, chapter) {
                None => missing_chapters.push(format!("{} {}", book.osis_id(), chapter)),
                Some(covered) => {
                    for label in labels {
                        if !covered.contains(label) {
                            missing_verses
                                .push(format!("{} {}:{}", book.osis_id(), chapter, label));
                        }
                    }
                }
            }
        }
    }

    SchemeScore {
        name: candidate.name().to_string(),
        missing_chapters,
        missing_verses,
        verse_count: candidate.verse_count(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::book::BookId;
    use crate::core::reference::VerseLabel;

    fn gen_scheme(name: &str, chapters: &[u16]) -> Arc<VersificationScheme> {
        Arc::new(
            VersificationScheme::from_verse_counts(
                name,
                None,
                Vec::new(),
                &[(BookId::Gen, chapters)],
            )
            .unwrap(),
        )
    }

    fn observe(verses: &[(u32, &str)]) -> ObservedCoverage {
        let mut coverage = ObservedCoverage::new();
        for (chapter, label) in verses {
            coverage.record(BookId::Gen, *chapter, VerseLabel::new(*label).unwrap());
        }
        coverage
    }

    #[test]
    fn test_empty_candidate_list_is_fatal() {
        assert!(matches!(
            SchemeMatcher::new(&[]),
            Err(MatchError::NoCandidates)
        ));
    }

    #[test]
    fn test_tightest_full_cover_wins() {
        // A covers exactly the observed verses, B is a superset, C misses two.
        let a = gen_scheme("A", &[5]);
        let b = gen_scheme("B", &[31]);
        let c = gen_scheme("C", &[3]);
        let observed = observe(&[(1, "1"), (1, "2"), (1, "3"), (1, "4"), (1, "5")]);

        let matcher = SchemeMatcher::new(&[c, b, a]).unwrap();
        let report = matcher.run(&observed, &MatchOptions::default());

        let names: Vec<&str> = report.ranked().iter().map(SchemeScore::name).collect();
        assert_eq!(names, vec!["A", "B", "C"]);
        assert!(report.best().is_full_cover());
        assert_eq!(report.ranked()[2].missing_verse_count(), 2);
    }

    #[test]
    fn test_missing_chapters_dominate_missing_verses() {
        // A misses a whole chapter, B misses three verses.
        let a = gen_scheme("A", &[10]);
        let b = gen_scheme("B", &[7, 4]);
        let observed = observe(&[(1, "8"), (1, "9"), (1, "10"), (2, "1")]);

        let matcher = SchemeMatcher::new(&[a, b]).unwrap();
        let report = matcher.run(&observed, &MatchOptions::default());

        assert_eq!(report.best().name(), "B");
        assert_eq!(report.best().missing_verse_count(), 3);
        assert_eq!(report.ranked()[1].missing_chapter_count(), 1);
    }

    #[test]
    fn test_ranking_is_deterministic() {
        let candidates = [
            gen_scheme("A", &[5]),
            gen_scheme("B", &[31]),
            gen_scheme("C", &[3]),
        ];
        let observed = observe(&[(1, "1"), (1, "2"), (1, "3"), (1, "4"), (1, "5")]);
        let matcher = SchemeMatcher::new(&candidates).unwrap();

        let first = matcher.run(&observed, &MatchOptions::default());
        for _ in 0..5 {
            let again = matcher.run(&observed, &MatchOptions::default());
            let names: Vec<&str> = again.ranked().iter().map(SchemeScore::name).collect();
            let expected: Vec<&str> = first.ranked().iter().map(SchemeScore::name).collect();
            assert_eq!(names, expected);
        }
    }

    #[test]
    fn test_limit_books_ignores_unused_books() {
        let big = Arc::new(
            VersificationScheme::from_verse_counts(
                "Big",
                None,
                Vec::new(),
                &[(BookId::Gen, &[5]), (BookId::Exod, &[100])],
            )
            .unwrap(),
        );
        let small = gen_scheme("Small", &[5]);
        let observed = observe(&[(1, "1")]);
        let matcher = SchemeMatcher::new(&[big, small]).unwrap();

        // Without limiting, the smaller total wins the tie.
        let report = matcher.run(&observed, &MatchOptions::default());
        assert_eq!(report.best().name(), "Small");

        // With limiting, both cover Gen equally and tie on size; the
        // stable sort keeps candidate order.
        let report = matcher.run(&observed, &MatchOptions { limit_books: true });
        assert_eq!(report.best().verse_count(), 5);
        assert_eq!(report.ranked()[1].verse_count(), 5);
    }

    #[test]
    fn test_runner_up_truncation() {
        let mut candidates = vec![gen_scheme("Best", &[5])];
        // Five schemes each missing progressively more verses; the ones
        // beyond the +5 verse slack stop the listing.
        for (i, chapters) in [4u16, 3, 2, 1].iter().enumerate() {
            candidates.push(gen_scheme(&format!("Worse{i}"), &[*chapters]));
        }
        let observed = observe(&[(1, "1"), (1, "2"), (1, "3"), (1, "4"), (1, "5")]);
        let matcher = SchemeMatcher::new(&candidates).unwrap();
        let report = matcher.run(&observed, &MatchOptions::default());

        assert_eq!(report.best().name(), "Best");
        let shown = report.runner_ups();
        // Worse3 misses 4 verses (within slack 5); all runner-ups shown
        assert_eq!(shown.len(), 4);
        // Ranking itself always covers every candidate
        assert_eq!(report.ranked().len(), 5);
    }

    #[test]
    fn test_selected_reports_unknown_names() {
        let matcher = SchemeMatcher::new(&[gen_scheme("A", &[5])]).unwrap();
        let report = matcher.run(&observe(&[(1, "1")]), &MatchOptions::default());
        let names = vec!["A".to_string(), "Nope".to_string()];
        let (found, unknown) = report.selected(&names);
        assert_eq!(found.len(), 1);
        assert_eq!(unknown, vec!["Nope"]);
    }
}
