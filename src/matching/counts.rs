//! The approximate, counts-only scheme detector.
//!
//! A fallback for when only coarse usage counts are available: instead of
//! exact verse-label membership it compares per-book
//! (chapter count, verse count) pairs. Strictly less precise than the
//! exact mode.

use std::collections::BTreeMap;
use std::sync::Arc;

use crate::core::book::BookId;
use crate::core::scheme::VersificationScheme;
use crate::matching::coverage::{BookCounts, ObservedCoverage, SchemeCoverage};
use crate::matching::engine::MatchError;

/// Priority between chapter-count and verse-count mismatches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ChapterMode {
    /// Chapter mismatches rank before verse mismatches
    #[default]
    HighPriority,
    /// Verse mismatches rank before chapter mismatches
    LowPriority,
    /// Chapter counts are ignored entirely
    Ignore,
}

/// One candidate's counts-based distance from the observed usage.
#[derive(Debug, Clone)]
pub struct CountsScore {
    name: String,
    verse_count: usize,
    missing_books: usize,
    missing_chapters: usize,
    missing_verses: usize,
    covered: BTreeMap<BookId, BookCounts>,
}

impl CountsScore {
    fn new(
        name: String,
        covered: BTreeMap<BookId, BookCounts>,
        observed: &BTreeMap<BookId, BookCounts>,
        chapter_mode: ChapterMode,
    ) -> Self {
        let verse_count = covered.values().map(|c| c.verses).sum();
        let mut missing_books = 0;
        let mut missing_chapters = 0;
        let mut missing_verses = 0;
        for (book, used) in observed {
            match covered.get(book) {
                None => missing_books += 1,
                Some(have) => {
                    if chapter_mode != ChapterMode::Ignore && have.chapters < used.chapters {
                        missing_chapters += used.chapters - have.chapters;
                    }
                    if have.verses < used.verses {
                        missing_verses += used.verses - have.verses;
                    }
                }
            }
        }
        Self {
            name,
            verse_count,
            missing_books,
            missing_chapters,
            missing_verses,
            covered,
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn verse_count(&self) -> usize {
        self.verse_count
    }

    #[must_use]
    pub fn missing_books(&self) -> usize {
        self.missing_books
    }

    #[must_use]
    pub fn missing_chapters(&self) -> usize {
        self.missing_chapters
    }

    #[must_use]
    pub fn missing_verses(&self) -> usize {
        self.missing_verses
    }

    #[must_use]
    pub fn is_full_cover(&self) -> bool {
        self.missing_books == 0 && self.missing_chapters == 0 && self.missing_verses == 0
    }

    /// Per-book counts of the candidate, for verbose reporting.
    #[must_use]
    pub fn covered_counts(&self) -> &BTreeMap<BookId, BookCounts> {
        &self.covered
    }

    fn rank_key(&self, chapter_mode: ChapterMode) -> (usize, usize, usize, usize) {
        // Missing whole books always dominate; the chapter/verse order
        // depends on the configured priority.
        match chapter_mode {
            ChapterMode::HighPriority => (
                self.missing_books,
                self.missing_chapters,
                self.missing_verses,
                self.verse_count,
            ),
            ChapterMode::LowPriority => (
                self.missing_books,
                self.missing_verses,
                self.missing_chapters,
                self.verse_count,
            ),
            ChapterMode::Ignore => (self.missing_books, self.missing_verses, 0, self.verse_count),
        }
    }
}

/// The ranked counts-mode result.
#[derive(Debug, Clone)]
pub struct CountsReport {
    ranked: Vec<CountsScore>,
    observed_verse_count: usize,
}

impl CountsReport {
    #[must_use]
    pub fn ranked(&self) -> &[CountsScore] {
        &self.ranked
    }

    #[must_use]
    pub fn best(&self) -> &CountsScore {
        &self.ranked[0]
    }

    #[must_use]
    pub fn observed_verse_count(&self) -> usize {
        self.observed_verse_count
    }
}

/// Ranks candidate schemes by per-book chapter/verse counts.
pub struct CountsMatcher {
    candidates: Vec<SchemeCoverage>,
}

impl CountsMatcher {
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

    #[must_use]
    pub fn run(
        &self,
        observed: &ObservedCoverage,
        chapter_mode: ChapterMode,
        limit_books: bool,
    ) -> CountsReport {
        let used_books: std::collections::BTreeSet<BookId> = observed.books().collect();
        let observed_counts = observed.counts();

        let mut ranked: Vec<CountsScore> = self
            .candidates
            .iter()
            .map(|candidate| {
                let mut candidate = candidate.clone();
                if limit_books {
                    candidate.limit_to_books(&used_books);
                }
                CountsScore::new(
                    candidate.name().to_string(),
                    candidate.counts(),
                    &observed_counts,
                    chapter_mode,
                )
            })
            .collect();
        ranked.sort_by_key(|score| score.rank_key(chapter_mode));

        CountsReport {
            ranked,
            observed_verse_count: observed.distinct_verse_count(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::reference::VerseLabel;

    fn scheme(name: &str, books: &[(BookId, &[u16])]) -> Arc<VersificationScheme> {
        Arc::new(VersificationScheme::from_verse_counts(name, None, Vec::new(), books).unwrap())
    }

    fn observe(verses: &[(BookId, u32, &str)]) -> ObservedCoverage {
        let mut coverage = ObservedCoverage::new();
        for (book, chapter, label) in verses {
            coverage.record(*book, *chapter, VerseLabel::new(*label).unwrap());
        }
        coverage
    }

    #[test]
    fn test_missing_book_dominates() {
        // A lacks Exodus entirely; B has both books but too few verses.
        let a = scheme("A", &[(BookId::Gen, &[50])]);
        let b = scheme("B", &[(BookId::Gen, &[2]), (BookId::Exod, &[2])]);
        let observed = observe(&[
            (BookId::Gen, 1, "1"),
            (BookId::Gen, 1, "2"),
            (BookId::Gen, 1, "3"),
            (BookId::Exod, 1, "1"),
        ]);

        let matcher = CountsMatcher::new(&[a, b]).unwrap();
        for mode in [
            ChapterMode::HighPriority,
            ChapterMode::LowPriority,
            ChapterMode::Ignore,
        ] {
            let report = matcher.run(&observed, mode, false);
            assert_eq!(report.best().name(), "B", "mode {mode:?}");
            assert_eq!(report.ranked()[1].missing_books(), 1);
        }
    }

    #[test]
    fn test_chapter_mode_changes_order() {
        // A: right verse totals, one chapter short. B: right chapter
        // count, several verses short.
        let a = scheme("A", &[(BookId::Gen, &[4])]);
        let b = scheme("B", &[(BookId::Gen, &[1, 1])]);
        let observed = observe(&[
            (BookId::Gen, 1, "1"),
            (BookId::Gen, 1, "2"),
            (BookId::Gen, 1, "3"),
            (BookId::Gen, 2, "1"),
        ]);

        let matcher = CountsMatcher::new(&[a, b]).unwrap();
        // Chapters dominate: A's missing chapter hurts more than B's
        // missing verses.
        let high = matcher.run(&observed, ChapterMode::HighPriority, false);
        assert_eq!(high.best().name(), "B");
        // Verses dominate: B's two missing verses hurt more.
        let low = matcher.run(&observed, ChapterMode::LowPriority, false);
        assert_eq!(low.best().name(), "A");
        // Ignoring chapters entirely behaves like the verse-first order.
        let ignore = matcher.run(&observed, ChapterMode::Ignore, false);
        assert_eq!(ignore.best().name(), "A");
        assert_eq!(ignore.best().missing_chapters(), 0);
    }

    #[test]
    fn test_full_cover_prefers_smaller_scheme() {
        let small = scheme("Small", &[(BookId::Gen, &[5])]);
        let large = scheme("Large", &[(BookId::Gen, &[31, 25])]);
        let observed = observe(&[(BookId::Gen, 1, "1"), (BookId::Gen, 1, "2")]);

        let matcher = CountsMatcher::new(&[large, small]).unwrap();
        let report = matcher.run(&observed, ChapterMode::HighPriority, false);
        assert!(report.best().is_full_cover());
        assert_eq!(report.best().name(), "Small");
    }

    #[test]
    fn test_limit_books_drops_unused_books() {
        let wide = scheme("Wide", &[(BookId::Gen, &[5]), (BookId::Rev, &[20])]);
        let narrow = scheme("Narrow", &[(BookId::Gen, &[5])]);
        let observed = observe(&[(BookId::Gen, 1, "1")]);

        let matcher = CountsMatcher::new(&[wide, narrow]).unwrap();
        let report = matcher.run(&observed, ChapterMode::HighPriority, true);
        // After limiting, both candidates have the same verse count.
        assert_eq!(report.ranked()[0].verse_count(), 5);
        assert_eq!(report.ranked()[1].verse_count(), 5);
    }
}
