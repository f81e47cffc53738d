//! Coverage models for the scheme detector.

use std::collections::{BTreeMap, BTreeSet};

use thiserror::Error;

use crate::core::book::BookId;
use crate::core::reference::{Reference, ReferenceError, VerseLabel};
use crate::core::scheme::VersificationScheme;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CoverageError {
    #[error("Line {line}: {source}")]
    InvalidLine {
        line: usize,
        source: ReferenceError,
    },
}

/// Parse a plain text listing of verse references, one
/// `<book> <chapter>:<verse>` per line. Blank lines and `#` comments are
/// ignored; line order (and any duplicates) is preserved.
pub fn parse_reference_lines(text: &str) -> Result<Vec<Reference>, CoverageError> {
    let mut references = Vec::new();
    for (idx, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let reference: Reference = line.parse().map_err(|source| CoverageError::InvalidLine {
            line: idx + 1,
            source,
        })?;
        references.push(reference);
    }
    Ok(references)
}

/// Per-book chapter/verse usage counts, for the approximate detector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BookCounts {
    pub chapters: usize,
    pub verses: usize,
}

/// The verse addresses actually used by a document, reduced per book to
/// a per-chapter set of verse labels.
///
/// Multiple physical verses sharing one label ("virtual verses") count
/// once; recording is idempotent.
#[derive(Debug, Clone, Default)]
pub struct ObservedCoverage {
    books: BTreeMap<BookId, BTreeMap<u32, BTreeSet<VerseLabel>>>,
}

impl ObservedCoverage {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one observed address.
    pub fn record(&mut self, book: BookId, chapter: u32, verse: VerseLabel) {
        self.books
            .entry(book)
            .or_default()
            .entry(chapter)
            .or_default()
            .insert(verse);
    }

    pub fn record_reference(&mut self, reference: &Reference) {
        self.record(
            reference.book(),
            reference.chapter(),
            reference.verse().clone(),
        );
    }

    /// Build coverage from a plain text listing: one
    /// `<book> <chapter>:<verse>` per line, blank lines and `#` comments
    /// ignored.
    pub fn from_text(text: &str) -> Result<Self, CoverageError> {
        let mut coverage = Self::new();
        for reference in &parse_reference_lines(text)? {
            coverage.record_reference(reference);
        }
        Ok(coverage)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.books.is_empty()
    }

    /// Number of distinct observed addresses.
    #[must_use]
    pub fn distinct_verse_count(&self) -> usize {
        self.books
            .values()
            .flat_map(BTreeMap::values)
            .map(BTreeSet::len)
            .sum()
    }

    /// Books used by the document, in canonical order.
    pub fn books(&self) -> impl Iterator<Item = BookId> + '_ {
        self.books.keys().copied()
    }

    /// Observed chapters of one book with their verse label sets.
    #[must_use]
    pub fn chapters(&self, book: BookId) -> Option<&BTreeMap<u32, BTreeSet<VerseLabel>>> {
        self.books.get(&book)
    }

    /// Per-book usage counts (distinct chapters, distinct verses) for the
    /// approximate detector.
    #[must_use]
    pub fn counts(&self) -> BTreeMap<BookId, BookCounts> {
        self.books
            .iter()
            .map(|(book, chapters)| {
                (
                    *book,
                    BookCounts {
                        chapters: chapters.len(),
                        verses: chapters.values().map(BTreeSet::len).sum(),
                    },
                )
            })
            .collect()
    }
}

/// A candidate scheme's coverage, laid out for fast per-chapter lookup:
/// per book, a vector indexed by chapter (0-based) of verse label sets.
#[derive(Debug, Clone)]
pub struct SchemeCoverage {
    name: String,
    covered: BTreeMap<BookId, Vec<BTreeSet<VerseLabel>>>,
    verse_count: usize,
}

impl SchemeCoverage {
    /// Project a scheme into its coverage view.
    #[must_use]
    pub fn of(scheme: &VersificationScheme) -> Self {
        let mut covered: BTreeMap<BookId, Vec<BTreeSet<VerseLabel>>> = BTreeMap::new();
        for reference in scheme.references() {
            let chapters = covered.entry(reference.book()).or_default();
            let chapter_idx = reference.chapter() as usize - 1;
            if chapters.len() <= chapter_idx {
                chapters.resize_with(chapter_idx + 1, BTreeSet::new);
            }
            chapters[chapter_idx].insert(reference.verse().clone());
        }
        Self {
            name: scheme.name().to_string(),
            covered,
            verse_count: scheme.verse_count(),
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Total number of verses in the scheme (after any book limiting).
    #[must_use]
    pub fn verse_count(&self) -> usize {
        self.verse_count
    }

    /// Chapter count of one book; 0 when the book is absent.
    #[must_use]
    pub fn chapter_count(&self, book: BookId) -> usize {
        self.covered.get(&book).map_or(0, Vec::len)
    }

    /// The verse labels of one chapter, if the scheme has it.
    #[must_use]
    pub fn chapter_verses(&self, book: BookId, chapter: u32) -> Option<&BTreeSet<VerseLabel>> {
        if chapter == 0 {
            return None;
        }
        self.covered.get(&book)?.get(chapter as usize - 1)
    }

    /// Restrict the coverage to the given books, dropping all others.
    /// Used to compare schemes only over the books a document uses.
    pub fn limit_to_books(&mut self, books: &BTreeSet<BookId>) {
        let removed: Vec<BookId> = self
            .covered
            .keys()
            .filter(|book| !books.contains(book))
            .copied()
            .collect();
        for book in removed {
            if let Some(chapters) = self.covered.remove(&book) {
                self.verse_count -= chapters.iter().map(BTreeSet::len).sum::<usize>();
            }
        }
    }

    /// Per-book (chapters, verses) counts for the approximate detector.
    /// Chapters without any verse are not counted.
    #[must_use]
    pub fn counts(&self) -> BTreeMap<BookId, BookCounts> {
        self.covered
            .iter()
            .map(|(book, chapters)| {
                (
                    *book,
                    BookCounts {
                        chapters: chapters.iter().filter(|c| !c.is_empty()).count(),
                        verses: chapters.iter().map(BTreeSet::len).sum(),
                    },
                )
            })
            .collect()
    }
}
