use std::fmt;
use std::str::FromStr;

use thiserror::Error;

use crate::core::book::BookId;
use crate::utils::validation::is_valid_verse_label;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ReferenceError {
    #[error("Invalid verse label: {0:?}")]
    InvalidLabel(String),

    #[error("Invalid chapter number: {0}")]
    InvalidChapter(u32),

    #[error("Unknown book identifier: {0:?}")]
    UnknownBook(String),

    #[error("Malformed verse reference: {0:?} (expected \"<book> <chapter>:<verse>\")")]
    Malformed(String),
}

/// A verse label within a chapter.
///
/// Labels are opaque strings compared by exact equality; no numeric
/// coercion happens anywhere in this crate. Besides plain numbers,
/// editions use lettered sub-verses ("5a"), explicit ranges ("13-15a"),
/// chapter-relative compound numbers ("41,6", Psalm titles), and the
/// reserved pseudo-verses "1/t" (chapter title) and "1/p" (preface).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VerseLabel(String);

/// Structural view of a [`VerseLabel`], for callers that want to reason
/// about label shape. Purely advisory; equality stays string-based.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LabelKind {
    /// Plain number, e.g. "5"
    Numbered(u32),
    /// Number with a letter suffix, e.g. "5a"
    Lettered(u32, char),
    /// Explicit range, e.g. "13-15a"
    Range,
    /// Chapter-relative compound number, e.g. "41,6"
    Compound,
    /// Chapter title pseudo-verse, e.g. "1/t"
    Title,
    /// Preface pseudo-verse, e.g. "1/p"
    Preface,
    /// Anything else the label grammar admits
    Custom,
}

impl VerseLabel {
    /// Create a verse label, validating it against the label grammar
    /// (leading nonzero digit, then digits and `,` `/` `.` `-`, with an
    /// optional trailing letter).
    pub fn new(label: impl Into<String>) -> Result<Self, ReferenceError> {
        let label = label.into();
        if is_valid_verse_label(&label) {
            Ok(Self(label))
        } else {
            Err(ReferenceError::InvalidLabel(label))
        }
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Classify the label's structure.
    #[must_use]
    pub fn kind(&self) -> LabelKind {
        let s = self.0.as_str();
        if s.ends_with("/t") {
            return LabelKind::Title;
        }
        if s.ends_with("/p") {
            return LabelKind::Preface;
        }
        if let Ok(n) = s.parse::<u32>() {
            return LabelKind::Numbered(n);
        }
        if s.len() >= 2 {
            let (head, tail) = s.split_at(s.len() - 1);
            let suffix = tail.chars().next();
            if let (Ok(n), Some(c)) = (head.parse::<u32>(), suffix) {
                if c.is_ascii_lowercase() {
                    return LabelKind::Lettered(n, c);
                }
            }
        }
        if s.contains('-') {
            return LabelKind::Range;
        }
        if s.contains(',') || s.contains('.') {
            return LabelKind::Compound;
        }
        LabelKind::Custom
    }
}

impl fmt::Display for VerseLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for VerseLabel {
    type Err = ReferenceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

/// An immutable verse address: book, chapter and verse label.
///
/// Two references are equal iff all three fields match exactly.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Reference {
    book: BookId,
    chapter: u32,
    verse: VerseLabel,
}

impl Reference {
    /// Create a reference. Chapters are 1-based.
    pub fn new(book: BookId, chapter: u32, verse: VerseLabel) -> Result<Self, ReferenceError> {
        if chapter < 1 {
            return Err(ReferenceError::InvalidChapter(chapter));
        }
        Ok(Self {
            book,
            chapter,
            verse,
        })
    }

    /// Convenience constructor parsing the label in place.
    pub fn parse_parts(book: BookId, chapter: u32, verse: &str) -> Result<Self, ReferenceError> {
        Self::new(book, chapter, VerseLabel::new(verse)?)
    }

    #[must_use]
    pub fn book(&self) -> BookId {
        self.book
    }

    #[must_use]
    pub fn chapter(&self) -> u32 {
        self.chapter
    }

    #[must_use]
    pub fn verse(&self) -> &VerseLabel {
        &self.verse
    }
}

impl fmt::Display for Reference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}:{}", self.book.osis_id(), self.chapter, self.verse)
    }
}

impl FromStr for Reference {
    type Err = ReferenceError;

    /// Parse `"<osis-book> <chapter>:<verse>"`, the format produced by
    /// [`Display`](fmt::Display) and used in persisted stores.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let malformed = || ReferenceError::Malformed(s.to_string());
        let (book_part, rest) = s.split_once(' ').ok_or_else(malformed)?;
        let (chapter_part, verse_part) = rest.split_once(':').ok_or_else(malformed)?;
        let book = BookId::from_osis_id(book_part)
            .ok_or_else(|| ReferenceError::UnknownBook(book_part.to_string()))?;
        let chapter: u32 = chapter_part.parse().map_err(|_| malformed())?;
        Self::parse_parts(book, chapter, verse_part)
    }
}
