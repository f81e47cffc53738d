use std::collections::HashMap;

use thiserror::Error;
use tracing::debug;

use crate::core::book::BookId;
use crate::core::reference::{Reference, ReferenceError};
use crate::core::standard::StandardVersification;
use crate::utils::validation::{validate_scheme_alias, validate_scheme_name, NameError};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SchemeError {
    #[error(transparent)]
    Name(#[from] NameError),

    #[error(transparent)]
    Reference(#[from] ReferenceError),

    #[error("Verse index {index} out of range for scheme {scheme:?} ({len} verses)")]
    IndexOutOfRange {
        scheme: String,
        index: usize,
        len: usize,
    },
}

/// A versification scheme: a named, ordered, duplicate-free catalogue of
/// verse addresses representing one numbering tradition.
///
/// The sequence order is the scheme's own canonical order. It is never
/// re-derived by sorting book/chapter/verse; unusual traditions
/// legitimately place a title pseudo-verse before verse 1 or reorder
/// verses, and that order is part of the scheme's identity.
///
/// Schemes are immutable once built. Derived schemes (e.g. a rename) are
/// always new objects.
#[derive(Debug, Clone)]
pub struct VersificationScheme {
    name: String,
    description: Option<String>,
    aliases: Vec<String>,
    references: Vec<Reference>,
    index: HashMap<Reference, usize>,
}

impl VersificationScheme {
    /// Build a scheme from an ordered reference list.
    ///
    /// The list may contain duplicates; repeats are silently dropped,
    /// keeping the first occurrence and its position. The dropped count
    /// is reported as a debug diagnostic, never an error.
    pub fn from_reference_list(
        name: impl Into<String>,
        description: Option<String>,
        aliases: Vec<String>,
        references: Vec<Reference>,
    ) -> Result<Self, SchemeError> {
        let name = name.into();
        validate_scheme_name(&name)?;
        for alias in &aliases {
            validate_scheme_alias(alias)?;
        }

        let mut unique = Vec::with_capacity(references.len());
        let mut index = HashMap::with_capacity(references.len());
        let mut dropped = 0usize;
        for reference in references {
            if index.contains_key(&reference) {
                dropped += 1;
                continue;
            }
            index.insert(reference.clone(), unique.len());
            unique.push(reference);
        }
        if dropped > 0 {
            debug!(
                scheme = %name,
                dropped,
                "dropped duplicate references while building scheme"
            );
        }

        Ok(Self {
            name,
            description,
            aliases,
            references: unique,
            index,
        })
    }

    /// Build a scheme from per-book verse counts: every chapter gets the
    /// plain verses `1..=count`, in book/chapter order.
    pub fn from_verse_counts(
        name: impl Into<String>,
        description: Option<String>,
        aliases: Vec<String>,
        counts: &[(BookId, &[u16])],
    ) -> Result<Self, SchemeError> {
        let total: usize = counts
            .iter()
            .map(|(_, chapters)| chapters.iter().map(|&c| c as usize).sum::<usize>())
            .sum();
        let mut references = Vec::with_capacity(total);
        for (book, chapters) in counts {
            for (chapter_idx, &verse_count) in chapters.iter().enumerate() {
                let chapter = chapter_idx as u32 + 1;
                for verse in 1..=u32::from(verse_count) {
                    references.push(Reference::parse_parts(*book, chapter, &verse.to_string())?);
                }
            }
        }
        Self::from_reference_list(name, description, aliases, references)
    }

    /// Build a scheme from a hard-coded standard table (e.g. KJV).
    pub fn from_standard_versification(
        name: impl Into<String>,
        standard: &StandardVersification,
    ) -> Result<Self, SchemeError> {
        Self::from_verse_counts(name, None, Vec::new(), standard.books)
    }

    /// Derive a copy of this scheme under a different name.
    pub fn with_name(&self, name: impl Into<String>) -> Result<Self, SchemeError> {
        let name = name.into();
        validate_scheme_name(&name)?;
        let mut renamed = self.clone();
        renamed.name = name;
        Ok(renamed)
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    #[must_use]
    pub fn aliases(&self) -> &[String] {
        &self.aliases
    }

    /// Whether `name` is this scheme's name or one of its aliases.
    #[must_use]
    pub fn matches_name(&self, name: &str) -> bool {
        self.name == name || self.aliases.iter().any(|a| a == name)
    }

    #[must_use]
    pub fn verse_count(&self) -> usize {
        self.references.len()
    }

    /// The reference at `index` (0-based).
    pub fn reference(&self, index: usize) -> Result<&Reference, SchemeError> {
        self.references
            .get(index)
            .ok_or_else(|| SchemeError::IndexOutOfRange {
                scheme: self.name.clone(),
                index,
                len: self.references.len(),
            })
    }

    /// Position of `reference` in canonical order, if present. O(1).
    #[must_use]
    pub fn index_of(&self, reference: &Reference) -> Option<usize> {
        self.index.get(reference).copied()
    }

    /// O(1) membership test.
    #[must_use]
    pub fn contains(&self, reference: &Reference) -> bool {
        self.index.contains_key(reference)
    }

    /// Iterate references in canonical order.
    pub fn references(&self) -> impl Iterator<Item = &Reference> {
        self.references.iter()
    }
}
