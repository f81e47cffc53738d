use std::sync::Arc;

use thiserror::Error;

use crate::algebra::compose::{best_agreement, ComposeError};
use crate::core::mapping::{MappingError, VersificationMapping};
use crate::core::scheme::{SchemeError, VersificationScheme};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("Versification scheme {0} not found")]
    UnknownScheme(String),

    #[error("Duplicate versification scheme name: {0}")]
    DuplicateScheme(String),

    #[error("No mapping found from {from} to {to}")]
    UnknownMapping { from: String, to: String },

    #[error("Mapping {index} from {from} to {to} does not exist ({count} available)")]
    MappingIndexOutOfRange {
        from: String,
        to: String,
        index: usize,
        count: usize,
    },

    #[error("Unable to build agreeing mapping from {from} to {to}")]
    NoAgreement { from: String, to: String },

    #[error("Invalid mapping selector: {0:?} (expected \"from/to\" or \"from/to/N\")")]
    InvalidSelector(String),

    #[error("Scheme {0} is still referenced by a mapping")]
    SchemeInUse(String),

    #[error(transparent)]
    Scheme(#[from] SchemeError),

    #[error(transparent)]
    Mapping(#[from] MappingError),

    #[error(transparent)]
    Compose(#[from] ComposeError),
}

/// An owned collection of named schemes and the mappings between them.
///
/// The store owns every scheme and mapping it holds; callers receive
/// shared references to immutable objects, never clones to mutate. The
/// store itself is the only mutable state in the system and expects a
/// single writer.
#[derive(Debug, Default)]
pub struct SchemeStore {
    schemes: Vec<Arc<VersificationScheme>>,
    mappings: Vec<Arc<VersificationMapping>>,
}

impl SchemeStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn schemes(&self) -> &[Arc<VersificationScheme>] {
        &self.schemes
    }

    #[must_use]
    pub fn mappings(&self) -> &[Arc<VersificationMapping>] {
        &self.mappings
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.schemes.is_empty() && self.mappings.is_empty()
    }

    /// Add a scheme. Its name and aliases must not collide with any
    /// name or alias already present.
    pub fn add_scheme(&mut self, scheme: VersificationScheme) -> Result<(), StoreError> {
        let mut claimed: Vec<&str> = vec![scheme.name()];
        claimed.extend(scheme.aliases().iter().map(String::as_str));
        for name in claimed {
            if self.schemes.iter().any(|s| s.matches_name(name)) {
                return Err(StoreError::DuplicateScheme(name.to_string()));
            }
        }
        self.schemes.push(Arc::new(scheme));
        Ok(())
    }

    /// Find a scheme by name, falling back to alias lookup.
    pub fn find_scheme(&self, name: &str) -> Result<&Arc<VersificationScheme>, StoreError> {
        if let Some(scheme) = self.schemes.iter().find(|s| s.name() == name) {
            return Ok(scheme);
        }
        self.schemes
            .iter()
            .find(|s| s.aliases().iter().any(|a| a == name))
            .ok_or_else(|| StoreError::UnknownScheme(name.to_string()))
    }

    /// Add a mapping. Both endpoint schemes must already be present.
    pub fn add_mapping(&mut self, mapping: VersificationMapping) -> Result<(), StoreError> {
        self.find_scheme(mapping.from_scheme().name())?;
        self.find_scheme(mapping.to_scheme().name())?;
        self.mappings.push(Arc::new(mapping));
        Ok(())
    }

    /// Remove a scheme by name. Refused while any mapping still uses the
    /// scheme as an endpoint, so a store never holds dangling mappings.
    pub fn remove_scheme(&mut self, name: &str) -> Result<(), StoreError> {
        let scheme = self.find_scheme(name)?.clone();
        let in_use = self.mappings.iter().any(|m| {
            m.from_scheme().name() == scheme.name() || m.to_scheme().name() == scheme.name()
        });
        if in_use {
            return Err(StoreError::SchemeInUse(scheme.name().to_string()));
        }
        self.schemes.retain(|s| s.name() != scheme.name());
        Ok(())
    }

    /// Remove a mapping identified by a selector (see
    /// [`find_mapping`](Self::find_mapping)). Only stored mappings can be
    /// removed; derived selectors (`/0` over several candidates, `/-1`)
    /// are rejected.
    pub fn remove_mapping(&mut self, selector: &str) -> Result<(), StoreError> {
        let (from, to, number) = self.parse_selector(selector)?;
        let from = self.find_scheme(&from)?.name().to_string();
        let to = self.find_scheme(&to)?.name().to_string();
        let indices: Vec<usize> = self.mapping_indices(&from, &to);
        if indices.is_empty() {
            return Err(StoreError::UnknownMapping { from, to });
        }
        let position = match number {
            0 if indices.len() == 1 => 0,
            n if n >= 1 && (n as usize) <= indices.len() => n as usize - 1,
            _ => {
                return Err(StoreError::MappingIndexOutOfRange {
                    from,
                    to,
                    index: number.max(0).unsigned_abs() as usize,
                    count: indices.len(),
                })
            }
        };
        self.mappings.remove(indices[position]);
        Ok(())
    }

    /// Rename a scheme. Every mapping referencing it is rebuilt against
    /// the renamed scheme; the old objects stay untouched (schemes are
    /// immutable, derived ones are new objects).
    pub fn rename_scheme(&mut self, old_name: &str, new_name: &str) -> Result<(), StoreError> {
        let scheme = self.find_scheme(old_name)?.clone();
        if self
            .schemes
            .iter()
            .any(|s| s.name() != scheme.name() && s.matches_name(new_name))
        {
            return Err(StoreError::DuplicateScheme(new_name.to_string()));
        }
        let renamed = Arc::new(scheme.with_name(new_name)?);

        let mut rebuilt_mappings = Vec::with_capacity(self.mappings.len());
        for mapping in &self.mappings {
            let from_hit = mapping.from_scheme().name() == scheme.name();
            let to_hit = mapping.to_scheme().name() == scheme.name();
            if !from_hit && !to_hit {
                rebuilt_mappings.push(mapping.clone());
                continue;
            }
            let from = if from_hit {
                renamed.clone()
            } else {
                mapping.from_scheme().clone()
            };
            let to = if to_hit {
                renamed.clone()
            } else {
                mapping.to_scheme().clone()
            };
            let rules = mapping
                .rules_in_order()
                .map(|(source, targets)| (source.clone(), targets.to_vec()))
                .collect();
            rebuilt_mappings.push(Arc::new(VersificationMapping::build(from, to, rules)?));
        }

        for stored in &mut self.schemes {
            if stored.name() == scheme.name() {
                *stored = renamed.clone();
            }
        }
        self.mappings = rebuilt_mappings;
        Ok(())
    }

    fn mapping_indices(&self, from: &str, to: &str) -> Vec<usize> {
        self.mappings
            .iter()
            .enumerate()
            .filter(|(_, m)| m.from_scheme().name() == from && m.to_scheme().name() == to)
            .map(|(i, _)| i)
            .collect()
    }

    /// All stored mappings between two scheme names.
    #[must_use]
    pub fn mappings_between(&self, from: &str, to: &str) -> Vec<&Arc<VersificationMapping>> {
        self.mappings
            .iter()
            .filter(|m| m.from_scheme().name() == from && m.to_scheme().name() == to)
            .collect()
    }

    /// Resolve a mapping selector of the form `from/to` or `from/to/N`.
    ///
    /// `N >= 1` picks the N-th stored mapping for the pair. `N = 0` (or
    /// omitted) picks the only stored mapping, or the
    /// [best agreement](crate::algebra::compose::best_agreement) of
    /// several. `N = -1` builds the identity mapping between the two
    /// schemes.
    pub fn find_mapping(&self, selector: &str) -> Result<Arc<VersificationMapping>, StoreError> {
        let (from, to, number) = self.parse_selector(selector)?;
        let from_scheme = self.find_scheme(&from)?.clone();
        let to_scheme = self.find_scheme(&to)?.clone();

        if number == -1 {
            return Ok(Arc::new(VersificationMapping::identity(
                from_scheme,
                to_scheme,
            )?));
        }

        let candidates = self.mappings_between(from_scheme.name(), to_scheme.name());
        if candidates.is_empty() {
            return Err(StoreError::UnknownMapping { from, to });
        }
        match number {
            0 => {
                if candidates.len() == 1 {
                    return Ok(candidates[0].clone());
                }
                let refs: Vec<&VersificationMapping> =
                    candidates.iter().map(|m| m.as_ref()).collect();
                match best_agreement(&refs)? {
                    Some(agreed) => Ok(Arc::new(agreed)),
                    None => Err(StoreError::NoAgreement { from, to }),
                }
            }
            n if n >= 1 && (n as usize) <= candidates.len() => {
                Ok(candidates[n as usize - 1].clone())
            }
            n => Err(StoreError::MappingIndexOutOfRange {
                from,
                to,
                index: n.max(0).unsigned_abs() as usize,
                count: candidates.len(),
            }),
        }
    }

    fn parse_selector(&self, selector: &str) -> Result<(String, String, i32), StoreError> {
        let parts: Vec<&str> = selector.split('/').collect();
        match parts.as_slice() {
            [from, to] => Ok(((*from).to_string(), (*to).to_string(), 0)),
            [from, to, number] => {
                let number: i32 = number
                    .parse()
                    .map_err(|_| StoreError::InvalidSelector(selector.to_string()))?;
                Ok(((*from).to_string(), (*to).to_string(), number))
            }
            _ => Err(StoreError::InvalidSelector(selector.to_string())),
        }
    }
}
