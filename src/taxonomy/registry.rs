use std::collections::HashMap;

use crate::constants::{MAX_CASCADE_EDGES, MAX_RELEVANCE_WEIGHT, MIN_RELEVANCE_WEIGHT};

use super::error::{RegistryError, RegistryResult};
use super::types::CorpusEntry;

/// Immutable, validated set of corpus entries.
///
/// Built once at startup and shared by handle (`Arc<TaxonomyRegistry>`). Every
/// cascade edge resolves to a registered entry; construction fails otherwise.
#[derive(Debug, Clone)]
pub struct TaxonomyRegistry {
    entries: Vec<CorpusEntry>,
    index: HashMap<String, usize>,
}

impl TaxonomyRegistry {
    /// Validates `entries` and builds the registry, preserving declaration order.
    pub fn new(entries: Vec<CorpusEntry>) -> RegistryResult<Self> {
        let mut index = HashMap::with_capacity(entries.len());

        for (i, entry) in entries.iter().enumerate() {
            if index.insert(entry.name.clone(), i).is_some() {
                return Err(RegistryError::DuplicateEntry {
                    name: entry.name.clone(),
                });
            }
            Self::validate_entry(entry)?;
        }

        for entry in &entries {
            for target in &entry.cascades_to {
                if target == &entry.name {
                    return Err(RegistryError::SelfCascade {
                        name: entry.name.clone(),
                    });
                }
                if !index.contains_key(target) {
                    return Err(RegistryError::DanglingCascade {
                        from: entry.name.clone(),
                        to: target.clone(),
                    });
                }
            }
        }

        Ok(Self { entries, index })
    }

    fn validate_entry(entry: &CorpusEntry) -> RegistryResult<()> {
        if entry.keyword_triggers.is_empty() {
            return Err(RegistryError::EmptyTriggers {
                name: entry.name.clone(),
            });
        }

        let weight = entry.relevance_weight;
        if !(MIN_RELEVANCE_WEIGHT..=MAX_RELEVANCE_WEIGHT).contains(&weight) {
            return Err(RegistryError::WeightOutOfRange {
                name: entry.name.clone(),
                weight,
                min: MIN_RELEVANCE_WEIGHT,
                max: MAX_RELEVANCE_WEIGHT,
            });
        }

        if entry.cascades_to.len() > MAX_CASCADE_EDGES {
            return Err(RegistryError::TooManyCascades {
                name: entry.name.clone(),
                count: entry.cascades_to.len(),
                max: MAX_CASCADE_EDGES,
            });
        }

        Ok(())
    }

    /// Looks up an entry by name.
    pub fn get(&self, name: &str) -> RegistryResult<&CorpusEntry> {
        self.index
            .get(name)
            .map(|&i| &self.entries[i])
            .ok_or_else(|| RegistryError::NotFound {
                name: name.to_string(),
            })
    }

    #[inline]
    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Entries in declaration order.
    #[inline]
    pub fn entries(&self) -> &[CorpusEntry] {
        &self.entries
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.name.as_str())
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
