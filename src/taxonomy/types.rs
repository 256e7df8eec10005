use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
/// Priority band of a corpus entry. Declaration order is recommendation order.
pub enum Tier {
    /// Foundational architecture texts.
    ArchitectureSpine,
    /// Hands-on implementation references.
    Implementation,
    /// Process and practice references.
    EngineeringPractices,
}

impl Tier {
    /// Sort key used by recommendations (lower sorts first).
    #[inline]
    pub fn priority(&self) -> u8 {
        match self {
            Tier::ArchitectureSpine => 0,
            Tier::Implementation => 1,
            Tier::EngineeringPractices => 2,
        }
    }

    #[inline]
    pub fn as_str(&self) -> &'static str {
        match self {
            Tier::ArchitectureSpine => "architecture_spine",
            Tier::Implementation => "implementation",
            Tier::EngineeringPractices => "engineering_practices",
        }
    }
}

impl std::fmt::Display for Tier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
/// One companion source registered for cross-referencing.
pub struct CorpusEntry {
    pub name: String,
    pub tier: Tier,
    /// Lower-cased single words that signal relevance.
    pub keyword_triggers: BTreeSet<String>,
    /// Names of entries followed when this one is selected.
    pub cascades_to: Vec<String>,
    pub relevance_weight: f32,
}

impl CorpusEntry {
    /// Creates an entry with no triggers and no cascade edges.
    pub fn new(name: impl Into<String>, tier: Tier, relevance_weight: f32) -> Self {
        Self {
            name: name.into(),
            tier,
            keyword_triggers: BTreeSet::new(),
            cascades_to: Vec::new(),
            relevance_weight,
        }
    }

    /// Adds keyword triggers (lower-cased and trimmed).
    pub fn with_triggers<I, S>(mut self, triggers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.keyword_triggers.extend(
            triggers
                .into_iter()
                .map(|t| t.as_ref().trim().to_lowercase())
                .filter(|t| !t.is_empty()),
        );
        self
    }

    /// Appends cascade edges, keeping declaration order and dropping repeats.
    pub fn cascades_to<I, S>(mut self, targets: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for target in targets {
            let target = target.into();
            if !self.cascades_to.contains(&target) {
                self.cascades_to.push(target);
            }
        }
        self
    }

    #[inline]
    pub fn has_cascades(&self) -> bool {
        !self.cascades_to.is_empty()
    }
}
