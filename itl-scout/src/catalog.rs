//! Champion name ↔ id translation
//!
//! The remote API identifies champions by numeric id. [`ChampionCatalog`] is
//! loaded once at startup and shared by `Arc` with the client that needs it.

use crate::error::LookupError;
use std::collections::HashMap;

/// Bidirectional champion lookup
pub trait ChampionLookup: Send + Sync {
    fn id_for(&self, name: &str) -> Result<u32, LookupError>;

    fn name_for(&self, id: u32) -> Result<String, LookupError>;
}

/// One catalog row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChampionEntry {
    /// Display name, e.g. "Miss Fortune"
    pub name: String,
    /// URL slug, e.g. "missfortune"
    pub slug: String,
    /// Riot champion id
    pub id: u32,
}

/// In-memory champion catalog
#[derive(Debug, Clone, Default)]
pub struct ChampionCatalog {
    entries: Vec<ChampionEntry>,
    by_name: HashMap<String, usize>,
    by_slug: HashMap<String, usize>,
    by_id: HashMap<u32, usize>,
}

impl ChampionCatalog {
    pub fn new(entries: Vec<ChampionEntry>) -> Self {
        let mut by_name = HashMap::with_capacity(entries.len());
        let mut by_slug = HashMap::with_capacity(entries.len());
        let mut by_id = HashMap::with_capacity(entries.len());

        for (index, entry) in entries.iter().enumerate() {
            // First row wins on duplicates
            by_name.entry(entry.name.clone()).or_insert(index);
            by_slug.entry(entry.slug.clone()).or_insert(index);
            by_id.entry(entry.id).or_insert(index);
        }

        Self {
            entries,
            by_name,
            by_slug,
            by_id,
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl ChampionLookup for ChampionCatalog {
    /// Exact display name, falling back to the slug
    fn id_for(&self, name: &str) -> Result<u32, LookupError> {
        self.by_name
            .get(name)
            .or_else(|| self.by_slug.get(name))
            .map(|&index| self.entries[index].id)
            .ok_or_else(|| LookupError::UnknownName(name.to_string()))
    }

    fn name_for(&self, id: u32) -> Result<String, LookupError> {
        self.by_id
            .get(&id)
            .map(|&index| self.entries[index].name.clone())
            .ok_or(LookupError::UnknownId(id))
    }
}
