use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use crate::config::HighlightEntry;
use crate::registry::TypeRegistry;
use crate::types::{AIR, BlockId, Rgba};

/// Block id -> highlight color, dense over the ids that are actually configured.
///
/// The table only changes in [`FilterTable::rebuild`], and only when the content hash
/// of the configuration differs from the one last applied.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FilterTable {
    colors: Vec<Option<Rgba>>,
    count: usize,
    applied_hash: Option<u64>,
}

impl FilterTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a table from `entries` in one step.
    pub fn from_entries(entries: &[HighlightEntry], registry: &dyn TypeRegistry) -> Self {
        let mut table = Self::new();
        table.rebuild(entries, Self::content_hash(entries), registry);
        table
    }

    /// Stable hash of an ordered entry list.
    pub fn content_hash(entries: &[HighlightEntry]) -> u64 {
        let mut h = DefaultHasher::new();
        entries.len().hash(&mut h);
        for e in entries {
            e.hash(&mut h);
        }
        h.finish()
    }

    /// Recomputes the table if `config_hash` is new. Returns whether it rebuilt.
    ///
    /// Unresolvable identifiers and air are dropped with a warning. When an id is listed
    /// more than once the last entry wins.
    pub fn rebuild(
        &mut self,
        entries: &[HighlightEntry],
        config_hash: u64,
        registry: &dyn TypeRegistry,
    ) -> bool {
        if self.applied_hash == Some(config_hash) {
            return false;
        }
        let mut colors: Vec<Option<Rgba>> = Vec::new();
        for entry in entries {
            let Some(id) = registry.resolve_type_id(&entry.block) else {
                log::warn!(target: "filter", "unknown block '{}' ignored", entry.block);
                continue;
            };
            if id == AIR {
                log::warn!(target: "filter", "'{}' is the empty block and cannot be highlighted", entry.block);
                continue;
            }
            let slot = id as usize;
            if colors.len() <= slot {
                colors.resize(slot + 1, None);
            }
            if colors[slot].is_some() {
                log::debug!(target: "filter", "block '{}' listed twice, last color wins", entry.block);
            }
            colors[slot] = Some(entry.color);
        }
        self.count = colors.iter().filter(|c| c.is_some()).count();
        self.colors = colors;
        self.applied_hash = Some(config_hash);
        log::info!(target: "filter", "filter rebuilt types={} hash={:016x}", self.count, config_hash);
        true
    }

    #[inline]
    pub fn is_filtered(&self, id: BlockId) -> bool {
        self.color_of(id).is_some()
    }

    #[inline]
    pub fn color_of(&self, id: BlockId) -> Option<Rgba> {
        self.colors.get(id as usize).copied().flatten()
    }

    /// Hash of the configuration the table was last built from.
    #[inline]
    pub fn applied_hash(&self) -> Option<u64> {
        self.applied_hash
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.count
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    pub fn iter(&self) -> impl Iterator<Item = (BlockId, Rgba)> + '_ {
        self.colors
            .iter()
            .enumerate()
            .filter_map(|(id, c)| c.map(|c| (id as BlockId, c)))
    }
}
