use std::sync::Arc;

use seam_blocks::{FilterTable, HighlightEntry, TypeRegistry};
use seam_world::{PartitionKey, WorldSource};
use serde::Deserialize;

use crate::arena::GeometryBackend;
use crate::cache::MeshCache;
use crate::scanner::{PartitionScanner, ScanReport};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ScanSettings {
    /// Chebyshev radius of the scanned cube, in partitions.
    pub scan_radius: i32,
    /// Partitions visited per tick.
    pub scan_quota: usize,
    /// Ticks between eviction sweeps; 0 disables sweeping.
    pub sweep_interval: u64,
}

impl Default for ScanSettings {
    fn default() -> Self {
        Self {
            scan_radius: 8,
            scan_quota: 16,
            sweep_interval: 100,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TickReport {
    pub scan: ScanReport,
    pub swept: bool,
    pub evicted: usize,
}

/// One highlight pipeline: scanner state plus the cache it feeds.
///
/// Ticked by whoever owns the world; renderers share [`Highlighter::cache`].
pub struct Highlighter {
    scanner: PartitionScanner,
    cache: Arc<MeshCache>,
    settings: ScanSettings,
    ticks: u64,
    enabled: bool,
}

impl Highlighter {
    pub fn new(backend: Arc<dyn GeometryBackend>, settings: ScanSettings) -> Self {
        Self {
            scanner: PartitionScanner::new(settings.scan_radius),
            cache: Arc::new(MeshCache::new(backend)),
            settings,
            ticks: 0,
            enabled: true,
        }
    }

    #[inline]
    pub fn cache(&self) -> &Arc<MeshCache> {
        &self.cache
    }

    #[inline]
    pub fn settings(&self) -> ScanSettings {
        self.settings
    }

    #[inline]
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    #[inline]
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn apply_settings(&mut self, settings: ScanSettings) {
        self.scanner.set_radius(settings.scan_radius);
        self.settings = settings;
    }

    /// Rebuilds the filter when the highlight list changed. A new filter invalidates
    /// everything, so the cache is cleared and scanning restarts from the reference.
    pub fn apply_config(&mut self, entries: &[HighlightEntry], registry: &dyn TypeRegistry) -> bool {
        let hash = FilterTable::content_hash(entries);
        if self.cache.filter().applied_hash() == Some(hash) {
            return false;
        }
        let mut table = FilterTable::new();
        table.rebuild(entries, hash, registry);
        self.cache.set_filter(Arc::new(table));
        self.scanner.reset();
        true
    }

    /// Disabling drops every snapshot and entry; enabling starts a fresh scan.
    pub fn set_enabled(&mut self, enabled: bool) {
        if self.enabled == enabled {
            return;
        }
        self.enabled = enabled;
        if !enabled {
            self.clear();
        }
        log::info!(target: "scan", "highlighting enabled={enabled}");
    }

    pub fn clear(&mut self) {
        self.cache.clear();
        self.scanner.reset();
    }

    /// Runs one scheduled step: a quota of partition visits, plus an eviction sweep
    /// every `sweep_interval` ticks.
    pub fn tick<W: WorldSource + ?Sized>(&mut self, world: &W, reference: PartitionKey) -> TickReport {
        let mut report = TickReport::default();
        if !self.enabled {
            return report;
        }
        self.ticks += 1;
        let filter = self.cache.filter();
        if !filter.is_empty() {
            report.scan = self.scanner.advance(
                self.settings.scan_quota,
                reference,
                world,
                &filter,
                &self.cache,
            );
        }
        let interval = self.settings.sweep_interval;
        if interval > 0 && self.ticks % interval == 0 {
            report.swept = true;
            report.evicted = self.scanner.sweep(reference, &self.cache);
        }
        report
    }
}
