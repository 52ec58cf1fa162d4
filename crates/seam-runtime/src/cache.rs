use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::time::Instant;

use hashbrown::HashMap;
use seam_blocks::FilterTable;
use seam_chunk::VoxelSnapshot;
use seam_mesh_cpu::{HighlightMesh, build_highlight_mesh};
use seam_world::PartitionKey;

use crate::arena::{BufferLease, GeometryBackend};

/// Built geometry for one partition together with the buffer holding it.
#[derive(Debug)]
pub struct MeshEntry {
    pub mesh: HighlightMesh,
    pub lease: BufferLease,
    pub snapshot: Arc<VoxelSnapshot>,
    /// When this partition first produced geometry; kept across rebuilds.
    pub first_seen: Instant,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SnapshotChange {
    Unchanged,
    Inserted,
    Replaced,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct MeshCacheStats {
    pub builds: u64,
    pub hits: u64,
    pub invalidations: u64,
    pub evictions: u64,
    /// Builds thrown away because the snapshot changed while they ran.
    pub discarded: u64,
    pub partitions: usize,
    pub entries: usize,
}

struct Slot {
    snapshot: Arc<VoxelSnapshot>,
    entry: Option<Arc<MeshEntry>>,
    first_seen: Option<Instant>,
}

/// Per-partition snapshots and their lazily built geometry.
///
/// The scanner writes snapshots, readers call [`MeshCache::get_or_build`]. Builds run
/// outside the lock and are published only if the slot still holds the snapshot they
/// were built from. Replaced entries are dropped after the lock is released; their
/// buffers go back to the backend when the last reader lets go of them.
pub struct MeshCache {
    slots: RwLock<HashMap<PartitionKey, Slot>>,
    filter: RwLock<Arc<FilterTable>>,
    backend: Arc<dyn GeometryBackend>,
    builds: AtomicU64,
    hits: AtomicU64,
    invalidations: AtomicU64,
    evictions: AtomicU64,
    discarded: AtomicU64,
}

impl MeshCache {
    pub fn new(backend: Arc<dyn GeometryBackend>) -> Self {
        Self {
            slots: RwLock::new(HashMap::new()),
            filter: RwLock::new(Arc::new(FilterTable::new())),
            backend,
            builds: AtomicU64::new(0),
            hits: AtomicU64::new(0),
            invalidations: AtomicU64::new(0),
            evictions: AtomicU64::new(0),
            discarded: AtomicU64::new(0),
        }
    }

    fn read(&self) -> RwLockReadGuard<'_, HashMap<PartitionKey, Slot>> {
        self.slots.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, HashMap<PartitionKey, Slot>> {
        self.slots.write().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn filter(&self) -> Arc<FilterTable> {
        Arc::clone(&self.filter.read().unwrap_or_else(PoisonError::into_inner))
    }

    /// Swaps the filter and drops everything built under the old one.
    pub fn set_filter(&self, filter: Arc<FilterTable>) {
        let removed = self.clear();
        *self.filter.write().unwrap_or_else(PoisonError::into_inner) = filter;
        log::info!(target: "cache", "filter replaced, cleared={removed}");
    }

    /// Records the latest snapshot for its partition. A changed snapshot drops the
    /// built entry; the next reader rebuilds it.
    pub fn store_snapshot(&self, snapshot: Arc<VoxelSnapshot>) -> SnapshotChange {
        let key = snapshot.key();
        let stale;
        let change = {
            let mut slots = self.write();
            match slots.get_mut(&key) {
                Some(slot) if *slot.snapshot == *snapshot => return SnapshotChange::Unchanged,
                Some(slot) => {
                    slot.snapshot = snapshot;
                    stale = slot.entry.take();
                    SnapshotChange::Replaced
                }
                None => {
                    slots.insert(
                        key,
                        Slot {
                            snapshot,
                            entry: None,
                            first_seen: None,
                        },
                    );
                    stale = None;
                    SnapshotChange::Inserted
                }
            }
        };
        if stale.is_some() {
            self.invalidations.fetch_add(1, Ordering::Relaxed);
        }
        drop(stale);
        log::debug!(target: "cache", "snapshot {:?} key=({}, {}, {})", change, key.px, key.py, key.pz);
        change
    }

    pub fn snapshot(&self, key: PartitionKey) -> Option<Arc<VoxelSnapshot>> {
        self.read().get(&key).map(|s| Arc::clone(&s.snapshot))
    }

    pub fn keys(&self) -> Vec<PartitionKey> {
        self.read().keys().copied().collect()
    }

    /// The current entry, without building.
    pub fn entry(&self, key: PartitionKey) -> Option<Arc<MeshEntry>> {
        self.read().get(&key).and_then(|s| s.entry.clone())
    }

    pub fn first_seen(&self, key: PartitionKey) -> Option<Instant> {
        self.read().get(&key).and_then(|s| s.first_seen)
    }

    /// Returns the entry for `key`, building it first if it is missing or was
    /// invalidated. `None` when the partition has no snapshot, or when the snapshot
    /// changed while building.
    pub fn get_or_build(&self, key: PartitionKey) -> Option<Arc<MeshEntry>> {
        let (snapshot, first_seen) = {
            let slots = self.read();
            let slot = slots.get(&key)?;
            if let Some(entry) = &slot.entry {
                self.hits.fetch_add(1, Ordering::Relaxed);
                return Some(Arc::clone(entry));
            }
            (Arc::clone(&slot.snapshot), slot.first_seen)
        };
        let entry = self.build_entry(snapshot, first_seen);
        self.publish(key, entry)
    }

    fn build_entry(&self, snapshot: Arc<VoxelSnapshot>, first_seen: Option<Instant>) -> MeshEntry {
        let filter = self.filter();
        let mesh = build_highlight_mesh(&snapshot, &filter);
        let lease = BufferLease::upload(&self.backend, &mesh);
        self.builds.fetch_add(1, Ordering::Relaxed);
        MeshEntry {
            mesh,
            lease,
            snapshot,
            first_seen: first_seen.unwrap_or_else(Instant::now),
        }
    }

    fn publish(&self, key: PartitionKey, entry: MeshEntry) -> Option<Arc<MeshEntry>> {
        let entry = Arc::new(entry);
        let mut slots = self.write();
        let Some(slot) = slots.get_mut(&key) else {
            drop(slots);
            self.discarded.fetch_add(1, Ordering::Relaxed);
            return None;
        };
        if !Arc::ptr_eq(&slot.snapshot, &entry.snapshot) {
            drop(slots);
            self.discarded.fetch_add(1, Ordering::Relaxed);
            log::debug!(target: "cache", "discarded stale build key=({}, {}, {})", key.px, key.py, key.pz);
            return None;
        }
        if let Some(existing) = &slot.entry {
            // Another reader won the race for the same snapshot.
            let existing = Arc::clone(existing);
            drop(slots);
            self.discarded.fetch_add(1, Ordering::Relaxed);
            return Some(existing);
        }
        slot.first_seen.get_or_insert(entry.first_seen);
        slot.entry = Some(Arc::clone(&entry));
        Some(entry)
    }

    /// Drops the built entry but keeps the snapshot and first-seen time.
    pub fn invalidate(&self, key: PartitionKey) -> bool {
        let stale = self.write().get_mut(&key).and_then(|s| s.entry.take());
        let hit = stale.is_some();
        if hit {
            self.invalidations.fetch_add(1, Ordering::Relaxed);
        }
        hit
    }

    /// Forgets the partition entirely.
    pub fn remove(&self, key: PartitionKey) -> bool {
        let removed = self.write().remove(&key);
        let hit = removed.is_some();
        if hit {
            self.evictions.fetch_add(1, Ordering::Relaxed);
        }
        hit
    }

    /// Removes every partition whose Chebyshev distance to `reference` exceeds `radius`.
    pub fn evict_beyond(&self, reference: PartitionKey, radius: i64) -> usize {
        let mut removed = Vec::new();
        {
            let mut slots = self.write();
            slots.retain(|key, slot| {
                if key.chebyshev_distance(reference) > radius {
                    removed.push((slot.entry.take(), Arc::clone(&slot.snapshot)));
                    false
                } else {
                    true
                }
            });
        }
        let n = removed.len();
        if n > 0 {
            self.evictions.fetch_add(n as u64, Ordering::Relaxed);
            log::debug!(target: "cache", "evicted={n} radius={radius}");
        }
        n
    }

    pub fn clear(&self) -> usize {
        let drained: Vec<Slot> = {
            let mut slots = self.write();
            slots.drain().map(|(_, slot)| slot).collect()
        };
        let n = drained.len();
        if n > 0 {
            self.evictions.fetch_add(n as u64, Ordering::Relaxed);
        }
        n
    }

    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    pub fn stats(&self) -> MeshCacheStats {
        let (partitions, entries) = {
            let slots = self.read();
            (slots.len(), slots.values().filter(|s| s.entry.is_some()).count())
        };
        MeshCacheStats {
            builds: self.builds.load(Ordering::Relaxed),
            hits: self.hits.load(Ordering::Relaxed),
            invalidations: self.invalidations.load(Ordering::Relaxed),
            evictions: self.evictions.load(Ordering::Relaxed),
            discarded: self.discarded.load(Ordering::Relaxed),
            partitions,
            entries,
        }
    }
}
