use hashbrown::{HashMap, HashSet};
use seam_blocks::{AIR, BlockId};

use crate::partition::{PARTITION_EDGE, PARTITION_VOLUME, PartitionKey, cell_index};
use crate::source::WorldSource;

/// In-memory world: every partition is loaded and all-air unless written to or
/// explicitly unloaded.
#[derive(Clone, Debug, Default)]
pub struct SparseWorld {
    partitions: HashMap<PartitionKey, Box<[BlockId]>>,
    unloaded: HashSet<PartitionKey>,
}

fn local(v: i32) -> usize {
    v.rem_euclid(PARTITION_EDGE as i32) as usize
}

impl SparseWorld {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_block(&mut self, x: i32, y: i32, z: i32, id: BlockId) {
        let key = PartitionKey::containing(x, y, z);
        let idx = cell_index(local(x), local(y), local(z));
        if id == AIR {
            if let Some(cells) = self.partitions.get_mut(&key) {
                cells[idx] = AIR;
                if cells.iter().all(|&c| c == AIR) {
                    self.partitions.remove(&key);
                }
            }
            return;
        }
        let cells = self
            .partitions
            .entry(key)
            .or_insert_with(|| vec![AIR; PARTITION_VOLUME].into_boxed_slice());
        cells[idx] = id;
    }

    pub fn block_at(&self, x: i32, y: i32, z: i32) -> BlockId {
        let key = PartitionKey::containing(x, y, z);
        self.partitions
            .get(&key)
            .map_or(AIR, |cells| cells[cell_index(local(x), local(y), local(z))])
    }

    /// Fills the inclusive box `min..=max` with `id`.
    pub fn fill(&mut self, min: (i32, i32, i32), max: (i32, i32, i32), id: BlockId) {
        for y in min.1..=max.1 {
            for z in min.2..=max.2 {
                for x in min.0..=max.0 {
                    self.set_block(x, y, z, id);
                }
            }
        }
    }

    pub fn set_loaded(&mut self, key: PartitionKey, loaded: bool) {
        if loaded {
            self.unloaded.remove(&key);
        } else {
            self.unloaded.insert(key);
        }
    }
}

impl WorldSource for SparseWorld {
    fn is_partition_loaded(&self, key: PartitionKey) -> bool {
        !self.unloaded.contains(&key)
    }

    fn type_grid(&self, key: PartitionKey) -> Option<Vec<BlockId>> {
        if !self.is_partition_loaded(key) {
            return None;
        }
        Some(match self.partitions.get(&key) {
            Some(cells) => cells.to_vec(),
            None => vec![AIR; PARTITION_VOLUME],
        })
    }
}
