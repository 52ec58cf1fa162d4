use std::error::Error;

use fastnoise_lite::{FastNoiseLite, NoiseType};
use hashbrown::HashMap;
use seam_blocks::{AIR, BlockId, BlockRegistry};

use crate::partition::{PARTITION_EDGE, PARTITION_VOLUME, PartitionKey, cell_index};
use crate::source::WorldSource;
use crate::veingen::VeinParams;

struct CompiledOre {
    id: BlockId,
    noise: FastNoiseLite,
    threshold: f32,
    min_y: i32,
    max_y: i32,
}

/// Noise-generated stone with ore veins, a loaded window that follows a center
/// partition, and an overlay of edits on top of the generated terrain.
pub struct VeinWorld {
    params: VeinParams,
    height: FastNoiseLite,
    ores: Vec<CompiledOre>,
    fill: BlockId,
    top: BlockId,
    loaded_center: PartitionKey,
    edits: HashMap<(i32, i32, i32), BlockId>,
}

impl VeinWorld {
    pub fn new(seed: i32, params: VeinParams, reg: &BlockRegistry) -> Result<Self, Box<dyn Error>> {
        let lookup = |name: &str| {
            reg.id_by_name(name)
                .ok_or_else(|| format!("vein world references unknown block '{name}'"))
        };
        let fill = lookup(&params.fill)?;
        let top = lookup(&params.top)?;
        let mut height = FastNoiseLite::with_seed(seed);
        height.set_noise_type(Some(NoiseType::OpenSimplex2));
        height.set_frequency(Some(params.height_frequency));
        let mut ores = Vec::with_capacity(params.ores.len());
        for (i, rule) in params.ores.iter().enumerate() {
            let Some(id) = reg.id_by_name(&rule.block) else {
                log::warn!(target: "world", "ore '{}' is not registered, skipped", rule.block);
                continue;
            };
            let mut noise = FastNoiseLite::with_seed(seed ^ (0x5EED_0000 + i as i32 * 7_919));
            noise.set_noise_type(Some(NoiseType::OpenSimplex2));
            noise.set_frequency(Some(rule.frequency));
            ores.push(CompiledOre {
                id,
                noise,
                threshold: rule.threshold,
                min_y: rule.min_y,
                max_y: rule.max_y,
            });
        }
        Ok(Self {
            params,
            height,
            ores,
            fill,
            top,
            loaded_center: PartitionKey::default(),
            edits: HashMap::new(),
        })
    }

    #[inline]
    pub fn params(&self) -> &VeinParams {
        &self.params
    }

    #[inline]
    pub fn loaded_center(&self) -> PartitionKey {
        self.loaded_center
    }

    /// Moves the streamed window. Partitions outside it stop reporting as loaded.
    pub fn set_loaded_center(&mut self, center: PartitionKey) {
        self.loaded_center = center;
    }

    /// Y of the topmost solid cell of column `(x, z)`.
    pub fn surface_height(&self, x: i32, z: i32) -> i32 {
        let h = self.height.get_noise_2d(x as f32, z as f32);
        self.params.surface_y + (h * self.params.height_amplitude).round() as i32
    }

    fn generated(&self, x: i32, y: i32, z: i32, surface: i32) -> BlockId {
        if y < 0 || y > surface {
            return AIR;
        }
        if y == surface {
            return self.top;
        }
        for ore in &self.ores {
            if y < ore.min_y || y > ore.max_y {
                continue;
            }
            if ore.noise.get_noise_3d(x as f32, y as f32, z as f32) > ore.threshold {
                return ore.id;
            }
        }
        self.fill
    }

    pub fn block_at(&self, x: i32, y: i32, z: i32) -> BlockId {
        if let Some(&id) = self.edits.get(&(x, y, z)) {
            return id;
        }
        self.generated(x, y, z, self.surface_height(x, z))
    }

    /// Overrides the generated block at `(x, y, z)`.
    pub fn set_block(&mut self, x: i32, y: i32, z: i32, id: BlockId) {
        self.edits.insert((x, y, z), id);
    }

    #[inline]
    pub fn edit_count(&self) -> usize {
        self.edits.len()
    }
}

impl WorldSource for VeinWorld {
    fn is_partition_loaded(&self, key: PartitionKey) -> bool {
        key.chebyshev_distance(self.loaded_center) <= i64::from(self.params.load_radius)
    }

    fn type_grid(&self, key: PartitionKey) -> Option<Vec<BlockId>> {
        if !self.is_partition_loaded(key) {
            return None;
        }
        let (ox, oy, oz) = key.origin();
        let mut surface = [0i32; PARTITION_EDGE * PARTITION_EDGE];
        for lz in 0..PARTITION_EDGE {
            for lx in 0..PARTITION_EDGE {
                surface[lz * PARTITION_EDGE + lx] =
                    self.surface_height(ox + lx as i32, oz + lz as i32);
            }
        }
        let mut grid = vec![AIR; PARTITION_VOLUME];
        for ly in 0..PARTITION_EDGE {
            for lz in 0..PARTITION_EDGE {
                for lx in 0..PARTITION_EDGE {
                    let (x, y, z) = (ox + lx as i32, oy + ly as i32, oz + lz as i32);
                    grid[cell_index(lx, ly, lz)] = match self.edits.get(&(x, y, z)) {
                        Some(&id) => id,
                        None => self.generated(x, y, z, surface[lz * PARTITION_EDGE + lx]),
                    };
                }
            }
        }
        Some(grid)
    }
}
