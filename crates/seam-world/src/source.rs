use seam_blocks::BlockId;

use crate::partition::PartitionKey;

/// Read access to the streamed world, one partition at a time.
pub trait WorldSource {
    fn is_partition_loaded(&self, key: PartitionKey) -> bool;

    /// Full type grid in `cell_index` order, or `None` when the partition is not
    /// available right now. Callers treat `None` as "not loaded".
    fn type_grid(&self, key: PartitionKey) -> Option<Vec<BlockId>>;
}

impl<W: WorldSource + ?Sized> WorldSource for &W {
    fn is_partition_loaded(&self, key: PartitionKey) -> bool {
        (**self).is_partition_loaded(key)
    }

    fn type_grid(&self, key: PartitionKey) -> Option<Vec<BlockId>> {
        (**self).type_grid(key)
    }
}
