//! Partition addressing and the world sources the scanner reads from.
#![forbid(unsafe_code)]

pub mod partition;
pub mod source;
pub mod sparse;
pub mod vein;
pub mod veingen;

pub use partition::{PARTITION_EDGE, PARTITION_VOLUME, PartitionKey, cell_index};
pub use source::WorldSource;
pub use sparse::SparseWorld;
pub use vein::VeinWorld;
pub use veingen::{OreRule, VeinParams};
