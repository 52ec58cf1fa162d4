//! Highlight runtime: buffer arena, mesh cache, scanner and the subsystem tying them together.
#![forbid(unsafe_code)]

pub mod arena;
pub mod cache;
pub mod highlighter;
pub mod scanner;

pub use arena::{ArenaStats, BufferArena, BufferId, BufferLease, GeometryBackend, ReleaseError};
pub use cache::{MeshCache, MeshCacheStats, MeshEntry, SnapshotChange};
pub use highlighter::{Highlighter, ScanSettings, TickReport};
pub use scanner::{EVICTION_MARGIN, PartitionScanner, ScanReport, spiral_offsets};
