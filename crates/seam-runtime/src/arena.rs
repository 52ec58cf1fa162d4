use std::error::Error;
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use seam_mesh_cpu::HighlightMesh;

/// Handle to an uploaded geometry buffer. The generation makes stale handles detectable
/// after their slot is reused.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct BufferId {
    slot: u32,
    generation: u32,
}

impl BufferId {
    #[inline]
    pub fn slot(self) -> u32 {
        self.slot
    }

    #[inline]
    pub fn generation(self) -> u32 {
        self.generation
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ReleaseError {
    /// The handle never came from this backend.
    Unknown(BufferId),
    /// The buffer was already released.
    AlreadyReleased(BufferId),
    /// The backend refused the release.
    Backend(String),
}

impl fmt::Display for ReleaseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReleaseError::Unknown(id) => write!(f, "unknown buffer {}:{}", id.slot, id.generation),
            ReleaseError::AlreadyReleased(id) => {
                write!(f, "buffer {}:{} released twice", id.slot, id.generation)
            }
            ReleaseError::Backend(msg) => write!(f, "backend release failed: {msg}"),
        }
    }
}

impl Error for ReleaseError {}

/// Where built geometry lives while it is drawable.
pub trait GeometryBackend: Send + Sync {
    fn upload(&self, mesh: &HighlightMesh) -> BufferId;
    fn release(&self, id: BufferId) -> Result<(), ReleaseError>;
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ArenaStats {
    pub live: usize,
    pub uploads: u64,
    pub releases: u64,
    pub live_bytes: usize,
}

struct PackedBuffers {
    quads: Vec<f32>,
    lines: Vec<f32>,
}

impl PackedBuffers {
    fn bytes(&self) -> usize {
        (self.quads.len() + self.lines.len()) * std::mem::size_of::<f32>()
    }
}

#[derive(Default)]
struct Slot {
    generation: u32,
    buffers: Option<PackedBuffers>,
}

#[derive(Default)]
struct ArenaInner {
    slots: Vec<Slot>,
    free: Vec<u32>,
    stats: ArenaStats,
}

/// In-process [`GeometryBackend`]: packed vertex streams stored in reusable slots.
#[derive(Default)]
pub struct BufferArena {
    inner: Mutex<ArenaInner>,
}

impl BufferArena {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, ArenaInner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn stats(&self) -> ArenaStats {
        self.lock().stats
    }

    pub fn is_live(&self, id: BufferId) -> bool {
        let inner = self.lock();
        inner
            .slots
            .get(id.slot as usize)
            .is_some_and(|s| s.generation == id.generation && s.buffers.is_some())
    }
}

impl GeometryBackend for BufferArena {
    fn upload(&self, mesh: &HighlightMesh) -> BufferId {
        let buffers = PackedBuffers {
            quads: mesh.pack_quads(),
            lines: mesh.pack_lines(),
        };
        let bytes = buffers.bytes();
        let mut inner = self.lock();
        let slot = match inner.free.pop() {
            Some(slot) => slot,
            None => {
                inner.slots.push(Slot::default());
                (inner.slots.len() - 1) as u32
            }
        };
        let s = &mut inner.slots[slot as usize];
        s.buffers = Some(buffers);
        let id = BufferId {
            slot,
            generation: s.generation,
        };
        inner.stats.live += 1;
        inner.stats.uploads += 1;
        inner.stats.live_bytes += bytes;
        id
    }

    fn release(&self, id: BufferId) -> Result<(), ReleaseError> {
        let mut inner = self.lock();
        let Some(s) = inner.slots.get_mut(id.slot as usize) else {
            return Err(ReleaseError::Unknown(id));
        };
        if s.generation != id.generation {
            return Err(ReleaseError::AlreadyReleased(id));
        }
        let Some(buffers) = s.buffers.take() else {
            return Err(ReleaseError::AlreadyReleased(id));
        };
        s.generation = s.generation.wrapping_add(1);
        inner.free.push(id.slot);
        inner.stats.live -= 1;
        inner.stats.releases += 1;
        inner.stats.live_bytes -= buffers.bytes();
        Ok(())
    }
}

/// Owns one uploaded buffer and releases it when dropped.
///
/// This is the only path that releases cache geometry. A failed release means the
/// ownership bookkeeping is broken, so it is fatal.
pub struct BufferLease {
    id: BufferId,
    backend: Arc<dyn GeometryBackend>,
}

impl BufferLease {
    pub fn upload(backend: &Arc<dyn GeometryBackend>, mesh: &HighlightMesh) -> Self {
        Self {
            id: backend.upload(mesh),
            backend: Arc::clone(backend),
        }
    }

    #[inline]
    pub fn id(&self) -> BufferId {
        self.id
    }
}

impl fmt::Debug for BufferLease {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BufferLease").field("id", &self.id).finish()
    }
}

impl Drop for BufferLease {
    fn drop(&mut self) {
        if let Err(e) = self.backend.release(self.id) {
            log::error!(target: "cache", "buffer release failed: {e}");
            if !std::thread::panicking() {
                panic!("buffer release failed: {e}");
            }
        }
    }
}
