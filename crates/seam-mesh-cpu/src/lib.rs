//! CPU highlight mesher: greedy face merging and boundary edge runs.
#![forbid(unsafe_code)]

use std::time::Instant;

use rayon::prelude::*;
use seam_blocks::FilterTable;
use seam_chunk::VoxelSnapshot;

pub mod edges;
pub mod face;
pub mod faces;
pub mod greedy;
pub mod mesh;

pub use edges::edge_lines;
pub use face::{Axis, Face};
pub use faces::face_quads;
pub use greedy::greedy_rects;
pub use mesh::{HighlightMesh, LINE_VERTEX_FLOATS, Line, QUAD_VERTEX_FLOATS, Quad};

/// Builds the highlight geometry of one snapshot.
///
/// Pure and deterministic: the six face directions run in parallel but are
/// concatenated in [`Face::ALL`] order, and edge runs come out sorted by
/// axis, position and color.
pub fn build_highlight_mesh(snapshot: &VoxelSnapshot, filter: &FilterTable) -> HighlightMesh {
    let t0 = Instant::now();
    let (per_face, lines) = rayon::join(
        || {
            Face::ALL
                .par_iter()
                .map(|&f| face_quads(snapshot, filter, f))
                .collect::<Vec<_>>()
        },
        || edge_lines(snapshot, filter),
    );
    let quads: Vec<Quad> = per_face.into_iter().flatten().collect();
    debug_assert!(quads.iter().all(|q| q.area() > 0.0));
    debug_assert!(lines.iter().all(|l| l.length() > 0.0));
    let key = snapshot.key();
    log::debug!(
        target: "perf",
        "ms={} highlight_mesh key=({}, {}, {}) cells={} quads={} lines={}",
        t0.elapsed().as_millis(),
        key.px,
        key.py,
        key.pz,
        snapshot.filtered_count(),
        quads.len(),
        lines.len()
    );
    HighlightMesh { quads, lines }
}

#[cfg(test)]
mod tests;
