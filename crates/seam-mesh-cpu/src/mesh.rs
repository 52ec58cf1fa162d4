use seam_blocks::Rgba;
use seam_geom::Vec3;

use crate::face::{Axis, Face};

/// Floats per packed quad vertex: position, color bits, normal.
pub const QUAD_VERTEX_FLOATS: usize = 7;
/// Floats per packed line vertex: position, color bits.
pub const LINE_VERTEX_FLOATS: usize = 4;

/// One merged face rectangle in world space. Corners wind counter-clockwise when seen
/// from the side the normal points to.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Quad {
    pub corners: [Vec3; 4],
    pub normal: Vec3,
    pub color: Rgba,
    pub face: Face,
}

impl Quad {
    #[inline]
    pub fn area(&self) -> f32 {
        let e1 = self.corners[1] - self.corners[0];
        let e2 = self.corners[3] - self.corners[0];
        e1.cross(e2).length()
    }
}

/// One merged, axis-aligned edge run in world space.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Line {
    pub start: Vec3,
    pub end: Vec3,
    pub color: Rgba,
    pub axis: Axis,
}

impl Line {
    #[inline]
    pub fn length(&self) -> f32 {
        self.start.distance(self.end)
    }
}

/// Built highlight geometry for one partition.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct HighlightMesh {
    pub quads: Vec<Quad>,
    pub lines: Vec<Line>,
}

impl HighlightMesh {
    #[inline]
    pub fn element_count(&self) -> usize {
        self.quads.len() + self.lines.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.quads.is_empty() && self.lines.is_empty()
    }

    /// Interleaved quad vertices, `QUAD_VERTEX_FLOATS` per corner, 4 corners per quad.
    pub fn pack_quads(&self) -> Vec<f32> {
        let mut out = Vec::with_capacity(self.quads.len() * 4 * QUAD_VERTEX_FLOATS);
        for q in &self.quads {
            let c = q.color.to_f32_bits();
            for p in q.corners {
                out.extend_from_slice(&[p.x, p.y, p.z, c, q.normal.x, q.normal.y, q.normal.z]);
            }
        }
        out
    }

    /// Interleaved line vertices, `LINE_VERTEX_FLOATS` per endpoint.
    pub fn pack_lines(&self) -> Vec<f32> {
        let mut out = Vec::with_capacity(self.lines.len() * 2 * LINE_VERTEX_FLOATS);
        for l in &self.lines {
            let c = l.color.to_f32_bits();
            out.extend_from_slice(&[l.start.x, l.start.y, l.start.z, c]);
            out.extend_from_slice(&[l.end.x, l.end.y, l.end.z, c]);
        }
        out
    }

    /// Size in bytes of both packed vertex streams.
    #[inline]
    pub fn packed_bytes(&self) -> usize {
        let floats =
            self.quads.len() * 4 * QUAD_VERTEX_FLOATS + self.lines.len() * 2 * LINE_VERTEX_FLOATS;
        floats * std::mem::size_of::<f32>()
    }
}
