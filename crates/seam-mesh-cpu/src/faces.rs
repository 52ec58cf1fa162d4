use seam_blocks::{FilterTable, Rgba};
use seam_chunk::VoxelSnapshot;
use seam_geom::Vec3;
use seam_world::PARTITION_EDGE;

use crate::face::Face;
use crate::greedy::greedy_rects;
use crate::mesh::Quad;

/// Merged quads for every exposed face pointing along `face`, layer by layer.
///
/// A cell contributes when it is highlighted and its neighbor across the face is not
/// the same color. Neighbors outside the partition count as absent.
pub fn face_quads(snapshot: &VoxelSnapshot, filter: &FilterTable, face: Face) -> Vec<Quad> {
    let n = PARTITION_EDGE;
    let (pa, ua, va) = face.axis().plane_uv();
    let (dx, dy, dz) = face.delta();
    let (ox, oy, oz) = snapshot.key().origin();
    let origin = [ox, oy, oz];
    let mut mask: Vec<Option<Rgba>> = vec![None; n * n];
    let mut quads = Vec::new();
    for layer in 0..n {
        mask.fill(None);
        let mut any = false;
        for v in 0..n {
            for u in 0..n {
                let mut c = [0usize; 3];
                c[pa] = layer;
                c[ua] = u;
                c[va] = v;
                let Some(color) = filter.color_of(snapshot.get_local(c[0], c[1], c[2])) else {
                    continue;
                };
                let neighbor = snapshot
                    .get(c[0] as i32 + dx, c[1] as i32 + dy, c[2] as i32 + dz)
                    .and_then(|id| filter.color_of(id));
                if neighbor == Some(color) {
                    continue;
                }
                mask[v * n + u] = Some(color);
                any = true;
            }
        }
        if !any {
            continue;
        }
        let plane = layer as i32 + i32::from(face.is_positive());
        greedy_rects(n, n, &mask, |u, v, w, h, color| {
            quads.push(make_quad(face, origin, plane, (u, v, w, h), color));
        });
    }
    quads
}

fn make_quad(
    face: Face,
    origin: [i32; 3],
    plane: i32,
    (u, v, w, h): (usize, usize, usize, usize),
    color: Rgba,
) -> Quad {
    debug_assert!(w > 0 && h > 0, "zero-area quad");
    let (pa, ua, va) = face.axis().plane_uv();
    let corner = |cu: usize, cv: usize| {
        let mut p = [0.0f32; 3];
        p[pa] = (origin[pa] + plane) as f32;
        p[ua] = (origin[ua] + cu as i32) as f32;
        p[va] = (origin[va] + cv as i32) as f32;
        Vec3::new(p[0], p[1], p[2])
    };
    let a = corner(u, v);
    let b = corner(u + w, v);
    let c = corner(u + w, v + h);
    let d = corner(u, v + h);
    let normal = face.normal();
    let corners = if (b - a).cross(d - a).dot(normal) >= 0.0 {
        [a, b, c, d]
    } else {
        [a, d, c, b]
    };
    Quad {
        corners,
        normal,
        color,
        face,
    }
}
