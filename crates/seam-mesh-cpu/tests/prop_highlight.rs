use std::collections::HashMap;

use proptest::prelude::*;
use seam_blocks::{BlockRegistry, FilterTable, HighlightEntry, Rgba};
use seam_chunk::VoxelSnapshot;
use seam_mesh_cpu::{Axis, Face, build_highlight_mesh};
use seam_world::{PARTITION_EDGE, PARTITION_VOLUME, PartitionKey, cell_index};

fn filter() -> FilterTable {
    let reg = BlockRegistry::from_names(&["stone", "redstone_ore", "lapis_ore", "red_sand"]);
    FilterTable::from_entries(
        &[
            HighlightEntry::new("redstone_ore", Rgba(0xFFFF_0000)),
            HighlightEntry::new("lapis_ore", Rgba(0xFF00_00FF)),
            HighlightEntry::new("red_sand", Rgba(0xFFFF_0000)),
        ],
        &reg,
    )
}

/// A cluster of cells near the origin or pushed against the far corner.
fn arb_snapshot() -> impl Strategy<Value = (PartitionKey, Vec<u16>)> {
    (
        (-3i32..3, -3i32..3, -3i32..3),
        any::<bool>(),
        prop::collection::vec((0usize..6, 0usize..6, 0usize..6, 0u16..=4), 1..120),
    )
        .prop_map(|((px, py, pz), far, cells)| {
            let shift = if far { PARTITION_EDGE - 6 } else { 0 };
            let mut grid = vec![0u16; PARTITION_VOLUME];
            for (x, y, z, id) in cells {
                grid[cell_index(x + shift, y + shift, z + shift)] = id;
            }
            // Guarantee at least one highlighted cell.
            grid[cell_index(shift, shift, shift)] = 2;
            (PartitionKey::new(px, py, pz), grid)
        })
}

fn color_at(snap: &VoxelSnapshot, f: &FilterTable, x: i32, y: i32, z: i32) -> Option<Rgba> {
    snap.get(x, y, z).and_then(|id| f.color_of(id))
}

fn local(snap: &VoxelSnapshot, v: f32, comp: usize) -> i32 {
    let (ox, oy, oz) = snap.key().origin();
    v as i32 - [ox, oy, oz][comp]
}

proptest! {
    // Every exposed unit face is covered by exactly one quad of the right color, and
    // no quad covers anything else.
    #[test]
    fn quads_cover_exposed_faces_exactly_once((key, grid) in arb_snapshot()) {
        let f = filter();
        let snap = VoxelSnapshot::capture(key, &grid, &f).unwrap();
        let mesh = build_highlight_mesh(&snap, &f);

        let mut expected: HashMap<(usize, i32, i32, i32), Rgba> = HashMap::new();
        for (x, y, z, id) in snap.filtered_cells() {
            let c = f.color_of(id).unwrap();
            for face in Face::ALL {
                let (dx, dy, dz) = face.delta();
                let (x, y, z) = (x as i32, y as i32, z as i32);
                if color_at(&snap, &f, x + dx, y + dy, z + dz) != Some(c) {
                    expected.insert((face.index(), x, y, z), c);
                }
            }
        }

        let mut covered: HashMap<(usize, i32, i32, i32), Rgba> = HashMap::new();
        for q in &mesh.quads {
            let (pa, ua, va) = q.face.axis().plane_uv();
            let comps = |p: seam_geom::Vec3| [p.x, p.y, p.z];
            let plane = local(&snap, comps(q.corners[0])[pa], pa);
            let layer = plane - i32::from(q.face.is_positive());
            let us: Vec<i32> = q.corners.iter().map(|c| local(&snap, comps(*c)[ua], ua)).collect();
            let vs: Vec<i32> = q.corners.iter().map(|c| local(&snap, comps(*c)[va], va)).collect();
            let (u0, u1) = (*us.iter().min().unwrap(), *us.iter().max().unwrap());
            let (v0, v1) = (*vs.iter().min().unwrap(), *vs.iter().max().unwrap());
            prop_assert!(u1 > u0 && v1 > v0);
            for u in u0..u1 {
                for v in v0..v1 {
                    let mut cell = [0i32; 3];
                    cell[pa] = layer;
                    cell[ua] = u;
                    cell[va] = v;
                    let k = (q.face.index(), cell[0], cell[1], cell[2]);
                    prop_assert!(covered.insert(k, q.color).is_none(), "overlap at {:?}", k);
                }
            }
        }
        prop_assert_eq!(covered, expected);
    }

    // The union of all line runs is exactly the set of boundary unit edges, with no
    // unit edge drawn twice.
    #[test]
    fn lines_cover_boundary_edges_exactly_once((key, grid) in arb_snapshot()) {
        let f = filter();
        let snap = VoxelSnapshot::capture(key, &grid, &f).unwrap();
        let mesh = build_highlight_mesh(&snap, &f);

        let mut expected = std::collections::HashSet::new();
        for (x, y, z, id) in snap.filtered_cells() {
            let c = Some(f.color_of(id).unwrap());
            let (x, y, z) = (x as i32, y as i32, z as i32);
            for axis in Axis::ALL {
                // The two axes perpendicular to `axis`, each with offset 0 or 1.
                let others: Vec<usize> = (0..3).filter(|&i| i != axis.index()).collect();
                for oa in 0..2 {
                    for ob in 0..2 {
                        let mut start = [x, y, z];
                        start[others[0]] += oa;
                        start[others[1]] += ob;
                        let mut n1 = [x, y, z];
                        n1[others[0]] += if oa == 1 { 1 } else { -1 };
                        let mut n2 = [x, y, z];
                        n2[others[1]] += if ob == 1 { 1 } else { -1 };
                        let c1 = color_at(&snap, &f, n1[0], n1[1], n1[2]);
                        let c2 = color_at(&snap, &f, n2[0], n2[1], n2[2]);
                        if c1 != c || c2 != c {
                            expected.insert((axis.index(), start[0], start[1], start[2]));
                        }
                    }
                }
            }
        }

        let mut covered = std::collections::HashSet::new();
        for l in &mesh.lines {
            let a = l.axis.index();
            let s = [local(&snap, l.start.x, 0), local(&snap, l.start.y, 1), local(&snap, l.start.z, 2)];
            let e = [local(&snap, l.end.x, 0), local(&snap, l.end.y, 1), local(&snap, l.end.z, 2)];
            prop_assert!(e[a] > s[a]);
            for t in s[a]..e[a] {
                let mut p = s;
                p[a] = t;
                prop_assert!(covered.insert((a, p[0], p[1], p[2])), "edge drawn twice");
            }
        }
        prop_assert_eq!(covered, expected);
    }

    #[test]
    fn rebuild_is_identical((key, grid) in arb_snapshot()) {
        let f = filter();
        let snap = VoxelSnapshot::capture(key, &grid, &f).unwrap();
        prop_assert_eq!(build_highlight_mesh(&snap, &f), build_highlight_mesh(&snap, &f));
    }
}
