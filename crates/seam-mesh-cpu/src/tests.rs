use super::*;
use seam_blocks::{BlockRegistry, HighlightEntry, Rgba};
use seam_geom::Vec3;
use seam_world::{PARTITION_VOLUME, PartitionKey, cell_index};

const RED: Rgba = Rgba(0xFFFF_0000);
const BLUE: Rgba = Rgba(0xFF00_00FF);

fn filter() -> FilterTable {
    let reg = BlockRegistry::from_names(&["stone", "redstone_ore", "lapis_ore", "red_sand"]);
    FilterTable::from_entries(
        &[
            HighlightEntry::new("redstone_ore", RED),
            HighlightEntry::new("lapis_ore", BLUE),
            HighlightEntry::new("red_sand", RED),
        ],
        &reg,
    )
}

fn snapshot(key: PartitionKey, cells: &[(usize, usize, usize, u16)], f: &FilterTable) -> VoxelSnapshot {
    let mut grid = vec![0u16; PARTITION_VOLUME];
    for &(x, y, z, id) in cells {
        grid[cell_index(x, y, z)] = id;
    }
    VoxelSnapshot::capture(key, &grid, f).expect("at least one filtered cell")
}

fn build(cells: &[(usize, usize, usize, u16)]) -> HighlightMesh {
    let f = filter();
    build_highlight_mesh(&snapshot(PartitionKey::default(), cells, &f), &f)
}

#[test]
fn single_voxel_is_six_quads_twelve_lines() {
    let mesh = build(&[(3, 4, 5, 2)]);
    assert_eq!(mesh.quads.len(), 6);
    assert_eq!(mesh.lines.len(), 12);
    for (q, f) in mesh.quads.iter().zip(Face::ALL) {
        assert_eq!(q.face, f);
        assert_eq!(q.normal, f.normal());
        assert_eq!(q.color, RED);
        assert_eq!(q.area(), 1.0);
    }
    assert!(mesh.lines.iter().all(|l| l.length() == 1.0 && l.color == RED));
}

#[test]
fn quads_wind_counter_clockwise_around_normal() {
    let mesh = build(&[(0, 0, 0, 2), (1, 0, 0, 3), (5, 5, 5, 2)]);
    for q in &mesh.quads {
        let [a, b, _, d] = q.corners;
        assert!((b - a).cross(d - a).dot(q.normal) > 0.0, "{q:?}");
    }
}

#[test]
fn positive_faces_sit_one_cell_out() {
    let mesh = build(&[(3, 4, 5, 2)]);
    let top = mesh.quads.iter().find(|q| q.face == Face::PosY).unwrap();
    assert!(top.corners.iter().all(|c| c.y == 5.0));
    let bottom = mesh.quads.iter().find(|q| q.face == Face::NegY).unwrap();
    assert!(bottom.corners.iter().all(|c| c.y == 4.0));
    let east = mesh.quads.iter().find(|q| q.face == Face::PosX).unwrap();
    assert!(east.corners.iter().all(|c| c.x == 4.0));
}

#[test]
fn two_adjacent_voxels_merge_faces_and_keep_seam_ring() {
    let mesh = build(&[(0, 0, 0, 2), (1, 0, 0, 2)]);
    assert_eq!(mesh.quads.len(), 6);
    let along_x: Vec<_> = mesh.lines.iter().filter(|l| l.axis == Axis::X).collect();
    assert_eq!(along_x.len(), 4);
    assert!(along_x.iter().all(|l| l.length() == 2.0));
    assert_eq!(mesh.lines.len(), 16);
}

#[test]
fn same_color_different_types_merge() {
    let mesh = build(&[(0, 0, 0, 2), (1, 0, 0, 4)]);
    assert_eq!(mesh.quads.len(), 6);
}

// A 2x3 slab of one color yields exactly one quad per exposed plane.
#[test]
fn slab_two_by_three_one_quad_per_plane() {
    let mut cells = Vec::new();
    for x in 0..2 {
        for z in 0..3 {
            cells.push((x, 7, z, 2));
        }
    }
    let mesh = build(&cells);
    assert_eq!(mesh.quads.len(), 6);
    let top = mesh.quads.iter().find(|q| q.face == Face::PosY).unwrap();
    assert_eq!(top.area(), 6.0);
}

#[test]
fn differing_colors_keep_shared_faces_and_blend_edges() {
    let mesh = build(&[(0, 0, 0, 2), (1, 0, 0, 3)]);
    assert_eq!(mesh.quads.len(), 12);
    let seam: Vec<_> = mesh
        .lines
        .iter()
        .filter(|l| l.axis != Axis::X && l.start.x == 1.0 && l.end.x == 1.0)
        .collect();
    assert_eq!(seam.len(), 4);
    assert!(seam.iter().all(|l| l.color == RED.average(BLUE)));
}

#[test]
fn solid_cube_has_no_interior_lines() {
    let mut cells = Vec::new();
    for y in 2..5 {
        for z in 2..5 {
            for x in 2..5 {
                cells.push((x, y, z, 2));
            }
        }
    }
    let mesh = build(&cells);
    assert_eq!(mesh.quads.len(), 6);
    let on_surface = |p: Vec3| [p.x, p.y, p.z].iter().any(|&c| c == 2.0 || c == 5.0);
    for l in &mesh.lines {
        let mid = (l.start + l.end) * 0.5;
        assert!(on_surface(mid), "interior line {l:?}");
    }
}

#[test]
fn partition_border_counts_as_absent_and_uses_world_coords() {
    let f = filter();
    let key = PartitionKey::new(1, 0, -1);
    let snap = snapshot(key, &[(15, 0, 0, 2)], &f);
    let mesh = build_highlight_mesh(&snap, &f);
    assert_eq!(mesh.quads.len(), 6);
    let east = mesh.quads.iter().find(|q| q.face == Face::PosX).unwrap();
    assert!(east.corners.iter().all(|c| c.x == 32.0));
    let north = mesh.quads.iter().find(|q| q.face == Face::NegZ).unwrap();
    assert!(north.corners.iter().all(|c| c.z == -16.0));
}

#[test]
fn build_is_deterministic() {
    let cells = [(0, 0, 0, 2), (1, 0, 0, 3), (1, 1, 0, 2), (4, 4, 4, 4), (4, 5, 4, 2)];
    assert_eq!(build(&cells), build(&cells));
}

#[test]
fn packed_layout_sizes_and_color_bits() {
    let mesh = build(&[(0, 0, 0, 3)]);
    let q = mesh.pack_quads();
    let l = mesh.pack_lines();
    assert_eq!(q.len(), 6 * 4 * QUAD_VERTEX_FLOATS);
    assert_eq!(l.len(), 12 * 2 * LINE_VERTEX_FLOATS);
    assert_eq!(q[3].to_bits(), BLUE.0);
    assert_eq!(l[3].to_bits(), BLUE.0);
    assert_eq!(mesh.packed_bytes(), (q.len() + l.len()) * 4);
    assert_eq!(mesh.element_count(), 18);
}
