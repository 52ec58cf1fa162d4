use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use seam_blocks::{BlockRegistry, HighlightEntry, Rgba};
use seam_runtime::{BufferArena, Highlighter, ScanSettings};
use seam_world::{PartitionKey, SparseWorld};

const STONE: u16 = 1;
const DIAMOND: u16 = 2;
const GOLD: u16 = 3;

fn registry() -> BlockRegistry {
    BlockRegistry::from_names(&["stone", "diamond_ore", "gold_ore"])
}

fn entries() -> Vec<HighlightEntry> {
    vec![
        HighlightEntry::new("diamond_ore", Rgba(0xFF00_FFFF)),
        HighlightEntry::new("gold_ore", Rgba(0xFFFF_D700)),
    ]
}

fn world() -> SparseWorld {
    let mut w = SparseWorld::new();
    w.fill((-20, -20, -20), (20, -1, 20), STONE);
    w.fill((1, -3, 1), (3, -2, 2), DIAMOND);
    w.set_block(-17, 5, 9, GOLD);
    w.set_block(60, -18, -18, DIAMOND);
    w
}

fn highlighter(radius: i32) -> (Arc<BufferArena>, Highlighter) {
    let arena = Arc::new(BufferArena::new());
    let settings = ScanSettings {
        scan_radius: radius,
        scan_quota: 16,
        sweep_interval: 100,
    };
    let mut h = Highlighter::new(arena.clone(), settings);
    assert!(h.apply_config(&entries(), &registry()));
    (arena, h)
}

fn full_pass(h: &mut Highlighter, w: &SparseWorld, reference: PartitionKey) {
    let visits = (2 * h.settings().scan_radius as usize + 1).pow(3);
    for _ in 0..visits.div_ceil(h.settings().scan_quota) {
        h.tick(w, reference);
    }
}

fn packed(h: &Highlighter) -> Vec<(PartitionKey, Vec<f32>, Vec<f32>)> {
    let mut keys = h.cache().keys();
    keys.sort();
    keys.into_iter()
        .map(|k| {
            let e = h.cache().get_or_build(k).unwrap();
            (k, e.mesh.pack_quads(), e.mesh.pack_lines())
        })
        .collect()
}

#[test]
fn only_partitions_with_highlighted_cells_are_cached() {
    let w = world();
    let (_, mut h) = highlighter(2);
    full_pass(&mut h, &w, PartitionKey::default());
    let mut keys = h.cache().keys();
    keys.sort();
    assert_eq!(keys, vec![PartitionKey::new(0, -1, 0), PartitionKey::new(-2, 0, 0)]);
}

// Disabling then re-enabling reproduces byte-identical geometry.
#[test]
fn restart_reproduces_identical_meshes() {
    let w = world();
    let (arena, mut h) = highlighter(2);
    full_pass(&mut h, &w, PartitionKey::default());
    let first = packed(&h);
    assert!(!first.is_empty());

    h.set_enabled(false);
    assert!(h.cache().is_empty());
    assert_eq!(arena.stats().live, 0);
    assert_eq!(h.tick(&w, PartitionKey::default()).scan.visited, 0);

    h.set_enabled(true);
    full_pass(&mut h, &w, PartitionKey::default());
    let second = packed(&h);
    let bits = |v: &Vec<(PartitionKey, Vec<f32>, Vec<f32>)>| {
        v.iter()
            .map(|(k, q, l)| {
                let q: Vec<u32> = q.iter().map(|f| f.to_bits()).collect();
                let l: Vec<u32> = l.iter().map(|f| f.to_bits()).collect();
                (*k, q, l)
            })
            .collect::<Vec<_>>()
    };
    assert_eq!(bits(&first), bits(&second));
}

#[test]
fn edits_invalidate_and_keep_first_seen() {
    let mut w = world();
    let (_, mut h) = highlighter(1);
    let key = PartitionKey::new(0, -1, 0);
    full_pass(&mut h, &w, PartitionKey::default());
    let before = h.cache().get_or_build(key).unwrap();

    w.set_block(1, -3, 1, STONE);
    full_pass(&mut h, &w, PartitionKey::default());
    assert!(h.cache().entry(key).is_none());
    let after = h.cache().get_or_build(key).unwrap();
    assert_ne!(before.mesh, after.mesh);
    assert_eq!(before.first_seen, after.first_seen);

    w.fill((1, -3, 1), (3, -2, 2), STONE);
    full_pass(&mut h, &w, PartitionKey::default());
    assert!(h.cache().snapshot(key).is_none());
}

#[test]
fn unloaded_partitions_are_retried() {
    let mut w = world();
    let key = PartitionKey::new(0, -1, 0);
    w.set_loaded(key, false);
    let (_, mut h) = highlighter(1);
    full_pass(&mut h, &w, PartitionKey::default());
    assert!(h.cache().snapshot(key).is_none());
    w.set_loaded(key, true);
    full_pass(&mut h, &w, PartitionKey::default());
    assert!(h.cache().snapshot(key).is_some());
}

#[test]
fn sweep_evicts_beyond_radius_plus_margin() {
    let w = world();
    let (arena, mut h) = highlighter(1);
    full_pass(&mut h, &w, PartitionKey::default());
    assert!(h.cache().get_or_build(PartitionKey::new(0, -1, 0)).is_some());

    // Three partitions away is still inside radius + margin.
    let near = PartitionKey::new(3, 0, 0);
    while h.ticks() % 100 != 99 {
        h.tick(&w, near);
    }
    assert!(h.tick(&w, near).swept);
    assert!(h.cache().snapshot(PartitionKey::new(0, -1, 0)).is_some());

    let far = PartitionKey::new(40, 0, 0);
    while h.ticks() % 100 != 99 {
        h.tick(&w, far);
    }
    let report = h.tick(&w, far);
    assert!(report.swept);
    assert!(report.evicted >= 1);
    assert!(h.cache().is_empty());
    assert_eq!(arena.stats().live, 0);
}

#[test]
fn config_change_clears_and_same_config_is_ignored() {
    let w = world();
    let (_, mut h) = highlighter(2);
    full_pass(&mut h, &w, PartitionKey::default());
    assert!(!h.apply_config(&entries(), &registry()));
    assert_eq!(h.cache().len(), 2);

    let gold_only = vec![HighlightEntry::new("gold_ore", Rgba(0xFFFF_D700))];
    assert!(h.apply_config(&gold_only, &registry()));
    assert!(h.cache().is_empty());
    full_pass(&mut h, &w, PartitionKey::default());
    assert_eq!(h.cache().keys(), vec![PartitionKey::new(-2, 0, 0)]);
}

#[test]
fn empty_filter_scans_nothing() {
    let w = world();
    let arena = Arc::new(BufferArena::new());
    let mut h = Highlighter::new(arena, ScanSettings::default());
    assert_eq!(h.tick(&w, PartitionKey::default()).scan.visited, 0);
}

#[test]
fn readers_race_the_scanner_safely() {
    let mut w = world();
    let (arena, mut h) = highlighter(1);
    let cache = Arc::clone(h.cache());
    let stop = AtomicBool::new(false);
    std::thread::scope(|s| {
        s.spawn(|| {
            while !stop.load(Ordering::Relaxed) {
                for k in cache.keys() {
                    if let Some(e) = cache.get_or_build(k) {
                        assert!(!e.mesh.is_empty());
                    }
                }
            }
        });
        for i in 0..200 {
            let id = if i % 2 == 0 { DIAMOND } else { GOLD };
            w.set_block(2, -2, 2, id);
            h.tick(&w, PartitionKey::default());
        }
        stop.store(true, Ordering::Relaxed);
    });
    let stats = h.cache().stats();
    assert_eq!(arena.stats().live, stats.entries);
}

#[test]
fn scan_settings_from_toml() {
    let s: ScanSettings = toml::from_str("scan_radius = 4\n").unwrap();
    assert_eq!(s.scan_radius, 4);
    assert_eq!(s.scan_quota, 16);
    assert_eq!(s.sweep_interval, 100);
}
