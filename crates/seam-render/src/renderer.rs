use std::sync::Arc;
use std::time::{Duration, Instant};

use seam_geom::Vec3;
use seam_runtime::{MeshCache, MeshEntry};
use seam_world::PartitionKey;
use serde::Deserialize;

use crate::frame::{CameraState, DrawSink, FrameContext};
use crate::modes::{AnimationMode, DrawMode, FacingMode};

/// Score of partitions that must not be drawn this frame.
const EXCLUDED: f32 = -1.0;
/// Cosine bounding the strict view cone at zoom 1.
const STRICT_MIN_COS: f32 = 0.2;
const FADE_IN: Duration = Duration::from_millis(600);

#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct RenderSettings {
    /// Partitions whose center is farther than this, in cells, are not drawn.
    pub render_radius: f32,
    /// Upper bound on quads plus lines emitted per frame.
    pub max_elements: usize,
    pub line_width: f32,
    pub facing: FacingMode,
    pub animation: AnimationMode,
    pub draw_mode: DrawMode,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            render_radius: 128.0,
            max_elements: 20_000,
            line_width: 2.0,
            facing: FacingMode::Balanced,
            animation: AnimationMode::None,
            draw_mode: DrawMode::Both,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FrameStats {
    /// Cached partitions looked at.
    pub candidates: usize,
    pub out_of_range: usize,
    pub out_of_view: usize,
    /// Partitions whose geometry could not be obtained this frame.
    pub stale: usize,
    /// Partitions drawn in full.
    pub drawn: usize,
    /// Set when the budget ran out; the last partition may be partially drawn.
    pub budget_exhausted: bool,
    pub quads: usize,
    pub lines: usize,
}

impl FrameStats {
    #[inline]
    pub fn elements(&self) -> usize {
        self.quads + self.lines
    }
}

/// Ranking score of a partition centered at `center`. Negative means excluded.
pub fn facing_score(mode: FacingMode, camera: &CameraState, center: Vec3) -> f32 {
    let to_center = center - camera.position;
    let d = to_center.length();
    let look = camera.look.normalized();
    let cos = if d <= 1e-4 || look.length_sq() == 0.0 {
        1.0
    } else {
        (to_center / d).dot(look).clamp(-1.0, 1.0)
    };
    match mode {
        FacingMode::None => 1.0 / (d + 1.0),
        FacingMode::Balanced => {
            let front = (cos + 1.0) * 0.5;
            (1.0 + front * front) / (d + 1.0)
        }
        FacingMode::Strict => {
            let half_angle = STRICT_MIN_COS.acos() / camera.zoom.max(1e-3);
            if cos.acos() > half_angle {
                EXCLUDED
            } else {
                // Below zoom 1 the cone opens past 90 degrees; keep those inside it drawable.
                cos.max(0.0) / (d + 1.0)
            }
        }
    }
}

/// Alpha multiplier in `[0, 1]` for an entry first seen at `first_seen`.
pub fn animation_alpha(mode: AnimationMode, frame: &FrameContext, first_seen: Instant) -> f32 {
    match mode {
        AnimationMode::None => 1.0,
        AnimationMode::Pulse => {
            let wave = ((frame.wall_secs * 4.0).sin() * 0.5 + 0.5) as f32;
            wave * 0.4 + 0.6
        }
        AnimationMode::FadeIn => {
            let age = frame.now.saturating_duration_since(first_seen);
            (age.as_secs_f32() / FADE_IN.as_secs_f32()).clamp(0.0, 1.0)
        }
    }
}

/// Picks and draws the most relevant cached partitions each frame.
///
/// Reads the cache only through `get_or_build`; never invalidates or evicts.
#[derive(Clone, Debug, Default)]
pub struct VisibilityRenderer {
    settings: RenderSettings,
}

impl VisibilityRenderer {
    pub fn new(settings: RenderSettings) -> Self {
        Self { settings }
    }

    #[inline]
    pub fn settings(&self) -> &RenderSettings {
        &self.settings
    }

    pub fn set_settings(&mut self, settings: RenderSettings) {
        self.settings = settings;
    }

    pub fn render(&self, cache: &MeshCache, frame: &FrameContext, sink: &mut dyn DrawSink) -> FrameStats {
        let s = &self.settings;
        let mut stats = FrameStats::default();
        let mut ranked: Vec<(f32, PartitionKey, Arc<MeshEntry>)> = Vec::new();
        for key in cache.keys() {
            stats.candidates += 1;
            let center = key.center();
            if frame.camera.position.distance(center) > s.render_radius {
                stats.out_of_range += 1;
                continue;
            }
            let score = facing_score(s.facing, &frame.camera, center);
            if score < 0.0 {
                stats.out_of_view += 1;
                continue;
            }
            match cache.get_or_build(key) {
                Some(entry) => ranked.push((score, key, entry)),
                None => stats.stale += 1,
            }
        }
        ranked.sort_by(|a, b| b.0.total_cmp(&a.0).then_with(|| a.1.cmp(&b.1)));

        let (faces, lines) = (s.draw_mode.faces(), s.draw_mode.lines());
        let mut remaining = s.max_elements;
        for (_, _, entry) in &ranked {
            let mesh = &entry.mesh;
            let cost = (if faces { mesh.quads.len() } else { 0 }) + (if lines { mesh.lines.len() } else { 0 });
            if cost == 0 {
                continue;
            }
            let alpha = animation_alpha(s.animation, frame, entry.first_seen);
            let limit = cost.min(remaining);
            let mut left = limit;
            if faces {
                for q in mesh.quads.iter().take(left) {
                    sink.draw_quad(q, q.color.scale_alpha(alpha));
                }
                let n = mesh.quads.len().min(left);
                stats.quads += n;
                left -= n;
            }
            if lines {
                for l in mesh.lines.iter().take(left) {
                    sink.draw_line(l, l.color.scale_alpha(alpha), s.line_width);
                }
                let n = mesh.lines.len().min(left);
                stats.lines += n;
                left -= n;
            }
            debug_assert_eq!(left, 0);
            remaining -= limit;
            if limit < cost {
                stats.budget_exhausted = true;
                log::trace!(target: "render", "budget exhausted after {} partitions", stats.drawn);
                break;
            }
            stats.drawn += 1;
        }
        log::trace!(
            target: "render",
            "frame candidates={} drawn={} quads={} lines={} stale={}",
            stats.candidates,
            stats.drawn,
            stats.quads,
            stats.lines,
            stats.stale
        );
        stats
    }
}
