use std::time::Instant;

use seam_blocks::Rgba;
use seam_geom::Vec3;
use seam_mesh_cpu::{Line, Quad};

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CameraState {
    pub position: Vec3,
    /// View direction; need not be normalized.
    pub look: Vec3,
    /// 1.0 is the default field of view; larger values narrow it.
    pub zoom: f32,
}

impl CameraState {
    pub fn new(position: Vec3, look: Vec3) -> Self {
        Self {
            position,
            look,
            zoom: 1.0,
        }
    }
}

/// Everything the renderer needs to know about the frame being drawn.
#[derive(Clone, Copy, Debug)]
pub struct FrameContext {
    pub camera: CameraState,
    /// Monotonic frame time, compared against entry first-seen times.
    pub now: Instant,
    /// Wall-clock seconds driving the pulse animation.
    pub wall_secs: f64,
}

/// Receives the primitives of one frame. Colors already carry the animation alpha.
pub trait DrawSink {
    fn draw_quad(&mut self, quad: &Quad, color: Rgba);
    fn draw_line(&mut self, line: &Line, color: Rgba, width: f32);
}
