use seam_blocks::Rgba;
use seam_mesh_cpu::{Line, Quad};
use seam_render::DrawSink;

/// Headless sink: tallies what a frame would have drawn.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct CountingSink {
    pub quads: usize,
    pub lines: usize,
    /// Summed quad area, in square cells.
    pub area: f32,
    /// Summed line length, in cells.
    pub length: f32,
    /// Smallest alpha seen this frame; 255 when nothing was drawn.
    pub min_alpha: u8,
}

impl CountingSink {
    pub fn new() -> Self {
        Self {
            min_alpha: u8::MAX,
            ..Self::default()
        }
    }
}

impl DrawSink for CountingSink {
    fn draw_quad(&mut self, quad: &Quad, color: Rgba) {
        self.quads += 1;
        self.area += quad.area();
        self.min_alpha = self.min_alpha.min(color.a());
    }

    fn draw_line(&mut self, line: &Line, color: Rgba, _width: f32) {
        self.lines += 1;
        self.length += line.length();
        self.min_alpha = self.min_alpha.min(color.a());
    }
}
