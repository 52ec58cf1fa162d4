//! Frame-budgeted selection and drawing of cached highlight geometry.
#![forbid(unsafe_code)]

pub mod frame;
pub mod modes;
pub mod renderer;

pub use frame::{CameraState, DrawSink, FrameContext};
pub use modes::{AnimationMode, DrawMode, FacingMode};
pub use renderer::{FrameStats, RenderSettings, VisibilityRenderer, animation_alpha, facing_score};
