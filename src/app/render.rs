use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use crossbeam_channel::{Receiver, Sender, select};
use seam_render::{CameraState, FrameContext, FrameStats, RenderSettings, VisibilityRenderer};
use seam_runtime::MeshCache;

use super::sink::CountingSink;

/// Messages from the tick thread to the render thread.
pub enum RenderMsg {
    Camera(CameraState),
    Settings(RenderSettings),
}

#[derive(Default)]
pub struct FrameReport {
    pub stats: FrameStats,
    pub sink: CountingSink,
}

/// Runs frames against the shared cache until `shutdown` is dropped or signalled.
pub fn spawn_render_thread(
    cache: Arc<MeshCache>,
    settings: RenderSettings,
    camera: CameraState,
    frame_interval: Duration,
    inbox: Receiver<RenderMsg>,
    shutdown: Receiver<()>,
    reports: Sender<FrameReport>,
) -> std::io::Result<JoinHandle<u64>> {
    thread::Builder::new().name("seam-render".into()).spawn(move || {
        let mut renderer = VisibilityRenderer::new(settings);
        let mut camera = camera;
        let start = Instant::now();
        let mut frames = 0u64;
        loop {
            select! {
                recv(shutdown) -> _ => break,
                default(frame_interval) => {}
            }
            for msg in inbox.try_iter() {
                match msg {
                    RenderMsg::Camera(c) => camera = c,
                    RenderMsg::Settings(s) => renderer.set_settings(s),
                }
            }
            let frame = FrameContext {
                camera,
                now: Instant::now(),
                wall_secs: start.elapsed().as_secs_f64(),
            };
            let mut sink = CountingSink::new();
            let stats = renderer.render(&cache, &frame, &mut sink);
            frames += 1;
            if reports.send(FrameReport { stats, sink }).is_err() {
                break;
            }
        }
        log::info!(target: "render", "render thread stopped after {frames} frames");
        frames
    })
}
