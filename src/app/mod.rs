mod config;
mod render;
mod sink;
mod watch;

use std::error::Error;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};

use crossbeam_channel::{Sender, unbounded};
use seam_blocks::{AIR, BlockRegistry};
use seam_geom::Vec3;
use seam_render::CameraState;
use seam_runtime::{BufferArena, GeometryBackend, Highlighter};
use seam_world::{PartitionKey, VeinWorld};

use config::AppConfig;
use render::{FrameReport, RenderMsg, spawn_render_thread};
use watch::ConfigWatcher;

/// Camera height above the surface under the walker.
const EYE_HEIGHT: f32 = 2.0;
/// Depth below the surface where the walker digs.
const DIG_DEPTH: i32 = 6;

pub struct RunOptions {
    pub config_path: Option<PathBuf>,
    pub ticks: u64,
    pub seed: i32,
    pub watch: bool,
    pub frame_interval: Duration,
}

/// Headless demo: a walker crosses a procedural ore world, digging as it goes,
/// while a second thread renders the highlight cache.
pub struct App {
    config: AppConfig,
    registry: BlockRegistry,
    world: VeinWorld,
    arena: Arc<BufferArena>,
    highlighter: Highlighter,
    watcher: Option<ConfigWatcher>,
    walker: Vec3,
    digs: u64,
}

impl App {
    pub fn new(opts: &RunOptions) -> Result<Self, Box<dyn Error>> {
        let config = match &opts.config_path {
            Some(path) => AppConfig::load_from_path(path)?,
            None => AppConfig::builtin()?,
        };
        let registry = config.registry()?;
        log::info!(target: "config", "registry has {} blocks", registry.len());
        let world = VeinWorld::new(opts.seed, config.world.clone(), &registry)?;
        let arena = Arc::new(BufferArena::new());
        let backend: Arc<dyn GeometryBackend> = arena.clone();
        let mut highlighter = Highlighter::new(backend, config.scan);
        highlighter.apply_config(&config.highlight, &registry);
        let watcher = match (&opts.config_path, opts.watch) {
            (Some(path), true) => match ConfigWatcher::spawn(path) {
                Ok(w) => Some(w),
                Err(e) => {
                    log::warn!(target: "config", "hot reload disabled: {e}");
                    None
                }
            },
            (None, true) => {
                log::warn!(target: "config", "--watch needs --config; hot reload disabled");
                None
            }
            _ => None,
        };
        let surface = world.surface_height(0, 0) as f32;
        Ok(Self {
            config,
            registry,
            world,
            arena,
            highlighter,
            watcher,
            walker: Vec3::new(0.5, surface + EYE_HEIGHT, 0.5),
            digs: 0,
        })
    }

    fn camera(&self) -> CameraState {
        CameraState::new(self.walker, Vec3::new(1.0, -0.35, 0.0))
    }

    fn reference(&self) -> PartitionKey {
        PartitionKey::containing_point(self.walker)
    }

    pub fn run(mut self, ticks: u64, frame_interval: Duration) -> Result<(), Box<dyn Error>> {
        let (msg_tx, msg_rx) = unbounded::<RenderMsg>();
        let (shutdown_tx, shutdown_rx) = unbounded::<()>();
        let (report_tx, report_rx) = unbounded::<FrameReport>();
        let render = spawn_render_thread(
            self.highlighter.cache().clone(),
            self.config.render,
            self.camera(),
            frame_interval,
            msg_rx,
            shutdown_rx,
            report_tx,
        )?;

        let tick_interval = Duration::from_millis(self.config.driver.tick_interval_ms);
        let mut last = FrameReport::default();
        let mut frames = 0u64;
        let started = Instant::now();
        for tick in 1..=ticks {
            let t0 = Instant::now();
            self.reload_if_changed(&msg_tx);
            self.step(tick);
            let _ = msg_tx.send(RenderMsg::Camera(self.camera()));
            for report in report_rx.try_iter() {
                frames += 1;
                last = report;
            }
            if tick % 100 == 0 {
                self.log_progress(tick, &last);
            }
            if let Some(rest) = tick_interval.checked_sub(t0.elapsed()) {
                std::thread::sleep(rest);
            }
        }

        drop(shutdown_tx);
        drop(msg_tx);
        match render.join() {
            Ok(n) => frames = frames.max(n),
            Err(_) => return Err("render thread panicked".into()),
        }
        let cs = self.highlighter.cache().stats();
        let arena = self.arena.stats();
        log::info!(
            target: "perf",
            "ms={} ticks={} frames={} digs={} builds={} hits={} invalidations={} evictions={} entries={} live_buffers={} live_bytes={}",
            started.elapsed().as_millis(),
            ticks,
            frames,
            self.digs,
            cs.builds,
            cs.hits,
            cs.invalidations,
            cs.evictions,
            cs.entries,
            arena.live,
            arena.live_bytes,
        );
        self.highlighter.clear();
        Ok(())
    }

    fn step(&mut self, tick: u64) {
        let driver = self.config.driver;
        self.walker.x += driver.walk_speed;
        let (wx, wz) = (self.walker.x.floor() as i32, self.walker.z.floor() as i32);
        let surface = self.world.surface_height(wx, wz);
        self.walker.y = surface as f32 + EYE_HEIGHT;
        if driver.dig_interval > 0 && tick % driver.dig_interval == 0 {
            self.dig(wx, surface - DIG_DEPTH, wz);
        }
        let reference = self.reference();
        self.world.set_loaded_center(reference);
        let report = self.highlighter.tick(&self.world, reference);
        if report.swept {
            log::debug!(target: "scan", "tick={tick} evicted={}", report.evicted);
        }
    }

    /// Clears a 3x3x3 pocket, which cuts into any vein it touches.
    fn dig(&mut self, x: i32, y: i32, z: i32) {
        for dy in -1..=1 {
            for dz in -1..=1 {
                for dx in -1..=1 {
                    self.world.set_block(x + dx, y + dy, z + dz, AIR);
                }
            }
        }
        self.digs += 1;
        log::debug!(target: "world", "dug pocket at ({x}, {y}, {z}) edits={}", self.world.edit_count());
    }

    fn reload_if_changed(&mut self, render: &Sender<RenderMsg>) {
        let Some(watcher) = &self.watcher else {
            return;
        };
        if !watcher.take_changed() {
            return;
        }
        let cfg = match AppConfig::load_from_path(watcher.path()) {
            Ok(cfg) => cfg,
            Err(e) => {
                log::warn!(target: "config", "reload of {} failed: {e}", watcher.path().display());
                return;
            }
        };
        if self.highlighter.apply_config(&cfg.highlight, &self.registry) {
            log::info!(target: "config", "highlight list changed ({} entries)", cfg.highlight.len());
        }
        if cfg.scan != self.config.scan {
            self.highlighter.apply_settings(cfg.scan);
        }
        if cfg.render != self.config.render {
            let _ = render.send(RenderMsg::Settings(cfg.render));
        }
        self.config.highlight = cfg.highlight;
        self.config.scan = cfg.scan;
        self.config.render = cfg.render;
        self.config.driver = cfg.driver;
        log::info!(target: "config", "reloaded {}; block and world tables apply on restart", watcher.path().display());
    }

    fn log_progress(&self, tick: u64, last: &FrameReport) {
        let cs = self.highlighter.cache().stats();
        log::info!(
            target: "render",
            "tick={} reference={:?} partitions={} entries={} drawn={} stale={} sink_quads={} sink_lines={} area={:.0} length={:.0} min_alpha={} budget_exhausted={}",
            tick,
            self.reference(),
            cs.partitions,
            cs.entries,
            last.stats.drawn,
            last.stats.stale,
            last.sink.quads,
            last.sink.lines,
            last.sink.area,
            last.sink.length,
            last.sink.min_alpha,
            last.stats.budget_exhausted,
        );
    }
}
