mod connectivity;
mod integrator;
mod render;
mod schedule;
mod state;

use eframe::egui::{Rect, Shape, Vec2};
use log::{info, warn};
use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::config::EngineConfig;
use schedule::FramePacer;
pub use schedule::{FrameHandle, FrameScheduler};
pub use state::Simulation;
use state::SurfaceSize;

/// What a frame callback ended up doing.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FrameOutcome {
    /// The handle was not the pending one (cancelled or superseded); nothing rescheduled.
    Stale,
    /// No drawable surface yet, or it has no area.
    NoSurface,
    /// Too early for the pacer; another frame was requested for later.
    Skipped,
    /// Simulation disabled, background painted.
    Static,
    Advanced,
}

/// The node-and-orbit animation mounted on one drawable surface.
///
/// The engine owns all simulation state and its display list. The host owns the
/// surface, forwards pointer positions and calls [`Engine::on_frame`] whenever a frame
/// the engine asked for comes due.
pub struct Engine {
    config: EngineConfig,
    surface: Option<Rect>,
    simulation: Simulation,
    pacer: FramePacer,
    pending: Option<FrameHandle>,
    rng: StdRng,
    shapes: Vec<Shape>,
    link_count: usize,
}

impl Engine {
    pub fn new(config: EngineConfig, target_fps: f32) -> Self {
        Self::with_rng(config, target_fps, StdRng::from_entropy())
    }

    #[cfg(test)]
    pub fn with_seed(config: EngineConfig, target_fps: f32, seed: u64) -> Self {
        Self::with_rng(config, target_fps, StdRng::seed_from_u64(seed))
    }

    fn with_rng(config: EngineConfig, target_fps: f32, rng: StdRng) -> Self {
        Self {
            config,
            surface: None,
            simulation: Simulation::empty(),
            pacer: FramePacer::new(target_fps),
            pending: None,
            rng,
            shapes: Vec::new(),
            link_count: 0,
        }
    }

    pub fn config(&self) -> EngineConfig {
        self.config
    }

    pub fn is_mounted(&self) -> bool {
        self.pending.is_some()
    }

    pub fn simulation(&self) -> &Simulation {
        &self.simulation
    }

    /// Display list of the last painted frame, in screen coordinates.
    pub fn shapes(&self) -> &[Shape] {
        &self.shapes
    }

    pub fn link_count(&self) -> usize {
        self.link_count
    }

    /// Starts the frame loop. Mounting an already mounted engine does nothing.
    pub fn mount(&mut self, scheduler: &mut impl FrameScheduler) {
        if self.is_mounted() {
            return;
        }

        info!(
            "mounting network: {} nodes, link radius {}, pointer radius {}",
            self.config.node_count, self.config.connection_distance, self.config.mouse_influence
        );
        self.pacer.reset();
        self.reinitialize();
        self.pending = Some(scheduler.request_frame(None));
    }

    /// Stops the frame loop. Any frame already handed to the host turns stale.
    pub fn unmount(&mut self, scheduler: &mut impl FrameScheduler) {
        if let Some(handle) = self.pending.take() {
            info!("unmounting network");
            scheduler.cancel(handle);
        }
    }

    /// Records the surface rectangle. A size change rebuilds the whole node set.
    pub fn resize(&mut self, surface: Rect) {
        let previous = self.surface.replace(surface);
        if previous.map(|rect| rect.size()) == Some(surface.size()) {
            return;
        }

        if !SurfaceSize::from(surface.size()).is_drawable() {
            warn!(
                "surface collapsed to {}x{}, pausing network",
                surface.width(),
                surface.height()
            );
        }
        self.reinitialize();
    }

    /// Stores the latest pointer position, relative to the surface's top-left corner.
    pub fn set_pointer(&mut self, position: Vec2) {
        self.simulation.pointer = position;
    }

    /// Runs one frame for `handle` at clock time `now` (seconds) and requests the next.
    pub fn on_frame(
        &mut self,
        handle: FrameHandle,
        now: f64,
        scheduler: &mut impl FrameScheduler,
    ) -> FrameOutcome {
        if self.pending != Some(handle) {
            return FrameOutcome::Stale;
        }

        let outcome = self.advance(now);
        let delay = (outcome == FrameOutcome::Skipped).then(|| self.pacer.remaining(now));
        self.pending = Some(scheduler.request_frame(delay));
        outcome
    }

    fn advance(&mut self, now: f64) -> FrameOutcome {
        let Some(rect) = self
            .surface
            .filter(|rect| SurfaceSize::from(rect.size()).is_drawable())
        else {
            self.shapes.clear();
            self.link_count = 0;
            return FrameOutcome::NoSurface;
        };

        if !self.pacer.ready(now) {
            return FrameOutcome::Skipped;
        }

        if self.simulation.is_empty() {
            render::render_static(&mut self.shapes, rect);
            return FrameOutcome::Static;
        }

        integrator::step(
            &mut self.simulation,
            SurfaceSize::from(rect.size()),
            self.config.mouse_influence,
            now,
            &mut self.rng,
        );
        self.link_count = connectivity::rebuild_connections(
            &mut self.simulation.nodes,
            self.config.connection_distance,
        );
        render::render_frame(
            &mut self.shapes,
            &self.simulation,
            rect,
            self.config.connection_distance,
            now,
        );

        FrameOutcome::Advanced
    }

    /// Swaps in a freshly built node set in one assignment, so no frame ever sees a
    /// partially rebuilt one.
    fn reinitialize(&mut self) {
        let Some(rect) = self.surface else {
            return;
        };

        let size = SurfaceSize::from(rect.size());
        self.simulation = Simulation::initialize(size, self.config.node_count, &mut self.rng);
        self.link_count = 0;
        if !self.simulation.is_empty() {
            info!(
                "network initialized: {} nodes on {:.0}x{:.0}",
                self.simulation.nodes.len(),
                size.width,
                size.height
            );
        }
    }
}
