use std::collections::VecDeque;

use eframe::egui::{self, Context, Key, Rect, Sense, Ui};
use log::debug;

use crate::config::{EngineConfig, Settings};
use crate::network::Engine;

mod overlay;
mod scheduler;
mod ui;

use scheduler::EguiScheduler;

pub struct NetfieldApp {
    settings: Settings,
    engine: Engine,
    scheduler: EguiScheduler,
    surface: Option<Rect>,
    show_controls: bool,
    draft: EngineConfig,
    show_fps: bool,
    fps_current: f32,
    fps_samples: VecDeque<f32>,
}

impl NetfieldApp {
    pub fn new(cc: &eframe::CreationContext<'_>, settings: Settings) -> Self {
        let mut scheduler = EguiScheduler::new(cc.egui_ctx.clone());
        // The surface size is unknown until the first pass, which picks the final preset.
        let config = settings.wide;
        let mut engine = Engine::new(config, settings.target_fps);
        engine.mount(&mut scheduler);

        Self {
            show_fps: settings.show_fps,
            settings,
            engine,
            scheduler,
            surface: None,
            show_controls: false,
            draft: config,
            fps_current: 0.0,
            fps_samples: VecDeque::new(),
        }
    }

    fn surface_width(&self) -> f32 {
        self.surface.map_or(f32::MAX, |rect| rect.width())
    }

    fn remount(&mut self, config: EngineConfig) {
        self.engine.unmount(&mut self.scheduler);
        self.engine = Engine::new(config, self.settings.target_fps);
        if let Some(surface) = self.surface {
            self.engine.resize(surface);
        }
        self.engine.mount(&mut self.scheduler);
        self.draft = config;
        if config.is_disabled() {
            debug!("network disabled, painting background only");
        }
    }

    fn sync_preset(&mut self, surface: Rect) {
        let wanted = self.settings.preset_for_width(surface.width());
        if wanted == self.engine.config() {
            return;
        }

        let preset = if self.settings.uses_compact(surface.width()) {
            "compact"
        } else {
            "wide"
        };
        debug!(
            "switching to {preset} preset at surface width {:.0}",
            surface.width()
        );
        self.remount(wanted);
    }

    fn handle_shortcuts(&mut self, ctx: &Context) {
        let (toggle_controls, toggle_fps) =
            ctx.input(|input| (input.key_pressed(Key::F1), input.key_pressed(Key::F2)));

        if toggle_controls {
            self.show_controls = !self.show_controls;
            self.draft = self.engine.config();
        }
        if toggle_fps {
            self.show_fps = !self.show_fps;
        }
    }

    fn draw_surface(&mut self, ui: &mut Ui) {
        let (rect, _response) = ui.allocate_exact_size(ui.available_size(), Sense::hover());
        self.surface = Some(rect);
        self.sync_preset(rect);
        self.engine.resize(rect);

        if let Some(pointer) = ui.input(|input| input.pointer.latest_pos()) {
            self.engine.set_pointer(pointer - rect.min);
        }

        let now = ui.input(|input| input.time);
        if let Some(handle) = self.scheduler.take_due() {
            self.engine.on_frame(handle, now, &mut self.scheduler);
        }

        let painter = ui.painter_at(rect);
        painter.extend(self.engine.shapes().iter().cloned());
        overlay::draw_vignette(&painter, rect);
        if let Some(status) = self.fps_display_text() {
            overlay::draw_status(&painter, rect, &status);
        }
    }
}

impl eframe::App for NetfieldApp {
    fn update(&mut self, ctx: &Context, _frame: &mut eframe::Frame) {
        self.update_fps_counter(ctx);
        self.handle_shortcuts(ctx);

        egui::CentralPanel::default()
            .frame(egui::Frame::NONE)
            .show(ctx, |ui| self.draw_surface(ui));

        if self.show_controls {
            self.draw_controls(ctx);
        }
    }
}

impl Drop for NetfieldApp {
    fn drop(&mut self) {
        self.engine.unmount(&mut self.scheduler);
    }
}
