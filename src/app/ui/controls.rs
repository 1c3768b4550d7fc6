use eframe::egui::{self, Context};

use crate::config::Settings;

use super::super::NetfieldApp;

impl NetfieldApp {
    pub(in crate::app) fn draw_controls(&mut self, ctx: &Context) {
        let width = self.surface_width();
        let preset = if self.settings.uses_compact(width) {
            "compact"
        } else {
            "wide"
        };

        let mut open = self.show_controls;
        let mut apply = false;
        let mut reset = false;

        egui::Window::new("Network")
            .open(&mut open)
            .resizable(false)
            .default_width(300.0)
            .show(ctx, |ui| {
                ui.label(format!("Editing the {preset} preset. Applying restarts the animation."));
                ui.add_space(4.0);

                ui.add(
                    egui::Slider::new(&mut self.draft.node_count, 0..=400)
                        .text("Nodes")
                        .clamping(egui::SliderClamping::Always),
                )
                .on_hover_text("Simulated nodes. Zero leaves only the background.");
                ui.add(
                    egui::Slider::new(&mut self.draft.connection_distance, 0.0..=600.0)
                        .text("Link radius")
                        .clamping(egui::SliderClamping::Always),
                )
                .on_hover_text("Nodes closer than this are joined by a line.");
                ui.add(
                    egui::Slider::new(&mut self.draft.mouse_influence, 0.0..=800.0)
                        .text("Pointer radius")
                        .clamping(egui::SliderClamping::Always),
                )
                .on_hover_text("Pointer pulls nodes and spins the orbits within this distance.");

                ui.horizontal(|ui| {
                    apply = ui.button("Apply").clicked();
                    reset = ui
                        .button("Defaults")
                        .on_hover_text("Restore the built-in values for this preset.")
                        .clicked();
                });

                ui.separator();
                ui.checkbox(&mut self.show_fps, "FPS display (F2)");
            });

        self.show_controls = open;

        if reset {
            let defaults = Settings::default();
            self.draft = if self.settings.uses_compact(width) {
                defaults.compact
            } else {
                defaults.wide
            };
            apply = true;
        }

        if apply {
            let config = self.draft;
            *self.settings.preset_for_width_mut(width) = config;
            self.remount(config);
        }
    }
}
