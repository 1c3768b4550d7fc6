mod app;
mod config;
mod network;

use std::path::PathBuf;

use anyhow::{Result, anyhow};
use clap::Parser;
use log::info;

use crate::config::{Overrides, Settings};

#[derive(Debug, Parser)]
#[command(author, version, about)]
struct Args {
    /// JSON settings file; command line flags win over it.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Node count of the wide preset.
    #[arg(long)]
    nodes: Option<usize>,

    #[arg(long)]
    connection_distance: Option<f32>,

    #[arg(long)]
    mouse_influence: Option<f32>,

    /// Keep the wide preset on narrow windows.
    #[arg(long)]
    no_compact: bool,

    /// Target simulation rate.
    #[arg(long)]
    fps: Option<f32>,

    #[arg(long)]
    show_fps: bool,

    #[arg(long, default_value_t = 1280.0)]
    width: f32,

    #[arg(long, default_value_t = 800.0)]
    height: f32,
}

impl Args {
    fn overrides(&self) -> Overrides {
        Overrides {
            node_count: self.nodes,
            connection_distance: self.connection_distance,
            mouse_influence: self.mouse_influence,
            target_fps: self.fps,
            no_compact: self.no_compact,
            show_fps: self.show_fps,
        }
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    let settings = Settings::resolve(args.config.as_deref(), &args.overrides())?;
    info!(
        "starting with {} nodes (wide), compact preset {}",
        settings.wide.node_count,
        if settings.responsive { "enabled" } else { "disabled" }
    );

    let options = eframe::NativeOptions {
        viewport: eframe::egui::ViewportBuilder::default()
            .with_inner_size([args.width, args.height])
            .with_min_inner_size([320.0, 240.0]),
        ..Default::default()
    };

    eframe::run_native(
        "netfield",
        options,
        Box::new(move |cc| Ok(Box::new(app::NetfieldApp::new(cc, settings.clone())))),
    )
    .map_err(|error| anyhow!("failed to run window: {error}"))
}
