use std::fs;
use std::path::Path;

use anyhow::{Context, Result, anyhow};
use log::debug;
use serde::{Deserialize, Serialize};

/// Mount-time options of the network engine.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EngineConfig {
    /// Number of simulated nodes. Zero leaves only the background fill.
    pub node_count: usize,
    /// Two nodes closer than this are linked.
    pub connection_distance: f32,
    /// Radius within which the pointer attracts nodes and spins the orbits.
    pub mouse_influence: f32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            node_count: 80,
            connection_distance: 120.0,
            mouse_influence: 150.0,
        }
    }
}

impl EngineConfig {
    pub const DISABLED: Self = Self {
        node_count: 0,
        connection_distance: 0.0,
        mouse_influence: 0.0,
    };

    /// Dense preset used on wide surfaces.
    pub fn wide() -> Self {
        Self {
            node_count: 140,
            connection_distance: 400.0,
            mouse_influence: 500.0,
        }
    }

    pub fn is_disabled(&self) -> bool {
        self.node_count == 0
    }

    fn validate(&self, preset: &str) -> Result<()> {
        if !self.connection_distance.is_finite() || self.connection_distance < 0.0 {
            return Err(anyhow!(
                "{preset}.connection_distance must be a non-negative number, got {}",
                self.connection_distance
            ));
        }
        if !self.mouse_influence.is_finite() || self.mouse_influence < 0.0 {
            return Err(anyhow!(
                "{preset}.mouse_influence must be a non-negative number, got {}",
                self.mouse_influence
            ));
        }
        Ok(())
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    pub wide: EngineConfig,
    pub compact: EngineConfig,
    /// Surfaces narrower than this use the compact preset.
    pub compact_breakpoint: f32,
    pub responsive: bool,
    pub target_fps: f32,
    pub show_fps: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            wide: EngineConfig::wide(),
            compact: EngineConfig::DISABLED,
            compact_breakpoint: 768.0,
            responsive: true,
            target_fps: 60.0,
            show_fps: false,
        }
    }
}

/// Command line values that win over the settings file.
#[derive(Clone, Debug, Default)]
pub struct Overrides {
    pub node_count: Option<usize>,
    pub connection_distance: Option<f32>,
    pub mouse_influence: Option<f32>,
    pub target_fps: Option<f32>,
    pub no_compact: bool,
    pub show_fps: bool,
}

impl Settings {
    pub fn load(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("failed to read settings from {}", path.display()))?;
        Self::from_json(&raw).with_context(|| format!("invalid settings in {}", path.display()))
    }

    pub fn from_json(raw: &str) -> Result<Self> {
        let settings: Self = serde_json::from_str(raw).context("invalid settings JSON")?;
        settings.validate()?;
        Ok(settings)
    }

    /// Defaults, then the optional settings file, then command line overrides.
    pub fn resolve(path: Option<&Path>, overrides: &Overrides) -> Result<Self> {
        let base = match path {
            Some(path) => Self::load(path)?,
            None => Self::default(),
        };
        let settings = base.with_overrides(overrides);
        settings.validate()?;
        debug!("resolved settings: {settings:?}");
        Ok(settings)
    }

    pub fn with_overrides(mut self, overrides: &Overrides) -> Self {
        if let Some(node_count) = overrides.node_count {
            self.wide.node_count = node_count;
        }
        if let Some(connection_distance) = overrides.connection_distance {
            self.wide.connection_distance = connection_distance;
        }
        if let Some(mouse_influence) = overrides.mouse_influence {
            self.wide.mouse_influence = mouse_influence;
        }
        if let Some(target_fps) = overrides.target_fps {
            self.target_fps = target_fps;
        }
        if overrides.no_compact {
            self.responsive = false;
        }
        self.show_fps |= overrides.show_fps;
        self
    }

    pub fn validate(&self) -> Result<()> {
        self.wide.validate("wide")?;
        self.compact.validate("compact")?;
        if !self.target_fps.is_finite() || self.target_fps <= 0.0 {
            return Err(anyhow!(
                "target_fps must be positive, got {}",
                self.target_fps
            ));
        }
        if !self.compact_breakpoint.is_finite() || self.compact_breakpoint < 0.0 {
            return Err(anyhow!(
                "compact_breakpoint must be a non-negative number, got {}",
                self.compact_breakpoint
            ));
        }
        Ok(())
    }

    pub fn uses_compact(&self, surface_width: f32) -> bool {
        self.responsive && surface_width < self.compact_breakpoint
    }

    pub fn preset_for_width(&self, surface_width: f32) -> EngineConfig {
        if self.uses_compact(surface_width) {
            self.compact
        } else {
            self.wide
        }
    }

    pub fn preset_for_width_mut(&mut self, surface_width: f32) -> &mut EngineConfig {
        if self.uses_compact(surface_width) {
            &mut self.compact
        } else {
            &mut self.wide
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_json_gives_defaults() {
        let settings = Settings::from_json("{}").expect("valid settings");
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn partial_preset_keeps_other_defaults() {
        let settings = Settings::from_json(r#"{ "wide": { "node_count": 60 }, "show_fps": true }"#)
            .expect("valid settings");

        assert_eq!(settings.wide.node_count, 60);
        assert_eq!(
            settings.wide.connection_distance,
            EngineConfig::default().connection_distance
        );
        assert!(settings.show_fps);
        assert_eq!(settings.compact, EngineConfig::DISABLED);
    }

    #[test]
    fn unknown_fields_are_rejected() {
        let error = Settings::from_json(r#"{ "wide": { "nodes": 60 } }"#).unwrap_err();
        assert!(format!("{error:#}").contains("nodes"));
    }

    #[test]
    fn negative_radius_is_rejected() {
        let error =
            Settings::from_json(r#"{ "compact": { "mouse_influence": -1.0 } }"#).unwrap_err();
        assert!(error.to_string().contains("compact.mouse_influence"));
    }

    #[test]
    fn zero_frame_rate_is_rejected() {
        let overrides = Overrides {
            target_fps: Some(0.0),
            ..Overrides::default()
        };
        assert!(Settings::resolve(None, &overrides).is_err());
    }

    #[test]
    fn overrides_apply_to_wide_preset() {
        let overrides = Overrides {
            node_count: Some(12),
            mouse_influence: Some(90.0),
            no_compact: true,
            ..Overrides::default()
        };
        let settings = Settings::default().with_overrides(&overrides);

        assert_eq!(settings.wide.node_count, 12);
        assert_eq!(settings.wide.mouse_influence, 90.0);
        assert_eq!(settings.wide.connection_distance, 400.0);
        assert!(!settings.responsive);
    }

    #[test]
    fn narrow_surfaces_use_compact_preset() {
        let mut settings = Settings::default();
        assert!(settings.preset_for_width(500.0).is_disabled());
        assert_eq!(settings.preset_for_width(768.0), EngineConfig::wide());

        settings.responsive = false;
        assert_eq!(settings.preset_for_width(500.0), EngineConfig::wide());
    }

    #[test]
    fn missing_file_reports_path() {
        let error = Settings::load(Path::new("/nonexistent/netfield.json")).unwrap_err();
        assert!(error.to_string().contains("/nonexistent/netfield.json"));
    }
}
