//! Runtime configuration loaded from `assets/cleaning.toml`.
//!
//! [`CleaningConfig`] is a Bevy [`Resource`] that mirrors the defaults in
//! [`crate::constants`].  Before the app is built, [`load_cleaning_config`]
//! reads `assets/cleaning.toml` and overwrites the defaults with any values
//! present in the file.  Missing keys fall back to the compile-time defaults, so a
//! minimal TOML can override just the values you care about:
//!
//! ```toml
//! completion_threshold = 0.9
//!
//! [tools.scrub]
//! radius = 40.0
//!
//! [tools.hose]
//! mode = "stream"
//! ```
//!
//! Keep `src/constants.rs` in sync: it remains the **authoritative default**
//! source used by `CleaningConfig::default()`.

use crate::constants::*;
use crate::error::{
    validate_bounds, validate_cell_size, validate_probability, validate_reach, validate_threshold,
    SimError, SimResult,
};
use crate::object::cleaning_object;
use bevy::prelude::*;
use serde::Deserialize;
use std::path::Path;

pub const CONFIG_PATH: &str = "assets/cleaning.toml";

/// How the hose interacts with the dirt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HoseMode {
    /// Static spray sector from the nozzle towards the pointer.
    #[default]
    Cone,
    /// Sampled jet path from the nozzle to the pointer.
    Stream,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ScrubToolConfig {
    pub radius: f32,
    pub loosen_chance: f32,
    pub base_kick: f32,
}

impl Default for ScrubToolConfig {
    fn default() -> Self {
        Self {
            radius: SCRUB_RADIUS,
            loosen_chance: SCRUB_LOOSEN_CHANCE,
            base_kick: SCRUB_BASE_KICK,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct HoseToolConfig {
    pub mode: HoseMode,
    /// Half-angle of the cone, degrees.
    pub angle_deg: f32,
    pub range: f32,
    pub force: f32,
    pub loosen_chance: f32,
    pub stream_samples: usize,
    pub stream_width: f32,
}

impl Default for HoseToolConfig {
    fn default() -> Self {
        Self {
            mode: HoseMode::Cone,
            angle_deg: HOSE_ANGLE_DEG,
            range: HOSE_RANGE,
            force: HOSE_FORCE,
            loosen_chance: HOSE_LOOSEN_CHANCE,
            stream_samples: HOSE_STREAM_SAMPLES,
            stream_width: HOSE_STREAM_WIDTH,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(default)]
pub struct ToolsConfig {
    pub scrub: ScrubToolConfig,
    pub hose: HoseToolConfig,
}

/// Runtime-tunable level, pool and tool configuration.
///
/// All fields default to the corresponding compile-time constant from
/// `src/constants.rs`.  Override any subset in `assets/cleaning.toml`.
#[derive(Resource, Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct CleaningConfig {
    // ── World Bounds ─────────────────────────────────────────────────────────
    pub world_width: f32,
    pub world_height: f32,
    /// Preset from the object catalog; `None` sizes the object by
    /// `object_fraction` of the world instead.
    pub object_id: Option<String>,
    pub object_fraction: f32,
    pub nozzle_bottom_offset: f32,

    // ── Dirt ─────────────────────────────────────────────────────────────────
    pub pool_capacity: usize,
    /// Multiplier on the base spawn density.
    pub density_scale: f32,

    // ── Grids ────────────────────────────────────────────────────────────────
    pub spatial_cell_size: f32,
    pub coverage_cell_size: f32,

    // ── Progress ─────────────────────────────────────────────────────────────
    pub completion_threshold: f32,

    // ── Tools ────────────────────────────────────────────────────────────────
    pub tools: ToolsConfig,
}

impl Default for CleaningConfig {
    fn default() -> Self {
        Self {
            world_width: WORLD_WIDTH,
            world_height: WORLD_HEIGHT,
            object_id: None,
            object_fraction: OBJECT_FRACTION,
            nozzle_bottom_offset: NOZZLE_BOTTOM_OFFSET,
            pool_capacity: POOL_CAPACITY,
            density_scale: 1.0,
            spatial_cell_size: SPATIAL_CELL_SIZE,
            coverage_cell_size: COVERAGE_CELL_SIZE,
            completion_threshold: COMPLETION_THRESHOLD,
            tools: ToolsConfig::default(),
        }
    }
}

impl CleaningConfig {
    /// Parse and validate a TOML document.
    pub fn from_toml_str(contents: &str) -> SimResult<Self> {
        let config: CleaningConfig = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values that would make the level unplayable or divide by zero.
    pub fn validate(&self) -> SimResult<()> {
        validate_bounds(self.world_width, self.world_height)?;
        validate_cell_size("SPATIAL_CELL_SIZE", self.spatial_cell_size)?;
        validate_cell_size("COVERAGE_CELL_SIZE", self.coverage_cell_size)?;
        validate_threshold(self.completion_threshold)?;
        validate_probability("SCRUB_LOOSEN_CHANCE", self.tools.scrub.loosen_chance)?;
        validate_probability("HOSE_LOOSEN_CHANCE", self.tools.hose.loosen_chance)?;
        validate_probability("OBJECT_FRACTION", self.object_fraction)?;
        validate_reach("SCRUB_RADIUS", self.tools.scrub.radius)?;
        validate_reach("HOSE_RANGE", self.tools.hose.range)?;
        validate_reach("HOSE_STREAM_WIDTH", self.tools.hose.stream_width)?;
        if self.pool_capacity == 0 {
            return Err(SimError::ZeroCapacity);
        }
        if !(0.0..90.0).contains(&self.tools.hose.angle_deg) {
            return Err(SimError::UnsafeConstant {
                name: "HOSE_ANGLE_DEG",
                value: self.tools.hose.angle_deg,
                safe_range: "[0.0, 90.0)",
            });
        }
        Ok(())
    }

    pub fn world_diagonal(&self) -> f32 {
        Vec2::new(self.world_width, self.world_height).length()
    }

    /// Cap every tool reach at the world diagonal.
    ///
    /// Nothing in the world lies farther away than that, so the cap never
    /// changes which particles a tool touches; it only bounds how many grid
    /// cells a query sweeps.
    pub fn clamp_tool_reach(&mut self) {
        let diagonal = self.world_diagonal();
        let scrub = &mut self.tools.scrub;
        let hose = &mut self.tools.hose;
        for (name, reach) in [
            ("scrub radius", &mut scrub.radius),
            ("hose range", &mut hose.range),
            ("hose stream width", &mut hose.stream_width),
        ] {
            if *reach > diagonal {
                debug!("{name} {reach} capped to world diagonal {diagonal:.1}");
                *reach = diagonal;
            }
        }
    }

    /// Window size matching the world, one world unit per logical pixel.
    pub fn window_resolution(&self) -> (u32, u32) {
        (
            self.world_width.round() as u32,
            self.world_height.round() as u32,
        )
    }

    /// Object `(width, height)` in world units, never larger than the world.
    pub fn object_dimensions(&self) -> (f32, f32) {
        let preset = self.object_id.as_deref().and_then(cleaning_object);
        let (w, h) = match preset {
            Some(object) => object.dimensions_for_screen(self.world_width),
            None => (
                self.world_width * self.object_fraction,
                self.world_height * self.object_fraction,
            ),
        };
        // Shrink uniformly so presets keep their aspect ratio.
        let fit = (self.world_width / w).min(self.world_height / h).min(1.0);
        (w * fit, h * fit)
    }
}

/// Read the TOML at `path` and overlay it on the compiled defaults.
///
/// Missing keys retain their compiled defaults.  Parse and validation errors
/// are logged and the defaults are returned.  A missing file is not an error.
/// Runs before the app is built so the window can be sized from the result.
pub fn load_cleaning_config(path: impl AsRef<Path>) -> CleaningConfig {
    let path = path.as_ref();
    match std::fs::read_to_string(path) {
        Ok(contents) => match CleaningConfig::from_toml_str(&contents) {
            Ok(loaded) => {
                info!("✓ Loaded cleaning config from {}", path.display());
                loaded
            }
            Err(e) => {
                warn!("⚠ Rejected {}: {e}; using defaults", path.display());
                CleaningConfig::default()
            }
        },
        Err(_) => {
            info!("ℹ No {} found; using compiled defaults", path.display());
            CleaningConfig::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        assert!(CleaningConfig::default().validate().is_ok());
    }

    #[test]
    fn partial_toml_overrides_only_given_keys() {
        let config = CleaningConfig::from_toml_str(
            r#"
            completion_threshold = 0.9

            [tools.scrub]
            radius = 40.0

            [tools.hose]
            mode = "stream"
            "#,
        )
        .unwrap();
        assert_eq!(config.completion_threshold, 0.9);
        assert_eq!(config.tools.scrub.radius, 40.0);
        assert_eq!(config.tools.scrub.loosen_chance, SCRUB_LOOSEN_CHANCE);
        assert_eq!(config.tools.hose.mode, HoseMode::Stream);
        assert_eq!(config.pool_capacity, POOL_CAPACITY);
    }

    #[test]
    fn invalid_values_are_rejected() {
        let err = CleaningConfig::from_toml_str("spatial_cell_size = 0.0").unwrap_err();
        assert!(matches!(
            err,
            SimError::UnsafeConstant {
                name: "SPATIAL_CELL_SIZE",
                ..
            }
        ));
        assert_eq!(
            CleaningConfig::from_toml_str("pool_capacity = 0").unwrap_err(),
            SimError::ZeroCapacity
        );
    }

    #[test]
    fn malformed_toml_is_a_parse_error() {
        let err = CleaningConfig::from_toml_str("completion_threshold = [").unwrap_err();
        assert!(matches!(err, SimError::ConfigParse { .. }));
    }

    #[test]
    fn fraction_sizing_matches_quarter_world() {
        let config = CleaningConfig::default();
        assert_eq!(config.object_dimensions(), (300.0, 200.0));
    }

    #[test]
    fn preset_is_shrunk_to_fit_world() {
        let config = CleaningConfig {
            object_id: Some("vintage_photo".into()),
            ..Default::default()
        };
        let (w, h) = config.object_dimensions();
        assert!(w <= config.world_width && h <= config.world_height);
        assert!((w / h - 1.4).abs() < 1e-4);
    }

    #[test]
    fn unbounded_tool_reach_is_rejected() {
        let err = CleaningConfig::from_toml_str("[tools.hose]\nrange = inf").unwrap_err();
        assert!(matches!(err, SimError::UnsafeConstant { name: "HOSE_RANGE", .. }));
        let err = CleaningConfig::from_toml_str("[tools.scrub]\nradius = -5.0").unwrap_err();
        assert!(matches!(err, SimError::UnsafeConstant { name: "SCRUB_RADIUS", .. }));
        let err = CleaningConfig::from_toml_str("[tools.hose]\nstream_width = nan").unwrap_err();
        assert!(matches!(err, SimError::UnsafeConstant { name: "HOSE_STREAM_WIDTH", .. }));
    }

    #[test]
    fn huge_reach_is_capped_at_world_diagonal() {
        let mut config = CleaningConfig::from_toml_str("[tools.hose]\nrange = 1e6").unwrap();
        config.clamp_tool_reach();
        assert_eq!(config.tools.hose.range, config.world_diagonal());
        assert_eq!(config.tools.scrub.radius, SCRUB_RADIUS);
        assert_eq!(config.tools.hose.stream_width, HOSE_STREAM_WIDTH);
    }

    fn scratch_file(name: &str, contents: &str) -> std::path::PathBuf {
        let path = std::env::temp_dir().join(format!("scrubdown-{}-{name}", std::process::id()));
        std::fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn loader_uses_file_world_size_for_the_window() {
        let path = scratch_file("world.toml", "world_width = 1000.0\nworld_height = 600.0");
        let config = load_cleaning_config(&path);
        std::fs::remove_file(&path).unwrap();
        assert_eq!(config.window_resolution(), (1000, 600));
        assert_eq!(config.world_diagonal(), Vec2::new(1000.0, 600.0).length());
    }

    #[test]
    fn loader_falls_back_to_defaults() {
        let missing = std::env::temp_dir().join("scrubdown-does-not-exist.toml");
        assert_eq!(load_cleaning_config(&missing), CleaningConfig::default());

        let path = scratch_file("bad.toml", "pool_capacity = 0");
        let config = load_cleaning_config(&path);
        std::fs::remove_file(&path).unwrap();
        assert_eq!(config, CleaningConfig::default());
        assert_eq!(
            config.window_resolution(),
            (WORLD_WIDTH as u32, WORLD_HEIGHT as u32)
        );
    }
}
