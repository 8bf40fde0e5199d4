//! Simulation settings
//!
//! Loaded from a JSON file by the driver and validated before the simulation
//! is built. Anything malformed is reported here, never inside a frame.

use std::path::Path;

use anyhow::{Context, Result, ensure};
use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Reference elevation used when shaking the ground
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum ShakeBaseline {
    /// Shake around the elevation left by the last crack deformation
    #[default]
    Crack,
    /// Shake around the previous frame's (already shaken) elevation.
    /// Accumulates offsets and drifts over long events.
    PreviousFrame,
}

impl ShakeBaseline {
    pub fn as_str(&self) -> &'static str {
        match self {
            ShakeBaseline::Crack => "crack",
            ShakeBaseline::PreviousFrame => "previous-frame",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "crack" | "fixed" => Some(ShakeBaseline::Crack),
            "previous-frame" | "previous" | "drift" => Some(ShakeBaseline::PreviousFrame),
            _ => None,
        }
    }
}

/// City, ground and earthquake configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === City ===
    /// Cells per side of the square city grid
    pub grid_size: u32,
    /// World distance between neighbouring cell centres
    pub spacing: f32,

    // === Ground ===
    /// Side length of the ground plane
    pub ground_size: f32,
    /// Segments per side (vertices per side = segments + 1)
    pub ground_segments: u32,
    pub shake_baseline: ShakeBaseline,

    // === Earthquake ===
    /// Event length in frames
    pub max_duration: u32,
    /// Stop collapsing buildings once they reach the ground
    pub settle_collapsed: bool,

    // === Debris ===
    pub particles_per_emitter: usize,
    /// Emitter lifetime in frames
    pub debris_lifetime: u32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            grid_size: GRID_SIZE,
            spacing: GRID_SPACING,

            ground_size: GROUND_SIZE,
            ground_segments: GROUND_SEGMENTS,
            shake_baseline: ShakeBaseline::Crack,

            max_duration: QUAKE_MAX_DURATION,
            settle_collapsed: true,

            particles_per_emitter: DEBRIS_PARTICLES,
            debris_lifetime: DEBRIS_LIFETIME,
        }
    }
}

impl Settings {
    /// Check the settings describe a city the simulation can run
    pub fn validate(&self) -> Result<()> {
        ensure!(self.grid_size > 0, "grid_size must be at least 1");
        ensure!(
            self.spacing.is_finite() && self.spacing >= BUILDING_MAX_EXTENT,
            "spacing {} must be finite and at least {} so buildings cannot overlap",
            self.spacing,
            BUILDING_MAX_EXTENT
        );
        ensure!(
            self.ground_size.is_finite() && self.ground_size > 0.0,
            "ground_size {} must be finite and positive",
            self.ground_size
        );
        ensure!(self.ground_segments > 0, "ground_segments must be at least 1");
        ensure!(self.max_duration > 0, "max_duration must be at least 1 frame");
        ensure!(
            self.particles_per_emitter > 0,
            "particles_per_emitter must be at least 1"
        );
        ensure!(self.debris_lifetime > 0, "debris_lifetime must be at least 1 frame");
        Ok(())
    }

    /// Parse and validate settings from a JSON string
    pub fn from_json(json: &str) -> Result<Self> {
        let settings: Self = serde_json::from_str(json).context("parse settings JSON")?;
        settings.validate()?;
        Ok(settings)
    }

    /// Load and validate settings from a JSON file
    pub fn load(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("read settings: {}", path.display()))?;
        Self::from_json(&json).with_context(|| format!("load settings: {}", path.display()))
    }

    /// Load settings, falling back to defaults if the file is missing or invalid
    pub fn load_or_default(path: &Path) -> Self {
        match Self::load(path) {
            Ok(settings) => {
                log::info!("Loaded settings from {}", path.display());
                settings
            }
            Err(e) => {
                log::warn!("Using default settings ({e:#})");
                Self::default()
            }
        }
    }

    /// Serialize for writing back to disk
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).context("serialize settings")
    }
}
