//! Simulation context
//!
//! Everything that changes while the simulation runs lives in one
//! `SimContext` owned by the frame driver. Independent scenes are just
//! independent contexts.

use glam::Vec3;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::city::{Building, generate_city};
use super::debris::DebrisSystem;
use super::ground::GroundHeightfield;
use super::seismic::SeismicState;
use crate::settings::Settings;

/// Things that happened during a tick, for the driver/renderer to react to
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum SimEvent {
    QuakeStarted,
    QuakeEnded,
    CollapseStarted { building: u32 },
    /// A collapsing building reached the ground
    BuildingSettled { building: u32 },
    DebrisEmitted { position: Vec3 },
}

/// Complete scene state
#[derive(Debug, Clone)]
pub struct SimContext {
    pub settings: Settings,
    pub buildings: Vec<Building>,
    pub ground: GroundHeightfield,
    pub debris: DebrisSystem,
    pub seismic: SeismicState,
    /// Simulation-local elapsed time (milliseconds)
    pub elapsed_ms: f64,
    /// Frames simulated
    pub frame: u64,
    /// Events recorded since the last drain
    pub events: Vec<SimEvent>,
    pub(crate) rng: Pcg32,
}

impl SimContext {
    /// Build a scene with an unseeded RNG (every run differs)
    pub fn new(settings: Settings) -> Self {
        let rng = Pcg32::from_rng(&mut rand::rng());
        Self::with_rng(settings, rng)
    }

    /// Build a repeatable scene from a seed
    pub fn with_seed(settings: Settings, seed: u64) -> Self {
        Self::with_rng(settings, Pcg32::seed_from_u64(seed))
    }

    fn with_rng(settings: Settings, mut rng: Pcg32) -> Self {
        let buildings = generate_city(settings.grid_size, settings.spacing, &mut rng);
        let ground = GroundHeightfield::new(settings.ground_size, settings.ground_segments);
        let debris = DebrisSystem::new(settings.particles_per_emitter, settings.debris_lifetime);
        let seismic = SeismicState::new(settings.max_duration);

        Self {
            settings,
            buildings,
            ground,
            debris,
            seismic,
            elapsed_ms: 0.0,
            frame: 0,
            events: Vec::new(),
            rng,
        }
    }

    /// Trigger an earthquake: activates the seismic state and cracks the
    /// ground. Does nothing while an earthquake is already running.
    pub fn start_earthquake(&mut self) -> bool {
        if !self.seismic.start() {
            log::debug!("Earthquake already active, trigger ignored");
            return false;
        }
        self.ground.apply_crack_deformation();
        self.ground.recompute_normals();
        self.events.push(SimEvent::QuakeStarted);
        log::info!(
            "Earthquake started ({} frames, {} buildings)",
            self.seismic.max_duration,
            self.buildings.len()
        );
        true
    }

    /// Take the events recorded so far
    pub fn drain_events(&mut self) -> Vec<SimEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn collapsing_count(&self) -> usize {
        self.buildings.iter().filter(|b| b.is_collapsing()).count()
    }

    pub fn collapsed_count(&self) -> usize {
        self.buildings.iter().filter(|b| b.is_collapsed()).count()
    }

    pub fn building(&self, id: u32) -> Option<&Building> {
        self.buildings.iter().find(|b| b.id == id)
    }
}
