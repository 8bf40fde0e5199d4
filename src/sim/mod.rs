//! Simulation module
//!
//! City generation and the earthquake that wrecks it. This module is pure:
//! - No rendering or platform dependencies
//! - Time only advances through `tick`'s frame delta
//! - All randomness comes from the context's RNG

pub mod city;
pub mod debris;
pub mod facade;
pub mod ground;
pub mod seismic;
pub mod state;
pub mod tick;

pub use city::{
    BUILDING_PALETTE, Building, CollapseState, MaterialDescriptor, RestTransform, WINDOW_MATERIAL,
    generate_city, is_road,
};
pub use debris::{DEBRIS_COLOR, DEBRIS_POINT_SIZE, DebrisSystem, ParticleEmitter};
pub use facade::{Facing, Window, layout_windows};
pub use ground::GroundHeightfield;
pub use seismic::{QuakePhase, SeismicState};
pub use state::{SimContext, SimEvent};
pub use tick::{FrameInput, step, tick};
