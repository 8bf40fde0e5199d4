//! Per-frame simulation step
//!
//! One call per rendered frame. Order inside a frame:
//! time → trigger → earthquake (intensity, buildings, ground, end) → debris.

use anyhow::{Result, ensure};
use rand::Rng;

use super::state::{SimContext, SimEvent};
use crate::consts::*;

/// Input for a single frame
#[derive(Debug, Clone, Default)]
pub struct FrameInput {
    /// Earthquake trigger (Space)
    pub trigger: bool,
}

/// Validate the frame delta, then advance one frame
pub fn step(ctx: &mut SimContext, input: &FrameInput, dt: f32) -> Result<()> {
    ensure!(
        dt.is_finite() && dt >= 0.0,
        "frame delta must be finite and non-negative, got {dt}"
    );
    tick(ctx, input, dt);
    Ok(())
}

/// Advance the scene by one frame of `dt` seconds
pub fn tick(ctx: &mut SimContext, input: &FrameInput, dt: f32) {
    ctx.frame += 1;
    ctx.elapsed_ms += dt as f64 * 1000.0;

    if input.trigger {
        ctx.start_earthquake();
    }

    if ctx.seismic.active {
        ctx.seismic.advance();
        shake_buildings(ctx);
        ctx.ground
            .apply_shake(ctx.elapsed_ms, ctx.seismic.intensity, ctx.settings.shake_baseline);

        if ctx.seismic.finish_if_elapsed() {
            ctx.events.push(SimEvent::QuakeEnded);
            log::info!(
                "Earthquake ended after {} frames: {} collapsing, {} collapsed",
                ctx.seismic.duration,
                ctx.collapsing_count(),
                ctx.collapsed_count()
            );
        }
    }

    ctx.debris.tick();
}

/// Shake every building, roll for new collapses and advance collapsing ones
fn shake_buildings(ctx: &mut SimContext) {
    let intensity = ctx.seismic.intensity;
    let collapse_window = ctx.seismic.collapse_window_open();
    let settle = ctx.settings.settle_collapsed;

    for building in &mut ctx.buildings {
        if building.is_collapsed() {
            continue;
        }
        building.shake(ctx.elapsed_ms, intensity);

        if collapse_window
            && building.is_standing()
            && building.position.y > 0.0
            && ctx.rng.random::<f32>() < COLLAPSE_CHANCE * intensity
        {
            building.begin_collapse();
            ctx.events.push(SimEvent::CollapseStarted { building: building.id });
            log::debug!("Building {} collapsing at {}", building.id, building.position);
        }

        if !building.is_collapsing() {
            continue;
        }
        if building.advance_collapse(settle) {
            if ctx.rng.random_bool(DEBRIS_CHANCE) {
                ctx.debris.emit(building.position, &mut ctx.rng);
                ctx.events.push(SimEvent::DebrisEmitted {
                    position: building.position,
                });
            }
        } else if building.is_collapsed() {
            ctx.events.push(SimEvent::BuildingSettled { building: building.id });
            log::debug!("Building {} settled", building.id);
        }
    }
}
