//! Quake City entry point
//!
//! Headless frame driver: builds a city, presses the trigger once and runs the
//! earthquake to completion at a fixed 60 Hz, logging what happens.
//!
//! Usage: `quake-city [settings.json]` (RUST_LOG=debug for per-building detail)

use std::path::PathBuf;

use anyhow::Result;

use quake_city::consts::FRAME_DT;
use quake_city::sim::{FrameInput, QuakePhase, SimContext, SimEvent, step};
use quake_city::Settings;

/// Frames to keep running after the quake so the last debris settles
const COOLDOWN_FRAMES: u32 = 120;

fn main() -> Result<()> {
    env_logger::init();
    log::info!("Quake City (headless) starting...");

    let settings = match std::env::args().nth(1).map(PathBuf::from) {
        Some(path) => Settings::load(&path)?,
        None => {
            let settings = Settings::default();
            settings.validate()?;
            settings
        }
    };
    log::info!(
        "City {}x{} @ {}, quake {} frames, shake baseline {}",
        settings.grid_size,
        settings.grid_size,
        settings.spacing,
        settings.max_duration,
        settings.shake_baseline.as_str()
    );

    let mut ctx = SimContext::new(settings);
    let mut collapses = 0;
    let mut bursts = 0;
    let mut peak_emitters = 0;
    let mut last_phase = QuakePhase::Idle;

    // Press the trigger on the first frame, then let it run
    let mut input = FrameInput { trigger: true };
    let mut cooldown = COOLDOWN_FRAMES;
    loop {
        step(&mut ctx, &input, FRAME_DT)?;
        input.trigger = false;

        let phase = ctx.seismic.phase();
        if phase != last_phase {
            log::info!(
                "Frame {}: {} (intensity {:.2})",
                ctx.frame,
                phase.as_str(),
                ctx.seismic.intensity
            );
            last_phase = phase;
        }

        // Ground elevations were re-uploaded this frame
        ctx.ground.take_dirty();

        for event in ctx.drain_events() {
            match event {
                SimEvent::CollapseStarted { .. } => collapses += 1,
                SimEvent::DebrisEmitted { .. } => bursts += 1,
                _ => {}
            }
        }
        peak_emitters = peak_emitters.max(ctx.debris.len());

        if !ctx.seismic.active {
            if ctx.debris.is_empty() || cooldown == 0 {
                break;
            }
            cooldown -= 1;
        }
    }

    println!("Simulated {} frames ({:.1}s)", ctx.frame, ctx.elapsed_ms / 1000.0);
    println!(
        "Buildings: {} total, {} collapses started, {} settled",
        ctx.buildings.len(),
        collapses,
        ctx.collapsed_count()
    );
    println!("Debris: {bursts} bursts, peak {peak_emitters} live emitters");
    Ok(())
}
