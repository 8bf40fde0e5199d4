//! End-to-end earthquake runs and generator properties

use glam::IVec2;
use proptest::prelude::*;
use rand::SeedableRng;
use rand_pcg::Pcg32;

use quake_city::consts::*;
use quake_city::sim::{
    FrameInput, GroundHeightfield, SimContext, SimEvent, generate_city, is_road, tick,
};
use quake_city::{Settings, ShakeBaseline};

#[test]
fn test_default_city_quake_scenario() {
    let mut ctx = SimContext::with_seed(Settings::default(), 2024);
    assert_eq!(ctx.buildings.len(), 100 - 19);

    tick(&mut ctx, &FrameInput { trigger: true }, FRAME_DT);
    assert!(ctx.seismic.active);
    assert_eq!(ctx.seismic.duration, 1);
    assert!((ctx.seismic.intensity - 0.02).abs() < 1e-6);

    for _ in 1..300 {
        tick(&mut ctx, &FrameInput::default(), FRAME_DT);
    }
    assert!(!ctx.seismic.active);

    let events = ctx.drain_events();
    assert_eq!(events.first(), Some(&SimEvent::QuakeStarted));
    assert_eq!(
        events.iter().filter(|e| **e == SimEvent::QuakeEnded).count(),
        1
    );

    // Every building either stands at rest height or has started falling
    for b in &ctx.buildings {
        assert_eq!(b.rest.original_y, b.height() / 2.0);
        if b.is_standing() {
            assert!((b.position.y - b.rest.original_y).abs() <= BUILDING_SHAKE_AMPLITUDE + 1e-4);
        }
    }

    // A second earthquake can follow once the first has ended
    tick(&mut ctx, &FrameInput { trigger: true }, FRAME_DT);
    assert!(ctx.seismic.active);
    assert_eq!(ctx.seismic.duration, 1);
}

#[test]
fn test_debris_outlives_quake_then_clears() {
    let mut ctx = SimContext::with_seed(Settings::default(), 9);
    tick(&mut ctx, &FrameInput { trigger: true }, FRAME_DT);
    for b in ctx.buildings.iter_mut().take(5) {
        b.begin_collapse();
    }
    while ctx.seismic.active {
        tick(&mut ctx, &FrameInput::default(), FRAME_DT);
    }
    for _ in 0..DEBRIS_LIFETIME {
        tick(&mut ctx, &FrameInput::default(), FRAME_DT);
    }
    assert!(ctx.debris.is_empty());
}

#[test]
fn test_previous_frame_baseline_drifts() {
    let settings = Settings {
        shake_baseline: ShakeBaseline::PreviousFrame,
        ..Default::default()
    };
    let mut ctx = SimContext::with_seed(settings, 5);
    tick(&mut ctx, &FrameInput { trigger: true }, FRAME_DT);
    while ctx.seismic.active {
        tick(&mut ctx, &FrameInput::default(), FRAME_DT);
    }
    let drifted = (0..ctx.ground.vertex_count())
        .filter(|&i| (ctx.ground.elevation(i) - ctx.ground.baseline(i)).abs() > 1e-3)
        .count();
    assert!(drifted > 0);
}

#[test]
fn test_independent_scenes() {
    let mut a = SimContext::with_seed(Settings::default(), 1);
    let b = SimContext::with_seed(Settings::default(), 1);
    tick(&mut a, &FrameInput { trigger: true }, FRAME_DT);
    assert!(a.seismic.active);
    assert!(!b.seismic.active);
    assert_eq!(b.ground.elevation(b.ground.index(51, 50)), 0.0);
}

proptest! {
    #[test]
    fn prop_city_respects_roads_and_ranges(grid_size in 1u32..16, spacing in 6.0f32..20.0, seed: u64) {
        let mut rng = Pcg32::seed_from_u64(seed);
        let buildings = generate_city(grid_size, spacing, &mut rng);

        let half = grid_size as i32 / 2;
        let cells = -half..(grid_size as i32 - half);
        let expected = cells.clone().filter(|&x| x != 0).count().pow(2);
        prop_assert_eq!(buildings.len(), expected);

        for b in &buildings {
            prop_assert!(!is_road(b.cell));
            prop_assert!(cells.contains(&b.cell.x) && cells.contains(&b.cell.y));
            prop_assert!((BUILDING_MIN_EXTENT..BUILDING_MAX_EXTENT).contains(&b.width()));
            prop_assert!((BUILDING_MIN_EXTENT..BUILDING_MAX_EXTENT).contains(&b.depth()));
            prop_assert!((BUILDING_MIN_HEIGHT..BUILDING_MAX_HEIGHT).contains(&b.height()));
            prop_assert_eq!(b.position.y, b.height() / 2.0);
        }

        // No two footprints overlap
        for (i, a) in buildings.iter().enumerate() {
            for c in &buildings[i + 1..] {
                let gap = (a.position - c.position).abs();
                let overlap_x = gap.x < (a.width() + c.width()) / 2.0;
                let overlap_z = gap.z < (a.depth() + c.depth()) / 2.0;
                prop_assert!(!(overlap_x && overlap_z));
            }
        }
        prop_assert!(buildings.iter().all(|b| b.cell != IVec2::ZERO));
    }

    #[test]
    fn prop_ground_edges_never_shake(time_ms in 0.0f64..1.0e7, intensity in -5.0f32..5.0, drift: bool) {
        let mut ground = GroundHeightfield::new(GROUND_SIZE, GROUND_SEGMENTS);
        ground.apply_crack_deformation();
        let reference = if drift { ShakeBaseline::PreviousFrame } else { ShakeBaseline::Crack };
        let before: Vec<f32> = ground.positions().iter().map(|p| p.y).collect();
        ground.apply_shake(time_ms, intensity, reference);
        for (i, p) in ground.positions().iter().enumerate() {
            if p.x.abs() >= GROUND_SHAKE_EDGE || p.z.abs() >= GROUND_SHAKE_EDGE {
                prop_assert_eq!(p.y, before[i]);
            }
        }
    }
}
