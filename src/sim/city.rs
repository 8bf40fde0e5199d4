//! Grid city generation and building state
//!
//! A square lattice of box buildings with a cross of road corridors through
//! the centre (every cell with x == 0 or z == 0 is left empty).

use glam::{IVec2, Mat4, Quat, Vec3};
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::facade::{Window, layout_windows};
use crate::consts::*;
use crate::wave;

/// Surface description handed to the renderer
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MaterialDescriptor {
    pub color: u32,
    pub emissive: u32,
    pub roughness: f32,
    pub metalness: f32,
}

impl MaterialDescriptor {
    const fn plain(color: u32, roughness: f32) -> Self {
        Self {
            color,
            emissive: 0x000000,
            roughness,
            metalness: 0.0,
        }
    }
}

/// Concrete greys buildings pick from
pub const BUILDING_PALETTE: [MaterialDescriptor; 4] = [
    MaterialDescriptor::plain(0x8c8c8c, 0.7),
    MaterialDescriptor::plain(0x6c6c6c, 0.7),
    MaterialDescriptor::plain(0x9c9c9c, 0.7),
    MaterialDescriptor::plain(0x7c7c7c, 0.7),
];

/// Shared by every window quad
pub const WINDOW_MATERIAL: MaterialDescriptor = MaterialDescriptor {
    color: 0xffffff,
    emissive: 0x555555,
    roughness: 0.2,
    metalness: 0.8,
};

/// Undisturbed transform captured at creation; never mutated afterwards
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RestTransform {
    pub original_y: f32,
    pub original_rotation_z: f32,
}

/// Structural state during an earthquake
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub enum CollapseState {
    #[default]
    Standing,
    /// Sinking and tilting a little more every quake frame
    Collapsing { drop: f32, tilt: f32 },
    /// Reached the ground; transform frozen
    Collapsed { drop: f32, tilt: f32 },
}

impl CollapseState {
    /// Accumulated (drop, tilt) from collapsing
    pub fn offsets(&self) -> (f32, f32) {
        match *self {
            CollapseState::Standing => (0.0, 0.0),
            CollapseState::Collapsing { drop, tilt } | CollapseState::Collapsed { drop, tilt } => {
                (drop, tilt)
            }
        }
    }
}

/// A box building on the city grid
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Building {
    pub id: u32,
    /// Grid cell (x, z)
    pub cell: IVec2,
    /// Footprint width (x), height (y), depth (z)
    pub size: Vec3,
    pub position: Vec3,
    pub rotation_z: f32,
    /// Index into `BUILDING_PALETTE`
    pub material: usize,
    pub rest: RestTransform,
    pub collapse: CollapseState,
    pub windows: Vec<Window>,
}

impl Building {
    pub fn width(&self) -> f32 {
        self.size.x
    }

    pub fn height(&self) -> f32 {
        self.size.y
    }

    pub fn depth(&self) -> f32 {
        self.size.z
    }

    pub fn material(&self) -> &'static MaterialDescriptor {
        &BUILDING_PALETTE[self.material]
    }

    pub fn is_standing(&self) -> bool {
        matches!(self.collapse, CollapseState::Standing)
    }

    pub fn is_collapsing(&self) -> bool {
        matches!(self.collapse, CollapseState::Collapsing { .. })
    }

    pub fn is_collapsed(&self) -> bool {
        matches!(self.collapse, CollapseState::Collapsed { .. })
    }

    /// World transform (translation, then tilt about Z)
    pub fn transform(&self) -> Mat4 {
        Mat4::from_rotation_translation(Quat::from_rotation_z(self.rotation_z), self.position)
    }

    /// Recompute position and tilt from the rest transform plus this frame's
    /// shake and any accumulated collapse. Collapsed rubble does not move.
    pub fn shake(&mut self, time_ms: f64, intensity: f32) {
        if self.is_collapsed() {
            return;
        }
        let (drop, tilt) = self.collapse.offsets();
        let bounce = wave(time_ms, 0.01, self.position.x) * intensity * BUILDING_SHAKE_AMPLITUDE;
        let sway = wave(time_ms, 0.005, self.position.x) * intensity * BUILDING_TILT_AMPLITUDE;
        self.position.y = self.rest.original_y + bounce - drop;
        self.rotation_z = self.rest.original_rotation_z + sway + tilt;
    }

    /// Start a one-way collapse. Returns false if already collapsing or down.
    pub fn begin_collapse(&mut self) -> bool {
        if !self.is_standing() {
            return false;
        }
        self.collapse = CollapseState::Collapsing { drop: 0.0, tilt: 0.0 };
        true
    }

    /// Sink and tilt one frame's worth while still above ground.
    ///
    /// Returns true if the building moved this frame. With `settle` set, a
    /// building at or below ground becomes `Collapsed` instead of moving.
    pub fn advance_collapse(&mut self, settle: bool) -> bool {
        let CollapseState::Collapsing { drop, tilt } = self.collapse else {
            return false;
        };
        if self.position.y <= 0.0 {
            if settle {
                self.collapse = CollapseState::Collapsed { drop, tilt };
            }
            return false;
        }
        self.position.y -= COLLAPSE_DROP_PER_FRAME;
        self.rotation_z += COLLAPSE_TILT_PER_FRAME;
        self.collapse = CollapseState::Collapsing {
            drop: drop + COLLAPSE_DROP_PER_FRAME,
            tilt: tilt + COLLAPSE_TILT_PER_FRAME,
        };
        true
    }
}

/// Grid cell indices along one axis: `[-n/2, n/2)`
fn axis_cells(grid_size: u32) -> std::ops::Range<i32> {
    let half = grid_size as i32 / 2;
    -half..(grid_size as i32 - half)
}

/// True for cells reserved as road corridors
pub fn is_road(cell: IVec2) -> bool {
    cell.x == 0 || cell.y == 0
}

/// Generate the city: one randomized building per non-road grid cell.
///
/// Buildings are returned in row order (x outer, z inner) with ids from 1.
pub fn generate_city(grid_size: u32, spacing: f32, rng: &mut impl Rng) -> Vec<Building> {
    let mut buildings = Vec::new();
    let mut next_id = 1;

    for x in axis_cells(grid_size) {
        for z in axis_cells(grid_size) {
            let cell = IVec2::new(x, z);
            if is_road(cell) {
                continue;
            }

            let height = rng.random_range(BUILDING_MIN_HEIGHT..BUILDING_MAX_HEIGHT);
            let width = rng.random_range(BUILDING_MIN_EXTENT..BUILDING_MAX_EXTENT);
            let depth = rng.random_range(BUILDING_MIN_EXTENT..BUILDING_MAX_EXTENT);
            let material = rng.random_range(0..BUILDING_PALETTE.len());
            let windows = layout_windows(width, height, depth, rng);

            buildings.push(Building {
                id: next_id,
                cell,
                size: Vec3::new(width, height, depth),
                position: Vec3::new(x as f32 * spacing, height / 2.0, z as f32 * spacing),
                rotation_z: 0.0,
                material,
                rest: RestTransform {
                    original_y: height / 2.0,
                    original_rotation_z: 0.0,
                },
                collapse: CollapseState::Standing,
                windows,
            });
            next_id += 1;
        }
    }

    let window_count: usize = buildings.iter().map(|b| b.windows.len()).sum();
    log::info!(
        "Generated city: {}x{} grid, {} buildings, {} windows",
        grid_size,
        grid_size,
        buildings.len(),
        window_count
    );

    buildings
}
