//! Facade window layout
//!
//! Windows are laid out on a 1-unit lattice over the four vertical faces of a
//! building. Offsets are local to the building centre, so a window follows its
//! building's transform without any bookkeeping.

use glam::{Mat4, Quat, Vec3};
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Outward direction of a window quad
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Facing {
    PosZ,
    NegZ,
    PosX,
    NegX,
}

impl Facing {
    /// Rotation about Y that turns a +Z facing quad to this direction
    pub fn yaw(&self) -> f32 {
        use std::f32::consts::{FRAC_PI_2, PI};
        match self {
            Facing::PosZ => 0.0,
            Facing::NegZ => PI,
            Facing::PosX => FRAC_PI_2,
            Facing::NegX => -FRAC_PI_2,
        }
    }

    /// Unit outward normal
    pub fn normal(&self) -> Vec3 {
        match self {
            Facing::PosZ => Vec3::Z,
            Facing::NegZ => Vec3::NEG_Z,
            Facing::PosX => Vec3::X,
            Facing::NegX => Vec3::NEG_X,
        }
    }

    /// Facing of a depth face (front/back) from the sign of its offset
    fn depth_face(z: f32) -> Self {
        if z > 0.0 { Facing::PosZ } else { Facing::NegZ }
    }

    /// Facing of a width face (sides) from the sign of its offset
    fn width_face(x: f32) -> Self {
        if x > 0.0 { Facing::PosX } else { Facing::NegX }
    }
}

/// A window quad mounted on a building face
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Window {
    /// Offset from the building centre
    pub offset: Vec3,
    pub facing: Facing,
}

impl Window {
    fn on_depth_face(x: f32, y: f32, z: f32) -> Self {
        Self {
            offset: Vec3::new(x, y, z),
            facing: Facing::depth_face(z),
        }
    }

    fn on_width_face(x: f32, y: f32, z: f32) -> Self {
        Self {
            offset: Vec3::new(x, y, z),
            facing: Facing::width_face(x),
        }
    }

    /// Transform relative to the owning building
    pub fn local_transform(&self) -> Mat4 {
        Mat4::from_rotation_translation(Quat::from_rotation_y(self.facing.yaw()), self.offset)
    }
}

/// Lattice coordinates `start, start + step, ...` strictly below `end`
fn lattice(start: f32, end: f32) -> impl Iterator<Item = f32> {
    (0..)
        .map(move |i| start + i as f32 * WINDOW_SPACING)
        .take_while(move |&v| v < end)
}

/// Lay out windows on all four faces of a `width × height × depth` box.
///
/// Rows run from y = 1 to below `height - 1`; columns from `-extent/2 + 1` to
/// below `extent/2`. Each slot is lit with probability 0.7, and one roll covers
/// the slot on both opposite faces.
pub fn layout_windows(width: f32, height: f32, depth: f32, rng: &mut impl Rng) -> Vec<Window> {
    let mut windows = Vec::new();
    let half_w = width / 2.0;
    let half_h = height / 2.0;
    let half_d = depth / 2.0;

    // Front and back
    for y in lattice(1.0, height - 1.0) {
        for x in lattice(-half_w + 1.0, half_w) {
            if rng.random_bool(WINDOW_LIT_CHANCE) {
                windows.push(Window::on_depth_face(x, y - half_h, half_d + WINDOW_INSET));
                windows.push(Window::on_depth_face(x, y - half_h, -half_d - WINDOW_INSET));
            }
        }
    }

    // Sides
    for y in lattice(1.0, height - 1.0) {
        for z in lattice(-half_d + 1.0, half_d) {
            if rng.random_bool(WINDOW_LIT_CHANCE) {
                windows.push(Window::on_width_face(half_w + WINDOW_INSET, y - half_h, z));
                windows.push(Window::on_width_face(-half_w - WINDOW_INSET, y - half_h, z));
            }
        }
    }

    windows
}
