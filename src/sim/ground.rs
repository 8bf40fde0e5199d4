//! Deformable ground heightfield
//!
//! A flat square plane in XZ, centred on the origin, with one mutable
//! elevation per vertex. Two contributions compose: a persistent crack
//! deformation set when a quake starts, and a per-frame shake offset.

use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::settings::ShakeBaseline;
use crate::wave;

/// Ground vertex grid (row-major, `side × side` vertices)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GroundHeightfield {
    /// Vertices per side
    pub side: usize,
    /// World-space side length
    pub size: f32,
    /// Current vertex positions (x, elevation, z)
    positions: Vec<Vec3>,
    /// Elevation left by the last crack deformation
    baseline: Vec<f32>,
    normals: Vec<Vec3>,
    /// Elevations changed since the renderer last looked
    dirty: bool,
    /// Normals no longer match the elevations
    normals_dirty: bool,
}

impl GroundHeightfield {
    /// Flat plane of `segments × segments` quads
    pub fn new(size: f32, segments: u32) -> Self {
        let side = segments as usize + 1;
        let step = size / segments as f32;
        let half = size / 2.0;

        let mut positions = Vec::with_capacity(side * side);
        for row in 0..side {
            for col in 0..side {
                let x = -half + col as f32 * step;
                let z = -half + row as f32 * step;
                positions.push(Vec3::new(x, 0.0, z));
            }
        }

        Self {
            side,
            size,
            baseline: vec![0.0; positions.len()],
            normals: vec![Vec3::Y; positions.len()],
            positions,
            dirty: false,
            normals_dirty: false,
        }
    }

    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    pub fn positions(&self) -> &[Vec3] {
        &self.positions
    }

    pub fn normals(&self) -> &[Vec3] {
        &self.normals
    }

    /// Vertex buffer view for upload
    pub fn position_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.positions)
    }

    pub fn elevation(&self, index: usize) -> f32 {
        self.positions[index].y
    }

    pub fn baseline(&self, index: usize) -> f32 {
        self.baseline[index]
    }

    /// Index of the vertex at grid (col, row)
    pub fn index(&self, col: usize, row: usize) -> usize {
        row * self.side + col
    }

    /// Whether the vertex at `index` lies outside the shaking zone
    pub fn is_edge(&self, index: usize) -> bool {
        let p = self.positions[index];
        p.x.abs() >= GROUND_SHAKE_EDGE || p.z.abs() >= GROUND_SHAKE_EDGE
    }

    /// Take the elevation dirty flag (renderer re-uploads when true)
    pub fn take_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub fn normals_dirty(&self) -> bool {
        self.normals_dirty
    }

    /// Sink a ripple pattern into the disk of radius 20 around the origin.
    ///
    /// Vertices outside the disk keep their elevation. The resulting
    /// elevations become the shake baseline.
    pub fn apply_crack_deformation(&mut self) {
        let mut cracked = 0;
        for p in &mut self.positions {
            let distance = Vec2::new(p.x, p.z).length();
            if distance < CRACK_RADIUS {
                p.y = -(distance * CRACK_FREQUENCY).sin() * CRACK_DEPTH;
                cracked += 1;
            }
        }
        for (base, p) in self.baseline.iter_mut().zip(&self.positions) {
            *base = p.y;
        }
        self.dirty = true;
        self.normals_dirty = true;
        log::debug!("Ground cracked: {} vertices deformed", cracked);
    }

    /// Displace every non-edge vertex by this frame's shake wave
    pub fn apply_shake(&mut self, time_ms: f64, intensity: f32, reference: ShakeBaseline) {
        for (p, base) in self.positions.iter_mut().zip(&self.baseline) {
            if p.x.abs() >= GROUND_SHAKE_EDGE || p.z.abs() >= GROUND_SHAKE_EDGE {
                continue;
            }
            let origin = match reference {
                ShakeBaseline::Crack => *base,
                ShakeBaseline::PreviousFrame => p.y,
            };
            let offset = wave(time_ms, 0.01, p.x * 0.1 + p.z * 0.1) * intensity * GROUND_SHAKE_AMPLITUDE;
            p.y = origin + offset;
        }
        self.dirty = true;
    }

    /// Rebuild per-vertex normals from central height differences
    pub fn recompute_normals(&mut self) {
        let side = self.side;
        let step = self.size / (side - 1) as f32;
        for row in 0..side {
            for col in 0..side {
                let h = |c: usize, r: usize| self.positions[r * side + c].y;
                let (l, r) = (col.saturating_sub(1), (col + 1).min(side - 1));
                let (d, u) = (row.saturating_sub(1), (row + 1).min(side - 1));
                let dx = (h(r, row) - h(l, row)) / ((r - l).max(1) as f32 * step);
                let dz = (h(col, u) - h(col, d)) / ((u - d).max(1) as f32 * step);
                self.normals[row * side + col] = Vec3::new(-dx, 1.0, -dz).normalize();
            }
        }
        self.normals_dirty = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ground() -> GroundHeightfield {
        GroundHeightfield::new(GROUND_SIZE, GROUND_SEGMENTS)
    }

    #[test]
    fn test_grid_layout() {
        let g = ground();
        assert_eq!(g.side, 101);
        assert_eq!(g.vertex_count(), 101 * 101);
        assert_eq!(g.positions()[0], Vec3::new(-250.0, 0.0, -250.0));
        assert_eq!(g.positions()[g.index(50, 50)], Vec3::ZERO);
        assert_eq!(g.position_bytes().len(), g.vertex_count() * 12);
    }

    #[test]
    fn test_crack_only_touches_disk() {
        let mut g = ground();
        g.apply_crack_deformation();
        for (i, p) in g.positions().iter().enumerate() {
            let d = Vec2::new(p.x, p.z).length();
            if d < CRACK_RADIUS {
                assert!((p.y + (d * 0.5).sin() * 2.0).abs() < 1e-6);
            } else {
                assert_eq!(p.y, 0.0, "vertex {i} outside the crack moved");
            }
            assert_eq!(g.baseline(i), p.y);
        }
        // Vertex at (5, 0): -sin(2.5) * 2
        let i = g.index(51, 50);
        assert!((g.elevation(i) + 2.5f32.sin() * 2.0).abs() < 1e-6);
        assert!(g.take_dirty());
        assert!(!g.take_dirty());
        assert!(g.normals_dirty());
    }

    #[test]
    fn test_shake_skips_edges() {
        let mut g = ground();
        g.apply_crack_deformation();
        let before: Vec<f32> = g.positions().iter().map(|p| p.y).collect();
        g.apply_shake(1000.0, 1.0, ShakeBaseline::Crack);
        let mut moved = 0;
        for i in 0..g.vertex_count() {
            if g.is_edge(i) {
                assert_eq!(g.elevation(i), before[i]);
            } else if g.elevation(i) != before[i] {
                moved += 1;
            }
        }
        assert!(moved > 0);
        // x = 100 sits exactly on the edge
        assert!(g.is_edge(g.index(70, 50)));
        assert!(!g.is_edge(g.index(69, 50)));
    }

    #[test]
    fn test_crack_baseline_does_not_drift() {
        let mut g = ground();
        g.apply_crack_deformation();
        for frame in 0..200 {
            g.apply_shake(frame as f64 * 16.7, 1.0, ShakeBaseline::Crack);
        }
        g.apply_shake(5000.0, 0.0, ShakeBaseline::Crack);
        for i in 0..g.vertex_count() {
            assert_eq!(g.elevation(i), g.baseline(i));
        }
    }

    #[test]
    fn test_previous_frame_baseline_accumulates() {
        let mut g = ground();
        g.apply_crack_deformation();
        let i = g.index(52, 52); // (10, 10), inside the shaking zone
        let t = 0.0; // phase = 2.0 at this vertex, so each frame adds the same positive offset
        let step = (2.0f32).sin() * GROUND_SHAKE_AMPLITUDE;
        g.apply_shake(t, 1.0, ShakeBaseline::PreviousFrame);
        g.apply_shake(t, 1.0, ShakeBaseline::PreviousFrame);
        assert!((g.elevation(i) - (g.baseline(i) + 2.0 * step)).abs() < 1e-5);
    }

    #[test]
    fn test_normals_flat_then_tilted() {
        let mut g = ground();
        g.recompute_normals();
        assert!(g.normals().iter().all(|n| (*n - Vec3::Y).length() < 1e-6));

        g.apply_crack_deformation();
        g.recompute_normals();
        assert!(!g.normals_dirty());
        let n = g.normals()[g.index(51, 50)];
        assert!((n.length() - 1.0).abs() < 1e-5);
        assert!(n.x.abs() > 1e-3);
        // Far corner untouched
        assert!((g.normals()[0] - Vec3::Y).length() < 1e-6);
    }
}
