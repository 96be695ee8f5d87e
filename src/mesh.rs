//! Wiremesh variant: a jittered triangular lattice whose edges are colored
//! by proximity to the pointer.

use crate::color;
use crate::geometry::Vec2;
use crate::surface::Surface;
use rand::{rngs::StdRng, Rng};
use std::f32::consts::TAU;

/// Regular lattice spacing in logical units.
pub(crate) const SPACING: f32 = 40.0;
/// Per-axis jitter bound as a fraction of the spacing.
pub(crate) const JITTER: f32 = 0.45;
/// Oscillation amplitude and spatial frequency.
const WOBBLE_AMP: f32 = 5.0;
const WOBBLE_FREQ: f32 = 0.02;

pub(crate) struct MeshPoint {
    /// Fixed at init: regular grid position plus one-time jitter.
    pub(crate) origin: Vec2,
    /// Recomputed every tick from (origin, t); never integrated.
    pub(crate) pos: Vec2,
    /// Reserved; rolled at init, not yet read by the renderer.
    #[allow(dead_code)]
    pub(crate) phase: f32,
}

pub(crate) struct Mesh {
    pub(crate) cols: usize,
    pub(crate) rows: usize,
    pub(crate) points: Vec<MeshPoint>,
}

impl Mesh {
    /// Lattice covering the viewport with one padding row/column on every
    /// side, so jittered edge points never expose a gap.
    pub(crate) fn init(w: f32, h: f32, rng: &mut StdRng) -> Self {
        if w <= 0.0 || h <= 0.0 {
            return Self {
                cols: 0,
                rows: 0,
                points: Vec::new(),
            };
        }

        let cols = (w / SPACING).ceil() as usize + 3;
        let rows = (h / SPACING).ceil() as usize + 3;
        let mut points = Vec::with_capacity(cols * rows);

        for j in 0..rows {
            for i in 0..cols {
                let gx = (i as f32 - 1.0) * SPACING;
                let gy = (j as f32 - 1.0) * SPACING;
                let origin = Vec2::new(
                    gx + rng.gen_range(-JITTER..JITTER) * SPACING,
                    gy + rng.gen_range(-JITTER..JITTER) * SPACING,
                );
                points.push(MeshPoint {
                    origin,
                    pos: origin,
                    phase: rng.gen_range(0.0..TAU),
                });
            }
        }

        Self { cols, rows, points }
    }

    /// Displayed position is a pure function of (origin, t).
    pub(crate) fn update(&mut self, t: f32) {
        for p in &mut self.points {
            p.pos = Vec2::new(
                p.origin.x + WOBBLE_AMP * (p.origin.y * WOBBLE_FREQ + t).sin(),
                p.origin.y + WOBBLE_AMP * (p.origin.x * WOBBLE_FREQ + t).cos(),
            );
        }
    }

    pub(crate) fn triangle_count(&self) -> usize {
        if self.cols < 2 || self.rows < 2 {
            0
        } else {
            (self.cols - 1) * (self.rows - 1) * 2
        }
    }

    pub(crate) fn draw(&self, surf: &mut Surface, pointer: Vec2) {
        if self.cols < 2 || self.rows < 2 {
            return;
        }

        for j in 0..self.rows - 1 {
            for i in 0..self.cols - 1 {
                let p00 = self.points[j * self.cols + i].pos;
                let p10 = self.points[j * self.cols + i + 1].pos;
                let p01 = self.points[(j + 1) * self.cols + i].pos;
                let p11 = self.points[(j + 1) * self.cols + i + 1].pos;

                // diagonal split flips with cell parity to break up the
                // repeating pattern
                let (t1, t2) = if (i + j) % 2 == 0 {
                    ([p00, p10, p11], [p00, p11, p01])
                } else {
                    ([p10, p11, p01], [p10, p01, p00])
                };

                for tri in [t1, t2] {
                    let centroid = Vec2::new(
                        (tri[0].x + tri[1].x + tri[2].x) / 3.0,
                        (tri[0].y + tri[1].y + tri[2].y) / 3.0,
                    );
                    let ink = color::thermal(centroid.dist(pointer));

                    surf.begin_path();
                    surf.move_to(tri[0].x, tri[0].y);
                    surf.line_to(tri[1].x, tri[1].y);
                    surf.line_to(tri[2].x, tri[2].y);
                    surf.close_path();
                    surf.stroke_path(ink);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    #[test]
    fn jitter_stays_bounded() {
        let mut rng = StdRng::seed_from_u64(5);
        let mesh = Mesh::init(800.0, 600.0, &mut rng);
        let bound = JITTER * SPACING;
        for (idx, p) in mesh.points.iter().enumerate() {
            let i = idx % mesh.cols;
            let j = idx / mesh.cols;
            let gx = (i as f32 - 1.0) * SPACING;
            let gy = (j as f32 - 1.0) * SPACING;
            assert!((p.origin.x - gx).abs() < bound);
            assert!((p.origin.y - gy).abs() < bound);
        }
    }

    #[test]
    fn lattice_pads_past_every_edge() {
        let mut rng = StdRng::seed_from_u64(5);
        let mesh = Mesh::init(800.0, 600.0, &mut rng);
        let min_x = mesh.points.iter().map(|p| p.origin.x).fold(f32::INFINITY, f32::min);
        let max_x = mesh.points.iter().map(|p| p.origin.x).fold(f32::NEG_INFINITY, f32::max);
        assert!(min_x < 0.0, "padding column left of the viewport");
        assert!(max_x > 800.0, "padding column right of the viewport");
    }

    #[test]
    fn update_is_pure_in_t() {
        let mut rng = StdRng::seed_from_u64(8);
        let mut mesh = Mesh::init(400.0, 400.0, &mut rng);

        mesh.update(1.75);
        let first: Vec<Vec2> = mesh.points.iter().map(|p| p.pos).collect();
        // interleave other times, then come back
        mesh.update(9.0);
        mesh.update(0.25);
        mesh.update(1.75);
        let again: Vec<Vec2> = mesh.points.iter().map(|p| p.pos).collect();

        assert_eq!(first, again, "no hidden accumulation across updates");
    }

    #[test]
    fn wobble_never_exceeds_amplitude() {
        let mut rng = StdRng::seed_from_u64(8);
        let mut mesh = Mesh::init(400.0, 400.0, &mut rng);
        for step in 0..200 {
            mesh.update(step as f32 * 0.015);
            for p in &mesh.points {
                assert!((p.pos.x - p.origin.x).abs() <= WOBBLE_AMP + 1e-4);
                assert!((p.pos.y - p.origin.y).abs() <= WOBBLE_AMP + 1e-4);
            }
        }
    }

    #[test]
    fn two_triangles_per_cell() {
        let mut rng = StdRng::seed_from_u64(13);
        let mesh = Mesh::init(800.0, 600.0, &mut rng);
        assert_eq!(
            mesh.triangle_count(),
            (mesh.cols - 1) * (mesh.rows - 1) * 2
        );
        assert!(mesh.triangle_count() > 0);
    }

    #[test]
    fn degenerate_mesh_is_empty_and_inert() {
        let mut rng = StdRng::seed_from_u64(1);
        let mesh = Mesh::init(0.0, 600.0, &mut rng);
        assert_eq!(mesh.triangle_count(), 0);
        let mut surf = Surface::new(10, 10);
        mesh.draw(&mut surf, Vec2::new(-500.0, -500.0));
    }
}
