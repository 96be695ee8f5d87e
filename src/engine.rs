//! The renderer object: owns every piece of mutable animation state, so
//! several independent surfaces could each run their own engine.

use crate::color::TRAIL;
use crate::gears::{layout_gears, Gear};
use crate::geometry::Vec2;
use crate::matrix::{init_drops, Drop};
use crate::mesh::Mesh;
use crate::surface::Surface;
use rand::{rngs::StdRng, SeedableRng};

/// Width below which the mobile gear placement is used, in logical units.
pub(crate) const MOBILE_THRESHOLD: f32 = 768.0;
/// Exponential smoothing factor for the scroll offset.
const SCROLL_EASE: f32 = 0.1;
/// Global-time step per tick for the mesh oscillation.
const TIME_STEP: f32 = 0.015;
/// Pointer position before any input: far off-canvas, so the thermal ramp
/// starts everywhere at its coolest value.
pub(crate) const POINTER_SENTINEL: Vec2 = Vec2::new(-500.0, -500.0);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum LayoutMode {
    Mobile,
    Desktop,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Variant {
    Composite,
    Wiremesh,
}

/// Raw target offset plus the low-pass value the gears actually see.
#[derive(Clone, Copy, Debug, Default)]
pub(crate) struct ScrollState {
    pub(crate) target: f32,
    pub(crate) smoothed: f32,
}

impl ScrollState {
    pub(crate) fn tick(&mut self) {
        self.smoothed += (self.target - self.smoothed) * SCROLL_EASE;
    }
}

pub(crate) struct Engine {
    pub(crate) w: f32,
    pub(crate) h: f32,
    pub(crate) mode: LayoutMode,
    pub(crate) variant: Variant,
    pub(crate) split: bool,
    pub(crate) drops: Vec<Drop>,
    pub(crate) gears: Vec<Gear>,
    pub(crate) mesh: Mesh,
    pub(crate) scroll: ScrollState,
    pub(crate) pointer: Vec2,
    pub(crate) t: f32,
    rng: StdRng,
}

impl Engine {
    pub(crate) fn new(seed: u64, variant: Variant, split: bool) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        Self {
            w: 0.0,
            h: 0.0,
            mode: LayoutMode::Desktop,
            variant,
            split,
            drops: Vec::new(),
            gears: Vec::new(),
            mesh: Mesh::init(0.0, 0.0, &mut rng),
            scroll: ScrollState::default(),
            pointer: POINTER_SENTINEL,
            t: 0.0,
            rng,
        }
    }

    /// Sole entry point that changes layout mode. Rebuilds all grid and
    /// particle state before the next tick can read it.
    pub(crate) fn resize(&mut self, w: f32, h: f32) {
        self.w = w;
        self.h = h;
        self.mode = if w < MOBILE_THRESHOLD {
            LayoutMode::Mobile
        } else {
            LayoutMode::Desktop
        };
        self.reinit();
    }

    fn reinit(&mut self) {
        self.drops = init_drops(self.drawable_width(), self.h, &mut self.rng);
        self.gears = layout_gears(self.w, self.h, self.mode);
        self.mesh = Mesh::init(self.w, self.h, &mut self.rng);
    }

    pub(crate) fn split_active(&self) -> bool {
        self.split && self.mode == LayoutMode::Desktop && self.variant == Variant::Composite
    }

    /// Width the rain may occupy: the left half in the split layout.
    pub(crate) fn drawable_width(&self) -> f32 {
        if self.split_active() {
            self.w * 0.5
        } else {
            self.w
        }
    }

    pub(crate) fn toggle_variant(&mut self) {
        self.variant = match self.variant {
            Variant::Composite => Variant::Wiremesh,
            Variant::Wiremesh => Variant::Composite,
        };
        self.reinit();
    }

    pub(crate) fn toggle_split(&mut self) {
        self.split = !self.split;
        self.reinit();
    }

    pub(crate) fn reseed(&mut self, seed: u64) {
        self.rng = StdRng::seed_from_u64(seed);
        self.reinit();
    }

    pub(crate) fn pointer_moved(&mut self, x: f32, y: f32) {
        self.pointer = Vec2::new(x, y);
    }

    /// Scroll wheel stand-in for the page scroll position.
    pub(crate) fn add_scroll(&mut self, delta: f32) {
        self.scroll.target = (self.scroll.target + delta).max(0.0);
    }

    /// One frame: advance all state, then draw it. Synchronous; nothing
    /// else mutates engine state while this runs.
    pub(crate) fn tick(&mut self, surf: &mut Surface) {
        self.scroll.tick();
        self.t += TIME_STEP;

        if self.w <= 0.0 || self.h <= 0.0 {
            return;
        }

        match self.variant {
            Variant::Composite => self.tick_composite(surf),
            Variant::Wiremesh => self.tick_wiremesh(surf),
        }
    }

    fn tick_composite(&mut self, surf: &mut Surface) {
        surf.fill_rect(
            0.0,
            0.0,
            self.drawable_width(),
            self.h,
            TRAIL.with_alpha(0.10),
        );

        for d in &mut self.drops {
            d.update(self.h, &mut self.rng);
        }
        for d in &self.drops {
            d.draw(surf);
        }

        if self.split_active() {
            self.draw_panel(surf);
        }

        for g in &mut self.gears {
            g.update();
        }
        let smoothed = self.scroll.smoothed;
        for g in &self.gears {
            g.draw(surf, smoothed);
        }
    }

    /// Split layout: hard-clear the right half, rule it with a grid, and
    /// drop a single divider at the midpoint. Gears layer on top.
    fn draw_panel(&mut self, surf: &mut Surface) {
        let x0 = self.w * 0.5;
        surf.clear_rect(x0, 0.0, self.w - x0, self.h);

        let grid = crate::color::CYAN.with_alpha(0.08);
        surf.begin_path();
        let mut gx = (x0 / 80.0).ceil() * 80.0;
        while gx < self.w {
            surf.move_to(gx, 0.0);
            surf.line_to(gx, self.h);
            gx += 80.0;
        }
        let mut gy = 0.0;
        while gy < self.h {
            surf.move_to(x0, gy);
            surf.line_to(self.w, gy);
            gy += 80.0;
        }
        surf.stroke_path(grid);

        surf.begin_path();
        surf.move_to(x0, 0.0);
        surf.line_to(x0, self.h);
        surf.stroke_path(crate::color::CYAN.with_alpha(0.35));
    }

    fn tick_wiremesh(&mut self, surf: &mut Surface) {
        surf.fill_rect(0.0, 0.0, self.w, self.h, TRAIL.with_alpha(0.08));
        self.mesh.update(self.t);
        self.mesh.draw(surf, self.pointer);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::CELL_W;

    fn engine_at(w: f32, h: f32) -> Engine {
        let mut e = Engine::new(0xC0FFEE, Variant::Composite, false);
        e.resize(w, h);
        e
    }

    #[test]
    fn desktop_layout_resolves_above_threshold() {
        let e = engine_at(1024.0, 768.0);
        assert_eq!(e.mode, LayoutMode::Desktop);
        assert_eq!(e.gears.len(), 3);
        assert_eq!(e.drops.len(), (1024.0 / CELL_W) as usize);
    }

    #[test]
    fn resize_to_mobile_fully_repopulates() {
        let mut e = engine_at(1024.0, 768.0);
        assert_eq!(e.gears.len(), 3);

        e.resize(400.0, 800.0);
        assert_eq!(e.mode, LayoutMode::Mobile);
        assert_eq!(e.gears.len(), 2);
        // column count recomputed from the new width, not stale
        assert_eq!(e.drops.len(), (400.0 / CELL_W) as usize);
        assert!(e.gears.iter().all(|g| g.spec.radius <= 60.0));
    }

    #[test]
    fn threshold_boundary() {
        assert_eq!(engine_at(767.9, 600.0).mode, LayoutMode::Mobile);
        assert_eq!(engine_at(768.0, 600.0).mode, LayoutMode::Desktop);
    }

    #[test]
    fn scroll_smoothing_follows_geometric_decay() {
        let mut e = engine_at(1024.0, 768.0);
        e.add_scroll(100.0);
        let mut surf = Surface::new(8, 4);
        for k in 1..=60 {
            e.tick(&mut surf);
            let expected = 100.0 - 100.0 * 0.9f32.powi(k);
            assert!(
                (e.scroll.smoothed - expected).abs() < 5e-3,
                "k={k}: {} vs {}",
                e.scroll.smoothed,
                expected
            );
        }
    }

    #[test]
    fn scroll_target_clamps_at_zero() {
        let mut e = engine_at(1024.0, 768.0);
        e.add_scroll(-500.0);
        assert_eq!(e.scroll.target, 0.0);
    }

    #[test]
    fn zero_area_viewport_ticks_quietly() {
        let mut e = Engine::new(1, Variant::Composite, false);
        e.resize(0.0, 0.0);
        let mut surf = Surface::new(0, 0);
        for _ in 0..5 {
            e.tick(&mut surf);
        }
        assert!(e.drops.is_empty());
    }

    #[test]
    fn split_layout_halves_the_rain() {
        let mut e = Engine::new(2, Variant::Composite, true);
        e.resize(1400.0, 800.0);
        assert!(e.split_active());
        assert_eq!(e.drops.len(), (700.0 / CELL_W) as usize);

        // split never applies to the mobile layout
        e.resize(500.0, 800.0);
        assert!(!e.split_active());
        assert_eq!(e.drops.len(), (500.0 / CELL_W) as usize);
    }

    #[test]
    fn tick_preserves_population() {
        let mut e = engine_at(1024.0, 768.0);
        let mut surf = Surface::new(73, 27);
        for _ in 0..30 {
            e.tick(&mut surf);
        }
        assert_eq!(e.gears.len(), 3);
        assert_eq!(e.drops.len(), (1024.0 / CELL_W) as usize);
    }

    #[test]
    fn wiremesh_tick_draws_near_the_pointer() {
        let mut e = Engine::new(3, Variant::Wiremesh, false);
        e.resize(1120.0, 756.0);
        e.pointer_moved(560.0, 378.0);
        let mut surf = Surface::new(80, 27);
        e.tick(&mut surf);
        assert!(surf.px.iter().any(|p| p.lit()));
    }

    #[test]
    fn variant_toggle_round_trips() {
        let mut e = engine_at(1024.0, 768.0);
        e.toggle_variant();
        assert_eq!(e.variant, Variant::Wiremesh);
        e.toggle_variant();
        assert_eq!(e.variant, Variant::Composite);
        assert_eq!(e.gears.len(), 3);
    }
}
