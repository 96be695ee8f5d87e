//! Rotating gear overlays: immutable per-gear config plus one rotation
//! accumulator that survives across ticks.

use crate::color::{Rgba, AMBER, CYAN, GEAR_PLATE};
use crate::engine::LayoutMode;
use crate::geometry::{self, Vec2};
use crate::surface::Surface;

/// Idle spin per tick, before the per-gear multiplier.
const BASE_SPIN: f32 = 0.002;
/// Rendered rotation gained per unit of smoothed scroll offset.
const SCROLL_COUPLING: f32 = 0.005;

/// Immutable layout-time configuration for one gear.
#[derive(Clone, Copy, Debug)]
pub(crate) struct GearSpec {
    pub(crate) center: Vec2,
    pub(crate) radius: f32,
    pub(crate) teeth: u32,
    pub(crate) speed_mult: f32,
    pub(crate) color: Rgba,
}

pub(crate) struct Gear {
    pub(crate) spec: GearSpec,
    pub(crate) base_angle: f32,
}

impl Gear {
    fn new(spec: GearSpec) -> Self {
        Self {
            spec,
            base_angle: 0.0,
        }
    }

    /// Idle spin: unconditional, monotone in magnitude.
    pub(crate) fn update(&mut self) {
        self.base_angle += BASE_SPIN * self.spec.speed_mult;
    }

    /// The scroll term is recomputed from the current smoothed offset every
    /// frame and never folded into `base_angle`, so reversing scroll
    /// visibly unwinds it while the idle spin keeps going.
    pub(crate) fn rendered_rotation(&self, smoothed_scroll: f32) -> f32 {
        self.base_angle + smoothed_scroll * SCROLL_COUPLING * self.spec.speed_mult
    }

    pub(crate) fn draw(&self, surf: &mut Surface, smoothed_scroll: f32) {
        let s = &self.spec;

        surf.save();
        surf.translate(s.center.x, s.center.y);
        surf.rotate(self.rendered_rotation(smoothed_scroll));

        surf.begin_path();
        surf.run_path(&geometry::gear_outline(s.radius, s.teeth));
        surf.fill_path(GEAR_PLATE);
        surf.stroke_path(s.color);

        let trim = geometry::gear_trim(s.radius);

        surf.begin_path();
        surf.arc(0.0, 0.0, trim.ring_radius, 0.0, std::f32::consts::TAU);
        surf.stroke_path(s.color);

        surf.begin_path();
        surf.arc(0.0, 0.0, trim.hub_radius, 0.0, std::f32::consts::TAU);
        surf.fill_path(s.color);

        surf.begin_path();
        surf.move_to(-trim.spoke_half, 0.0);
        surf.line_to(trim.spoke_half, 0.0);
        surf.move_to(0.0, -trim.spoke_half);
        surf.line_to(0.0, trim.spoke_half);
        surf.stroke_path(s.color);

        surf.restore();
    }
}

/// Hand-tuned gear placements per layout mode. Desktop gets three larger
/// gears clustered right of center; mobile tucks two small ones into the
/// bottom corner.
pub(crate) fn layout_gears(w: f32, h: f32, mode: LayoutMode) -> Vec<Gear> {
    let specs: Vec<GearSpec> = match mode {
        LayoutMode::Mobile => vec![
            GearSpec {
                center: Vec2::new(w * 0.9, h * 0.85),
                radius: 60.0,
                teeth: 16,
                speed_mult: 1.0,
                color: AMBER.with_alpha(0.3),
            },
            GearSpec {
                center: Vec2::new(w * 0.9 - 85.0, h * 0.85 - 50.0),
                radius: 30.0,
                teeth: 12,
                speed_mult: -1.5,
                color: CYAN.with_alpha(0.3),
            },
        ],
        LayoutMode::Desktop => {
            let cx = w * 0.8;
            let cy = h * 0.5;
            vec![
                GearSpec {
                    center: Vec2::new(cx, cy + 100.0),
                    radius: 100.0,
                    teeth: 32,
                    speed_mult: 1.0,
                    color: AMBER.with_alpha(0.4),
                },
                GearSpec {
                    center: Vec2::new(cx + 150.0, cy - 20.0),
                    radius: 60.0,
                    teeth: 20,
                    speed_mult: -1.6,
                    color: CYAN.with_alpha(0.4),
                },
                GearSpec {
                    center: Vec2::new(cx - 120.0, cy + 20.0),
                    radius: 40.0,
                    teeth: 12,
                    speed_mult: -2.5,
                    color: AMBER.with_alpha(0.4),
                },
            ]
        }
    };

    specs.into_iter().map(Gear::new).collect()
}
