//! Pure geometry: gear outlines as path commands, no drawing here.

use std::f32::consts::TAU;

#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct Vec2 {
    pub(crate) x: f32,
    pub(crate) y: f32,
}

impl Vec2 {
    pub(crate) const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub(crate) fn dist(self, other: Vec2) -> f32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }
}

fn polar(angle: f32, radius: f32) -> Vec2 {
    Vec2::new(angle.cos() * radius, angle.sin() * radius)
}

/// One drawing-surface path command, in user-space coordinates.
#[derive(Clone, Copy, Debug)]
pub(crate) enum PathCmd {
    MoveTo(Vec2),
    LineTo(Vec2),
    /// Circular arc swept from `start` to `end` (radians). Connects with a
    /// line from the current point, as a canvas arc does.
    Arc {
        center: Vec2,
        radius: f32,
        start: f32,
        end: f32,
    },
    Close,
}

/// How far a tooth tip sticks out past the outer rim, in logical units.
pub(crate) const TOOTH_LIP: f32 = 8.0;
/// Inner rim as a fraction of the outer radius.
pub(crate) const INNER_RIM: f32 = 0.85;
/// Structural ring and hub radii, as fractions of the outer radius.
pub(crate) const RING: f32 = 0.6;
pub(crate) const HUB: f32 = 0.3;

/// Closed tooth outline for a gear centered at the origin.
///
/// Per tooth: tip at `radius + TOOTH_LIP`, drop to the outer rim, step in to
/// the inner rim, then an inner-rim arc to the next tooth's start angle.
/// Teeth occupy exactly half the angular period; the arc covers the rest.
pub(crate) fn gear_outline(radius: f32, teeth: u32) -> Vec<PathCmd> {
    let mut cmds = Vec::with_capacity(teeth as usize * 4 + 1);
    let inner = radius * INNER_RIM;

    for i in 0..teeth {
        let a = TAU * i as f32 / teeth as f32;
        let half = TAU / (teeth as f32 * 2.0);

        let tip = polar(a, radius + TOOTH_LIP);
        if i == 0 {
            cmds.push(PathCmd::MoveTo(tip));
        } else {
            cmds.push(PathCmd::LineTo(tip));
        }
        cmds.push(PathCmd::LineTo(polar(a + half, radius)));
        cmds.push(PathCmd::LineTo(polar(a + half, inner)));
        cmds.push(PathCmd::Arc {
            center: Vec2::new(0.0, 0.0),
            radius: inner,
            start: a + half,
            end: a + TAU / teeth as f32,
        });
    }

    cmds.push(PathCmd::Close);
    cmds
}

/// Decorations drawn on top of the outline: a stroked structural ring, a
/// filled hub, and two perpendicular spokes spanning the inner rim.
pub(crate) struct GearTrim {
    pub(crate) ring_radius: f32,
    pub(crate) hub_radius: f32,
    pub(crate) spoke_half: f32,
}

pub(crate) fn gear_trim(radius: f32) -> GearTrim {
    GearTrim {
        ring_radius: radius * RING,
        hub_radius: radius * HUB,
        spoke_half: radius * INNER_RIM,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tip_count(cmds: &[PathCmd], radius: f32) -> usize {
        let lip = radius + TOOTH_LIP;
        cmds.iter()
            .filter(|c| {
                let p = match c {
                    PathCmd::MoveTo(p) | PathCmd::LineTo(p) => *p,
                    _ => return false,
                };
                (p.dist(Vec2::new(0.0, 0.0)) - lip).abs() < 1e-3
            })
            .count()
    }

    #[test]
    fn one_tip_per_tooth() {
        for teeth in [3u32, 12, 16, 20, 32] {
            let cmds = gear_outline(60.0, teeth);
            assert_eq!(tip_count(&cmds, 60.0), teeth as usize, "teeth={teeth}");
        }
    }

    #[test]
    fn outline_is_closed() {
        let cmds = gear_outline(100.0, 32);
        assert!(matches!(cmds.first(), Some(PathCmd::MoveTo(_))));
        assert!(matches!(cmds.last(), Some(PathCmd::Close)));
    }

    #[test]
    fn last_arc_returns_to_start_angle() {
        let teeth = 12u32;
        let cmds = gear_outline(40.0, teeth);
        let last_arc = cmds
            .iter()
            .rev()
            .find_map(|c| match c {
                PathCmd::Arc { end, .. } => Some(*end),
                _ => None,
            })
            .unwrap();
        // the final inner-rim arc lands on the first tooth's start angle
        assert!((last_arc - TAU).abs() < 1e-4);
    }

    #[test]
    fn rim_radii_ordered() {
        let r = 80.0;
        let trim = gear_trim(r);
        assert!(trim.hub_radius < trim.ring_radius);
        assert!(trim.ring_radius < trim.spoke_half);
        assert!(trim.spoke_half < r);
    }
}
