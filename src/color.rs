//! Palette and the thermal distance ramp used by the wiremesh variant.

/// Straight (non-premultiplied) color. Channels are 0..=255, alpha 0..=1.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct Rgba {
    pub(crate) r: u8,
    pub(crate) g: u8,
    pub(crate) b: u8,
    pub(crate) a: f32,
}

impl Rgba {
    pub(crate) const fn new(r: u8, g: u8, b: u8, a: f32) -> Self {
        Self { r, g, b, a }
    }

    pub(crate) fn with_alpha(self, a: f32) -> Self {
        Self { a, ..self }
    }
}

pub(crate) const WHITE: Rgba = Rgba::new(255, 255, 255, 1.0);
pub(crate) const CYAN: Rgba = Rgba::new(0, 243, 255, 1.0);
pub(crate) const AMBER: Rgba = Rgba::new(255, 157, 0, 1.0);

/// Trail-fade fill: near-black so lit pixels decay instead of vanishing.
pub(crate) const TRAIL: Rgba = Rgba::new(3, 3, 3, 1.0);

/// Gear plate fill; dark and near-opaque so gears occlude the rain.
pub(crate) const GEAR_PLATE: Rgba = Rgba::new(5, 5, 5, 0.8);

/// Distance beyond which the thermal ramp is pinned at its coolest value.
pub(crate) const THERMAL_RADIUS: f32 = 350.0;

/// Normalized thermal parameter: 0 at the pointer, 1 at/beyond the
/// influence radius. Negative, NaN and infinite distances read as coldest.
pub(crate) fn thermal_k(dist: f32) -> f32 {
    if dist.is_finite() && dist >= 0.0 {
        (dist / THERMAL_RADIUS).min(1.0)
    } else {
        1.0
    }
}

/// Hue of the ramp in degrees: 0 (hot) at the pointer, 240 (cool) far away.
pub(crate) fn thermal_hue(dist: f32) -> f32 {
    240.0 * thermal_k(dist)
}

/// Full thermal color: hue ramp with lightness and alpha decaying with
/// distance, stable past the influence radius.
pub(crate) fn thermal(dist: f32) -> Rgba {
    let k = thermal_k(dist);
    let (r, g, b) = hsl_to_rgb(thermal_hue(dist), 1.0, 0.60 - 0.25 * k);
    Rgba::new(r, g, b, 0.85 - 0.60 * k)
}

/// h in degrees, s and l in 0..=1.
pub(crate) fn hsl_to_rgb(h: f32, s: f32, l: f32) -> (u8, u8, u8) {
    let h = h.rem_euclid(360.0);
    let c = (1.0 - (2.0 * l - 1.0).abs()) * s;
    let x = c * (1.0 - ((h / 60.0) % 2.0 - 1.0).abs());
    let m = l - c / 2.0;

    let (r, g, b) = match (h / 60.0) as u32 {
        0 => (c, x, 0.0),
        1 => (x, c, 0.0),
        2 => (0.0, c, x),
        3 => (0.0, x, c),
        4 => (x, 0.0, c),
        _ => (c, 0.0, x),
    };

    (
        ((r + m).clamp(0.0, 1.0) * 255.0 + 0.5) as u8,
        ((g + m).clamp(0.0, 1.0) * 255.0 + 0.5) as u8,
        ((b + m).clamp(0.0, 1.0) * 255.0 + 0.5) as u8,
    )
}
