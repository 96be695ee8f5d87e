//! Falling-glyph columns for the composite background.

use crate::color::{CYAN, WHITE};
use crate::surface::{Surface, CELL_W};
use rand::{rngs::StdRng, Rng};

/// Chance per tick that a drop swaps its displayed glyph.
const REROLL: f64 = 0.1;
/// Chance per over-bottom tick that a drop recycles to the top. Drops past
/// the bottom linger until this fires, so resets stay staggered instead of
/// wrapping in lockstep.
const RECYCLE: f64 = 0.02;

pub(crate) struct Drop {
    pub(crate) x: f32,
    pub(crate) y: f32,
    pub(crate) speed: f32,
    pub(crate) glyph: char,
}

impl Drop {
    fn new(x: f32, height: f32, rng: &mut StdRng) -> Self {
        Self {
            x,
            y: rng.gen_range(0.0..height),
            speed: rand_speed(rng),
            glyph: rand_glyph(rng),
        }
    }

    pub(crate) fn update(&mut self, height: f32, rng: &mut StdRng) {
        if rng.gen_bool(REROLL) {
            self.glyph = rand_glyph(rng);
        }

        self.y += self.speed;

        if self.y > height && rng.gen_bool(RECYCLE) {
            self.y = -CELL_W;
            self.speed = rand_speed(rng);
        }
    }

    pub(crate) fn draw(&self, surf: &mut Surface) {
        // dim body, bright leading glyph one cell below
        surf.fill_text(self.glyph, self.x, self.y, CYAN.with_alpha(0.25));
        surf.fill_text(self.glyph, self.x, self.y + CELL_W, WHITE);
    }
}

/// One drop per glyph column across the drawable width, first-frame y
/// scattered over the full height so the rain never starts synchronized.
pub(crate) fn init_drops(drawable_w: f32, height: f32, rng: &mut StdRng) -> Vec<Drop> {
    if drawable_w < CELL_W || height <= 0.0 {
        return Vec::new();
    }
    let columns = (drawable_w / CELL_W).floor() as usize;
    (0..columns)
        .map(|i| Drop::new(i as f32 * CELL_W, height, rng))
        .collect()
}

fn rand_speed(rng: &mut StdRng) -> f32 {
    rng.gen_range(1.0..4.0)
}

fn rand_glyph(rng: &mut StdRng) -> char {
    // mostly Katakana with hex digits mixed in
    let roll: u8 = rng.gen_range(0..=99);
    if roll < 80 {
        char::from_u32(rng.gen_range(0x30A0u32..=0x30FFu32)).unwrap_or('ッ')
    } else if roll < 90 {
        rng.gen_range(b'0'..=b'9') as char
    } else {
        rng.gen_range(b'A'..=b'F') as char
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    #[test]
    fn one_drop_per_column() {
        let mut rng = StdRng::seed_from_u64(7);
        for w in [140.0, 141.0, 1024.0, 768.0, 13.9] {
            let drops = init_drops(w, 400.0, &mut rng);
            assert_eq!(drops.len(), (w / CELL_W).floor() as usize, "w={w}");
        }
    }

    #[test]
    fn degenerate_viewport_yields_no_drops() {
        let mut rng = StdRng::seed_from_u64(7);
        assert!(init_drops(0.0, 400.0, &mut rng).is_empty());
        assert!(init_drops(500.0, 0.0, &mut rng).is_empty());
    }

    #[test]
    fn drops_start_scattered_in_view() {
        let mut rng = StdRng::seed_from_u64(42);
        let drops = init_drops(1400.0, 600.0, &mut rng);
        assert!(drops.iter().all(|d| (0.0..600.0).contains(&d.y)));
        let min = drops.iter().map(|d| d.y).fold(f32::INFINITY, f32::min);
        let max = drops.iter().map(|d| d.y).fold(0.0f32, f32::max);
        assert!(max - min > 100.0, "first frame should not look synchronized");
    }

    #[test]
    fn recycle_resets_above_top_with_fresh_speed() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut d = Drop::new(0.0, 100.0, &mut rng);
        d.y = 101.0;
        d.speed = 0.0; // hold position so only the recycle roll moves it
        let mut recycled = false;
        for _ in 0..10_000 {
            d.update(100.0, &mut rng);
            if d.y < 0.0 {
                recycled = true;
                break;
            }
        }
        assert!(recycled, "probabilistic recycle should fire eventually");
        assert_eq!(d.y, -CELL_W);
        assert!((1.0..4.0).contains(&d.speed));
    }

    #[test]
    fn speeds_in_range() {
        let mut rng = StdRng::seed_from_u64(9);
        let drops = init_drops(2800.0, 500.0, &mut rng);
        assert!(drops.iter().all(|d| (1.0..4.0).contains(&d.speed)));
    }

    #[test]
    fn glyphs_come_from_the_alphabet() {
        let mut rng = StdRng::seed_from_u64(11);
        for _ in 0..500 {
            let g = rand_glyph(&mut rng);
            let ok = ('\u{30A0}'..='\u{30FF}').contains(&g)
                || g.is_ascii_digit()
                || ('A'..='F').contains(&g);
            assert!(ok, "unexpected glyph {g:?}");
        }
    }
}
