//! The drawing surface: an RGB braille-subpixel buffer plus a glyph cell
//! layer, with canvas-style paths and a translate/rotate transform stack.
//!
//! Logical units map onto the terminal so that one glyph cell is 14×28
//! units and one braille subpixel (2×4 per cell) is exactly 7 units in both
//! axes. All engine constants stay in logical units; only this module knows
//! the device scale.

use crate::color::Rgba;
use crate::geometry::{PathCmd, Vec2};
use std::f32::consts::TAU;

pub(crate) const CELL_W: f32 = 14.0;
pub(crate) const CELL_H: f32 = 28.0;
/// Logical units per braille subpixel.
pub(crate) const PX_UNIT: f32 = 7.0;

/// One subpixel, premultiplied over the black background.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) struct Ink {
    pub(crate) r: u8,
    pub(crate) g: u8,
    pub(crate) b: u8,
}

impl Ink {
    pub(crate) fn lit(self) -> bool {
        self.r.max(self.g).max(self.b) >= 16
    }

    fn blend(&mut self, src: Rgba) {
        let a = src.a.clamp(0.0, 1.0);
        let mix = |d: u8, s: u8| -> u8 {
            (d as f32 * (1.0 - a) + s as f32 * a + 0.5).clamp(0.0, 255.0) as u8
        };
        self.r = mix(self.r, src.r);
        self.g = mix(self.g, src.g);
        self.b = mix(self.b, src.b);
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct Glyph {
    pub(crate) ch: char,
    pub(crate) ink: Ink,
}

/// Row-major 2D affine, canvas convention (right-multiplied composition).
#[derive(Clone, Copy)]
struct Transform {
    a: f32,
    b: f32,
    c: f32,
    d: f32,
    e: f32,
    f: f32,
}

impl Transform {
    const IDENTITY: Transform = Transform {
        a: 1.0,
        b: 0.0,
        c: 0.0,
        d: 1.0,
        e: 0.0,
        f: 0.0,
    };

    fn apply(&self, p: Vec2) -> Vec2 {
        Vec2::new(
            self.a * p.x + self.c * p.y + self.e,
            self.b * p.x + self.d * p.y + self.f,
        )
    }

    fn translate(&mut self, tx: f32, ty: f32) {
        self.e += self.a * tx + self.c * ty;
        self.f += self.b * tx + self.d * ty;
    }

    fn rotate(&mut self, angle: f32) {
        let (s, c) = angle.sin_cos();
        let (a, b) = (self.a, self.b);
        let (cc, d) = (self.c, self.d);
        self.a = a * c + cc * s;
        self.b = b * c + d * s;
        self.c = -a * s + cc * c;
        self.d = -b * s + d * c;
    }
}

pub(crate) struct Surface {
    pub(crate) cols: u16,
    pub(crate) rows: u16,
    pub(crate) px_w: i32,
    pub(crate) px_h: i32,
    pub(crate) px: Vec<Ink>,
    pub(crate) glyphs: Vec<Option<Glyph>>,
    /// Flattened subpaths in device (subpixel) coordinates.
    subpaths: Vec<Vec<Vec2>>,
    xf: Transform,
    stack: Vec<Transform>,
}

impl Surface {
    pub(crate) fn new(cols: u16, rows: u16) -> Self {
        let px_w = cols as i32 * 2;
        let px_h = rows as i32 * 4;
        Self {
            cols,
            rows,
            px_w,
            px_h,
            px: vec![Ink::default(); (px_w * px_h).max(0) as usize],
            glyphs: vec![None; cols as usize * rows as usize],
            subpaths: Vec::new(),
            xf: Transform::IDENTITY,
            stack: Vec::new(),
        }
    }

    pub(crate) fn logical_width(&self) -> f32 {
        self.cols as f32 * CELL_W
    }

    pub(crate) fn logical_height(&self) -> f32 {
        self.rows as f32 * CELL_H
    }

    fn px_idx(&self, x: i32, y: i32) -> Option<usize> {
        if x < 0 || y < 0 || x >= self.px_w || y >= self.px_h {
            None
        } else {
            Some((y * self.px_w + x) as usize)
        }
    }

    fn glyph_idx(&self, cx: i32, cy: i32) -> Option<usize> {
        if cx < 0 || cy < 0 || cx >= self.cols as i32 || cy >= self.rows as i32 {
            None
        } else {
            Some(cy as usize * self.cols as usize + cx as usize)
        }
    }

    pub(crate) fn glyph_at(&self, cx: u16, cy: u16) -> Option<Glyph> {
        self.glyph_idx(cx as i32, cy as i32)
            .and_then(|i| self.glyphs[i])
    }

    /* ---- transform stack ---- */

    pub(crate) fn save(&mut self) {
        self.stack.push(self.xf);
    }

    pub(crate) fn restore(&mut self) {
        if let Some(t) = self.stack.pop() {
            self.xf = t;
        }
    }

    pub(crate) fn translate(&mut self, tx: f32, ty: f32) {
        self.xf.translate(tx, ty);
    }

    pub(crate) fn rotate(&mut self, angle: f32) {
        self.xf.rotate(angle);
    }

    /* ---- path construction ---- */

    fn to_device(&self, p: Vec2) -> Vec2 {
        let q = self.xf.apply(p);
        Vec2::new(q.x / PX_UNIT, q.y / PX_UNIT)
    }

    pub(crate) fn begin_path(&mut self) {
        self.subpaths.clear();
    }

    pub(crate) fn move_to(&mut self, x: f32, y: f32) {
        let p = self.to_device(Vec2::new(x, y));
        self.subpaths.push(vec![p]);
    }

    pub(crate) fn line_to(&mut self, x: f32, y: f32) {
        let p = self.to_device(Vec2::new(x, y));
        match self.subpaths.last_mut() {
            Some(sp) => sp.push(p),
            None => self.subpaths.push(vec![p]),
        }
    }

    /// Arc swept from `start` to `end` radians, flattened into segments.
    /// Connects with a line from the current point, as on a 2D canvas.
    pub(crate) fn arc(&mut self, cx: f32, cy: f32, radius: f32, start: f32, end: f32) {
        let sweep = end - start;
        let steps = ((sweep.abs() / TAU * 64.0).ceil() as usize).max(2);
        for i in 0..=steps {
            let a = start + sweep * i as f32 / steps as f32;
            let x = cx + a.cos() * radius;
            let y = cy + a.sin() * radius;
            if i == 0 && self.subpaths.last().map_or(true, |sp| sp.is_empty()) {
                self.move_to(x, y);
            } else {
                self.line_to(x, y);
            }
        }
    }

    pub(crate) fn close_path(&mut self) {
        if let Some(sp) = self.subpaths.last_mut() {
            if let Some(&first) = sp.first() {
                sp.push(first);
            }
        }
    }

    /// Replay a prebuilt command list through the current transform.
    pub(crate) fn run_path(&mut self, cmds: &[PathCmd]) {
        for cmd in cmds {
            match *cmd {
                PathCmd::MoveTo(p) => self.move_to(p.x, p.y),
                PathCmd::LineTo(p) => self.line_to(p.x, p.y),
                PathCmd::Arc {
                    center,
                    radius,
                    start,
                    end,
                } => self.arc(center.x, center.y, radius, start, end),
                PathCmd::Close => self.close_path(),
            }
        }
    }

    /* ---- painting ---- */

    /// Axis-aligned rect fill in logical coordinates, alpha-blended over
    /// the buffer. Glyphs under the rect fade toward the fill color and are
    /// dropped once no longer visible; this is what makes trails decay.
    pub(crate) fn fill_rect(&mut self, x: f32, y: f32, w: f32, h: f32, color: Rgba) {
        if w <= 0.0 || h <= 0.0 {
            return;
        }
        let x0 = ((x / PX_UNIT).floor() as i32).max(0);
        let y0 = ((y / PX_UNIT).floor() as i32).max(0);
        let x1 = (((x + w) / PX_UNIT).ceil() as i32).min(self.px_w);
        let y1 = (((y + h) / PX_UNIT).ceil() as i32).min(self.px_h);

        for py in y0..y1 {
            for px in x0..x1 {
                if let Some(i) = self.px_idx(px, py) {
                    self.px[i].blend(color);
                }
            }
        }

        let cx0 = ((x / CELL_W).floor() as i32).max(0);
        let cy0 = ((y / CELL_H).floor() as i32).max(0);
        let cx1 = (((x + w) / CELL_W).ceil() as i32).min(self.cols as i32);
        let cy1 = (((y + h) / CELL_H).ceil() as i32).min(self.rows as i32);

        for cy in cy0..cy1 {
            for cx in cx0..cx1 {
                if let Some(i) = self.glyph_idx(cx, cy) {
                    if let Some(g) = self.glyphs[i].as_mut() {
                        g.ink.blend(color);
                        if !g.ink.lit() {
                            self.glyphs[i] = None;
                        }
                    }
                }
            }
        }
    }

    /// Hard clear: pixels to black, glyphs removed.
    pub(crate) fn clear_rect(&mut self, x: f32, y: f32, w: f32, h: f32) {
        if w <= 0.0 || h <= 0.0 {
            return;
        }
        let x0 = ((x / PX_UNIT).floor() as i32).max(0);
        let y0 = ((y / PX_UNIT).floor() as i32).max(0);
        let x1 = (((x + w) / PX_UNIT).ceil() as i32).min(self.px_w);
        let y1 = (((y + h) / PX_UNIT).ceil() as i32).min(self.px_h);
        for py in y0..y1 {
            for px in x0..x1 {
                if let Some(i) = self.px_idx(px, py) {
                    self.px[i] = Ink::default();
                }
            }
        }

        let cx0 = ((x / CELL_W).floor() as i32).max(0);
        let cy0 = ((y / CELL_H).floor() as i32).max(0);
        let cx1 = (((x + w) / CELL_W).ceil() as i32).min(self.cols as i32);
        let cy1 = (((y + h) / CELL_H).ceil() as i32).min(self.rows as i32);
        for cy in cy0..cy1 {
            for cx in cx0..cx1 {
                if let Some(i) = self.glyph_idx(cx, cy) {
                    self.glyphs[i] = None;
                }
            }
        }
    }

    /// Even-odd scanline fill of the current path. A near-opaque fill
    /// (alpha ≥ 0.5) occludes: glyph cells under covered subpixels are
    /// removed, so filled shapes sit on top of the rain.
    pub(crate) fn fill_path(&mut self, color: Rgba) {
        let occlude = color.a >= 0.5;
        let polys = self.subpaths.clone();
        if polys.iter().all(|p| p.len() < 3) {
            return;
        }

        let mut min_y = f32::INFINITY;
        let mut max_y = f32::NEG_INFINITY;
        for p in polys.iter().flatten() {
            min_y = min_y.min(p.y);
            max_y = max_y.max(p.y);
        }
        let y0 = (min_y.floor() as i32).max(0);
        let y1 = (max_y.ceil() as i32).min(self.px_h - 1);

        let mut xs: Vec<f32> = Vec::new();
        for py in y0..=y1 {
            let yc = py as f32 + 0.5;
            xs.clear();
            for poly in &polys {
                if poly.len() < 3 {
                    continue;
                }
                let n = poly.len();
                for i in 0..n {
                    let a = poly[i];
                    let b = poly[(i + 1) % n];
                    if (a.y <= yc && b.y > yc) || (b.y <= yc && a.y > yc) {
                        let t = (yc - a.y) / (b.y - a.y);
                        xs.push(a.x + (b.x - a.x) * t);
                    }
                }
            }
            xs.sort_by(|l, r| l.partial_cmp(r).unwrap_or(std::cmp::Ordering::Equal));

            for pair in xs.chunks_exact(2) {
                let xa = (pair[0] - 0.5).ceil() as i32;
                let xb = (pair[1] - 0.5).floor() as i32;
                for px in xa.max(0)..=xb.min(self.px_w - 1) {
                    if let Some(i) = self.px_idx(px, py) {
                        self.px[i].blend(color);
                    }
                    if occlude {
                        if let Some(i) = self.glyph_idx(px / 2, py / 4) {
                            self.glyphs[i] = None;
                        }
                    }
                }
            }
        }
    }

    /// Stroke the current path one subpixel wide.
    pub(crate) fn stroke_path(&mut self, color: Rgba) {
        let polys = self.subpaths.clone();
        for poly in &polys {
            for seg in poly.windows(2) {
                self.draw_line(seg[0], seg[1], color);
            }
        }
    }

    fn draw_line(&mut self, a: Vec2, b: Vec2, color: Rgba) {
        let mut x0 = a.x.round() as i32;
        let mut y0 = a.y.round() as i32;
        let x1 = b.x.round() as i32;
        let y1 = b.y.round() as i32;

        let dx = (x1 - x0).abs();
        let dy = -(y1 - y0).abs();
        let sx = if x0 < x1 { 1 } else { -1 };
        let sy = if y0 < y1 { 1 } else { -1 };
        let mut err = dx + dy;

        loop {
            if let Some(i) = self.px_idx(x0, y0) {
                self.px[i].blend(color);
            }
            if x0 == x1 && y0 == y1 {
                break;
            }
            let e2 = 2 * err;
            if e2 >= dy {
                err += dy;
                x0 += sx;
            }
            if e2 <= dx {
                err += dx;
                y0 += sy;
            }
        }
    }

    /// Place one glyph at a logical position. The cell keeps the glyph and
    /// its color (premultiplied by alpha) until painted or faded over.
    pub(crate) fn fill_text(&mut self, ch: char, x: f32, y: f32, color: Rgba) {
        let p = self.xf.apply(Vec2::new(x, y));
        let cx = (p.x / CELL_W).floor() as i32;
        let cy = (p.y / CELL_H).floor() as i32;
        if let Some(i) = self.glyph_idx(cx, cy) {
            let a = color.a.clamp(0.0, 1.0);
            let ink = Ink {
                r: (color.r as f32 * a + 0.5) as u8,
                g: (color.g as f32 * a + 0.5) as u8,
                b: (color.b as f32 * a + 0.5) as u8,
            };
            self.glyphs[i] = Some(Glyph { ch, ink });
        }
    }
}
