//! Terminal session and presentation: a finished surface becomes braille
//! cells with glyph cells layered where text was drawn.

use crate::surface::Surface;
use anyhow::{Context, Result};
use crossterm::{
    cursor,
    event::{DisableMouseCapture, EnableMouseCapture},
    execute, queue,
    style::{Color, Print, ResetColor, SetBackgroundColor, SetForegroundColor},
    terminal::{
        self, BeginSynchronizedUpdate, Clear, ClearType, DisableLineWrap, EnableLineWrap,
        EndSynchronizedUpdate, EnterAlternateScreen, LeaveAlternateScreen,
    },
};
use std::io::{self, Write};

pub(crate) struct Terminal {
    out: io::Stdout,
    pub(crate) cols: u16,
    pub(crate) rows: u16,
    prev: Vec<(char, Color)>,
}

impl Terminal {
    /// Fails fast if the terminal cannot give us raw mode, the alternate
    /// screen, or its size; the engine cannot run degraded without them.
    pub(crate) fn begin() -> Result<Self> {
        let mut out = io::stdout();
        execute!(
            out,
            EnterAlternateScreen,
            cursor::Hide,
            DisableLineWrap,
            EnableMouseCapture,
            SetBackgroundColor(Color::Black),
            Clear(ClearType::All)
        )
        .context("terminal rejected alternate-screen setup")?;
        terminal::enable_raw_mode().context("could not enable raw mode")?;
        let (cols, rows) = terminal::size().context("could not query terminal size")?;

        Ok(Self {
            out,
            cols,
            rows,
            prev: vec![('\0', Color::Reset); cols as usize * rows as usize],
        })
    }

    pub(crate) fn end(&mut self) -> Result<()> {
        queue!(
            self.out,
            ResetColor,
            Clear(ClearType::All),
            cursor::Show,
            EnableLineWrap,
            DisableMouseCapture,
            LeaveAlternateScreen
        )?;
        self.out.flush()?;
        terminal::disable_raw_mode()?;
        Ok(())
    }

    pub(crate) fn resized(&mut self, cols: u16, rows: u16) {
        self.cols = cols;
        self.rows = rows;
        // '\0' never matches a composed cell, so everything repaints
        self.prev = vec![('\0', Color::Reset); cols as usize * rows as usize];
    }

    pub(crate) fn present(&mut self, surf: &Surface) -> Result<()> {
        queue!(self.out, BeginSynchronizedUpdate)?;

        let mut last_fg: Option<Color> = None;
        for cy in 0..self.rows.min(surf.rows) {
            for cx in 0..self.cols.min(surf.cols) {
                let cell = compose_cell(surf, cx, cy);
                let i = cy as usize * self.cols as usize + cx as usize;
                if self.prev[i] == cell {
                    continue;
                }
                self.prev[i] = cell;

                queue!(self.out, cursor::MoveTo(cx, cy))?;
                if last_fg != Some(cell.1) {
                    queue!(self.out, SetForegroundColor(cell.1))?;
                    last_fg = Some(cell.1);
                }
                queue!(self.out, Print(cell.0))?;
            }
        }

        queue!(self.out, ResetColor, EndSynchronizedUpdate)?;
        self.out.flush()?;
        Ok(())
    }
}

fn braille_bit(dx: i32, dy: i32) -> u8 {
    match (dx, dy) {
        (0, 0) => 0x01,
        (0, 1) => 0x02,
        (0, 2) => 0x04,
        (0, 3) => 0x40,
        (1, 0) => 0x08,
        (1, 1) => 0x10,
        (1, 2) => 0x20,
        (1, 3) => 0x80,
        _ => 0x00,
    }
}

/// Glyph layer wins; otherwise the cell's 2×4 subpixels become a braille
/// pattern colored by the average of its lit pixels.
fn compose_cell(surf: &Surface, cx: u16, cy: u16) -> (char, Color) {
    if let Some(g) = surf.glyph_at(cx, cy) {
        return (
            g.ch,
            Color::Rgb {
                r: g.ink.r,
                g: g.ink.g,
                b: g.ink.b,
            },
        );
    }

    let px0 = cx as i32 * 2;
    let py0 = cy as i32 * 4;
    let mut mask: u8 = 0;
    let mut sum = (0u32, 0u32, 0u32);
    let mut lit: u32 = 0;

    for dy in 0..4 {
        for dx in 0..2 {
            let x = px0 + dx;
            let y = py0 + dy;
            if x >= surf.px_w || y >= surf.px_h {
                continue;
            }
            let p = surf.px[(y * surf.px_w + x) as usize];
            if p.lit() {
                mask |= braille_bit(dx, dy);
                sum.0 += p.r as u32;
                sum.1 += p.g as u32;
                sum.2 += p.b as u32;
                lit += 1;
            }
        }
    }

    if lit == 0 {
        return (' ', Color::Reset);
    }

    let ch = char::from_u32(0x2800 + mask as u32).unwrap_or(' ');
    (
        ch,
        Color::Rgb {
            r: (sum.0 / lit) as u8,
            g: (sum.1 / lit) as u8,
            b: (sum.2 / lit) as u8,
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::WHITE;

    #[test]
    fn glyph_layer_wins_over_braille() {
        let mut s = Surface::new(4, 2);
        // light every subpixel of cell (0,0), then put a glyph on it
        for dy in 0..4 {
            for dx in 0..2 {
                s.px[(dy * s.px_w + dx) as usize] = crate::surface::Ink {
                    r: 255,
                    g: 255,
                    b: 255,
                };
            }
        }
        s.fill_text('ラ', 0.0, 0.0, WHITE);
        let (ch, _) = compose_cell(&s, 0, 0);
        assert_eq!(ch, 'ラ');
    }

    #[test]
    fn full_block_of_subpixels_is_full_braille() {
        let mut s = Surface::new(4, 2);
        for dy in 0..4 {
            for dx in 0..2 {
                s.px[(dy * s.px_w + dx) as usize] = crate::surface::Ink {
                    r: 0,
                    g: 243,
                    b: 255,
                };
            }
        }
        let (ch, fg) = compose_cell(&s, 0, 0);
        assert_eq!(ch, '\u{28FF}');
        assert_eq!(
            fg,
            Color::Rgb {
                r: 0,
                g: 243,
                b: 255
            }
        );
    }

    #[test]
    fn empty_cell_is_blank() {
        let s = Surface::new(4, 2);
        assert_eq!(compose_cell(&s, 1, 1), (' ', Color::Reset));
    }

    #[test]
    fn single_subpixel_sets_one_dot() {
        let mut s = Surface::new(4, 2);
        s.px[0] = crate::surface::Ink {
            r: 200,
            g: 0,
            b: 0,
        };
        let (ch, _) = compose_cell(&s, 0, 0);
        assert_eq!(ch, '\u{2801}');
    }
}
