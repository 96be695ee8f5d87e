//! Event loop: input collection, frame pacing, resize handling, present.

use crate::engine::{Engine, Variant};
use crate::surface::{Surface, CELL_H, CELL_W};
use crate::term::Terminal;
use crate::Args;
use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, MouseEventKind};
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

/// Logical units of page scroll per wheel notch.
const SCROLL_STEP: f32 = 120.0;

struct App {
    term: Terminal,
    surface: Surface,
    engine: Engine,
    frame_dt: Duration,
    show_hud: bool,
    should_quit: bool,
}

impl App {
    fn init(args: &Args) -> Result<Self> {
        let term = Terminal::begin()?;
        let surface = Surface::new(term.cols, term.rows);

        let variant = if args.wiremesh {
            Variant::Wiremesh
        } else {
            Variant::Composite
        };
        let seed = if args.seed == 0 { clock_seed() } else { args.seed };

        let mut engine = Engine::new(seed, variant, args.split);
        engine.resize(surface.logical_width(), surface.logical_height());

        let fps = args.fps.clamp(10, 120);

        Ok(Self {
            term,
            surface,
            engine,
            frame_dt: Duration::from_secs_f32(1.0 / fps as f32),
            show_hud: args.hud,
            should_quit: false,
        })
    }

    fn run(&mut self) -> Result<()> {
        let mut last_frame = Instant::now();

        while !self.should_quit {
            self.collect_input()?;

            self.engine.tick(&mut self.surface);
            if self.show_hud {
                self.draw_hud();
            }
            self.term.present(&self.surface)?;

            let elapsed = Instant::now().saturating_duration_since(last_frame);
            if elapsed < self.frame_dt {
                std::thread::sleep(self.frame_dt - elapsed);
            }
            last_frame = Instant::now();
        }

        Ok(())
    }

    fn collect_input(&mut self) -> Result<()> {
        while event::poll(Duration::from_millis(0))? {
            match event::read()? {
                Event::Key(k) => self.handle_key(k.code),
                Event::Resize(cols, rows) => {
                    // rebuild everything before the next tick reads it
                    self.term.resized(cols, rows);
                    self.surface = Surface::new(cols, rows);
                    self.engine
                        .resize(self.surface.logical_width(), self.surface.logical_height());
                }
                Event::Mouse(m) => match m.kind {
                    MouseEventKind::Moved | MouseEventKind::Drag(_) => {
                        self.engine.pointer_moved(
                            m.column as f32 * CELL_W + CELL_W * 0.5,
                            m.row as f32 * CELL_H + CELL_H * 0.5,
                        );
                    }
                    MouseEventKind::ScrollDown => self.engine.add_scroll(SCROLL_STEP),
                    MouseEventKind::ScrollUp => self.engine.add_scroll(-SCROLL_STEP),
                    _ => {}
                },
                _ => {}
            }
        }
        Ok(())
    }

    fn handle_key(&mut self, code: KeyCode) {
        match code {
            KeyCode::Char('q') | KeyCode::Esc => self.should_quit = true,
            KeyCode::Char('v') => self.engine.toggle_variant(),
            KeyCode::Char('s') => self.engine.toggle_split(),
            KeyCode::Char('r') => self.engine.reseed(clock_seed()),
            KeyCode::Char('h') => self.show_hud = !self.show_hud,
            _ => {}
        }
    }

    fn draw_hud(&mut self) {
        let hud = match self.engine.variant {
            Variant::Composite => format!(
                "composite  scroll:{:<6.0}  (v variant) (s split) (r reseed) (h hud) (q quit)",
                self.engine.scroll.target
            ),
            Variant::Wiremesh => format!(
                "wiremesh   tris:{:<6}  (v variant) (s split) (r reseed) (h hud) (q quit)",
                self.engine.mesh.triangle_count()
            ),
        };
        for (i, ch) in hud.chars().enumerate() {
            if i as f32 * CELL_W >= self.surface.logical_width() {
                break;
            }
            self.surface
                .fill_text(ch, i as f32 * CELL_W, 0.0, crate::color::WHITE.with_alpha(0.6));
        }
    }
}

fn clock_seed() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or(Duration::from_secs(0))
        .as_millis() as u64
}

pub(crate) fn run(args: &Args) -> Result<()> {
    let mut app = App::init(args)?;
    let result = app.run();
    app.term.end()?;
    result
}
