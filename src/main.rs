mod app;
mod color;
mod engine;
mod gears;
mod geometry;
mod matrix;
mod mesh;
mod surface;
mod term;

use anyhow::Result;
use clap::Parser;

/// gearfall: matrix rain with rotating gears, or a pointer-heated
/// wiremesh, as a terminal background toy.
#[derive(Parser, Debug)]
#[command(version)]
pub(crate) struct Args {
    /// frame cap in frames per second
    #[arg(long, default_value_t = 30)]
    fps: u32,

    /// RNG seed; 0 derives one from the clock
    #[arg(long, default_value_t = 0)]
    seed: u64,

    /// start in the wiremesh variant
    #[arg(long, default_value_t = false)]
    wiremesh: bool,

    /// start with the split-screen desktop layout
    #[arg(long, default_value_t = false)]
    split: bool,

    /// show the HUD line on start
    #[arg(long, default_value_t = false)]
    hud: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();
    app::run(&args)
}
