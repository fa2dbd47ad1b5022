use std::io::Write;

use clap::Parser;
use skirmish_lib::{Game, GameConfig};

#[derive(Parser, Debug)]
#[command(name = "skirmish")]
#[command(about = "Run a headless RTS skirmish and print it as ASCII frames")]
struct Args {
    /// Random seed for map generation and combat
    #[arg(long, default_value = "1")]
    seed: u64,

    /// Map width in tiles
    #[arg(long, default_value = "64", value_parser = clap::value_parser!(i32).range(24..=512))]
    width: i32,

    /// Map height in tiles
    #[arg(long, default_value = "32", value_parser = clap::value_parser!(i32).range(12..=512))]
    height: i32,

    /// Units per team
    #[arg(long, default_value = "6")]
    units: usize,

    /// Ticks to simulate
    #[arg(long, default_value = "1000")]
    ticks: u64,

    /// Print a frame every N ticks (0 prints only the first and last)
    #[arg(long, default_value = "100")]
    frame_every: u64,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let args = Args::parse();

    let mut game = Game::new(&GameConfig {
        seed: args.seed,
        width: args.width,
        height: args.height,
        units: args.units,
    });

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    writeln!(out, "{}\n{}", game.summary(), game.render())?;

    for _ in 0..args.ticks {
        game.step();
        if game.is_over() {
            break;
        }
        if args.frame_every > 0 && game.tick % args.frame_every == 0 {
            writeln!(out, "{}\n{}", game.summary(), game.render())?;
        }
    }

    writeln!(out, "{}\n{}", game.summary(), game.render())?;
    writeln!(out, "navigation: {}", game.nav.stats())?;
    Ok(())
}
