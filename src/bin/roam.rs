//! Headless world walker — drives a scripted session against a world.
//!
//! Usage: cargo run --bin roam -- [OPTIONS]
//!
//! Options:
//!   --config <PATH>   Load world configuration from a JSON file
//!   --size <N>        Map side length (default: 32)
//!   --seed <SEED>     Random seed (default: 12345)
//!   --steps <N>       Number of scripted frames to run (default: 600)
//!
//! The script walks the player forward with a slow turn, places a block
//! whenever the crosshair rests on terrain, and runs one block-finder round.
//! Useful for smoke-testing world behavior without a renderer attached.

use std::path::PathBuf;

use voxwalk::world::{InputEvent, WorldConfig, WorldContext};

fn main() {
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or("info"),
    )
    .format_timestamp_millis()
    .init();

    let args: Vec<String> = std::env::args().collect();
    let steps = parse_usize_arg(&args, "--steps").unwrap_or(600);

    let mut config = match parse_str_arg(&args, "--config") {
        Some(path) => WorldConfig::load(&PathBuf::from(path))
            .expect("Failed to load world config"),
        None => WorldConfig::default(),
    };
    if let Some(size) = parse_i32_arg(&args, "--size") {
        config.map_size = size;
    }
    if let Some(seed) = parse_u32_arg(&args, "--seed") {
        config.seed = seed;
    }

    println!("=== Voxwalk Roamer ===");
    println!("Map:   {}x{}", config.map_size, config.map_size);
    println!("Seed:  {}", config.seed);
    println!("Steps: {}", steps);
    println!();

    let mut world = WorldContext::new(config);
    world.handle_event(InputEvent::StartGame).expect("start game");

    let mut moves = 0u32;
    let mut blocked = 0u32;
    let mut placed = 0u32;
    for frame in 0..steps {
        // Steady walk with a slow drift to the left
        if world.handle_event(InputEvent::MoveForward).expect("move") {
            moves += 1;
        } else {
            blocked += 1;
            world.handle_event(InputEvent::TurnLeft).expect("turn");
        }
        if frame % 7 == 0 {
            world.handle_event(InputEvent::TurnLeft).expect("turn");
        }

        // Glance down every few seconds and drop a block if terrain is there
        if frame % 180 == 120 {
            world
                .handle_event(InputEvent::Look { dx: 0.0, dy: 45.0 })
                .expect("look");
            if world.handle_event(InputEvent::PlaceBlock).expect("place") {
                placed += 1;
            }
            world
                .handle_event(InputEvent::Look { dx: 0.0, dy: -45.0 })
                .expect("look");
        }

        world.handle_event(InputEvent::ClickBlock).expect("click");
        world.tick(1.0 / 60.0);
    }

    println!("{}", world.game().hud_line());
    println!(
        "Frames: {} ({} moves, {} blocked, {} blocks placed)",
        steps, moves, blocked, placed
    );
    println!("Final eye: {:?}", world.camera().eye);
}

fn parse_i32_arg(args: &[String], flag: &str) -> Option<i32> {
    args.iter().position(|a| a == flag)
        .and_then(|i| args.get(i + 1))
        .and_then(|s| s.parse().ok())
}

fn parse_u32_arg(args: &[String], flag: &str) -> Option<u32> {
    args.iter().position(|a| a == flag)
        .and_then(|i| args.get(i + 1))
        .and_then(|s| s.parse().ok())
}

fn parse_usize_arg(args: &[String], flag: &str) -> Option<usize> {
    args.iter().position(|a| a == flag)
        .and_then(|i| args.get(i + 1))
        .and_then(|s| s.parse().ok())
}

fn parse_str_arg(args: &[String], flag: &str) -> Option<String> {
    args.iter().position(|a| a == flag)
        .and_then(|i| args.get(i + 1))
        .map(|s| s.clone())
}
