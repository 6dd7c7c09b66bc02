use std::time::{Instant, SystemTime, UNIX_EPOCH};

use log::info;

mod config;
mod entities;
mod game;
mod math;

use config::{WINDOW_HEIGHT, WINDOW_WIDTH};
use game::{Game, ParticleSystem};

fn main() {
    env_logger::init();

    let args: Vec<String> = std::env::args().collect();
    let seed = parse_seed(&args).unwrap_or_else(system_seed);
    info!("starting with seed {seed}");

    let (mut rl, thread) = raylib::init()
        .size(WINDOW_WIDTH, WINDOW_HEIGHT)
        .title("Iron Column")
        .build();
    rl.set_target_fps(60);

    let mut game = Game::new(seed);
    let mut particles = ParticleSystem::new(seed.wrapping_add(1));
    let clock = Instant::now();

    while !rl.window_should_close() {
        let now_ms = clock.elapsed().as_secs_f64() * 1000.0;
        let camera = game.camera();
        let input = game::input::sample(&rl, &camera, now_ms);

        game.update(&input);
        particles.absorb(game.drain_effects());
        particles.update();

        let mut d = rl.begin_drawing(&thread);
        game.draw(&mut d, &particles, now_ms);
    }
}

fn parse_seed(args: &[String]) -> Option<u64> {
    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        if arg == "--seed" {
            if let Some(value) = iter.next() {
                if let Ok(parsed) = value.parse::<u64>() {
                    return Some(parsed);
                }
            }
        }
    }
    None
}

fn system_seed() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_nanos() as u64
}
