//! Headless demo entry point
//!
//! Runs a short scripted session against the simulation core: start a game,
//! aim, charge, fire, let the field evolve, then save and reload a snapshot.
//! Useful as a smoke test and as a usage example for frontend authors.

use std::path::PathBuf;

use glam::Vec2;
use log::info;

use gunfield::persistence::{load_snapshot, save_snapshot};
use gunfield::sim::events::GameEvent;
use gunfield::sim::scheduler::JobMode;
use gunfield::{Game, Tuning};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let tuning = Tuning::default();
    let seed = std::env::args()
        .nth(1)
        .and_then(|s| s.parse().ok())
        .unwrap_or(0xC0FFEE);

    let mut game = Game::new(tuning.clone(), seed)?;
    game.new_game();

    // Aim toward the middle of the target zone and charge for a while
    game.set_pointer(Vec2::new(560.0, 420.0));
    game.fire_start();
    for _ in 0..30 {
        game.step();
    }
    game.fire_end();

    let mut hits = 0;
    for tick in 0..400 {
        for event in game.step() {
            match event {
                GameEvent::HitScored { bullet_number, .. } => {
                    hits += 1;
                    info!("tick {tick}: bullet {bullet_number} scored");
                }
                GameEvent::RoundOver { shots } => {
                    info!("tick {tick}: round over after {shots} shots");
                }
                _ => {}
            }
        }
    }
    println!("after 400 ticks: score {}, {} hits observed", game.score, hits);

    let save_path = PathBuf::from("gunfield-save.json");
    save_snapshot(&save_path, &game.get_state())?;

    let mut restored = Game::new(tuning.clone(), seed)?;
    let snapshot = load_snapshot(&save_path, &tuning)?;
    restored.set_state(&snapshot, JobMode::Active)?;
    println!(
        "reloaded save: score {}, {} targets standing",
        restored.score,
        restored.arena.targets.len()
    );

    Ok(())
}
