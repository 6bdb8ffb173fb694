//! Snowcraft headless runner
//!
//! Plays the campaign with a scripted red team so the simulation can be
//! exercised without a renderer:
//!
//! ```text
//! snowcraft [seed] [tuning.json] [levels.json]
//! ```

use std::process::ExitCode;

use glam::Vec2;
use snowcraft::Engine;
use snowcraft::consts::FIXED_DT;
use snowcraft::sim::{GameEvent, GamePhase, Intent, Team};

/// Wind-up held before each scripted throw
const HOLD_TIME: f32 = 0.6;
/// Give up after ten simulated minutes
const MAX_FRAMES: u32 = 60 * 60 * 10;

fn read_config(path: Option<String>) -> Result<Option<String>, std::io::Error> {
    path.map(std::fs::read_to_string).transpose()
}

#[cfg(not(target_arch = "wasm32"))]
fn main() -> ExitCode {
    env_logger::init();
    run()
}

#[cfg(target_arch = "wasm32")]
fn main() -> ExitCode {
    // No logger backend on wasm; hosts embed the library instead
    run()
}

fn run() -> ExitCode {
    let mut args = std::env::args().skip(1);
    let seed = match args.next().map(|s| s.parse::<u64>()) {
        Some(Ok(seed)) => seed,
        Some(Err(err)) => {
            log::error!("Invalid seed: {err}");
            return ExitCode::FAILURE;
        }
        None => 0x5eed,
    };
    let (tuning, levels) = match (read_config(args.next()), read_config(args.next())) {
        (Ok(tuning), Ok(levels)) => (tuning, levels),
        (Err(err), _) | (_, Err(err)) => {
            log::error!("Failed to read config: {err}");
            return ExitCode::FAILURE;
        }
    };
    let mut engine = match Engine::from_json(seed, tuning.as_deref(), levels.as_deref()) {
        Ok(engine) => engine,
        Err(err) => {
            log::error!("Bad config: {err}");
            return ExitCode::FAILURE;
        }
    };

    engine.submit(Intent::StartGame);

    let mut held = 0.0;
    let mut throws = 0u32;
    let mut knockouts = 0u32;
    for frame in 0..MAX_FRAMES {
        engine.update(FIXED_DT);

        for event in engine.drain_events() {
            match event {
                GameEvent::Knockout { team, .. } => {
                    knockouts += 1;
                    log::debug!("Frame {frame}: {team:?} unit knocked out");
                }
                GameEvent::LevelComplete { level, score } => {
                    log::info!("Level {level} cleared, score {score}");
                }
                _ => {}
            }
        }

        match engine.phase() {
            GamePhase::Playing => {}
            GamePhase::LevelComplete => {
                engine.submit(Intent::NextLevel);
                continue;
            }
            GamePhase::GameOver | GamePhase::Victory => break,
            _ => continue,
        }

        let Some(unit) = engine.selected_unit() else {
            continue;
        };
        let (charging, can_throw, pos) = (unit.charging, unit.can_throw(), unit.pos);

        if charging {
            held += FIXED_DT;
            if held >= HOLD_TIME {
                let aim = nearest_enemy(&engine, pos).unwrap_or(pos + Vec2::X);
                engine.submit(Intent::ReleaseCharge { aim });
                engine.submit(Intent::SelectNext);
                throws += 1;
                held = 0.0;
            }
        } else if can_throw {
            engine.submit(Intent::StartCharge);
        }
    }

    let state = engine.state();
    log::info!(
        "Finished in {:?} on level {} with score {} ({throws} throws, {knockouts} knockouts)",
        state.phase,
        state.level,
        state.score,
    );
    ExitCode::SUCCESS
}

fn nearest_enemy(engine: &Engine, from: Vec2) -> Option<Vec2> {
    engine
        .state()
        .units
        .iter()
        .filter(|u| u.team == Team::Green && u.is_alive())
        .map(|u| u.pos)
        .min_by(|a, b| a.distance_squared(from).total_cmp(&b.distance_squared(from)))
}
