//! Formation Shooter headless driver
//!
//! Runs the simulation without a window: a simple autopilot supplies the
//! intents a keyboard would, status is logged periodically and the final
//! status is printed as JSON. Pass a settings JSON path as the first
//! argument to override the defaults.

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use formation_shooter::{Engine, Settings};

    env_logger::init();
    log::info!("Formation Shooter (headless) starting...");

    let settings = match std::env::args().nth(1) {
        Some(path) => match Settings::load(&path) {
            Ok(settings) => settings,
            Err(err) => {
                log::warn!("{} ({}), using defaults", err, path);
                Settings::default()
            }
        },
        None => Settings::default(),
    };

    let mut engine = match Engine::initialize(settings.clone()) {
        Ok(engine) => engine,
        Err(err) => {
            log::error!("Failed to initialize engine: {}", err);
            std::process::exit(1);
        }
    };

    let run = engine.settings();
    log::info!(
        "Running {} ticks on a {}x{} screen",
        run.demo_ticks,
        run.screen_width,
        run.screen_height
    );

    for _ in 0..settings.demo_ticks {
        let input = autopilot::plan(engine.state());
        engine.tick(&input);

        let status = engine.status();
        let ticks = engine.state().time_ticks;
        if settings.log_every > 0 && ticks % settings.log_every == 0 {
            log::info!(
                "tick {}: score {}, lives {}, fleets {}, divers {}",
                ticks,
                status.score,
                status.lives,
                status.fleets_destroyed,
                engine.state().divers.len()
            );
        }
        if status.is_game_over {
            break;
        }
    }

    match serde_json::to_string_pretty(&engine.status()) {
        Ok(json) => println!("{json}"),
        Err(err) => log::error!("Failed to encode status: {}", err),
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // The core is driven by the host page; nothing to run here
}

#[cfg(not(target_arch = "wasm32"))]
mod autopilot {
    use formation_shooter::sim::{GameState, TickInput};

    /// Ticks between shots
    const FIRE_INTERVAL: u64 = 60;
    /// Horizontal slack before the ship bothers to move
    const DEADZONE: f32 = 2.0;

    /// Track the lowest diver (or the nearest formation enemy) and fire steadily
    pub fn plan(state: &GameState) -> TickInput {
        let ship_center = state.player.pos.x + state.player.size.x / 2.0;

        let target = state
            .divers
            .iter()
            .max_by(|a, b| a.pos.y.total_cmp(&b.pos.y))
            .or_else(|| {
                state.formation.iter().min_by(|a, b| {
                    let da = (a.pos.x + a.size.x / 2.0 - ship_center).abs();
                    let db = (b.pos.x + b.size.x / 2.0 - ship_center).abs();
                    da.total_cmp(&db)
                })
            })
            .map(|enemy| enemy.pos.x + enemy.size.x / 2.0);

        let mut input = TickInput {
            fire: state.time_ticks % FIRE_INTERVAL == 0,
            ..Default::default()
        };
        if let Some(x) = target {
            input.move_left = x < ship_center - DEADZONE;
            input.move_right = x > ship_center + DEADZONE;
        }
        input
    }
}
