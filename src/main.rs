//! Space Factory headless runner
//!
//! Flies a scripted autopilot through a full session on a synthetic 60 Hz
//! frame clock and prints the ship afterwards.
//!
//! ```text
//! space-factory [--seed N] [--tuning path.json] [--settings path.json]
//!               [--camera snap|ease] [--seconds S] [--dump]
//! ```

#[cfg(not(target_arch = "wasm32"))]
mod native {
    use std::path::PathBuf;

    use clap::Parser;
    use glam::Vec2;
    use space_factory::Tuning;
    use space_factory::settings::{CameraMode, Settings};
    use space_factory::sim::{FixedStepDriver, GameState, TickInput, extrapolate};

    /// Synthetic frame length fed to the driver
    const FRAME_DT: f32 = 1.0 / 60.0;

    #[derive(Parser, Debug)]
    #[command(name = "space-factory")]
    #[command(about = "Fly a scripted autopilot through a Space Factory session")]
    pub struct Args {
        /// Session seed
        #[arg(long, default_value_t = 12345)]
        pub seed: u64,

        /// Tuning overrides (JSON)
        #[arg(long)]
        pub tuning: Option<PathBuf>,

        /// Presentation settings (JSON)
        #[arg(long)]
        pub settings: Option<PathBuf>,

        /// Camera follow mode, overriding the settings file
        #[arg(long, value_parser = parse_camera)]
        pub camera: Option<CameraMode>,

        /// Simulated seconds to run before stopping
        #[arg(long, default_value_t = 300.0)]
        pub seconds: f32,

        /// Print the final state as JSON
        #[arg(long)]
        pub dump: bool,
    }

    fn parse_camera(s: &str) -> Result<CameraMode, String> {
        CameraMode::from_str(s).ok_or_else(|| format!("unknown camera mode '{s}' (snap, ease)"))
    }

    /// Shortest offset from `from` to `to` on the torus
    fn toroidal_delta(from: Vec2, to: Vec2, space_size: f32) -> Vec2 {
        let mut d = to - from;
        for axis in [&mut d.x, &mut d.y] {
            if *axis > space_size / 2.0 {
                *axis -= space_size;
            } else if *axis < -space_size / 2.0 {
                *axis += space_size;
            }
        }
        d
    }

    /// Steer toward the current goal, or coast to a stop without one
    fn autopilot(state: &GameState) -> TickInput {
        let tuning = &state.tuning;
        let target = match state.phases.goal {
            Some(goal) => toroidal_delta(state.ship_center(), goal.center(), tuning.space_size),
            None => Vec2::ZERO,
        };
        let cruise = tuning.max_speed * 0.5;
        let wanted = (target * 0.5).clamp(Vec2::splat(-cruise), Vec2::splat(cruise));
        let error = wanted - state.ship.velocity;
        let deadband = tuning.thrust_per_engine;

        TickInput {
            thrust_right: error.x > deadband,
            thrust_left: error.x < -deadband,
            thrust_down: error.y > deadband,
            thrust_up: error.y < -deadband,
            ..Default::default()
        }
    }

    pub fn run(args: Args) -> Result<(), Box<dyn std::error::Error>> {
        let tuning = match &args.tuning {
            Some(path) => Tuning::load(path)?,
            None => Tuning::default(),
        };
        let mut settings = match &args.settings {
            Some(path) => Settings::load(path)?,
            None => Settings::default(),
        };
        if let Some(mode) = args.camera {
            settings.camera_mode = mode;
        }
        log::info!("Camera: {}", settings.camera_mode.as_str());

        let mut driver = FixedStepDriver::from_settings(&settings);
        let mut state = GameState::with_config(args.seed, tuning, settings)?;

        let frames = (args.seconds / FRAME_DT) as u64;

        for frame in 0..frames {
            let mut input = autopilot(&state);
            let before = state.phases.index;
            driver.advance(&mut state, &mut input, FRAME_DT);

            if state.phases.index != before {
                let prompt = state
                    .phases
                    .current(&state.tuning)
                    .map(|phase| phase.prompt.as_str())
                    .unwrap_or("done");
                log::info!(
                    "t={:.1}s phase {} ({:.0}s): {} | fuel {:.2} cargo {}",
                    state.elapsed_seconds(),
                    state.phases.index,
                    state.phases.time_remaining(&state.tuning),
                    prompt,
                    state.grid.total_fuel(),
                    state.objects.in_factory_count()
                );
            }
            if frame % 60 == 0 {
                let view = extrapolate(&state, driver.leftover());
                log::debug!(
                    "ship at ({:.0}, {:.0}), {} objects",
                    view.ship_position.x,
                    view.ship_position.y,
                    view.objects.len()
                );
            }
            if state.phases.is_finished() {
                break;
            }
        }

        print!("{}", state.grid);
        println!(
            "seed {} | {:.1}s | phase {}/{} | damage {} | fuel {:.2} | {:?}",
            state.seed,
            state.elapsed_seconds(),
            state.phases.index,
            state.tuning.phases.len(),
            state.phases.damage_count,
            state.grid.total_fuel(),
            state.outcome()
        );
        if args.dump {
            println!("{}", serde_json::to_string_pretty(&state)?);
        }
        Ok(())
    }

}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Space Factory (headless) starting...");

    let args = <native::Args as clap::Parser>::parse();
    if let Err(err) = native::run(args) {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // No headless runner on the web; a host embeds the library directly
}
