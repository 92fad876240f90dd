//! Runs the demo scenes in a desktop window

use env_logger::Env;
use playground::prelude::*;
use playground::scenes::{BrownianScene, CarsScene};

const CONFIG_FILE: &str = "playground.ron";

fn run() -> Result<(), EngineError> {
    let config = if std::path::Path::new(CONFIG_FILE).exists() {
        EngineConfig::load(CONFIG_FILE)?
    } else {
        EngineConfig::default()
    };

    let platform = DesktopPlatform::new(config.vsync)?;
    let mut runtime = EngineRuntime::new(config, platform);

    match std::env::args().nth(1).as_deref() {
        Some("brownian") => runtime.load_scene::<BrownianScene>()?,
        Some("cars") => runtime.load_scene::<CarsScene>()?,
        None => {
            runtime.load_scene::<BrownianScene>()?;
            runtime.load_scene::<CarsScene>()?;
        }
        Some(other) => {
            log::error!("Unknown scene {other:?}, expected \"brownian\" or \"cars\"");
            return Ok(());
        }
    }

    runtime.run_engine()
}

fn main() {
    let _ = env_logger::Builder::from_env(Env::default().default_filter_or("info")).try_init();

    if let Err(e) = run() {
        log::error!("Engine error: {e}");
        std::process::exit(1);
    }
}
