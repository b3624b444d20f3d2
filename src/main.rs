//! Headless demo: one wanderer loose in the default level
//!
//! Usage: `wanderer [config.ron] [scene.ron]`

use wanderer::prelude::*;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let config = match args.next() {
        Some(path) => WanderConfig::load(path)?,
        None => WanderConfig::default(),
    };
    let scene = match args.next() {
        Some(path) => Scene::load(path)?,
        None => Scene::default(),
    };

    let sim_config = SimConfig::default();
    let controller = scene.spawn_wanderer(config, sim_config.seed)?;
    let mut simulation = Simulation::new(sim_config, controller)?;

    let report = simulation.run();
    log::info!(
        "Finished {} frames ({:.1}s): {} state changes, {} targets, ended {} at {}",
        report.frames,
        report.elapsed,
        report.transitions,
        report.targets_chosen,
        report.state,
        report.position
    );

    Ok(())
}
