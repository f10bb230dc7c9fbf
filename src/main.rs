//! Spell Life entry point
//!
//! Native builds run the simulation headless: load a config, step a fixed
//! number of ticks and log population stats along the way.
//!
//! ```bash
//! spell-life
//! spell-life my_config.json --ticks 5000 --seed 7
//! ```

#[cfg(not(target_arch = "wasm32"))]
mod cli {
    use clap::Parser;
    use std::path::PathBuf;

    #[derive(Parser, Debug)]
    #[command(name = "spell-life")]
    #[command(about = "Headless particle-life simulation with magic")]
    #[command(version)]
    pub struct Args {
        /// JSON config file (defaults are used when omitted)
        pub config: Option<PathBuf>,

        /// Number of ticks to simulate
        #[arg(long, default_value_t = 1000)]
        pub ticks: u64,

        /// RNG seed
        #[arg(long, default_value_t = 42)]
        pub seed: u64,
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use clap::Parser;
    use spell_life::SimConfig;
    use spell_life::renderer::SceneBuilder;
    use spell_life::sim::Simulation;

    env_logger::init();
    let args = cli::Args::parse();
    log::info!("Spell Life (native) starting...");

    let config = match &args.config {
        Some(path) => match SimConfig::load(path) {
            Ok(config) => config,
            Err(e) => {
                log::error!("{}", e);
                std::process::exit(1);
            }
        },
        None => SimConfig::default(),
    };

    let mut sim = match Simulation::new(config, args.seed) {
        Ok(sim) => sim,
        Err(e) => {
            log::error!("{}", e);
            std::process::exit(1);
        }
    };
    log::info!("Simulation initialized with seed: {}", args.seed);

    let mut scene = SceneBuilder::new(sim.config().atom_radius, args.seed);
    // One logged frame per simulated second
    let log_every = (1000 / u64::from(sim.config().tick_ms).max(1)).max(1);
    for _ in 0..args.ticks {
        sim.update();
        let views = sim.render_views();
        let vertices = scene.build(&views).len();

        let stats = sim.stats();
        if stats.ticks % log_every == 0 {
            log::info!(
                "t={}ms alive={} tasks={} channels={} pairs={} vertices={}",
                stats.now_ms,
                stats.alive,
                stats.pending_tasks,
                stats.active_channels,
                stats.entangled_pairs,
                vertices
            );
        }
    }

    let stats = sim.stats();
    log::info!("Finished {} ticks with {} particles", stats.ticks, stats.alive);
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // Browser hosts drive `Simulation` directly through the library
}
