use tracing::info;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

use state_machine::Simulation;

const AGENTS: usize = 8;
const STEPS: usize = 200;
const DT: f32 = 0.05;

fn main() {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let mut sim = Simulation::new();
    for i in 0..AGENTS {
        let spread = i as f32;
        sim.spawn(0.0, 1.0 + spread, 1.0 + 0.5 * spread, 0.25 * spread);
    }
    info!(agents = sim.len(), state_size = std::mem::size_of::<state_machine::State>(), "Simulation started");

    for _ in 0..STEPS {
        sim.step(DT);
    }

    let transitions: u32 = (0..sim.len())
        .filter_map(|agent| sim.context(agent))
        .map(|ctx| ctx.transitions)
        .sum();
    info!(
        idle = sim.count("idle"),
        moving = sim.count("moving"),
        transitions,
        "Simulation finished"
    );
}
