//! Tether swarm simulator
//!
//! Run a simulation configured from the environment and print the final
//! swarm snapshot as JSON.

use tether_agent::TICKS_PER_SECOND;
use tether_sim::{Simulation, SimulationConfig};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "tether_sim=info,tether=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = SimulationConfig::from_env()?;
    tracing::info!(
        agents = config.agents,
        ticks = config.ticks,
        seed = config.seed,
        loss_rate = config.loss_rate,
        mobile = config.mobile,
        "Starting swarm simulation"
    );

    let mut sim = Simulation::new(config)?;
    let ticks = sim.config().ticks;
    let report_every = TICKS_PER_SECOND * 10;

    for tick in 1..=ticks {
        sim.step();
        if tick % report_every == 0 {
            let snap = sim.snapshot();
            tracing::info!(
                seconds = tick / TICKS_PER_SECOND,
                leaders = snap.leader_count,
                singles = snap.single_count,
                links = snap.link_count,
                events = sim.event_count(),
                "progress"
            );
        }
    }

    let snap = sim.snapshot();
    tracing::info!(
        frames = snap.frame,
        leaders = snap.leader_count,
        singles = snap.single_count,
        events = sim.event_count(),
        "Simulation complete"
    );
    println!("{}", serde_json::to_string_pretty(&snap)?);

    Ok(())
}
