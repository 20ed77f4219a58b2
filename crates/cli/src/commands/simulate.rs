//! Play a simulation timeline against a scenario.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result, bail};
use clap::Parser;
use console::style;

use discen_runtime::{
    MirrorScene, RuntimeConfig, ScenarioContext, SimulationEvent, SimulationListener, TracingSink,
};

/// Play a simulation timeline against a scenario
#[derive(Parser)]
pub struct Simulate {
    /// Scenario document
    #[arg(value_name = "SCENARIO")]
    scenario: PathBuf,

    /// Simulation timeline (`.ron`) or simulation document (`.json`)
    #[arg(value_name = "SIMULATION")]
    simulation: PathBuf,

    /// Seconds of simulated time per update
    #[arg(short, long, default_value_t = 0.5)]
    step: f32,
}

struct EventPrinter;

impl SimulationListener for EventPrinter {
    fn on_event(&self, event: SimulationEvent) {
        match event {
            SimulationEvent::Updated | SimulationEvent::TimeChanged(_) => {
                tracing::debug!(target: "discen::cli", %event, "simulation event")
            }
            _ => println!("{}", style(format!("[{}]", event)).magenta()),
        }
    }
}

impl Simulate {
    pub fn execute(self, config: RuntimeConfig) -> Result<()> {
        if !self.step.is_finite() || self.step <= 0.0 {
            bail!("Step must be a positive number of seconds");
        }

        let scene = Arc::new(MirrorScene::new());
        let mut ctx = ScenarioContext::builder()
            .config(config)
            .message_sink(Arc::new(TracingSink))
            .scene(scene.clone())
            .simulation_listener(Arc::new(EventPrinter))
            .build();
        ctx.initialize_simulation();

        ctx.load_scenario(&self.scenario)
            .with_context(|| format!("Failed to load scenario: {}", self.scenario.display()))?;
        ctx.load_simulation(&self.simulation).with_context(|| {
            format!("Failed to load simulation: {}", self.simulation.display())
        })?;
        if !ctx.valid_simulation() {
            bail!("Simulation has no tracks");
        }

        let tracked: Vec<String> = ctx
            .simulation()
            .map(|player| player.timeline().elements().map(str::to_owned).collect())
            .unwrap_or_default();

        ctx.play_simulation()?;
        while ctx.simulation_started() {
            if !ctx.update_simulation(self.step)? {
                break;
            }
            let progress = ctx.simulation_progress()?;
            let clock = ctx
                .simulation_datetime_string()?
                .unwrap_or_else(|| format!("{:5.1}%", progress * 100.0));
            println!("{}", style(clock).bold().cyan());

            for id in &tracked {
                let Some(transform) = scene.transform(id) else {
                    continue;
                };
                println!(
                    "  {:<12} parent={:<10} local=({:.2}, {:.2}, {:.2})",
                    id,
                    transform.parent().unwrap_or("-"),
                    transform.origin.right,
                    transform.origin.forward,
                    transform.origin.up
                );
            }
        }
        Ok(())
    }
}
