// ABOUTME: Dinner CLI - seats philosophers around a table and lets them eat, think, and talk.
// ABOUTME: Ctrl-C interrupts every waiting philosopher and ends the dinner with an error.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{Level, info, warn};
use tracing_subscriber::FmtSubscriber;

use symposium::prelude::*;

#[derive(Parser)]
#[command(name = "dinner")]
#[command(version)]
#[command(about = "Dining philosophers coordinated by a monitor")]
struct Cli {
    /// Number of philosophers (positive integer)
    philosophers: Option<usize>,

    /// JSON configuration file; flags override its values
    #[arg(long, env = "DINNER_CONFIG")]
    config: Option<PathBuf>,

    /// Eat-think-talk cycles per philosopher
    #[arg(long)]
    steps: Option<usize>,

    /// Upper bound for a single activity, in milliseconds
    #[arg(long = "time-to-waste-ms")]
    time_to_waste_ms: Option<u64>,

    /// Chance per cycle that a philosopher asks to talk
    #[arg(long)]
    talk_probability: Option<f64>,

    /// Random seed for repeatable choices
    #[arg(long)]
    seed: Option<u64>,

    /// Print the final report as JSON
    #[arg(long)]
    json: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

impl Cli {
    fn dinner_config(&self) -> Result<DinnerConfig> {
        let mut config = match &self.config {
            Some(path) => DinnerConfig::from_file(path)
                .with_context(|| format!("loading {}", path.display()))?,
            None => DinnerConfig::default(),
        };

        if let Some(philosophers) = self.philosophers {
            config.philosophers = philosophers;
        }
        if let Some(steps) = self.steps {
            config.dining_steps = steps;
        }
        if let Some(ms) = self.time_to_waste_ms {
            config.time_to_waste_ms = ms;
        }
        if let Some(probability) = self.talk_probability {
            config.talk_probability = probability;
        }
        if let Some(seed) = self.seed {
            config.seed = Some(seed);
        }

        config.validate()?;
        Ok(config)
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose { Level::DEBUG } else { Level::INFO };
    FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .compact()
        .init();

    let config = cli.dinner_config()?;
    info!(
        philosophers = config.philosophers,
        steps = config.dining_steps,
        "{} philosopher(s) came for a dinner",
        config.philosophers
    );

    let (trigger, shutdown) = Shutdown::channel();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("interrupted, asking everyone to leave");
            trigger.trigger();
        }
    });

    let report = Dinner::new(config)?.shutdown(shutdown).run().await?;

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        for philosopher in &report.philosophers {
            println!(
                "Philosopher {}: {} meal(s), {} speech(es), longest wait {}ms",
                philosopher.id,
                philosopher.meals,
                philosopher.speeches,
                philosopher.longest_wait_ms
            );
        }
        println!(
            "All philosophers have left. Dinner took {}ms.",
            report.elapsed_ms
        );
    }

    Ok(())
}
