// ABOUTME: Philosopher - one seat's eat-think-talk loop driven through the coordinator.
// ABOUTME: Narrates each activity and stops for good once a wait is interrupted.

use std::sync::Arc;
use std::time::{Duration, Instant};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;
use tracing::info;

use super::activity::{Activity, ActivityKind, say_something};
use super::config::DinnerConfig;
use super::shutdown::Shutdown;
use crate::coordinator::{Coordinator, PhilosopherId};
use crate::error::{ConfigError, DinnerError};

/// What one philosopher got done.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PhilosopherReport {
    pub id: PhilosopherId,
    pub meals: usize,
    pub speeches: usize,
    /// Longest time spent waiting for utensils, in milliseconds.
    pub longest_wait_ms: u64,
}

/// A seat at the table.
pub struct Philosopher {
    id: PhilosopherId,
    coordinator: Arc<Coordinator>,
    activity: Arc<dyn Activity>,
    dining_steps: usize,
    talk_probability: f64,
    rng: StdRng,
    shutdown: Shutdown,
}

impl Philosopher {
    /// Seat philosopher `id`. A configured seed is offset by `id` so every
    /// seat makes different, but repeatable, choices.
    ///
    /// Returns `Err(ConfigError::Invalid)` if `config` does not validate.
    pub fn new(
        id: PhilosopherId,
        coordinator: Arc<Coordinator>,
        activity: Arc<dyn Activity>,
        config: &DinnerConfig,
        shutdown: Shutdown,
    ) -> Result<Self, ConfigError> {
        config.validate()?;

        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed.wrapping_add(id as u64)),
            None => StdRng::from_os_rng(),
        };

        Ok(Self {
            id,
            coordinator,
            activity,
            dining_steps: config.dining_steps,
            talk_probability: config.talk_probability,
            rng,
            shutdown,
        })
    }

    pub fn id(&self) -> PhilosopherId {
        self.id
    }

    /// Go through every dining step.
    ///
    /// Returns an error as soon as a wait is interrupted or shutdown is
    /// requested between steps; the philosopher never touches the table again.
    pub async fn run(mut self) -> Result<PhilosopherReport, DinnerError> {
        let id = self.id;
        let mut report = PhilosopherReport {
            id,
            meals: 0,
            speeches: 0,
            longest_wait_ms: 0,
        };
        let mut longest_wait = Duration::ZERO;

        for _ in 0..self.dining_steps {
            if self.shutdown.is_triggered() {
                return Err(DinnerError::Stopped { id });
            }

            let asked = Instant::now();
            self.coordinator
                .acquire_resources_with_cancel(id, self.shutdown.clone().triggered())
                .await?;
            longest_wait = longest_wait.max(asked.elapsed());

            self.narrate(ActivityKind::Eat).await;
            self.coordinator.release_resources(id);
            report.meals += 1;

            self.narrate(ActivityKind::Think).await;

            if self.rng.random_bool(self.talk_probability) {
                self.coordinator
                    .request_token_with_cancel(id, self.shutdown.clone().triggered())
                    .await?;
                self.narrate(ActivityKind::Talk).await;
                self.coordinator.release_token();
                report.speeches += 1;
            }

            tokio::task::yield_now().await;
        }

        report.longest_wait_ms = longest_wait.as_millis().try_into().unwrap_or(u64::MAX);
        Ok(report)
    }

    async fn narrate(&mut self, kind: ActivityKind) {
        let id = self.id;
        info!("Philosopher {} has started {}.", id, kind);
        if kind == ActivityKind::Talk {
            info!("Philosopher {} says: {}", id, say_something(id, &mut self.rng));
        }
        self.activity.perform(id, kind).await;
        info!("Philosopher {} has finished {}.", id, kind);
    }
}
