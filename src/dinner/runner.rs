// ABOUTME: Dinner runner - seats the philosophers, runs them as tasks, and collects reports.
// ABOUTME: Every philosopher shares one coordinator; none talk to each other directly.

use std::sync::Arc;
use std::time::Instant;

use futures::future::join_all;
use serde::Serialize;
use tracing::{info, warn};

use super::activity::{Activity, RandomDelay};
use super::config::DinnerConfig;
use super::philosopher::{Philosopher, PhilosopherReport};
use super::shutdown::Shutdown;
use crate::coordinator::{Coordinator, TableSnapshot};
use crate::error::DinnerError;

/// Outcome of a finished dinner.
#[derive(Debug, Clone, Serialize)]
pub struct DinnerReport {
    pub philosophers: Vec<PhilosopherReport>,
    /// Coordinator state once everyone left.
    pub table: TableSnapshot,
    pub elapsed_ms: u64,
}

impl DinnerReport {
    pub fn total_meals(&self) -> usize {
        self.philosophers.iter().map(|p| p.meals).sum()
    }

    pub fn total_speeches(&self) -> usize {
        self.philosophers.iter().map(|p| p.speeches).sum()
    }
}

/// A dinner waiting to be served.
pub struct Dinner {
    config: DinnerConfig,
    coordinator: Arc<Coordinator>,
    activity: Arc<dyn Activity>,
    shutdown: Shutdown,
}

impl Dinner {
    /// Prepare a table for `config`. Activities default to random sleeps
    /// bounded by the configured time to waste.
    pub fn new(config: DinnerConfig) -> Result<Self, DinnerError> {
        config.validate()?;

        Ok(Self {
            coordinator: Arc::new(Coordinator::new(config.philosophers)),
            activity: Arc::new(RandomDelay::new(config.max_activity())),
            shutdown: Shutdown::never(),
            config,
        })
    }

    /// Replace the activity every philosopher performs.
    pub fn activity(mut self, activity: impl Activity + 'static) -> Self {
        self.activity = Arc::new(activity);
        self
    }

    /// Interrupt the dinner when `shutdown` fires.
    pub fn shutdown(mut self, shutdown: Shutdown) -> Self {
        self.shutdown = shutdown;
        self
    }

    /// The coordinator the philosophers will share.
    pub fn coordinator(&self) -> Arc<Coordinator> {
        self.coordinator.clone()
    }

    /// Run every philosopher to completion.
    ///
    /// Returns the first philosopher's error (in seat order) if any of them
    /// failed, after all of them have stopped.
    pub async fn run(self) -> Result<DinnerReport, DinnerError> {
        let started = Instant::now();
        info!(
            philosophers = self.config.philosophers,
            steps = self.config.dining_steps,
            "dinner is served"
        );

        let seated = (0..self.config.philosophers)
            .map(|id| {
                Philosopher::new(
                    id,
                    self.coordinator.clone(),
                    self.activity.clone(),
                    &self.config,
                    self.shutdown.clone(),
                )
            })
            .collect::<Result<Vec<_>, _>>()?;
        let handles: Vec<_> = seated
            .into_iter()
            .map(|philosopher| tokio::spawn(philosopher.run()))
            .collect();

        let mut philosophers = Vec::with_capacity(handles.len());
        let mut first_error = None;

        for (id, joined) in join_all(handles).await.into_iter().enumerate() {
            let outcome = joined.unwrap_or_else(|e| {
                Err(DinnerError::Task {
                    id,
                    message: e.to_string(),
                })
            });
            match outcome {
                Ok(report) => philosophers.push(report),
                Err(e) => {
                    warn!(id, error = %e, "philosopher left the table early");
                    if first_error.is_none() {
                        first_error = Some(e);
                    }
                }
            }
        }

        if let Some(e) = first_error {
            return Err(e);
        }

        let report = DinnerReport {
            philosophers,
            table: self.coordinator.snapshot(),
            elapsed_ms: started.elapsed().as_millis().try_into().unwrap_or(u64::MAX),
        };
        info!(
            meals = report.total_meals(),
            speeches = report.total_speeches(),
            elapsed_ms = report.elapsed_ms,
            "dinner is over"
        );
        Ok(report)
    }
}
