// ABOUTME: Dinner module - philosophers that eat, think, and talk through the coordinator.
// ABOUTME: Contains configuration, activities, the philosopher loop, and the runner.

mod activity;
mod config;
mod philosopher;
mod runner;
mod shutdown;

pub use activity::{Activity, ActivityKind, RandomDelay, say_something};
pub use config::DinnerConfig;
pub use philosopher::{Philosopher, PhilosopherReport};
pub use runner::{Dinner, DinnerReport};
pub use shutdown::{Shutdown, ShutdownTrigger};

#[cfg(test)]
mod config_test;
