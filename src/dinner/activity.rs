// ABOUTME: Activity trait - the bounded work a philosopher does between monitor calls.
// ABOUTME: RandomDelay sleeps a random time; callers may plug in their own activities.

use std::time::Duration;

use async_trait::async_trait;
use rand::Rng;

use crate::coordinator::PhilosopherId;

/// What a philosopher is busy with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActivityKind {
    Eat,
    Think,
    Talk,
}

impl std::fmt::Display for ActivityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ActivityKind::Eat => write!(f, "eating"),
            ActivityKind::Think => write!(f, "thinking"),
            ActivityKind::Talk => write!(f, "talking"),
        }
    }
}

/// Simulated work performed between coordinator calls.
///
/// Implementations must return in bounded time: a philosopher that never
/// finishes eating starves both of its neighbours.
#[async_trait]
pub trait Activity: Send + Sync {
    /// Spend some time on `kind`.
    async fn perform(&self, id: PhilosopherId, kind: ActivityKind);
}

/// Sleeps for a uniformly random time up to `max`.
#[derive(Debug, Clone)]
pub struct RandomDelay {
    max: Duration,
}

impl RandomDelay {
    pub fn new(max: Duration) -> Self {
        Self { max }
    }

    /// Pick a pause in `[0, max]`.
    pub fn pick(&self) -> Duration {
        let max_ms: u64 = self.max.as_millis().try_into().unwrap_or(u64::MAX);
        Duration::from_millis(rand::rng().random_range(0..=max_ms))
    }
}

#[async_trait]
impl Activity for RandomDelay {
    async fn perform(&self, _id: PhilosopherId, _kind: ActivityKind) {
        let pause = self.pick();
        tokio::task::yield_now().await;
        tokio::time::sleep(pause).await;
        tokio::task::yield_now().await;
    }
}

/// Things a philosopher may say once it holds the speaking token.
pub fn say_something<R: Rng>(id: PhilosopherId, rng: &mut R) -> String {
    const PHRASES: [&str; 4] = [
        "Eh, it's not easy to be a philosopher: eat, think, talk, eat...",
        "You know, true is false and false is true if you think of it",
        "2 + 2 = 5 for extremely large values of 2...",
        "If thee cannot speak, thee must be silent",
    ];

    let pick = rng.random_range(0..=PHRASES.len());
    match PHRASES.get(pick) {
        Some(phrase) => (*phrase).to_string(),
        None => format!("My number is {}", id),
    }
}
