// ABOUTME: Prelude module - convenient imports for common use cases.
// ABOUTME: Use `use symposium::prelude::*;` to get started quickly.

pub use crate::coordinator::{
    Coordinator, PhilosopherId, PhilosopherState, Request, TableSnapshot,
};
pub use crate::dinner::{
    Activity, ActivityKind, Dinner, DinnerConfig, DinnerReport, Philosopher, PhilosopherReport,
    RandomDelay, Shutdown, ShutdownTrigger,
};
pub use crate::error::{ConfigError, DinnerError, MonitorError, SymposiumError};
