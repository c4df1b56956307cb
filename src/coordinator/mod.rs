// ABOUTME: Coordinator module - the monitor that seats philosophers around a table.
// ABOUTME: Arbitrates adjacent utensils and the single speaking token.

mod coordinator;
mod seating;

pub use coordinator::Coordinator;
pub use seating::{PhilosopherId, PhilosopherState, Request, TableSnapshot};
