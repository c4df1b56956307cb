// ABOUTME: Root module for symposium - a monitor for philosophers sharing a table.
// ABOUTME: Re-exports the coordinator, the dinner driver, and error types.

pub mod coordinator;
pub mod dinner;
pub mod error;
pub mod prelude;

pub use coordinator::Coordinator;
pub use error::SymposiumError;
