/// Services module
/// Long-lived backend services and the pure run-recipe registry.

pub mod autosave;
pub mod console;
pub mod pipeline;
pub mod runner;
pub mod workspace;
