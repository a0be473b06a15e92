//! Core engine for the gridtest browser orchestrator.
//!
//! This crate drives multiple remote browser sessions concurrently against a
//! WebDriver automation server, injects scripts into each page's execution
//! context and normalizes their outcomes back into process-side results.

pub mod bridge;
pub mod browser;
pub mod combinators;
pub mod error;
pub mod factory;
pub mod orchestrator;
pub mod session;

// Re-export the main types for convenience
pub use bridge::{execute_async_script, execute_script, execute_script_with_args};
pub use browser::Browser;
pub use combinators::{parallel, sequence, TaskFactory};
pub use error::HarnessError;
pub use factory::SessionFactory;
pub use orchestrator::{Done, Orchestrator};
pub use session::DriverSession;
