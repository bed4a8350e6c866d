//! # PharmaClock App
//!
//! Terminal application layer - commands and main entry point.
//!
//! This crate contains:
//! - CLI definition and command handlers
//! - Application context (dependency injection)
//! - Terminal confirmation adapter
//!
//! ## Architecture
//! - Depends on `common`, `domain`, `core`, and `infra`
//! - Wires up the hexagonal architecture
//! - Renders controller outcomes for the employee

pub mod adapters;
pub mod cli;
pub mod commands;
pub mod context;
pub mod utils;

// Re-export for convenience
pub use adapters::TerminalConfirmer;
pub use cli::{BreakAction, Cli, Command};
pub use context::AppContext;
