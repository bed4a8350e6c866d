//! Adapters between the terminal and core ports.

pub mod terminal;

pub use terminal::TerminalConfirmer;
