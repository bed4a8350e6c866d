//! Time utilities and abstractions
//!
//! - [`clock`]: wall-clock trait with a system implementation (a mock lives
//!   in `testing`)
//! - [`ticker`]: recurring ticks that stop when their handle is dropped

pub mod clock;
pub mod ticker;

pub use clock::{Clock, SystemClock};
pub use ticker::{spawn_ticker, TickerHandle};
