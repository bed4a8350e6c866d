//! Clock-in / clock-out / break state machine

pub mod controller;
pub mod ports;
pub mod refresh;

pub use controller::{
    CancelReason, ClockController, ClockControllerBuilder, ClockOutcome, TransitionReport,
};
pub use refresh::{Reconciliation, RefreshPolicy};
