//! Output kernel: mode control, arbitration and the driver loop.
//!
//! The kernel step is synchronous and pure with respect to I/O. It consumes
//! events and returns `SideEffect`s; the driver in `reactor` performs them.

pub mod arbitrator;
pub mod event;
pub mod mode;
pub mod reactor;
pub mod scheduler;
pub mod state;
pub mod telemetry;
pub mod time;
