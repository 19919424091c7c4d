//! Time utilities and abstractions
//!
//! - **[`clock`]**: real and mock clocks used by time-based reclamation

pub mod clock;

pub use clock::{Clock, MockClock, SystemClock};
