//! Runtime state
//!
//! `PlasmaState` is owned by the background control loop. `ThcShared`
//! holds the few words crossed between the control loop and the jog
//! interrupt, each with a single writer.

pub mod plasma;
pub mod shared;

pub use plasma::PlasmaState;
pub use shared::{
    AxisPosition, JogCommand, JogFlags, ThcShared, TickClock, MAX_DEADLINE_TICKS,
};
