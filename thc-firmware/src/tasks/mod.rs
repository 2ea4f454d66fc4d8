//! Embassy async tasks
//!
//! Each task runs independently and communicates via the statics in
//! `channels`.

pub mod control;
pub mod host_tx;
pub mod tick;

pub use control::{control_task, ControlPins};
pub use host_tx::host_tx_task;
pub use tick::{tick_task, JogOutput, TickerSource};
