//! Board-agnostic core logic for the plasma torch height controller
//!
//! This crate contains all application logic that does not depend on
//! specific hardware implementations:
//!
//! - Hardware abstraction traits (torch relay, arc-ok input, voltage sampler,
//!   step/dir output, tick source) and host collaborator traits (planner,
//!   feedback, alarm)
//! - Arc ignition sequencing with retry and timeout policy
//! - Arc-voltage bang-bang height feedback with velocity-adaptive locking
//! - Interrupt-context Z jog stepping and the shared tick clock
//! - Configuration type definitions and parsing

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod config;
pub mod control;
pub mod motion;
pub mod state;
pub mod timer;
pub mod traits;

pub use control::{IgnitionError, PlasmaContext};
pub use state::{PlasmaState, ThcShared};
