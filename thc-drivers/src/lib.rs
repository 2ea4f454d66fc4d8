//! Hardware driver implementations
//!
//! This crate provides concrete implementations of the traits defined
//! in thc-core over `embedded-hal` 1.0 pins and delays:
//!
//! - Torch relay output and arc-ok input (GPIO)
//! - Step/direction output for the height axis (GPIO + blocking delay)
//! - Latched arc voltage sample fed from an ADC task

#![no_std]
#![deny(unsafe_code)]

pub mod sensor;
pub mod stepper;
pub mod torch;
