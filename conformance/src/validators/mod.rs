//! Validators, one module per concern.

pub mod artifacts;
pub mod codec;
pub mod faults;
