extern crate self as overlay_core;

pub mod log;

pub use ::log::{debug, error, info, trace, warn};
