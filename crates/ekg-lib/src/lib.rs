pub mod config;
pub mod detectors;
pub mod error;
pub mod filters;
pub mod io;
pub mod metrics;
pub mod pipeline;
pub mod signal;
pub mod spectral;
pub mod synth;

pub use error::{Result, SignalError};
pub use pipeline::*;
pub use signal::*;
