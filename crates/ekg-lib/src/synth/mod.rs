pub mod ecg;
pub mod noise;

pub use ecg::*;
pub use noise::*;
