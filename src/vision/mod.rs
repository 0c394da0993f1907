//! Perception side: frames in, one complete description per frame out.

pub mod aggregator;
pub mod detector;
pub mod frame;
pub mod locator;
pub mod pipeline;
pub mod source;
pub mod stub;
