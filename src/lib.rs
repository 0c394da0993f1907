pub mod config;
pub mod error;
pub mod kernel;
pub mod outputs;
pub mod vision;

pub use config::{PipelineConfig, UserProfile};
pub use kernel::reactor::Reactor;
pub use vision::pipeline::{Detectors, VisionPipeline};
