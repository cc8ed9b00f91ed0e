// Line-driven progress fan library modules

pub mod clock;
pub mod config;
pub mod duration;
pub mod error;
pub mod estimate;
pub mod fan_loop;
pub mod record;
pub mod render;
pub mod run;
pub mod source;

// Re-export commonly used types
pub use config::FanConfig;
pub use error::FanError;
pub use fan_loop::{FanLoop, FanOptions, Phase, RunSummary};
pub use record::RunRecord;
pub use run::run_fan;
