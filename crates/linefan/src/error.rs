use std::path::PathBuf;
use thiserror::Error;

/// Failures the fan can hit outside the render loop itself
#[derive(Debug, Error)]
pub enum FanError {
    #[error("Failed to change directory to {}: {source}", path.display())]
    ChangeDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to spawn `{command}`: {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to capture subprocess {0}")]
    MissingPipe(&'static str),

    #[error("Failed to write run record {}: {source}", path.display())]
    RecordWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
