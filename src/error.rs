use crate::line::LineId;

use std::io;
use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SubtitleError {
    #[error("Subtitles file not found: '{}'", .0.display())]
    FileNotFound(PathBuf),

    #[error("Invalid subtitles file path.")]
    InvalidPath,

    #[error("I/O error on '{}'", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Invalid time format in subtitle: '{0}'")]
    InvalidTimeInput(String),

    #[error("No subtitle line for {0}")]
    UnknownLine(LineId),
}
