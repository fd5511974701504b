use std::path::PathBuf;

use thiserror::Error;

/// Everything that can go wrong between opening a grid file and writing the
/// evolved grid back out.
///
/// All variants are raised at load/construct time. The update kernel itself
/// never fails on a grid it accepted.
#[derive(Debug, Error)]
pub enum GridError {
    #[error("usage: {0}")]
    Usage(String),

    #[error("could not open {}", path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("could not write {}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("i/o failure: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed grid data: {0}")]
    Format(String),

    #[error("unsupported grid data type: {0}")]
    UnsupportedType(String),

    #[error("coordinate {coord:?} lies outside a fixed boundary")]
    Boundary { coord: Vec<isize> },

    #[error("invalid grid shape: {0}")]
    Shape(String),

    #[error("site type mismatch (expected {expected}, found {found})")]
    TypeMismatch { expected: String, found: String },

    #[error("invalid update configuration: {0}")]
    Config(String),
}

/// `Format` message for a stream whose first line is not a grid type tag.
pub const NOT_GRID_DATA: &str = "file does not contain grid data";

impl GridError {
    pub(crate) fn not_grid_data() -> Self {
        Self::Format(NOT_GRID_DATA.to_string())
    }

    /// True for the `Format` error raised when the first header line is not
    /// a grid type tag at all.
    pub fn is_not_grid_data(&self) -> bool {
        matches!(self, Self::Format(msg) if msg == NOT_GRID_DATA)
    }

    pub(crate) fn format(msg: impl Into<String>) -> Self {
        Self::Format(msg.into())
    }

    pub(crate) fn shape(msg: impl Into<String>) -> Self {
        Self::Shape(msg.into())
    }
}
