//! Error types for mazegraph

use thiserror::Error;

/// Everything that can stop the pipeline before a search runs.
///
/// An unreachable goal is not an error, see [`crate::find::PathFinderState::NoPathFound`].
#[derive(Error, Debug)]
pub enum MazeError {
    #[error("failed to read maze: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse SVG: {0}")]
    Svg(#[from] usvg::Error),

    #[error("failed to parse segment list: {0}")]
    Json(#[from] serde_json::Error),

    #[error("failed to write image: {0}")]
    Image(#[from] image::ImageError),

    #[error("invalid ASCII maze at line {line}: {reason}")]
    Ascii { line: usize, reason: String },

    #[error("unsupported maze format: {0}")]
    UnknownFormat(String),

    #[error("maze drawing contains no cells")]
    EmptyMaze,

    #[error("maze must be square, found {rows} rows and {columns} columns")]
    NotSquare { rows: usize, columns: usize },

    #[error("no entrance found: no cell in the top row opens upward")]
    NoEntrance,

    #[error("no exit found: no cell in the bottom row opens downward")]
    NoExit,

    #[error("invalid geometry: {0}")]
    InvalidGeometry(String),

    #[error("invalid color: {0}")]
    InvalidColor(String),

    #[error("unknown algorithm: {0}")]
    UnknownAlgorithm(String),
}

pub type Result<T> = std::result::Result<T, MazeError>;
