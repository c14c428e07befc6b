//! Error types for DDS building.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while loading images or building DDS files.
///
/// There are no recoverable errors inside a build; a failure aborts that
/// build only. A partial output file may be left on disk, invalidated by
/// the error result.
#[derive(Debug, Error)]
pub enum BuildError {
    /// Input unreadable or output not writable.
    #[error("failed to open '{path}': {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Neither the raster decoder nor the MBM fallback recognized the input.
    #[error("'{path}' is not a recognized image format")]
    Decode { path: PathBuf },

    /// Faces of one build have differing dimensions.
    #[error("all faces must have the same dimensions: expected {expected_width}x{expected_height}, got {width}x{height}")]
    ShapeMismatch {
        expected_width: u32,
        expected_height: u32,
        width: u32,
        height: u32,
    },

    /// CUBE_MAP requested with a face count other than 6.
    #[error("cube map requires exactly 6 faces, got {0}")]
    CubeArity(usize),

    /// No faces were given.
    #[error("at least one face must be given")]
    EmptyFaces,

    /// The introspected file does not start with the `DDS ` magic.
    #[error("not a DDS file (magic bytes {0:02x?})")]
    BadHeader([u8; 4]),

    /// Underlying I/O failure while reading or writing.
    #[error(transparent)]
    Io(#[from] io::Error),
}
