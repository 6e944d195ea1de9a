//! Crate-level error type.

use thiserror::Error;

use crate::formats::{FormatError, SourceError};
use crate::options::ConfigError;

/// Any error raised while loading a table or configuring a query.
#[derive(Error, Debug)]
pub enum Error {
    /// The table could not be read
    #[error(transparent)]
    Source(#[from] SourceError),

    /// The table content is not a usable genetic code table
    #[error(transparent)]
    Format(#[from] FormatError),

    /// Invalid caller configuration
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Result type for crate operations.
pub type Result<T> = std::result::Result<T, Error>;
