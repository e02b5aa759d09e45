use std::path::PathBuf;

use thiserror::Error;

use crate::packer::PackFailure;

#[derive(Debug, Error)]
pub enum AtlasError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Cannot decode image {path}: {source}")]
    Decode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
    #[error("Cannot write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Cannot encode {path}: {source}")]
    Encode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
    #[error("Invalid config: {0}")]
    InvalidConfig(String),
    #[error("Nothing to pack: no source image survived loading")]
    Empty,
    #[error("Duplicate frame name {name}: JSON metadata needs unique names")]
    DuplicateFrame { name: String },
    #[error("Canvas limit reached: packing failed at {failed_size}x{failed_size} and max size is {max_size} ({failure})")]
    CanvasLimit {
        failed_size: u32,
        max_size: u32,
        failure: PackFailure,
    },
}

pub type Result<T> = std::result::Result<T, AtlasError>;
