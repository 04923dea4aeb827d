use std::io;
use thiserror::Error;

/// Errors that can occur when loading a flash dump
#[derive(Error, Debug)]
pub enum FlashError {
    #[error("File not found: {0}")]
    InputNotFound(String),

    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    #[error("Not a regular file: {0}")]
    NotAFile(String),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Failed to memory-map {path}: {message}")]
    MapFailed { path: String, message: String },
}

pub type Result<T> = std::result::Result<T, FlashError>;
