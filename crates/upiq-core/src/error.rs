//! Error types for upiq

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Empty document: {0}")]
    EmptyDocument(String),

    #[error("CSV parsing error: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Config error: {0}")]
    Config(String),

    #[error("Unsupported input: {0}")]
    UnsupportedInput(String),
}

pub type Result<T> = std::result::Result<T, Error>;
