//! Error types for FinSight

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Database pool error: {0}")]
    Pool(#[from] r2d2::Error),

    #[error("Config error: {0}")]
    Config(String),

    #[error("Invalid data: {0}")]
    InvalidData(String),

    #[error("Not found: {0}")]
    NotFound(String),

    /// The ledger snapshot could not be read; no partial insights are produced
    #[error("Financial data unavailable: {0}")]
    DataUnavailable(String),
}

pub type Result<T> = std::result::Result<T, Error>;
