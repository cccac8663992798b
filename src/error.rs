//! Application-wide error types.

use thiserror::Error;

use crate::llm::{GenerateError, StrategyUnavailable};

#[derive(Debug, Error)]
pub enum AppError {
    #[error("config error: {0}")]
    Config(String),

    #[error("credential error: {0}")]
    Credential(String),

    #[error("logger error: {0}")]
    Logger(String),

    #[error(transparent)]
    Strategy(#[from] StrategyUnavailable),

    #[error(transparent)]
    Generate(#[from] GenerateError),
}
