use thiserror::Error;
use tm_core::CoreError;

#[derive(Debug, Error)]
pub enum MotionError {
    #[error("invalid motion configuration: {0}")]
    Config(#[from] CoreError),
}

pub type MotionResult<T> = Result<T, MotionError>;
