use thiserror::Error;
use tm_motion::MotionError;

#[derive(Debug, Error)]
pub enum FrameError {
    #[error("frame loop configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Motion(#[from] MotionError),
}

pub type FrameResult<T> = Result<T, FrameError>;
