use thiserror::Error as ThisError;

#[derive(Debug, ThisError)]
pub enum Error {
    #[error("dimension must be at least 1")]
    InvalidDimension,
    #[error("k and l must be at least 1")]
    InvalidParameter,
}

pub type Result<T> = std::result::Result<T, Error>;
