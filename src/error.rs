use thiserror::Error;

pub type EnhanceResult<T> = Result<T, EnhanceError>;

#[derive(Debug, Error)]
pub enum EnhanceError {
    #[error("host operation failed: {0}")]
    Host(String),

    #[error("chart render failed: {0}")]
    Render(String),

    #[error("storage unavailable: {0}")]
    Storage(String),

    #[error("invalid config: {0}")]
    InvalidConfig(String),
}
