use thiserror::Error;

pub type ChartResult<T> = Result<T, ChartError>;

#[derive(Debug, Error)]
pub enum ChartError {
    #[error("invalid viewport size: width={width}, height={height}")]
    InvalidViewport { width: f64, height: f64 },

    #[error("invalid data: {0}")]
    InvalidData(String),

    #[error("unknown scene node: index={index}")]
    UnknownNode { index: u32 },

    #[error("series `{series_id}` failed: {reason}")]
    SeriesFault { series_id: String, reason: String },
}
