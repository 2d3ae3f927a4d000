use thiserror::Error;

pub type PlotResult<T> = Result<T, PlotError>;

#[derive(Debug, Error)]
pub enum PlotError {
    #[error("invalid viewport size: width={width}, height={height}")]
    InvalidViewport { width: u32, height: u32 },

    #[error("invalid data: {0}")]
    InvalidData(String),

    #[error("x and y sequences differ in length: x={x_len}, y={y_len}")]
    LengthMismatch { x_len: usize, y_len: usize },

    #[error("invalid shape: {0}")]
    InvalidShape(String),

    #[error("drawing backend failure: {0}")]
    Backend(String),

    #[error("export failed: {0}")]
    Export(String),
}
