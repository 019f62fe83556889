use thiserror::Error;

pub type PlotResult<T> = Result<T, PlotError>;

#[derive(Debug, Clone, Error)]
pub enum PlotError {
    #[error("invalid viewport size: width={width}, height={height}")]
    InvalidViewport { width: u32, height: u32 },

    #[error("invalid data: {0}")]
    InvalidData(String),

    #[error("failed to load field `{field}`: {reason}")]
    FieldLoadFailure { field: String, reason: String },

    #[error("column `{column}` is not present in the merged catalog metadata")]
    InvalidAxisSelection { column: String },

    #[error("unknown field: {0}")]
    UnknownField(String),

    #[error("point handle does not refer to a live visual point")]
    StalePoint,
}
