/// Errors from PNM decoding and encoding.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum PnmError {
    #[error("unrecognized format magic bytes")]
    UnrecognizedFormat,

    #[error("invalid header: {0}")]
    InvalidHeader(String),

    #[error("invalid pixel data: {0}")]
    InvalidData(String),

    #[error("sample count mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("dimensions too large: {width}x{height}")]
    DimensionsTooLarge { width: u32, height: u32 },

    #[error("limit exceeded: {0}")]
    LimitExceeded(String),

    #[error("unexpected end of input")]
    UnexpectedEof,

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
