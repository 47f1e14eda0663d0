use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
pub enum MatrixError {
    #[error("Contact matrix must be square, got {rows}x{cols}")]
    NotSquare { rows: usize, cols: usize },

    #[error("Contact matrix has no bins")]
    Empty,

    #[error("Cannot build a {n}x{n} matrix from {len} values")]
    ShapeMismatch { n: usize, len: usize },
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Smoothing window must be odd, got {0}")]
    EvenWindow(usize),

    #[error("Smoothing window ({window}) must be larger than the polynomial order ({polyorder})")]
    WindowTooSmall { window: usize, polyorder: usize },

    #[error("Normalization needs at least one iteration")]
    NoIterations,

    #[error("Picker threshold must lie in [0, 1), got {0}")]
    InvalidThreshold(f64),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Toml(#[from] toml::de::Error),
}

pub type MatrixResult<T> = std::result::Result<T, MatrixError>;
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;
