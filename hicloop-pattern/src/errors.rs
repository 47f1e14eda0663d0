use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
pub enum PatternError {
    #[error("Cannot have kernel {kernel:?} bigger than signal {signal:?}")]
    KernelTooLarge {
        kernel: (usize, usize),
        signal: (usize, usize),
    },

    #[error("Kernel has no cells")]
    EmptyKernel,

    #[error("Probabilities must be <= 1.0, found {value} at ({row}, {col})")]
    ProbabilityAboveOne { row: usize, col: usize, value: f64 },

    #[error("Probabilities must be >= 0.0, found {value} at ({row}, {col})")]
    ProbabilityBelowZero { row: usize, col: usize, value: f64 },
}

pub type PatternResult<T> = std::result::Result<T, PatternError>;
