use thiserror::Error;

#[derive(Error, Debug)]
pub enum DspError {
    #[error("Output buffer too small: need {needed} samples, have {available}")]
    InsufficientOutput { needed: usize, available: usize },

    #[error("Filter design failed: {0}")]
    FilterDesign(String),
}

pub type Result<T> = std::result::Result<T, DspError>;
