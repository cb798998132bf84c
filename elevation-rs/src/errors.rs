use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum FilterError {
    #[error("Smoothing factor must lie strictly between 0 and 1, got {0}")]
    InvalidAlpha(f32),
}
