use thiserror::Error;

#[derive(Debug, Error)]
pub enum MatrixError {
    #[error("speed must be strictly positive, got {0} km/h")]
    InvalidSpeed(f64),
}
