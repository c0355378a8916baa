use thiserror::Error;

/// Reasons a killer payload is rejected before it reaches storage.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Falta el campo obligatorio: {0}")]
    MissingField(&'static str),

    #[error("La fecha de lanzamiento es inválida.")]
    InvalidReleaseDate(String),
}
