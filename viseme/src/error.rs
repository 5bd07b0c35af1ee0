use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum VisemeError {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
}
