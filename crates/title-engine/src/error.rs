use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum EngineError {
    #[error("enter at least one title before generating variations")]
    EmptyInput,
}

pub type Result<T> = std::result::Result<T, EngineError>;
