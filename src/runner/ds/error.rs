use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ErrorType {
    #[error("Uncaught reference error: {0}.")]
    ReferenceError(String),
    #[error("Uncaught ambiguous reference error: {0}.")]
    AmbiguousReferenceError(String),
    #[error("Uncaught type error: {0}.")]
    TypeError(String),
    #[error("Uncaught range error: {0}.")]
    RangeError(String),
    #[error("Uncaught definition error: {0}.")]
    DefinitionError(String),
    #[error("Uncaught syntax error: {0}.")]
    SyntaxError(String),
}
impl ErrorType {
    pub fn kind(&self) -> &'static str {
        match self {
            ErrorType::ReferenceError(_) => "ReferenceError",
            ErrorType::AmbiguousReferenceError(_) => "AmbiguousReferenceError",
            ErrorType::TypeError(_) => "TypeError",
            ErrorType::RangeError(_) => "RangeError",
            ErrorType::DefinitionError(_) => "DefinitionError",
            ErrorType::SyntaxError(_) => "SyntaxError",
        }
    }

    pub fn message(&self) -> &str {
        match self {
            ErrorType::ReferenceError(m)
            | ErrorType::AmbiguousReferenceError(m)
            | ErrorType::TypeError(m)
            | ErrorType::RangeError(m)
            | ErrorType::DefinitionError(m)
            | ErrorType::SyntaxError(m) => m,
        }
    }
}
