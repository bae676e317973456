use thiserror::Error;

/// Every failure the descriptor builder, the registry and the path engine can surface.
///
/// An identity nobody can resolve is not an error: the registry answers `Ok(None)` for it so
/// callers can chain their own fallbacks.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum BeanError {
    #[error("the field '{field}' does not exist in {type_id}")]
    UnknownField { field: String, type_id: String },

    #[error("the field '{field}' is not a list")]
    InvalidIndexUsage { field: String },

    #[error("the field '{field}' is not a complex type")]
    InvalidRecursion { field: String },

    #[error("no accessor found for field '{field}' in {type_id}")]
    NoAccessor { field: String, type_id: String },

    #[error("the value can not be converted from {from} to {to}")]
    ConversionFailure { from: String, to: String },

    #[error("the non-empty collection of size {size} for field '{field}' can not be converted to the single item of type {to}")]
    AmbiguousCollectionCollapse {
        field: String,
        size: usize,
        to: String,
    },

    #[error("can not build the type descriptor for {type_id}: {message}")]
    ConstructionFailure { type_id: String, message: String },

    #[error("invalid path '{path}': {message}")]
    InvalidPath { path: String, message: String },

    #[error("no collection handler available for field '{field}'")]
    NoCollectionHandler { field: String },

    #[error("invalid index '{index}': {message}")]
    InvalidIndex { index: String, message: String },

    #[error("invocation of '{method}' failed: {message}")]
    Invocation { method: String, message: String },

    #[error("can not instantiate {type_id}: {message}")]
    Instantiation { type_id: String, message: String },

    #[error("the descriptor for {type_id} is no longer attached to a resolver")]
    Detached { type_id: String },

    #[error("config error: {message}")]
    Config { message: String },
}

impl BeanError {
    pub fn construction(type_id: &str, message: impl Into<String>) -> Self {
        BeanError::ConstructionFailure {
            type_id: type_id.to_string(),
            message: message.into(),
        }
    }

    pub fn invocation(method: &str, message: impl Into<String>) -> Self {
        BeanError::Invocation {
            method: method.to_string(),
            message: message.into(),
        }
    }

    pub fn conversion(from: impl ToString, to: impl ToString) -> Self {
        BeanError::ConversionFailure {
            from: from.to_string(),
            to: to.to_string(),
        }
    }
}
