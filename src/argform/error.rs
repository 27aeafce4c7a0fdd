use crate::argument::ArgKind;
use crate::value::Value;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ArgformError {
    #[error("Duplicate argument '{0}'")]
    DuplicateName(String),

    #[error("Argument not found: {0}")]
    NotFound(String),

    #[error("Unknown field '{key}' on argument '{name}'")]
    UnknownField { name: String, key: String },

    #[error("'{value}' is not one of the items of '{name}'")]
    NotAnItem { name: String, value: String },

    #[error("{kind} argument '{name}' cannot accept {shape} value '{value}'")]
    Incompatible {
        name: String,
        kind: ArgKind,
        shape: &'static str,
        value: Value,
    },

    #[error("Argument '{0}' has no bound presentation")]
    Unbound(String),

    #[error("No binding available for {0} arguments")]
    Unsupported(ArgKind),

    #[error("Cannot clear without persistent storage")]
    NoStorage,

    #[error("Could not determine a per-user settings directory")]
    NoSettingsDir,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, ArgformError>;
