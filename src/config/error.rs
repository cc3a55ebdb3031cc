use thiserror::Error;

// * Unified Error type for the Settings Layer.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read settings file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Syntax error on line {line}: {reason}")]
    Syntax { line: usize, reason: String },

    #[error("Duplicate key '{key}' on line {line}")]
    DuplicateKey { key: String, line: usize },

    #[error("Missing [{0}] section")]
    MissingSection(String),

    #[error("Missing required key '{0}'")]
    MissingKey(&'static str),

    #[error("Key '{key}' expects a non-negative number, got '{value}'")]
    InvalidNumber { key: &'static str, value: String },

    #[error("Key '{key}' expects on/off/true/false/yes/no/1/0, got '{value}'")]
    InvalidBoolean { key: &'static str, value: String },

    #[error("Invalid user agent on line {line}: {reason}")]
    InvalidUserAgent { line: usize, reason: String },
}
