use std::num::ParseIntError;
use std::path::PathBuf;

use thiserror::Error;

use crate::flags::FlagKind;

/// Why a flag consumer could not produce a parsed value.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LookupError {
    #[error("flag was never registered with the parser")]
    NotRegistered,

    #[error("stored value is not of kind {expected}")]
    WrongKind { expected: FlagKind },

    #[error("flag has no value")]
    NoValue,

    #[error("{0}")]
    Parser(String),
}

#[derive(Debug, Error)]
pub enum FlagfigError {
    #[error("undefined environment variables: {}", .names.join(", "))]
    MissingEnvVars { names: Vec<String> },

    #[error("invalid boolean value '{value}' for '{key}'")]
    InvalidBool { key: String, value: String },

    #[error("invalid integer value '{value}' for '{key}': {source}")]
    InvalidInt {
        key: String,
        value: String,
        source: ParseIntError,
    },

    #[error("invalid configuration content for '{set}': {source}")]
    InvalidConfig {
        set: String,
        source: Box<FlagfigError>,
    },

    #[error("flag '{flag}' declares kind {expected} but its default is {actual}")]
    DefaultTypeMismatch {
        flag: String,
        expected: FlagKind,
        actual: FlagKind,
    },

    #[error("flag '{flag}' has no declared kind")]
    UnspecifiedKind { flag: String },

    #[error("flag '{flag}' was never declared")]
    FlagNotDeclared { flag: String },

    #[error("flag '{flag}' holds {actual} value '{value}', not {expected}")]
    FlagTypeMismatch {
        flag: String,
        expected: FlagKind,
        actual: FlagKind,
        value: String,
    },

    #[error("could not read flag '{flag}': {source}")]
    FlagLookup { flag: String, source: LookupError },

    #[error("no flag results available")]
    NoResults,

    #[error("Failed to parse {path}: {source}")]
    ParseError {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("Failed to read {path}: {source}")]
    IoError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("App name is required: call .app_name() on the loader")]
    AppNameRequired,
}

impl FlagfigError {
    /// Wrap an accessor failure with the name of the flag set whose
    /// configuration produced it.
    pub fn invalid_config(set: &str, source: FlagfigError) -> Self {
        FlagfigError::InvalidConfig {
            set: set.to_string(),
            source: Box::new(source),
        }
    }

    /// Whether this error stems from a mistake in the flag declarations
    /// rather than from user-supplied configuration.
    pub fn is_programmer_error(&self) -> bool {
        matches!(
            self,
            FlagfigError::DefaultTypeMismatch { .. } | FlagfigError::UnspecifiedKind { .. }
        )
    }
}
