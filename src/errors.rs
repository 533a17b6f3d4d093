use thiserror::Error;

/// A finding recorded while resolving templates.
///
/// These are never returned as `Err`: the resolver collects them in encounter
/// order and hands them back next to the (partially) resolved value.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolveError {
    /// The path located nothing, or located `null`.
    #[error("failed to extract field '{path}': field not found")]
    FieldNotFound { path: String },

    /// The path located a value whose string form is empty.
    #[error("failed to extract field '{path}': field is empty")]
    FieldEmpty { path: String },
}

impl ResolveError {
    /// The template path (including the leading `$`) this finding is about.
    pub fn path(&self) -> &str {
        match self {
            ResolveError::FieldNotFound { path } | ResolveError::FieldEmpty { path } => path,
        }
    }
}

/// Failures at the edges of the crate: turning text into JSON before resolving.
#[derive(Debug, Error)]
pub enum InputError {
    #[error("invalid JSON in {what}: {source}")]
    Json {
        what: &'static str,
        #[source]
        source: serde_json::Error,
    },

    #[error("cannot read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

pub type Result<T> = std::result::Result<T, InputError>;
