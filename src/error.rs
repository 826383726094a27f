//! Error types used across the diff-annotations crate.
use thiserror::Error;

/// The possible errors emitted when parsing `git diff` output.
///
/// These are raised on malformed input only.
/// The parser never logs or recovers from them; that is up to the caller.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    /// A hunk has fewer than 2 lines, or its first line is not a hunk header.
    #[error("Malformed diff chunk:\n{chunk}")]
    MalformedChunk {
        /// The offending chunk text.
        chunk: String,
    },

    /// A file's diff has fewer than 5 lines, or its first line is not a `diff --git` header.
    #[error("Malformed file diff:\n{diff}")]
    MalformedDiff {
        /// The offending diff text.
        diff: String,
    },
}

/// The possible errors emitted while reading diffs and writing annotations.
#[derive(Debug, Error)]
pub enum AnnotatorError {
    /// Error related to parsing the diff text.
    #[error(transparent)]
    Parse(#[from] ParseError),

    /// Errors related to standard I/O.
    #[error("Failed to {task}: {source}")]
    Io {
        task: String,
        #[source]
        source: std::io::Error,
    },

    /// Error emitted when serializing annotations as JSON.
    #[error("Failed to {task}: {source}")]
    Json {
        task: String,
        #[source]
        source: serde_json::Error,
    },

    /// Error emitted when failing to read environment variable
    #[error("Failed to get env var '{name}': {source}")]
    EnvVar {
        name: String,
        #[source]
        source: std::env::VarError,
    },
}

impl AnnotatorError {
    /// Helper function to create an [`Self::EnvVar`] error with variable name and source error.
    pub fn env_var(name: &str, source: std::env::VarError) -> Self {
        Self::EnvVar {
            name: name.to_string(),
            source,
        }
    }

    /// Helper function to create an [`Self::Io`] error with task context.
    pub fn io(task: &str, source: std::io::Error) -> Self {
        Self::Io {
            task: task.to_string(),
            source,
        }
    }

    /// Helper function to create a [`Self::Json`] error with task context.
    pub fn json(task: &str, source: serde_json::Error) -> Self {
        Self::Json {
            task: task.to_string(),
            source,
        }
    }
}
