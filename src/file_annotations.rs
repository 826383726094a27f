use std::fmt::Display;

use serde::Serialize;

/// The severity level of an [`Annotation`].
///
/// Only [`AnnotationLevel::Error`] is produced by the diff parser.
#[derive(Debug, Default, PartialEq, Eq, Clone, Copy, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AnnotationLevel {
    #[default]
    Error,
    Notice,
    Warning,
}

impl AnnotationLevel {
    /// The lowercase token used in CI workflow commands.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Error => "error",
            Self::Notice => "notice",
            Self::Warning => "warning",
        }
    }
}

impl Display for AnnotationLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A structure to describe a line-level annotation about a file.
///
/// Once constructed, an annotation cannot be changed.
#[derive(Debug, PartialEq, Eq, Clone, Serialize)]
pub struct Annotation {
    level: AnnotationLevel,
    file: String,
    line: usize,
    message: String,
}

impl Annotation {
    /// Create an annotation; it cannot be changed afterward.
    pub fn new(
        level: AnnotationLevel,
        file: impl Into<String>,
        line: usize,
        message: impl Into<String>,
    ) -> Self {
        Self {
            level,
            file: file.into(),
            line,
            message: message.into(),
        }
    }

    /// The severity level of the annotation.
    pub fn level(&self) -> AnnotationLevel {
        self.level
    }

    /// The path to the file being annotated.
    ///
    /// This is the file's path in the new version of the diff (`b/<path>`).
    pub fn file(&self) -> &str {
        &self.file
    }

    /// The line number (1-based) in the new version of the file.
    pub fn line(&self) -> usize {
        self.line
    }

    /// The message of the annotation.
    ///
    /// This may contain line breaks.
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl Display for Annotation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "::{} file={},line={}::{}",
            self.level, self.file, self.line, self.message
        )
    }
}
