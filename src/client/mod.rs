//! A module to contain the traits and structs that deliver annotations to a CI system.
use std::io::Write;

use crate::{Annotation, AnnotatorError};

mod github;
pub use github::GithubClient;
mod json;
pub use json::JsonClient;

/// The log target used for log grouping commands.
///
/// Apps' [`log`] implementations should print records with this target without any prefix.
pub const CI_LOG_GROUPING: &str = "CI_LOG_GROUPING";

/// A custom trait that templates the output to a CI system.
pub trait CiClient {
    /// This prints a line to indicate the beginning of a related group of log statements.
    fn start_log_group(&self, name: &str) {
        let _ = name;
    }

    /// This prints a line to indicate the ending of a related group of log statements.
    fn end_log_group(&self, name: &str) {
        let _ = name;
    }

    /// Writes the given `annotations` to `out`.
    ///
    /// Nothing is written if `annotations` is empty.
    fn write_file_annotations(
        &self,
        out: &mut dyn Write,
        annotations: &[Annotation],
    ) -> Result<(), AnnotatorError>;

    /// Appends a given comment to the CI workflow's summary page.
    ///
    /// Not all CI systems natively support this type of feedback.
    /// For those, this is a non-op returning [`Ok`].
    fn append_step_summary(&self, comment: &str) -> Result<(), AnnotatorError> {
        let _ = comment;
        Ok(())
    }
}
