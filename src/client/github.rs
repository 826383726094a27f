//! This module holds functionality specific to GitHub Actions' workflow commands.

use std::{env, fs::OpenOptions, io::Write, path::PathBuf};

use super::{CI_LOG_GROUPING, CiClient};
use crate::{Annotation, AnnotatorError};

/// A structure to write annotations with GitHub Actions' workflow commands.
#[derive(Debug, Default, Clone)]
pub struct GithubClient {
    /// The value of the `GITHUB_STEP_SUMMARY` environment variable.
    step_summary: Option<PathBuf>,
}

impl GithubClient {
    /// Create a client that appends step summaries to the given file (if any).
    pub fn new(step_summary: Option<PathBuf>) -> Self {
        Self { step_summary }
    }

    /// Create a client from the CI runner's environment.
    pub fn from_env() -> Self {
        let step_summary = env::var_os("GITHUB_STEP_SUMMARY")
            .filter(|v| !v.is_empty())
            .map(PathBuf::from);
        if step_summary.is_none() {
            log::debug!("GITHUB_STEP_SUMMARY is not set");
        }
        Self { step_summary }
    }
}

impl CiClient for GithubClient {
    /// For apps' [`log`] implementations, this function's [`log::info`] output needs to have
    /// no prefixed data.
    /// Such behavior can be identified by the log target [`CI_LOG_GROUPING`].
    fn start_log_group(&self, name: &str) {
        log::info!(target: CI_LOG_GROUPING, "::group::{name}");
    }

    fn end_log_group(&self, _name: &str) {
        log::info!(target: CI_LOG_GROUPING, "::endgroup::");
    }

    fn write_file_annotations(
        &self,
        out: &mut dyn Write,
        annotations: &[Annotation],
    ) -> Result<(), AnnotatorError> {
        if annotations.is_empty() {
            return Ok(());
        }
        for annotation in annotations {
            writeln!(out, "{annotation}")
                .map_err(|e| AnnotatorError::io("write file annotation", e))?;
        }
        out.flush()
            .map_err(|e| AnnotatorError::io("flush file annotations", e))
    }

    fn append_step_summary(&self, comment: &str) -> Result<(), AnnotatorError> {
        let Some(gh_out) = &self.step_summary else {
            return Err(AnnotatorError::env_var(
                "GITHUB_STEP_SUMMARY",
                env::VarError::NotPresent,
            ));
        };
        // step summary MD file can be overwritten/removed in CI runners
        match OpenOptions::new().append(true).open(gh_out) {
            Ok(mut gh_out_file) => writeln!(&mut gh_out_file, "\n{comment}\n")
                .map_err(|e| AnnotatorError::io("write to GITHUB_STEP_SUMMARY file", e)),
            Err(e) => Err(AnnotatorError::io("open GITHUB_STEP_SUMMARY file", e)),
        }
    }
}
