//! The command line interface of the `parse-diffs` binary.
//!
//! This is the caller of the parser: it reads the diff, decides whether a
//! malformed file is fatal, and hands the annotations to a [`CiClient`].

use std::{
    env, fs,
    io::{self, Read, Write},
    path::{Path, PathBuf},
};

use clap::{Parser, ValueEnum};

use crate::{
    AnnotatorError,
    client::{CiClient, GithubClient, JsonClient},
    git_diff::{parse_file, split_file_diffs},
};

/// No format errors were found.
pub const SUCCESS: u8 = 0;

/// At least one format error was annotated.
pub const FORMAT_ERRORS: u8 = 1;

/// The diff could not be read or parsed, or annotations could not be written.
pub const FATAL_ERROR: u8 = 2;

/// Convert `git diff` output into CI annotations for formatting errors.
///
/// Pipe the output of `git diff` (after running a formatter) into this tool
/// and it will print one annotation per changed hunk.
#[derive(Parser, Debug)]
#[command(name = "parse-diffs")]
#[command(version, about, long_about = None)]
pub struct Arguments {
    /// The file containing the diff. Reads stdin if absent or `-`.
    pub diff_file: Option<PathBuf>,

    /// The format of the annotations written to stdout.
    #[arg(
        long,
        value_enum,
        default_value_t = OutputFormat::Github,
        env = "DIFF_ANNOTATIONS_FORMAT"
    )]
    pub format: OutputFormat,

    /// Fail on a malformed file diff instead of skipping it.
    #[arg(long, env = "DIFF_ANNOTATIONS_STRICT")]
    pub strict: bool,

    /// Append a summary to the workflow's step summary (GitHub only).
    #[arg(long)]
    pub step_summary: bool,

    /// Enable debug output.
    #[arg(short, long)]
    pub verbose: bool,
}

/// The supported annotation formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// GitHub Actions workflow commands (`::error file=...,line=...::...`).
    Github,
    /// One JSON object per line.
    Json,
}

impl Arguments {
    /// The log level implied by `--verbose` and the runner's `ACTIONS_STEP_DEBUG`.
    pub fn log_level(&self) -> log::LevelFilter {
        let step_debug = env::var("ACTIONS_STEP_DEBUG").is_ok_and(|v| v == "true");
        if self.verbose || step_debug {
            log::LevelFilter::Debug
        } else {
            log::LevelFilter::Info
        }
    }

    fn client(&self) -> Box<dyn CiClient> {
        match self.format {
            OutputFormat::Github => Box::new(GithubClient::from_env()),
            OutputFormat::Json => Box::new(JsonClient),
        }
    }

    /// The path to read the diff from, or [`None`] for stdin.
    pub fn input_path(&self) -> Option<&Path> {
        self.diff_file
            .as_deref()
            .filter(|path| path.as_os_str() != "-")
    }

    /// Read the whole diff from [`Self::input_path`] or stdin.
    pub fn read_diff(&self) -> Result<String, AnnotatorError> {
        let mut diff = String::new();
        match self.input_path() {
            Some(path) => {
                log::debug!("Reading diff from {}", path.display());
                diff = fs::read_to_string(path)
                    .map_err(|e| AnnotatorError::io(&format!("read {}", path.display()), e))?;
            }
            _ => {
                log::debug!("Reading diff from stdin");
                io::stdin()
                    .read_to_string(&mut diff)
                    .map_err(|e| AnnotatorError::io("read diff from stdin", e))?;
            }
        }
        Ok(diff)
    }
}

/// The tally of an [`annotate`] pass.
#[derive(Debug, Default, PartialEq, Eq, Clone, Copy)]
pub struct Report {
    /// The number of annotations written.
    pub annotations: usize,
    /// The number of files that got annotations.
    pub files: usize,
    /// The number of malformed file diffs that were skipped.
    pub skipped: usize,
}

impl Report {
    /// A markdown summary suitable for a step summary.
    pub fn summary(&self) -> String {
        let mut summary = String::from("## Format check\n\n");
        if self.annotations == 0 {
            summary.push_str("No format errors found.");
        } else {
            summary.push_str(&format!(
                "Found {} format error(s) in {} file(s).",
                self.annotations, self.files
            ));
        }
        if self.skipped > 0 {
            summary.push_str(&format!(
                "\n\n{} malformed file diff(s) were skipped.",
                self.skipped
            ));
        }
        summary
    }

    /// The process exit code for this report.
    pub fn exit_code(&self) -> u8 {
        if self.annotations > 0 {
            FORMAT_ERRORS
        } else {
            SUCCESS
        }
    }
}

/// Parse every file in `diff` and write its annotations through `client`.
///
/// A malformed file diff is fatal if `strict` is asserted.
/// Otherwise it is logged and skipped.
pub fn annotate(
    diff: &str,
    strict: bool,
    client: &dyn CiClient,
    out: &mut dyn Write,
) -> Result<Report, AnnotatorError> {
    let mut report = Report::default();
    let mut file_diffs = 0;
    for file_diff in split_file_diffs(diff) {
        file_diffs += 1;
        let annotations = match parse_file(file_diff) {
            Ok(annotations) => annotations,
            Err(e) if strict => return Err(e.into()),
            Err(e) => {
                log::warn!("Skipping {e}");
                report.skipped += 1;
                continue;
            }
        };
        let Some(first) = annotations.first() else {
            continue;
        };
        let group = format!("Format errors in {}", first.file());
        client.start_log_group(&group);
        let written = client.write_file_annotations(out, &annotations);
        client.end_log_group(&group);
        written?;
        report.files += 1;
        report.annotations += annotations.len();
    }
    if file_diffs == 0 && !diff.trim().is_empty() {
        log::warn!("Input contains no `diff --git` file headers; nothing to annotate");
    }
    log::debug!(
        "Wrote {} annotation(s) for {} file(s)",
        report.annotations,
        report.files
    );
    Ok(report)
}

/// Append the `report`'s summary through `client`.
///
/// A missing step summary file is logged and skipped.
pub fn append_summary(client: &dyn CiClient, report: &Report) -> Result<(), AnnotatorError> {
    match client.append_step_summary(&report.summary()) {
        Err(AnnotatorError::EnvVar { name, .. }) => {
            log::warn!("Skipped the step summary because {name} is not set");
            Ok(())
        }
        result => result,
    }
}

/// Run the CLI with parsed `args`, writing annotations to stdout.
pub fn run_cli(args: &Arguments) -> Result<Report, AnnotatorError> {
    let diff = args.read_diff()?;
    let client = args.client();
    let report = annotate(&diff, args.strict, client.as_ref(), &mut io::stdout())?;
    if args.step_summary {
        append_summary(client.as_ref(), &report)?;
    }
    Ok(report)
}
