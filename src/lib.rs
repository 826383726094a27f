#![doc = include_str!("../README.md")]
pub mod cli;
pub mod client;
pub mod error;
pub mod git_diff;
pub mod logger;

mod file_annotations;
pub use error::{AnnotatorError, ParseError};
pub use file_annotations::{Annotation, AnnotationLevel};
pub use git_diff::{parse_chunk, parse_diff, parse_file};
