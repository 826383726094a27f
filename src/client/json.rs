use std::io::Write;

use super::CiClient;
use crate::{Annotation, AnnotatorError};

/// A structure to write annotations as JSON lines.
///
/// Each annotation is serialized as one object per line,
/// for CI systems (or scripts) that don't understand GitHub's workflow commands.
#[derive(Debug, Default, Clone, Copy)]
pub struct JsonClient;

impl CiClient for JsonClient {
    fn write_file_annotations(
        &self,
        out: &mut dyn Write,
        annotations: &[Annotation],
    ) -> Result<(), AnnotatorError> {
        for annotation in annotations {
            serde_json::to_writer(&mut *out, annotation)
                .map_err(|e| AnnotatorError::json("serialize file annotation", e))?;
            writeln!(out).map_err(|e| AnnotatorError::io("write file annotation", e))?;
        }
        out.flush()
            .map_err(|e| AnnotatorError::io("flush file annotations", e))
    }
}
