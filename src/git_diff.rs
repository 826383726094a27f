use regex::Regex;
use std::sync::LazyLock;

use crate::{Annotation, AnnotationLevel, ParseError};

/// A struct to represent the header information of a diff hunk.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub struct DiffHunkHeader {
    /// The starting line number of the old hunk.
    pub old_start: usize,
    /// The total number of lines in the old hunk.
    pub old_lines: usize,
    /// The starting line number of the new hunk.
    pub new_start: usize,
    /// The total number of lines in the new hunk.
    pub new_lines: usize,
}

/// Matches `@@ -<start>,<count> +<start>,<count> @@`.
///
/// Both counts are required.
static HUNK_HEADER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^@@ -(\d+),(\d+) \+(\d+),(\d+) @@").unwrap());

/// Matches `diff --git a/<old path> b/<new path>`.
static FILE_HEADER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^diff --git a/(.*) b/(.*)$").unwrap());

static FILE_DELIMITER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^diff --git ").unwrap());

/// The label that precedes the offending hunk in every annotation's message.
pub const FORMAT_ERROR_LABEL: &str = "Format Error";

/// The number of lines (file header included) that precede the first hunk of a file's diff.
const FRONT_MATTER_LINES: usize = 4;

impl DiffHunkHeader {
    /// Parse a hunk header line.
    ///
    /// Returns [`None`] if the line is not a hunk header.
    pub fn parse(line: &str) -> Option<Self> {
        let captures = HUNK_HEADER.captures(line)?;
        let number =
            |index: usize| -> Option<usize> { captures.get(index)?.as_str().parse().ok() };
        Some(Self {
            old_start: number(1)?,
            old_lines: number(2)?,
            new_start: number(3)?,
            new_lines: number(4)?,
        })
    }

    /// The line that represents the whole hunk: the midpoint of the new range.
    ///
    /// This is an approximation. It does not always point at the offending line.
    pub fn midpoint(&self) -> Option<usize> {
        self.new_start.checked_add(self.new_lines / 2)
    }
}

/// Create an [`Annotation`] from a single hunk (header line included).
///
/// Fails with [`ParseError::MalformedChunk`] if the chunk has fewer than 2 lines
/// or does not start with a hunk header.
pub fn parse_chunk(chunk: &str, file: &str) -> Result<Annotation, ParseError> {
    let lines = chunk.lines().collect::<Vec<_>>();
    let malformed = || ParseError::MalformedChunk {
        chunk: chunk.to_string(),
    };
    if lines.len() < 2 {
        return Err(malformed());
    }
    let line = DiffHunkHeader::parse(lines[0])
        .and_then(|header| header.midpoint())
        .ok_or_else(malformed)?;
    Ok(Annotation::new(
        AnnotationLevel::Error,
        file,
        line,
        format!(
            "{FORMAT_ERROR_LABEL}\n```diff\n{}\n```",
            chunk.trim_end_matches('\n')
        ),
    ))
}

/// Parses a single file's diff into one [`Annotation`] per hunk.
///
/// The diff must start with a `diff --git a/... b/...` line followed by 3 lines of
/// metadata (`index`, `---`, `+++`). The annotations name the file's new path and
/// are ordered as the hunks appear.
pub fn parse_file(contents: &str) -> Result<Vec<Annotation>, ParseError> {
    let lines = contents.lines().collect::<Vec<_>>();
    let malformed = || ParseError::MalformedDiff {
        diff: contents.to_string(),
    };
    if lines.len() <= FRONT_MATTER_LINES {
        return Err(malformed());
    }
    let file_name = FILE_HEADER
        .captures(lines[0])
        .and_then(|captures| captures.get(2))
        .ok_or_else(malformed)?
        .as_str();

    // chunks are slices of `contents` so line endings are kept verbatim
    let mut chunks = Vec::new();
    let mut chunk_start = None;
    let mut offset = 0;
    for (index, line) in contents.split_inclusive('\n').enumerate() {
        if index >= FRONT_MATTER_LINES {
            match chunk_start {
                Some(start) if HUNK_HEADER.is_match(line) => {
                    chunks.push(&contents[start..offset]);
                    chunk_start = Some(offset);
                }
                None => chunk_start = Some(offset),
                _ => {}
            }
        }
        offset += line.len();
    }
    if let Some(start) = chunk_start {
        chunks.push(&contents[start..]);
    }

    chunks
        .iter()
        .map(|chunk| parse_chunk(chunk, file_name))
        .collect()
}

/// Splits a multi-file `git diff` into each file's diff.
///
/// Each yielded slice starts with its `diff --git` line.
/// Anything preceding the first file header is dropped.
pub fn split_file_diffs(diff: &str) -> impl Iterator<Item = &str> {
    let mut bounds = FILE_DELIMITER
        .find_iter(diff)
        .map(|m| m.start())
        .collect::<Vec<_>>();
    bounds.push(diff.len());
    (1..bounds.len()).map(move |i| &diff[bounds[i - 1]..bounds[i]])
}

/// Parses a multi-file `git diff` into annotations for every hunk of every file.
///
/// Fails on the first malformed file or hunk.
pub fn parse_diff(diff: &str) -> Result<Vec<Annotation>, ParseError> {
    let mut annotations = Vec::new();
    for file_diff in split_file_diffs(diff) {
        annotations.extend(parse_file(file_diff)?);
    }
    Ok(annotations)
}

// ******************* UNIT TESTS ***********************
#[cfg(test)]
mod test {
    use super::{DiffHunkHeader, parse_chunk, parse_diff, parse_file, split_file_diffs};
    use crate::{AnnotationLevel, ParseError};
    use pretty_assertions::assert_eq;

    const TWO_HUNKS: &str = "diff --git a/test b/test
index 1a2b3c4..5d6e7f8 100644
--- a/test
+++ b/test
@@ -24,7 +24,7 @@ fn main() {
     let a = 1;
     let b = 2;
     let c = 3;
-    let d  =  4;
+    let d = 4;
     let e = 5;
     let f = 6;
     let g = 7;
@@ -85,7 +85,7 @@ fn helper() {
     one();
     two();
     three();
-    four( );
+    four();
     five();
     six();
     seven();
";

    const RENAMED_PATHS: &str = "diff --git a/path/for/Some file.cpp b/path/to/Some file.cpp
index 1a2b3c4..5d6e7f8 100644
--- a/path/for/Some file.cpp
+++ b/path/to/Some file.cpp
@@ -3,7 +3,7 @@



-#include <some_lib/render/animation.hpp>
+#include <some_lib/render/animations.hpp>



";

    #[test]
    fn chunk_midpoint() {
        let annotation = parse_chunk("@@ -1,3 +1,3 @@\n-a\n+b", "test").unwrap();
        assert_eq!(annotation.line(), 2);
        assert_eq!(annotation.level(), AnnotationLevel::Error);
        assert_eq!(annotation.file(), "test");
    }

    #[test]
    fn chunk_message_embeds_hunk() {
        let chunk = "@@ -1,3 +1,3 @@\n-a\n+b";
        let annotation = parse_chunk(chunk, "test").unwrap();
        assert_eq!(
            annotation.message(),
            "Format Error\n```diff\n@@ -1,3 +1,3 @@\n-a\n+b\n```"
        );
    }

    #[test]
    fn chunk_floor_division() {
        let annotation = parse_chunk("@@ -10,4 +12,5 @@\n+x\n+y", "f").unwrap();
        assert_eq!(annotation.line(), 14);
    }

    #[test]
    fn terse_chunk_header() {
        let err = parse_chunk("@@ -3 +3 @@\n-a\n+b", "f").unwrap_err();
        assert!(matches!(err, ParseError::MalformedChunk { .. }));
        assert_eq!(DiffHunkHeader::parse("@@ -18 +17,2 @@ int main(){"), None);
        assert_eq!(
            DiffHunkHeader::parse("@@ -18,1 +17,2 @@ int main(){"),
            Some(DiffHunkHeader {
                old_start: 18,
                old_lines: 1,
                new_start: 17,
                new_lines: 2,
            })
        );
    }

    #[test]
    fn terse_line_does_not_start_hunk() {
        let diff = "diff --git a/f b/f\nindex 1..2 100644\n--- a/f\n+++ b/f\n@@ -1,4 +1,4 @@\n-a\n+b\n@@ -9 +9 @@\n-c\n+d\n";
        let annotations = parse_file(diff).unwrap();
        assert_eq!(annotations.len(), 1);
        assert_eq!(annotations[0].line(), 3);
        assert!(annotations[0].message().contains("@@ -9 +9 @@\n-c\n+d\n```"));
    }

    #[test]
    fn crlf_hunk_is_verbatim() {
        let diff = TWO_HUNKS.replace('\n', "\r\n");
        let annotations = parse_file(&diff).unwrap();
        assert_eq!(annotations.len(), 2);
        assert_eq!(annotations[0].file(), "test");
        assert!(
            annotations[0]
                .message()
                .contains("-    let d  =  4;\r\n+    let d = 4;\r\n")
        );
        assert!(annotations[1].message().ends_with("     seven();\r\n```"));
    }

    #[test]
    fn chunk_too_short() {
        let err = parse_chunk("@@ -1,3 +1,3 @@", "test").unwrap_err();
        assert_eq!(
            err,
            ParseError::MalformedChunk {
                chunk: "@@ -1,3 +1,3 @@".to_string()
            }
        );
    }

    #[test]
    fn chunk_bad_header() {
        let err = parse_chunk("not a header\n+a\n-b", "test").unwrap_err();
        assert!(matches!(err, ParseError::MalformedChunk { chunk } if chunk.starts_with("not")));
        assert!(parse_chunk(" @@ -1,3 +1,3 @@\n+a", "test").is_err());
        assert!(parse_chunk("@@ -a,3 +1,3 @@\n+a", "test").is_err());
    }

    #[test]
    fn two_hunk_file() {
        let annotations = parse_file(TWO_HUNKS).unwrap();
        let lines = annotations.iter().map(|a| a.line()).collect::<Vec<_>>();
        assert_eq!(lines, vec![27, 88]);
        assert!(annotations.iter().all(|a| a.file() == "test"));
        assert!(annotations[1].message().contains("+    four();"));
        assert!(!annotations[0].message().contains("four"));
    }

    #[test]
    fn file_uses_new_path() {
        let annotations = parse_file(RENAMED_PATHS).unwrap();
        assert_eq!(annotations.len(), 1);
        assert_eq!(annotations[0].file(), "path/to/Some file.cpp");
        assert_eq!(annotations[0].line(), 6);
    }

    #[test]
    fn file_too_short() {
        let diff = "diff --git a/test b/test\nindex 1..2\n--- a/test\n+++ b/test\n";
        let err = parse_file(diff).unwrap_err();
        assert_eq!(
            err,
            ParseError::MalformedDiff {
                diff: diff.to_string()
            }
        );
    }

    #[test]
    fn file_bad_header() {
        let diff = TWO_HUNKS.replacen("diff --git a/test b/test", "diff a/test b/test", 1);
        assert!(matches!(
            parse_file(&diff).unwrap_err(),
            ParseError::MalformedDiff { .. }
        ));
    }

    #[test]
    fn file_with_unexpected_front_matter() {
        let diff = "diff --git a/new b/new\nnew file mode 100644\nindex 0000000..5d6e7f8\n--- /dev/null\n+++ b/new\n@@ -0,0 +1,2 @@\n+a\n+b\n";
        assert!(matches!(
            parse_file(diff).unwrap_err(),
            ParseError::MalformedChunk { chunk } if chunk == "+++ b/new\n"
        ));
    }

    #[test]
    fn reparse_is_identical() {
        assert_eq!(parse_file(TWO_HUNKS).unwrap(), parse_file(TWO_HUNKS).unwrap());
    }

    #[test]
    fn split_multiple_files() {
        let diff = format!("preamble\n{TWO_HUNKS}{RENAMED_PATHS}");
        let files = split_file_diffs(&diff).collect::<Vec<_>>();
        assert_eq!(files, vec![TWO_HUNKS, RENAMED_PATHS]);
        assert_eq!(split_file_diffs("no diff here").count(), 0);
    }

    #[test]
    fn parse_multiple_files() {
        let diff = format!("{TWO_HUNKS}{RENAMED_PATHS}");
        let annotations = parse_diff(&diff).unwrap();
        let locations = annotations
            .iter()
            .map(|a| (a.file(), a.line()))
            .collect::<Vec<_>>();
        assert_eq!(
            locations,
            vec![("test", 27), ("test", 88), ("path/to/Some file.cpp", 6)]
        );
    }

    #[test]
    fn parse_multiple_files_fails_fast() {
        let diff = format!("{TWO_HUNKS}diff --git a/x b/x\n");
        assert!(matches!(
            parse_diff(&diff).unwrap_err(),
            ParseError::MalformedDiff { .. }
        ));
        assert!(parse_diff("").unwrap().is_empty());
    }
}
