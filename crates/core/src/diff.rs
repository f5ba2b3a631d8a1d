//! # Diff Index
//!
//! Maps lines of the files changed in a pull request onto diff positions.
//!
//! A diff position is the 1-based ordinal of a line inside a file's unified
//! patch, counted from the line directly below the first hunk header. Every
//! later line of the patch advances the position by one, including the headers
//! of later hunks and `\ No newline at end of file` markers. Hosting APIs use
//! this ordinal, not the file's own line number, to anchor inline comments.

use std::collections::HashMap;

use lazy_static::lazy_static;
use pr_commenter_developer_platforms::models::PullRequestFile;
use regex::Regex;
use tracing::{debug, warn};

use crate::errors::ParseError;

#[cfg(test)]
#[path = "diff_tests.rs"]
mod tests;

lazy_static! {
    /// Pre-compiled regex for unified diff hunk headers, e.g. `@@ -10,5 +10,7 @@ resource "aws_s3_bucket"`
    static ref HUNK_HEADER_REGEX: Regex =
        Regex::new(r"^@@ -(\d+)(?:,(\d+))? \+(\d+)(?:,(\d+))? @@")
            .expect("Failed to compile hunk header regex");
}

/// How a line in a patch relates to the base and head versions of the file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeKind {
    /// The line only exists in the head version.
    Added,
    /// The line is unchanged and shown for context.
    Context,
    /// The line only exists in the base version.
    Removed,
}

/// A single line of a hunk.
///
/// `line_number` is the line in the head version of the file for added and
/// context lines, and the line in the base version for removed lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DiffLine {
    pub line_number: u32,
    pub position: u32,
    pub kind: ChangeKind,
}

impl DiffLine {
    /// Returns `true` if a review comment can be anchored on this line.
    pub fn is_commentable(&self) -> bool {
        matches!(self.kind, ChangeKind::Added | ChangeKind::Context)
    }
}

/// A contiguous block of a unified diff.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiffHunk {
    pub path: String,
    pub source_start: u32,
    pub source_lines: u32,
    pub target_start: u32,
    pub target_lines: u32,

    /// The lines of the hunk in the order they appear in the patch
    pub lines: Vec<DiffLine>,
}

/// The parsed patch of one file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileDiff {
    pub path: String,
    pub hunks: Vec<DiffHunk>,

    /// Commentable lines ordered by head line number
    anchors: Vec<DiffLine>,

    /// Base line numbers of removed lines, ascending
    removed: Vec<u32>,
}

impl FileDiff {
    fn new(path: &str, hunks: Vec<DiffHunk>) -> Self {
        let mut anchors: Vec<DiffLine> = hunks
            .iter()
            .flat_map(|h| h.lines.iter())
            .filter(|l| l.is_commentable())
            .copied()
            .collect();
        anchors.sort_by_key(|l| l.line_number);
        anchors.dedup_by_key(|l| l.line_number);

        let mut removed: Vec<u32> = hunks
            .iter()
            .flat_map(|h| h.lines.iter())
            .filter(|l| l.kind == ChangeKind::Removed)
            .map(|l| l.line_number)
            .collect();
        removed.sort_unstable();
        removed.dedup();

        Self {
            path: path.to_string(),
            hunks,
            anchors,
            removed,
        }
    }

    /// Looks up the diff position of a line of the head version of the file.
    pub fn resolve(&self, line_number: u32) -> Result<u32, NotInDiff> {
        match self
            .anchors
            .binary_search_by_key(&line_number, |l| l.line_number)
        {
            Ok(index) => Ok(self.anchors[index].position),
            Err(_) if self.removed.binary_search(&line_number).is_ok() => {
                Err(NotInDiff::RemovedLine)
            }
            Err(_) => Err(NotInDiff::OutsideHunks),
        }
    }

    /// Finds the head line number anchored at the given diff position.
    pub fn line_at_position(&self, position: u32) -> Option<u32> {
        self.anchors
            .iter()
            .find(|l| l.position == position)
            .map(|l| l.line_number)
    }
}

/// The reason a line cannot carry a review comment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum NotInDiff {
    #[error("the file is not changed by the pull request")]
    UnknownFile,

    #[error("the patch of the file could not be parsed")]
    Unparseable,

    #[error("the line is outside every hunk of the file")]
    OutsideHunks,

    #[error("the line was removed by the pull request")]
    RemovedLine,

    #[error("the line range is invalid")]
    InvalidRange,
}

/// Parses the hunk header of a unified diff into
/// `(source_start, source_lines, target_start, target_lines)`.
///
/// An omitted line count means a count of one.
fn parse_hunk_header(header: &str) -> Option<(u32, u32, u32, u32)> {
    let captures = HUNK_HEADER_REGEX.captures(header)?;
    let number = |index: usize, default: Option<u32>| match captures.get(index) {
        Some(m) => m.as_str().parse::<u32>().ok(),
        None => default,
    };

    Some((
        number(1, None)?,
        number(2, Some(1))?,
        number(3, None)?,
        number(4, Some(1))?,
    ))
}

/// Returns the current line number of a side of the patch and moves it to the next line.
fn advance(next: &mut u32, line: usize) -> Result<u32, ParseError> {
    let current = *next;
    *next = current
        .checked_add(1)
        .ok_or(ParseError::LineNumberOverflow { line })?;
    Ok(current)
}

/// Parses the unified patch of a single file.
///
/// # Arguments
///
/// * `path` - The path of the file relative to the repository root
/// * `patch` - The patch text, starting at the first hunk header
///
/// # Errors
///
/// Returns a [`ParseError`] if the patch does not start with a hunk header,
/// contains a malformed hunk header, or contains a line that is not a context,
/// added, removed or "no newline" line.
///
/// # Examples
///
/// ```
/// use pr_commenter_core::diff::parse_patch;
///
/// let patch = "@@ -1,2 +1,3 @@\n line one\n+line two\n line three";
/// let file = parse_patch("main.tf", patch).unwrap();
///
/// assert_eq!(file.resolve(2), Ok(2));
/// ```
pub fn parse_patch(path: &str, patch: &str) -> Result<FileDiff, ParseError> {
    let mut hunks: Vec<DiffHunk> = Vec::new();
    let mut position: u32 = 0;
    let mut next_source: u32 = 0;
    let mut next_target: u32 = 0;

    for (index, content) in patch.lines().enumerate() {
        let line = index + 1;

        if content.starts_with("@@") {
            let (source_start, source_lines, target_start, target_lines) =
                parse_hunk_header(content).ok_or_else(|| ParseError::InvalidHunkHeader {
                    line,
                    header: content.to_string(),
                })?;

            // Only the first header sits above position 1
            if !hunks.is_empty() {
                position += 1;
            }

            hunks.push(DiffHunk {
                path: path.to_string(),
                source_start,
                source_lines,
                target_start,
                target_lines,
                lines: Vec::new(),
            });
            next_source = source_start;
            next_target = target_start;
            continue;
        }

        let Some(hunk) = hunks.last_mut() else {
            return Err(ParseError::MissingHunkHeader { line });
        };

        position += 1;
        let entry = match content.chars().next() {
            Some('+') => DiffLine {
                line_number: advance(&mut next_target, line)?,
                position,
                kind: ChangeKind::Added,
            },
            Some('-') => DiffLine {
                line_number: advance(&mut next_source, line)?,
                position,
                kind: ChangeKind::Removed,
            },
            // Some tools strip the leading space of empty context lines
            Some(' ') | None => {
                advance(&mut next_source, line)?;
                DiffLine {
                    line_number: advance(&mut next_target, line)?,
                    position,
                    kind: ChangeKind::Context,
                }
            }
            Some('\\') => continue,
            Some(_) => {
                return Err(ParseError::UnexpectedLine {
                    line,
                    content: content.to_string(),
                })
            }
        };

        hunk.lines.push(entry);
    }

    Ok(FileDiff::new(path, hunks))
}

/// Queryable index of every file patch in a pull request.
///
/// Built once per session and read-only afterwards.
#[derive(Debug, Clone, Default)]
pub struct DiffIndex {
    files: HashMap<String, FileDiff>,
    unparseable: HashMap<String, ParseError>,
}

impl DiffIndex {
    /// Builds the index from the changed files of a pull request.
    ///
    /// A file whose patch cannot be parsed is recorded as unparseable and the
    /// remaining files are still indexed. Files without a patch (binary files
    /// or very large diffs) are indexed without any commentable lines.
    pub fn build(files: &[PullRequestFile]) -> Self {
        let mut index = DiffIndex::default();

        for file in files {
            let patch = file.patch.as_deref().unwrap_or_default();
            match parse_patch(&file.filename, patch) {
                Ok(parsed) => {
                    debug!(
                        path = file.filename.as_str(),
                        hunks = parsed.hunks.len(),
                        "Indexed file patch"
                    );
                    index.files.insert(file.filename.clone(), parsed);
                }
                Err(e) => {
                    warn!(
                        path = file.filename.as_str(),
                        error = e.to_string(),
                        "Failed to parse the patch of the file. No comments can be placed on it."
                    );
                    index.unparseable.insert(file.filename.clone(), e);
                }
            }
        }

        index
    }

    /// Returns the parsed patch of a file.
    pub fn file(&self, path: &str) -> Result<&FileDiff, NotInDiff> {
        if let Some(file) = self.files.get(path) {
            return Ok(file);
        }

        if self.unparseable.contains_key(path) {
            Err(NotInDiff::Unparseable)
        } else {
            Err(NotInDiff::UnknownFile)
        }
    }

    /// Returns the parse error recorded for a file, if its patch was malformed.
    pub fn parse_error(&self, path: &str) -> Option<&ParseError> {
        self.unparseable.get(path)
    }

    /// Resolves a head line of a file to its diff position.
    pub fn resolve(&self, path: &str, line_number: u32) -> Result<u32, NotInDiff> {
        self.file(path)?.resolve(line_number)
    }

    /// Resolves a line range to the diff position a comment on it is anchored at.
    ///
    /// The anchor is the position of `end_line`. Lines between `start_line` and
    /// `end_line` do not need to be part of the diff.
    pub fn resolve_range(
        &self,
        path: &str,
        start_line: u32,
        end_line: u32,
    ) -> Result<u32, NotInDiff> {
        if start_line == 0 || start_line > end_line {
            return Err(NotInDiff::InvalidRange);
        }

        self.resolve(path, end_line)
    }

    /// Finds the head line number of a file anchored at the given diff position.
    pub fn line_at_position(&self, path: &str, position: u32) -> Option<u32> {
        self.files.get(path)?.line_at_position(position)
    }

    /// The number of files with a parsed patch.
    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}
