/// One static-analysis result to be placed as a review comment.
///
/// `path` is relative to the repository root and `body` is the final Markdown
/// text of the comment. Line numbers are 1-based and refer to the head version
/// of the file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Finding {
    pub path: String,
    pub start_line: u32,
    pub end_line: u32,
    pub body: String,
}

impl Finding {
    pub fn new(
        path: impl Into<String>,
        start_line: u32,
        end_line: u32,
        body: impl Into<String>,
    ) -> Self {
        Self {
            path: path.into(),
            start_line,
            end_line,
            body: body.into(),
        }
    }

    /// Returns `true` if the finding spans more than one line.
    pub fn is_multi_line(&self) -> bool {
        self.start_line < self.end_line
    }
}
