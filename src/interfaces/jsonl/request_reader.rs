use super::RequestLine;
use crate::error::{DirectoryError, Result};
use std::io::BufRead;

/// Reads request lines from any buffered source (file, stdin).
///
/// Blank lines are ignored. A line that is not a valid request yields an
/// error item and reading continues with the next line.
pub struct RequestReader<R: BufRead> {
    source: R,
}

impl<R: BufRead> RequestReader<R> {
    pub fn new(source: R) -> Self {
        Self { source }
    }

    /// Returns an iterator that lazily reads and parses requests.
    pub fn requests(self) -> impl Iterator<Item = Result<RequestLine>> {
        self.source
            .lines()
            .filter(|line| !matches!(line, Ok(l) if l.trim().is_empty()))
            .map(|line| {
                let line = line?;
                serde_json::from_str(&line).map_err(DirectoryError::from)
            })
    }
}
