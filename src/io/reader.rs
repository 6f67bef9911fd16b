//! Line-oriented number reader shared by the text formats.
//!
//! Every format here is a sequence of lines holding a known count of
//! whitespace-separated numbers. Blank lines and `#` comments are skipped.

use std::io::BufRead;
use std::str::FromStr;

use crate::error::{MeshError, Result};

/// Reads "N numbers from the next line".
pub struct LineReader<R> {
    inner: R,
    line: usize,
    buf: String,
}

impl<R: BufRead> LineReader<R> {
    /// Wrap a buffered reader.
    pub fn new(inner: R) -> Self {
        Self {
            inner,
            line: 0,
            buf: String::new(),
        }
    }

    /// 1-based number of the last line read.
    pub fn line(&self) -> usize {
        self.line
    }

    /// Move to the next line with content. Returns `false` at end of input.
    fn advance(&mut self) -> Result<bool> {
        loop {
            self.buf.clear();
            if self.inner.read_line(&mut self.buf)? == 0 {
                return Ok(false);
            }
            self.line += 1;
            let trimmed = self.buf.trim();
            if !trimmed.is_empty() && !trimmed.starts_with('#') {
                return Ok(true);
            }
        }
    }

    /// The next line with content, trimmed, or `None` at end of input.
    pub fn next_line(&mut self) -> Result<Option<&str>> {
        if self.advance()? {
            Ok(Some(self.buf.trim()))
        } else {
            Ok(None)
        }
    }

    /// Parse exactly `n` numbers from the next line with content.
    pub fn read_numbers<T: FromStr>(&mut self, n: usize) -> Result<Vec<T>> {
        if !self.advance()? {
            return Err(MeshError::parse(
                self.line + 1,
                format!("expected {} numbers, found end of input", n),
            ));
        }

        let line = self.line;
        let mut values = Vec::with_capacity(n);
        for token in self.buf.split_whitespace() {
            let value = token
                .parse()
                .map_err(|_| MeshError::parse(line, format!("`{}` is not a number", token)))?;
            values.push(value);
        }
        if values.len() != n {
            return Err(MeshError::parse(
                line,
                format!("expected {} numbers, found {}", n, values.len()),
            ));
        }
        Ok(values)
    }

    /// Parse a single count.
    pub fn read_count(&mut self) -> Result<usize> {
        Ok(self.read_numbers::<usize>(1)?[0])
    }

    /// Expect the next line with content to be `tag`.
    pub fn expect_tag(&mut self, tag: &str) -> Result<()> {
        if !self.advance()? {
            return Err(MeshError::parse(
                self.line + 1,
                format!("expected `{}`, found end of input", tag),
            ));
        }
        let found = self.buf.trim();
        if found != tag {
            return Err(MeshError::parse(
                self.line,
                format!("expected `{}`, found `{}`", tag, found),
            ));
        }
        Ok(())
    }
}
