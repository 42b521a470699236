//! Line parser for the key/value config file.
//!
//! Each line is one of: blank, `#` comment, `KEY = value` assignment, or
//! something else. Anything that is not an assignment is skipped without
//! error; malformed lines never abort loading.

use regex_lite::Regex;
use std::collections::VecDeque;
use std::io::{self, BufRead};
use std::sync::LazyLock;

static ASSIGNMENT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*([^=\s]+)\s*=\s*(.+?)\s*$").expect("assignment pattern is valid")
});

/// Classification of a single line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Line {
    Blank,
    Comment,
    Assignment { key: String, value: String },
    /// Matched nothing; silently dropped by the loader.
    Unrecognized,
}

/// Classify one line (without its terminator).
pub fn parse_line(line: &str) -> Line {
    let trimmed = line.trim_start();
    if trimmed.trim_end().is_empty() {
        return Line::Blank;
    }
    if trimmed.starts_with('#') {
        return Line::Comment;
    }
    match ASSIGNMENT.captures(line) {
        Some(caps) => Line::Assignment {
            key: caps[1].to_string(),
            value: caps[2].to_string(),
        },
        None => Line::Unrecognized,
    }
}

/// Per-line read bound.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LineLimit {
    /// Read whole lines.
    #[default]
    Unbounded,
    /// Read at most `n - 1` bytes at a time; longer lines are split into
    /// chunks that are each classified as a separate line.
    Truncate(usize),
}

impl LineLimit {
    pub fn from_setting(max_line_len: Option<usize>) -> Self {
        match max_line_len {
            Some(n) if n > 1 => LineLimit::Truncate(n),
            _ => LineLimit::Unbounded,
        }
    }
}

/// Lazily yields `(name, value)` pairs from a reader.
pub struct Assignments<R> {
    reader: R,
    limit: LineLimit,
    pending: VecDeque<String>,
    buf: Vec<u8>,
}

/// Parse assignments from `reader`, one per matching line.
pub fn parse_lines<R: BufRead>(reader: R, limit: LineLimit) -> Assignments<R> {
    Assignments {
        reader,
        limit,
        pending: VecDeque::new(),
        buf: Vec::new(),
    }
}

impl<R: BufRead> Assignments<R> {
    /// Refill `pending` from the next physical line. Returns false at EOF.
    fn fill(&mut self) -> io::Result<bool> {
        self.buf.clear();
        if self.reader.read_until(b'\n', &mut self.buf)? == 0 {
            return Ok(false);
        }
        let line = String::from_utf8_lossy(&self.buf);
        let line = line.trim_end_matches(['\n', '\r']);
        match self.limit {
            LineLimit::Unbounded => self.pending.push_back(line.to_string()),
            LineLimit::Truncate(n) => self.pending.extend(split_chunks(line, n - 1)),
        }
        Ok(true)
    }
}

impl<R: BufRead> Iterator for Assignments<R> {
    type Item = io::Result<(String, String)>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            while let Some(line) = self.pending.pop_front() {
                if let Line::Assignment { key, value } = parse_line(&line) {
                    return Some(Ok((key, value)));
                }
            }
            match self.fill() {
                Ok(true) => continue,
                Ok(false) => return None,
                Err(e) => return Some(Err(e)),
            }
        }
    }
}

/// Split `line` into pieces of at most `max` bytes on char boundaries.
fn split_chunks(line: &str, max: usize) -> Vec<String> {
    if line.len() <= max {
        return vec![line.to_string()];
    }
    let mut chunks = Vec::new();
    let mut rest = line;
    while !rest.is_empty() {
        let mut end = max.min(rest.len());
        while end > 0 && !rest.is_char_boundary(end) {
            end -= 1;
        }
        if end == 0 {
            // Single char wider than the bound.
            end = rest.chars().next().map(char::len_utf8).unwrap_or(rest.len());
        }
        chunks.push(rest[..end].to_string());
        rest = &rest[end..];
    }
    chunks
}
