#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Lexical scanner that splits catalog text into level records.
//!
//! A catalog is a sequence of lines. `<Name>` opens a level, `@@text@@`
//! optionally describes it, and every `@content@` line contributes one board
//! row. Comment lines (leading `#`), blank lines and free prose outside those
//! forms are skipped. Scanning is lazy: records are produced one at a time as
//! the underlying lines are consumed.

use std::{collections::VecDeque, iter::Enumerate, str::Lines};

use klotski_core::{LevelRecord, ScanError, COMMENT_MARKER, DESCRIPTION_DELIMITER, ROW_DELIMITER};
use log::debug;

/// Starts scanning the provided catalog text.
#[must_use]
pub fn scan(text: &str) -> Scanner<'_> {
    Scanner::new(text)
}

/// Lazy iterator over the level records contained in catalog text.
///
/// Each item is either a complete record or a scan error. A record containing
/// a scan fault yields its faults in place of the record; scanning then resumes
/// with the next header, so one malformed level never hides the rest of the
/// catalog.
#[derive(Debug)]
pub struct Scanner<'a> {
    lines: Enumerate<Lines<'a>>,
    open: Option<OpenRecord>,
    pending: VecDeque<Result<LevelRecord, ScanError>>,
}

impl<'a> Scanner<'a> {
    /// Creates a scanner positioned at the first line of `text`.
    #[must_use]
    pub fn new(text: &'a str) -> Self {
        Self {
            lines: text.lines().enumerate(),
            open: None,
            pending: VecDeque::new(),
        }
    }

    fn consume(&mut self, line: usize, raw: &str) {
        match classify(raw) {
            LineKind::Skip => {}
            LineKind::Header(name) => {
                self.close_open_record();
                self.open = Some(OpenRecord::new(name, line));
            }
            LineKind::Description(text) => match self.open.as_mut() {
                Some(record) => record.describe(text, line),
                None => self.pending.push_back(Err(ScanError::OrphanRow { line })),
            },
            LineKind::Row(content) => match self.open.as_mut() {
                Some(record) => record.rows.push(content.to_owned()),
                None => self.pending.push_back(Err(ScanError::OrphanRow { line })),
            },
            LineKind::Unmatched => {
                let fault = ScanError::UnmatchedDelimiter { line };
                match self.open.as_mut() {
                    Some(record) => record.faults.push(fault),
                    None => self.pending.push_back(Err(fault)),
                }
            }
        }
    }

    fn close_open_record(&mut self) {
        if let Some(record) = self.open.take() {
            record.close(&mut self.pending);
        }
    }
}

impl Iterator for Scanner<'_> {
    type Item = Result<LevelRecord, ScanError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(item) = self.pending.pop_front() {
                return Some(item);
            }

            match self.lines.next() {
                Some((index, raw)) => self.consume(index + 1, raw),
                None if self.open.is_some() => self.close_open_record(),
                None => return None,
            }
        }
    }
}

/// Record whose header has been seen but whose end has not.
#[derive(Debug)]
struct OpenRecord {
    name: String,
    line: usize,
    description: Option<String>,
    rows: Vec<String>,
    faults: Vec<ScanError>,
}

impl OpenRecord {
    fn new(name: &str, line: usize) -> Self {
        Self {
            name: name.to_owned(),
            line,
            description: None,
            rows: Vec::new(),
            faults: Vec::new(),
        }
    }

    fn describe(&mut self, text: &str, line: usize) {
        if self.description.is_some() || !self.rows.is_empty() {
            self.faults.push(ScanError::MisplacedDescription {
                name: self.name.clone(),
                line,
            });
        } else {
            self.description = Some(text.to_owned());
        }
    }

    fn close(self, out: &mut VecDeque<Result<LevelRecord, ScanError>>) {
        if !self.faults.is_empty() {
            debug!(
                "level '{}' (line {}) dropped after {} scan fault(s)",
                self.name,
                self.line,
                self.faults.len()
            );
            out.extend(self.faults.into_iter().map(Err));
            return;
        }

        if self.rows.is_empty() {
            out.push_back(Err(ScanError::EmptyLevel {
                name: self.name,
                line: self.line,
            }));
            return;
        }

        debug!(
            "scanned level '{}' (line {}, {} rows)",
            self.name,
            self.line,
            self.rows.len()
        );
        out.push_back(Ok(LevelRecord {
            name: self.name,
            description: self.description.unwrap_or_default(),
            line: self.line,
            raw_lines: self.rows,
        }));
    }
}

/// Syntactic role of one catalog line.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum LineKind<'a> {
    /// Blank, comment or free prose.
    Skip,
    /// `<Name>` header carrying the level name.
    Header(&'a str),
    /// `@@text@@` description carrying the text.
    Description(&'a str),
    /// `@content@` board row carrying the content.
    Row(&'a str),
    /// A line that opens a row without closing it.
    Unmatched,
}

fn classify(raw: &str) -> LineKind<'_> {
    let line = raw.trim();
    if line.is_empty() || line.starts_with(COMMENT_MARKER) {
        return LineKind::Skip;
    }

    if let Some(name) = line.strip_prefix('<').and_then(|rest| rest.strip_suffix('>')) {
        if !name.contains(['<', '>']) {
            return LineKind::Header(name);
        }
        return LineKind::Skip;
    }

    if line.len() >= 2 * DESCRIPTION_DELIMITER.len() {
        if let Some(text) = line
            .strip_prefix(DESCRIPTION_DELIMITER)
            .and_then(|rest| rest.strip_suffix(DESCRIPTION_DELIMITER))
        {
            return LineKind::Description(text);
        }
    }

    match line.strip_prefix(ROW_DELIMITER) {
        Some(rest) => match rest.strip_suffix(ROW_DELIMITER) {
            Some(content) => LineKind::Row(content),
            None => LineKind::Unmatched,
        },
        None => LineKind::Skip,
    }
}
