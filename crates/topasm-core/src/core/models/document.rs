use std::fmt;
use std::ops::Range;

/// One topology file (`.top` or `.itp`) held as an ordered sequence of lines.
///
/// Lines are stored without terminators. Whether the source ended with a
/// newline is remembered so unchanged content is written back byte-for-byte.
/// All positions are 0-based line indices into the current state of the
/// document; every insertion or removal shifts the lines that follow it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TopologyDocument {
    lines: Vec<String>,
    trailing_newline: bool,
}

impl Default for TopologyDocument {
    fn default() -> Self {
        Self {
            lines: Vec::new(),
            trailing_newline: true,
        }
    }
}

impl TopologyDocument {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn parse(text: &str) -> Self {
        Self {
            lines: text.lines().map(str::to_string).collect(),
            trailing_newline: text.is_empty() || text.ends_with('\n'),
        }
    }

    pub fn from_lines<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            lines: lines.into_iter().map(Into::into).collect(),
            trailing_newline: true,
        }
    }

    pub fn with_trailing_newline(mut self, trailing_newline: bool) -> Self {
        self.trailing_newline = trailing_newline;
        self
    }

    pub fn has_trailing_newline(&self) -> bool {
        self.trailing_newline
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// `true` when the document holds nothing but whitespace.
    pub fn is_blank(&self) -> bool {
        self.lines.iter().all(|line| line.trim().is_empty())
    }

    pub fn line(&self, index: usize) -> Option<&str> {
        self.lines.get(index).map(String::as_str)
    }

    pub fn lines(&self) -> impl Iterator<Item = &str> {
        self.lines.iter().map(String::as_str)
    }

    /// Lines inside `range`, clamped to the document.
    pub fn slice(&self, range: Range<usize>) -> &[String] {
        let end = range.end.min(self.lines.len());
        let start = range.start.min(end);
        &self.lines[start..end]
    }

    /// Index of the first line at or after `start` satisfying `predicate`.
    pub fn find_from<P>(&self, start: usize, mut predicate: P) -> Option<usize>
    where
        P: FnMut(&str) -> bool,
    {
        self.lines
            .iter()
            .enumerate()
            .skip(start)
            .find(|(_, line)| predicate(line))
            .map(|(i, _)| i)
    }

    pub fn find<P>(&self, predicate: P) -> Option<usize>
    where
        P: FnMut(&str) -> bool,
    {
        self.find_from(0, predicate)
    }

    /// Index of the last line inside `range` satisfying `predicate`.
    pub fn rfind_in<P>(&self, range: Range<usize>, mut predicate: P) -> Option<usize>
    where
        P: FnMut(&str) -> bool,
    {
        let end = range.end.min(self.lines.len());
        let start = range.start.min(end);
        (start..end).rev().find(|&i| predicate(&self.lines[i]))
    }

    /// Inserts `lines` so that the first of them lands at `index`.
    ///
    /// `index` is clamped to the document length. Returns the index of the
    /// line directly after the inserted run.
    pub fn insert_before<I, S>(&mut self, index: usize, lines: I) -> usize
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let at = index.min(self.lines.len());
        let new_lines: Vec<String> = lines.into_iter().map(Into::into).collect();
        let count = new_lines.len();
        self.lines.splice(at..at, new_lines);
        at + count
    }

    /// Inserts `lines` directly below the line at `index`.
    pub fn insert_after<I, S>(&mut self, index: usize, lines: I) -> usize
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.insert_before(index.saturating_add(1), lines)
    }

    pub fn append<I, S>(&mut self, lines: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.lines.extend(lines.into_iter().map(Into::into));
    }

    /// Removes and returns the lines in `range`; later lines move up.
    pub fn remove_range(&mut self, range: Range<usize>) -> Vec<String> {
        let end = range.end.min(self.lines.len());
        let start = range.start.min(end);
        self.lines.drain(start..end).collect()
    }

    pub fn into_lines(self) -> Vec<String> {
        self.lines
    }

    pub fn to_text(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for TopologyDocument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, line) in self.lines.iter().enumerate() {
            if i > 0 {
                f.write_str("\n")?;
            }
            f.write_str(line)?;
        }
        if self.trailing_newline && !self.lines.is_empty() {
            f.write_str("\n")?;
        }
        Ok(())
    }
}
