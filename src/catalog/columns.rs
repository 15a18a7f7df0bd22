//! Column boundary inference for fixed-width catalogue rows.
//!
//! SoFiA right-aligns every value under the last character of its column
//! label, so a column spans from the end of the previous label to the end of
//! its own. Offsets are counted in characters, not bytes.

use tracing::debug;

/// A declared catalogue column and the character range it occupies
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Column {
    pub label: String,
    pub start: usize,
    pub end: usize,
}

/// Column layout derived from a single header line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnSchema {
    columns: Vec<Column>,
}

impl ColumnSchema {
    /// Build the schema from a header line such as `#  id  name   x   y`.
    ///
    /// Returns `None` unless the line is a comment whose first label is
    /// `name` or `id` (case-insensitive). Each label is searched for only
    /// after the end of the previous one, so a label that also occurs inside
    /// an earlier label cannot pull its boundary backwards.
    pub fn from_header_line(line: &str) -> Option<Self> {
        let mut tokens = line.split_whitespace();
        if tokens.next()? != "#" {
            return None;
        }

        let labels: Vec<&str> = tokens.collect();
        let first = labels.first()?.to_lowercase();
        if first != "name" && first != "id" {
            return None;
        }

        let chars: Vec<char> = line.chars().collect();
        let mut cursor = chars.iter().position(|&c| c == '#')? + 1;
        let mut start = 0;
        let mut columns = Vec::with_capacity(labels.len());

        for label in labels {
            let needle: Vec<char> = label.chars().collect();
            let position = find_from(&chars, &needle, cursor)?;
            let end = position + needle.len();

            columns.push(Column {
                label: label.to_string(),
                start,
                end,
            });
            start = end;
            cursor = end;
        }

        debug!(
            "Catalogue header declares {} columns ending at offset {}",
            columns.len(),
            start
        );

        Some(Self { columns })
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|column| column.label.as_str())
    }

    pub fn contains(&self, label: &str) -> bool {
        self.column(label).is_some()
    }

    pub fn column(&self, label: &str) -> Option<&Column> {
        self.columns.iter().find(|column| column.label == label)
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Cut one data row into `(label, value)` pairs for every declared column
    pub fn split_row<'a>(&'a self, line: &str) -> Vec<(&'a str, String)> {
        let chars: Vec<char> = line.chars().collect();
        self.columns
            .iter()
            .map(|column| (column.label.as_str(), column.slice(&chars)))
            .collect()
    }
}

impl Column {
    /// Extract this column from a row, trimmed and with one layer of
    /// enclosing double quotes removed. Short rows yield what is available.
    pub fn slice(&self, row: &[char]) -> String {
        let end = self.end.min(row.len());
        let start = self.start.min(end);
        let raw: String = row[start..end].iter().collect();
        unquote(raw.trim()).to_string()
    }
}

fn unquote(value: &str) -> &str {
    value
        .strip_prefix('"')
        .and_then(|inner| inner.strip_suffix('"'))
        .unwrap_or(value)
}

fn find_from(haystack: &[char], needle: &[char], from: usize) -> Option<usize> {
    if needle.is_empty() || from > haystack.len() {
        return None;
    }
    haystack[from..]
        .windows(needle.len())
        .position(|window| window == needle)
        .map(|offset| from + offset)
}
