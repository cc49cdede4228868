//! Minimal delimited-text tables (tab- and comma-separated).

/// Column delimiter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delimiter {
    /// Tab-separated; cells are never quoted.
    Tab,
    /// Comma-separated; cells may be wrapped in double quotes.
    Comma,
}

/// A header row plus data rows. Cells are trimmed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Table {
    /// Header cells.
    pub header: Vec<String>,
    /// Data rows; may be shorter or longer than the header.
    pub rows: Vec<Vec<String>>,
}

impl Table {
    /// Parses `text`. Blank lines are skipped; the first non-blank line is
    /// the header.
    #[must_use]
    pub fn parse(text: &str, delimiter: Delimiter) -> Table {
        let mut lines = text.lines().filter(|l| !l.trim().is_empty());
        let Some(header) = lines.next() else {
            return Table::default();
        };
        let split = |line: &str| -> Vec<String> {
            match delimiter {
                Delimiter::Tab => line.split('\t').map(|c| c.trim().to_owned()).collect(),
                Delimiter::Comma => split_quoted(line),
            }
        };
        Table {
            header: split(header),
            rows: lines.map(split).collect(),
        }
    }
}

/// Returns cell `index` of `row`, or `""` when the row is short.
#[must_use]
pub fn cell(row: &[String], index: Option<usize>) -> &str {
    index
        .and_then(|i| row.get(i))
        .map_or("", String::as_str)
}

/// Splits a comma-separated line; commas inside double quotes are kept and
/// `""` inside a quoted cell is an escaped quote.
fn split_quoted(line: &str) -> Vec<String> {
    let mut cells = Vec::new();
    let mut current = String::new();
    let mut quoted = false;
    let mut chars = line.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '"' if quoted && chars.peek() == Some(&'"') => {
                current.push('"');
                chars.next();
            }
            '"' => quoted = !quoted,
            ',' if !quoted => cells.push(std::mem::take(&mut current).trim().to_owned()),
            _ => current.push(c),
        }
    }
    cells.push(current.trim().to_owned());
    cells
}
