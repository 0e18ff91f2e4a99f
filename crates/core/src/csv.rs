//! CSV reader for master-data import files.
//!
//! Import files come from spreadsheet exports. Insurer columns hold JSON
//! payloads, so quoted fields routinely contain commas, doubled quotes and
//! sometimes line breaks. Columns are looked up by normalized header name
//! (see [`normalize_header`]) so that `ensureditId`, `ensuredit_id` and
//! `Ensuredit ID` address the same column.

use crate::error::CoreError;

/// Normalize a column header or alias for lookup.
///
/// Trims, lowercases and drops `_`, `-` and whitespace.
pub fn normalize_header(raw: &str) -> String {
    raw.trim()
        .chars()
        .filter(|c| !matches!(c, '_' | '-') && !c.is_whitespace())
        .flat_map(char::to_lowercase)
        .collect()
}

/// One data record and the source line it started on.
#[derive(Debug, Clone)]
struct CsvRecord {
    line: usize,
    values: Vec<String>,
}

/// A parsed CSV document: header plus data records.
#[derive(Debug, Clone)]
pub struct CsvTable {
    headers: Vec<String>,
    keys: Vec<String>,
    records: Vec<CsvRecord>,
}

/// Borrowed view of a single data row.
#[derive(Debug, Clone, Copy)]
pub struct CsvRow<'a> {
    keys: &'a [String],
    record: &'a CsvRecord,
}

impl CsvTable {
    /// Parse CSV text. The first record is the header.
    pub fn parse(text: &str) -> Result<Self, CoreError> {
        let text = text.strip_prefix('\u{feff}').unwrap_or(text);
        let mut records = split_records(text)?.into_iter();

        let header = records
            .next()
            .ok_or_else(|| CoreError::Validation("CSV is empty".into()))?;

        let headers: Vec<String> = header.values.iter().map(|h| h.trim().to_string()).collect();
        if headers.iter().all(|h| h.is_empty()) {
            return Err(CoreError::Validation("CSV header row is empty".into()));
        }
        let keys = headers.iter().map(|h| normalize_header(h)).collect();

        Ok(Self {
            headers,
            keys,
            records: records.collect(),
        })
    }

    /// Parse raw upload bytes, rejecting invalid UTF-8.
    pub fn from_bytes(data: &[u8]) -> Result<Self, CoreError> {
        let text = std::str::from_utf8(data)
            .map_err(|e| CoreError::Validation(format!("CSV is not valid UTF-8: {e}")))?;
        Self::parse(text)
    }

    /// Header names as they appear in the file (trimmed).
    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    /// Whether any of `aliases` names a column of this file.
    pub fn has_column<S: AsRef<str>>(&self, aliases: &[S]) -> bool {
        self.find_column(aliases).is_some()
    }

    /// Position of the first column matching any of `aliases`.
    ///
    /// Aliases are tried in order; the first alias present wins.
    pub fn find_column<S: AsRef<str>>(&self, aliases: &[S]) -> Option<usize> {
        aliases.iter().find_map(|alias| {
            let wanted = normalize_header(alias.as_ref());
            self.keys.iter().position(|k| *k == wanted)
        })
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn rows(&self) -> impl Iterator<Item = CsvRow<'_>> {
        self.records.iter().map(|record| CsvRow {
            keys: &self.keys,
            record,
        })
    }
}

impl<'a> CsvRow<'a> {
    /// Source line this row started on. The header is line 1.
    pub fn line(&self) -> usize {
        self.record.line
    }

    /// Raw value of the first column matching any of `aliases`.
    ///
    /// Unlike a plain column lookup, an alias whose cell is blank falls
    /// through to the next alias, so `fuelType` then `fuel` picks whichever
    /// column is actually filled in.
    pub fn get<S: AsRef<str>>(&self, aliases: &[S]) -> Option<&'a str> {
        aliases.iter().find_map(|alias| {
            let wanted = normalize_header(alias.as_ref());
            self.keys
                .iter()
                .position(|k| *k == wanted)
                .and_then(|idx| self.record.values.get(idx))
                .map(String::as_str)
                .filter(|v| !v.trim().is_empty())
        })
    }

    /// Raw value at a column position.
    pub fn get_at(&self, idx: usize) -> Option<&'a str> {
        self.record.values.get(idx).map(String::as_str)
    }
}

/// Split CSV text into records, honouring quoted fields.
///
/// Blank lines are skipped. A quote only opens a quoted field at the start
/// of a field; elsewhere it is literal.
fn split_records(text: &str) -> Result<Vec<CsvRecord>, CoreError> {
    let mut records = Vec::new();
    let mut values: Vec<String> = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut field_started = false;
    let mut line = 1;
    let mut record_line = 1;
    let mut chars = text.chars().peekable();

    while let Some(ch) = chars.next() {
        if in_quotes {
            match ch {
                '"' if chars.peek() == Some(&'"') => {
                    current.push('"');
                    chars.next();
                }
                '"' => in_quotes = false,
                '\n' => {
                    line += 1;
                    current.push(ch);
                }
                _ => current.push(ch),
            }
            continue;
        }

        match ch {
            '"' if !field_started => {
                in_quotes = true;
                field_started = true;
            }
            ',' => {
                values.push(std::mem::take(&mut current));
                field_started = false;
            }
            '\r' if chars.peek() == Some(&'\n') => {}
            '\n' | '\r' => {
                values.push(std::mem::take(&mut current));
                push_record(&mut records, std::mem::take(&mut values), record_line);
                field_started = false;
                line += 1;
                record_line = line;
            }
            _ => {
                current.push(ch);
                field_started = true;
            }
        }
    }

    if in_quotes {
        return Err(CoreError::Validation(format!(
            "Unterminated quoted field starting on line {record_line}"
        )));
    }

    if field_started || !values.is_empty() {
        values.push(current);
        push_record(&mut records, values, record_line);
    }

    Ok(records)
}

fn push_record(records: &mut Vec<CsvRecord>, values: Vec<String>, line: usize) {
    let blank = values.len() == 1 && values[0].trim().is_empty();
    if !blank {
        records.push(CsvRecord { line, values });
    }
}
