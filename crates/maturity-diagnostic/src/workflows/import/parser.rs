use super::normalizer::normalize_label;
use super::ImportError;
use csv::StringRecord;
use std::io::Read;

/// Spreadsheet export with normalized headers and non-blank rows.
#[derive(Debug)]
pub(crate) struct CsvTable {
    headers: Vec<String>,
    rows: Vec<StringRecord>,
}

impl CsvTable {
    pub(crate) fn rows(&self) -> &[StringRecord] {
        &self.rows
    }

    /// First column whose normalized header satisfies `predicate`.
    pub(crate) fn column<P>(&self, predicate: P) -> Option<usize>
    where
        P: Fn(&str) -> bool,
    {
        self.headers.iter().position(|header| predicate(header))
    }
}

/// Trimmed, non-empty cell value.
pub(crate) fn cell(record: &StringRecord, column: Option<usize>) -> Option<&str> {
    column
        .and_then(|index| record.get(index))
        .map(|value| value.trim().trim_matches('"').trim())
        .filter(|value| !value.is_empty())
}

pub(crate) fn read_table<R: Read>(mut reader: R) -> Result<CsvTable, ImportError> {
    let mut raw = String::new();
    reader.read_to_string(&mut raw)?;
    let text = raw.strip_prefix('\u{feff}').unwrap_or(&raw);

    let header_line = text
        .lines()
        .find(|line| !line.trim().is_empty())
        .ok_or(ImportError::Empty)?;
    let delimiter = detect_delimiter(header_line);

    let mut csv_reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(text.as_bytes());

    let headers = csv_reader
        .headers()?
        .iter()
        .map(normalize_label)
        .collect::<Vec<_>>();

    let mut rows = Vec::new();
    for record in csv_reader.records() {
        let record = record?;
        if record.iter().all(|value| value.trim().is_empty()) {
            continue;
        }
        rows.push(record);
    }

    if rows.is_empty() {
        return Err(ImportError::Empty);
    }

    Ok(CsvTable { headers, rows })
}

/// Spreadsheet tools in pt-BR locales export `;`, everything else `,`.
pub(crate) fn detect_delimiter(header_line: &str) -> u8 {
    let commas = header_line.matches(',').count();
    let semicolons = header_line.matches(';').count();
    if semicolons >= commas {
        b';'
    } else {
        b','
    }
}
