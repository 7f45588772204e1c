//! CSV reading into raw [`Row`]s.
//!
//! Every cell is kept as text (empty cells stay `""`); type coercion is left
//! to the normalizers. Headers are trimmed and a UTF-8 BOM is dropped.
//! Records may be shorter or longer than the header row: missing cells are
//! absent from the row, surplus cells are ignored. Lines whose cells are all
//! blank are skipped.

use std::io::Read;
use std::path::{Path, PathBuf};

use claims_model::{CellValue, Row};
use csv::StringRecord;

use crate::error::{IngestError, Result};

/// A fully loaded CSV file.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CsvTable {
    pub headers: Vec<String>,
    pub rows: Vec<Row>,
}

impl CsvTable {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// The first `n` rows (fewer when the table is shorter).
    pub fn head(&self, n: usize) -> &[Row] {
        &self.rows[..n.min(self.rows.len())]
    }
}

/// Incremental reader handing out rows in chunks.
pub struct CsvRowReader<R: Read> {
    reader: csv::Reader<R>,
    headers: Vec<String>,
    path: PathBuf,
    record: StringRecord,
    rows_read: usize,
}

impl<R: Read> CsvRowReader<R> {
    /// Opens a reader and consumes the header row.
    ///
    /// `path` names the source in errors; it is not opened.
    pub fn new(source: R, path: &Path) -> Result<Self> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(source);

        let headers: Vec<String> = reader
            .headers()
            .map_err(|e| csv_error(path, &e))?
            .iter()
            .map(clean_header)
            .collect();

        if headers.iter().all(String::is_empty) {
            return Err(IngestError::EmptyCsv {
                path: path.to_path_buf(),
            });
        }

        Ok(Self {
            reader,
            headers,
            path: path.to_path_buf(),
            record: StringRecord::new(),
            rows_read: 0,
        })
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    /// Data rows handed out so far.
    pub fn rows_read(&self) -> usize {
        self.rows_read
    }

    /// Reads up to `size` rows; an empty vector means end of input.
    pub fn next_chunk(&mut self, size: usize) -> Result<Vec<Row>> {
        let size = size.max(1);
        let mut rows = Vec::with_capacity(size.min(4096));
        while rows.len() < size {
            let more = self
                .reader
                .read_record(&mut self.record)
                .map_err(|e| csv_error(&self.path, &e))?;
            if !more {
                break;
            }
            if self.record.iter().all(|cell| cell.trim().is_empty()) {
                continue;
            }
            rows.push(self.current_row());
        }
        self.rows_read += rows.len();
        Ok(rows)
    }

    /// Reads every remaining row.
    pub fn read_to_end(&mut self) -> Result<Vec<Row>> {
        let mut rows = Vec::new();
        loop {
            let chunk = self.next_chunk(4096)?;
            if chunk.is_empty() {
                return Ok(rows);
            }
            rows.extend(chunk);
        }
    }

    fn current_row(&self) -> Row {
        self.headers
            .iter()
            .zip(self.record.iter())
            .map(|(header, cell)| (header.as_str(), CellValue::from(cell)))
            .collect()
    }
}

/// Parses an in-memory CSV file. `path` names the source in errors.
///
/// A file with a header row but no data rows is [`IngestError::EmptyCsv`].
pub fn read_csv_bytes(bytes: &[u8], path: &Path) -> Result<CsvTable> {
    let mut reader = CsvRowReader::new(bytes, path)?;
    let rows = reader.read_to_end()?;
    if rows.is_empty() {
        return Err(IngestError::EmptyCsv {
            path: path.to_path_buf(),
        });
    }
    Ok(CsvTable {
        headers: reader.headers,
        rows,
    })
}

/// Reads a CSV file from disk.
pub fn read_csv_file(path: &Path) -> Result<CsvTable> {
    let bytes = read_file(path)?;
    read_csv_bytes(&bytes, path)
}

/// Reads a whole file, mapping "not found" to [`IngestError::FileNotFound`].
pub fn read_file(path: &Path) -> Result<Vec<u8>> {
    std::fs::read(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            IngestError::FileNotFound {
                path: path.to_path_buf(),
            }
        } else {
            IngestError::FileRead {
                path: path.to_path_buf(),
                source: e,
            }
        }
    })
}

fn clean_header(raw: &str) -> String {
    raw.trim_start_matches('\u{feff}').trim().to_string()
}

fn csv_error(path: &Path, error: &csv::Error) -> IngestError {
    IngestError::CsvParse {
        path: path.to_path_buf(),
        message: error.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(content: &str) -> Result<CsvTable> {
        read_csv_bytes(content.as_bytes(), Path::new("test.csv"))
    }

    #[test]
    fn test_headers_trimmed_and_bom_removed() {
        let table = parse("\u{feff} Member ID ,Service Date\nM1,01/15/2024\n").unwrap();
        assert_eq!(table.headers, vec!["Member ID", "Service Date"]);
        assert_eq!(table.rows[0].value("Member ID"), &CellValue::from("M1"));
    }

    #[test]
    fn test_values_stay_text() {
        let table = parse("id,amount,note\nA1,150,\n").unwrap();
        assert_eq!(table.rows[0].value("amount"), &CellValue::from("150"));
        assert_eq!(table.rows[0].value("note"), &CellValue::from(""));
    }

    #[test]
    fn test_ragged_rows() {
        let table = parse("a,b,c\n1,2\n1,2,3,4\n").unwrap();
        assert_eq!(table.rows[0].get("c"), None);
        assert_eq!(table.rows[1].len(), 3);
    }

    #[test]
    fn test_blank_lines_skipped() {
        let table = parse("a,b\n1,2\n,\n\n3,4\n").unwrap();
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn test_empty_inputs() {
        assert!(matches!(parse(""), Err(IngestError::EmptyCsv { .. })));
        assert!(matches!(parse("a,b\n"), Err(IngestError::EmptyCsv { .. })));
    }

    #[test]
    fn test_invalid_utf8_is_parse_error() {
        let bytes = b"a,b\n\xff\xfe,1\n";
        let result = read_csv_bytes(bytes, Path::new("bad.csv"));
        assert!(matches!(result, Err(IngestError::CsvParse { .. })));
    }

    #[test]
    fn test_chunks() {
        let mut reader = CsvRowReader::new("a\n1\n2\n3\n".as_bytes(), Path::new("t.csv")).unwrap();
        assert_eq!(reader.next_chunk(2).unwrap().len(), 2);
        assert_eq!(reader.next_chunk(2).unwrap().len(), 1);
        assert!(reader.next_chunk(2).unwrap().is_empty());
        assert_eq!(reader.rows_read(), 3);
    }
}
