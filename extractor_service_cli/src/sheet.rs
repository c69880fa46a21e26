use calamine::{open_workbook_auto_from_rs, Data, Range, Reader};
use std::io::Cursor;
use thiserror::Error;
use tracing::debug;

use crate::{RowId, SourceRow};

pub const ID_COLUMN: &str = "URL_ID";
pub const URL_COLUMN: &str = "URL";

/// Problems with the uploaded workbook itself. These fail the whole request.
#[derive(Debug, Error)]
pub enum InputError {
    #[error("could not read workbook: {0}")]
    Unreadable(String),
    #[error("workbook has no worksheets")]
    NoWorksheet,
    #[error("Excel file must contain URL_ID and URL columns.")]
    MissingColumns,
    #[error("Column \"{0}\" not found in the file.")]
    UnknownColumn(String),
}

/// First worksheet of a workbook: a header row and the data rows under it.
#[derive(Debug, Clone)]
pub struct Sheet {
    headers: Vec<String>,
    rows: Vec<Vec<Data>>,
}

impl Sheet {
    /// Reads xlsx, xls, xlsb or ods bytes.
    pub fn from_bytes(bytes: Vec<u8>) -> Result<Self, InputError> {
        let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes))
            .map_err(|e| InputError::Unreadable(e.to_string()))?;

        let range = workbook
            .worksheet_range_at(0)
            .ok_or(InputError::NoWorksheet)?
            .map_err(|e| InputError::Unreadable(e.to_string()))?;

        Ok(Self::from_range(&range))
    }

    pub fn from_range(range: &Range<Data>) -> Self {
        let mut rows = range.rows();
        let headers: Vec<String> = rows
            .next()
            .map(|header| header.iter().map(cell_text).collect())
            .unwrap_or_default();
        let rows: Vec<Vec<Data>> = rows.map(|row| row.to_vec()).collect();

        debug!("read sheet with {} columns and {} rows", headers.len(), rows.len());
        Self { headers, rows }
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    fn cell(&self, row: usize, col: usize) -> &Data {
        self.rows
            .get(row)
            .and_then(|r| r.get(col))
            .unwrap_or(&Data::Empty)
    }

    /// Rows of `URL_ID` / `URL` pairs, in sheet order.
    pub fn source_rows(&self) -> Result<Vec<SourceRow>, InputError> {
        let (id_col, url_col) = match (self.column_index(ID_COLUMN), self.column_index(URL_COLUMN)) {
            (Some(id), Some(url)) => (id, url),
            _ => return Err(InputError::MissingColumns),
        };

        Ok((0..self.rows.len())
            .map(|i| SourceRow {
                id: cell_id(self.cell(i, id_col)),
                url: cell_text(self.cell(i, url_col)).trim().to_string(),
            })
            .collect())
    }

    /// Non-empty cells of one column, rendered as text.
    pub fn column_values(&self, name: &str) -> Result<Vec<String>, InputError> {
        let col = self
            .column_index(name)
            .ok_or_else(|| InputError::UnknownColumn(name.to_string()))?;

        Ok((0..self.rows.len())
            .map(|i| self.cell(i, col))
            .filter(|cell| !matches!(cell, Data::Empty))
            .map(cell_text)
            .collect())
    }
}

fn cell_text(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) => s.clone(),
        Data::Float(f) if f.fract() == 0.0 && f.abs() < i64::MAX as f64 => {
            (*f as i64).to_string()
        }
        other => other.to_string(),
    }
}

fn cell_id(cell: &Data) -> RowId {
    match cell {
        Data::Int(n) => RowId::Number(*n),
        Data::Float(f) if f.fract() == 0.0 && f.abs() < i64::MAX as f64 => {
            RowId::Number(*f as i64)
        }
        other => RowId::Text(cell_text(other)),
    }
}
