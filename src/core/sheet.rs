use anyhow::{anyhow, Result};
use calamine::{Data, Reader, Xlsx};
use log::debug;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::io::Cursor;

/// A single decoded cell. Serializes the way a JSON array-of-arrays would hold it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CellValue {
    Empty,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
    Error(String),
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Empty => Ok(()),
            CellValue::Bool(b) => write!(f, "{}", b),
            CellValue::Int(i) => write!(f, "{}", i),
            CellValue::Float(v) => write!(f, "{}", v),
            CellValue::Text(s) | CellValue::Error(s) => f.write_str(s),
        }
    }
}

impl From<&Data> for CellValue {
    fn from(cell: &Data) -> Self {
        match cell {
            Data::Empty => CellValue::Empty,
            Data::Bool(b) => CellValue::Bool(*b),
            Data::Int(i) => CellValue::Int(*i),
            Data::Float(v) => CellValue::Float(*v),
            Data::String(s) => CellValue::Text(s.clone()),
            Data::Error(e) => CellValue::Error(e.to_string()),
            // Dates stay as their serial number.
            Data::DateTime(d) => CellValue::Float(d.as_f64()),
            other => CellValue::Text(other.to_string()),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Sheet {
    pub name: String,
    cells: Vec<Vec<CellValue>>,
}

impl Sheet {
    pub fn new(name: impl Into<String>, cells: Vec<Vec<CellValue>>) -> Self {
        Self {
            name: name.into(),
            cells,
        }
    }

    /// Row-major copy of the populated range. Row 0 is data, never field names.
    pub fn to_rows(&self) -> Vec<Vec<CellValue>> {
        self.cells.clone()
    }

    /// (rows, columns) of the populated range.
    pub fn dimensions(&self) -> (usize, usize) {
        let width = self.cells.iter().map(Vec::len).max().unwrap_or(0);
        (self.cells.len(), width)
    }
}

/// Decoded workbook, sheets kept in workbook order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Workbook {
    pub sheets: Vec<Sheet>,
}

impl Workbook {
    pub fn sheet_names(&self) -> Vec<&str> {
        self.sheets.iter().map(|s| s.name.as_str()).collect()
    }

    pub fn first_sheet(&self) -> Option<&Sheet> {
        self.sheets.first()
    }
}

pub trait SheetDecoder: Send + Sync {
    fn decode(&self, bytes: &[u8]) -> Result<Workbook>;
}

/// Spreadsheet decoder backed by calamine's xlsx reader.
#[derive(Debug, Clone, Copy, Default)]
pub struct CalamineDecoder;

impl SheetDecoder for CalamineDecoder {
    fn decode(&self, bytes: &[u8]) -> Result<Workbook> {
        let mut workbook: Xlsx<_> =
            Xlsx::new(Cursor::new(bytes)).map_err(|e| anyhow!("Failed to open XLSX: {}", e))?;

        let sheet_names: Vec<String> = workbook.sheet_names().to_vec();
        let mut sheets = Vec::with_capacity(sheet_names.len());

        for sheet_name in sheet_names {
            let range = workbook
                .worksheet_range(&sheet_name)
                .map_err(|e| anyhow!("Failed to read sheet {}: {}", sheet_name, e))?;

            let cells = range
                .rows()
                .map(|row| row.iter().map(CellValue::from).collect())
                .collect();

            sheets.push(Sheet::new(sheet_name, cells));
        }

        debug!("Decoded workbook with {} sheets", sheets.len());
        Ok(Workbook { sheets })
    }
}
