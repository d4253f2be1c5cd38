//! Score extraction from age-group workbooks
//!
//! The workbook's base name selects a layout; each slot of that layout is read
//! from one fixed cell and validated. Any missing or invalid value aborts the
//! whole extraction, so callers only ever see complete score maps.

mod layouts;

pub use layouts::{column_index, CellRef, LayoutKind, LayoutSpec, LAYOUTS};

use calamine::{open_workbook, Data, Range, Reader, Xlsx};
use devcard_common::{Error, Result, Score, ScoreMap, Slot};
use std::collections::HashMap;
use std::fmt;
use std::path::Path;
use tracing::{debug, info};

/// Validated scores plus the layout that produced them
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Extraction {
    pub scores: ScoreMap,
    pub layout: LayoutKind,
}

/// Cell content as far as score validation is concerned
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Empty,
    Int(i64),
    Float(f64),
    Text(String),
    Bool(bool),
    /// Dates, durations, error cells
    Other(String),
}

impl From<&Data> for CellValue {
    fn from(data: &Data) -> Self {
        match data {
            Data::Empty => CellValue::Empty,
            Data::Int(i) => CellValue::Int(*i),
            Data::Float(f) => CellValue::Float(*f),
            Data::String(s) => CellValue::Text(s.clone()),
            Data::Bool(b) => CellValue::Bool(*b),
            other => CellValue::Other(other.to_string()),
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Empty => Ok(()),
            CellValue::Int(i) => write!(f, "{}", i),
            CellValue::Float(x) => write!(f, "{}", x),
            CellValue::Text(s) | CellValue::Other(s) => f.write_str(s),
            CellValue::Bool(b) => write!(f, "{}", b),
        }
    }
}

/// Coerce a cell to a score
///
/// Numbers are truncated toward zero (`3.0` and `3.7` both give 3); text is
/// trimmed and parsed as a decimal first. Blank cells are `MissingScore`;
/// anything else outside 1..=4 is `InvalidScore`.
pub fn coerce_score(slot: Slot, cell: &CellValue) -> Result<Score> {
    let invalid = |value: String| Error::InvalidScore { slot, value };

    let number = match cell {
        CellValue::Empty => return Err(Error::MissingScore { slot }),
        CellValue::Text(s) if s.is_empty() => return Err(Error::MissingScore { slot }),
        CellValue::Int(i) => *i as f64,
        CellValue::Float(x) => *x,
        CellValue::Bool(b) => f64::from(u8::from(*b)),
        CellValue::Text(s) => s.trim().parse::<f64>().map_err(|_| invalid(s.clone()))?,
        CellValue::Other(s) => return Err(invalid(s.clone())),
    };

    if !number.is_finite() {
        return Err(invalid(cell.to_string()));
    }

    let value = number.trunc() as i64;
    Score::try_from(value).map_err(|v| invalid(v.to_string()))
}

/// Reads score cells from recognized workbooks
#[derive(Debug, Clone, Copy, Default)]
pub struct ScoreExtractor;

impl ScoreExtractor {
    pub fn new() -> Self {
        Self
    }

    /// Read and validate every slot defined for the workbook's layout
    pub fn read_scores(&self, path: &Path) -> Result<Extraction> {
        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or_default();
        let layout = LayoutKind::from_file_name(file_name)
            .ok_or_else(|| Error::InvalidFileKind(file_name.to_string()))?;

        let mut workbook: Xlsx<_> = open_workbook(path)
            .map_err(|e| Error::Spreadsheet(format!("Cannot open {}: {}", path.display(), e)))?;

        let spec = layout.spec();
        let mut sheets: HashMap<&str, Range<Data>> = HashMap::new();
        let mut scores = ScoreMap::new();

        for (slot, cell) in spec.cells {
            if !sheets.contains_key(cell.sheet) {
                let range = workbook.worksheet_range(cell.sheet).map_err(|e| {
                    Error::Spreadsheet(format!("Cannot read sheet '{}': {}", cell.sheet, e))
                })?;
                sheets.insert(cell.sheet, range);
            }

            let value = sheets
                .get(cell.sheet)
                .and_then(|range| range.get_value(cell.position()))
                .map(CellValue::from)
                .unwrap_or(CellValue::Empty);
            debug!("{} {} = {:?}", slot, cell, value);

            let score = coerce_score(*slot, &value)?;
            scores.insert(*slot, i64::from(score.value()));
        }

        info!(
            "Read {} score(s) from {} ({} layout)",
            scores.len(),
            path.display(),
            layout
        );
        Ok(Extraction { scores, layout })
    }
}
