//! Row protocol for the recommendations table
//!
//! The table is addressed by (row, column). Row 0 holds the two header cells,
//! row 1 the group heading, then every section takes two rows: its title, then
//! diagnostic (column 0) and recommendation (column 1). The template usually
//! ships with rows 0-3; every section after the first appends its own two rows.

use super::recommendations::{LayoutText, Section};
use devcard_common::{Score, ScoreMap, Slot};
use std::fmt;
use tracing::{debug, warn};

/// Header text of the diagnostic column
pub const NEEDS_HEADER: &str =
    "Особые образовательные потребности ребенка по отношению к группе, в которой он находится";

/// Header text of the recommendation column
pub const TASKS_HEADER: &str = "Задачи";

pub const HEADING_ROW: usize = 1;
pub const FIRST_SECTION_ROW: usize = 2;

/// Mutable view of a document table
pub trait ReportTable {
    fn row_count(&self) -> usize;

    /// Number of cells in a row (0 for rows past the end)
    fn cell_count(&self, row: usize) -> usize;

    /// Concatenated text of a cell, `None` when the cell does not exist
    fn cell_text(&self, row: usize, column: usize) -> Option<String>;

    /// Replace a cell's content with a single paragraph; missing cells are added
    fn set_cell_text(&mut self, row: usize, column: usize, text: &str);

    /// Append an empty row as wide as the last one
    fn append_row(&mut self);
}

/// Whether the first row starts with the two recognized header cells
pub fn is_recommendation_table<T: ReportTable + ?Sized>(table: &T) -> bool {
    let header = |column| table.cell_text(0, column).map(|t| t.trim().to_string());
    table.cell_count(0) >= 2
        && header(0).as_deref() == Some(NEEDS_HEADER)
        && header(1).as_deref() == Some(TASKS_HEADER)
}

/// A section whose score could not be turned into text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectionFailure {
    pub slot: Slot,
    pub title: String,
    /// Stored value, `None` when the slot was absent
    pub value: Option<i64>,
}

impl fmt::Display for SectionFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.value {
            Some(value) => write!(f, "{} ({}): no text for score {}", self.title, self.slot, value),
            None => write!(f, "{} ({}): no score recorded", self.title, self.slot),
        }
    }
}

fn section_entry<'a>(
    section: &'a Section,
    scores: &ScoreMap,
) -> Result<(&'a str, &'a str), SectionFailure> {
    let value = scores.get(section.slot);
    let failure = || SectionFailure {
        slot: section.slot,
        title: section.title.clone(),
        value,
    };

    let score = value
        .and_then(|v| Score::try_from(v).ok())
        .ok_or_else(failure)?;
    section
        .entry(score)
        .map(|e| (e.diagnostic.as_str(), e.recommendation.as_str()))
        .ok_or_else(failure)
}

fn ensure_rows<T: ReportTable + ?Sized>(table: &mut T, rows: usize) {
    while table.row_count() < rows {
        table.append_row();
    }
}

/// Write the heading and every section of `layout` into `table`
///
/// Sections whose score is absent or has no text leave their content row
/// blank; they are returned so the caller can report them. Filling never
/// stops early.
pub fn fill_table<T: ReportTable + ?Sized>(
    table: &mut T,
    layout: &LayoutText,
    scores: &ScoreMap,
) -> Vec<SectionFailure> {
    let mut failures = Vec::new();

    ensure_rows(table, HEADING_ROW + 1);
    table.set_cell_text(HEADING_ROW, 0, &layout.heading);

    let mut row = FIRST_SECTION_ROW;
    for (index, section) in layout.sections.iter().enumerate() {
        if index > 0 {
            table.append_row();
        }
        ensure_rows(table, row + 1);
        table.set_cell_text(row, 0, &section.title);

        if index > 0 {
            table.append_row();
        }
        ensure_rows(table, row + 2);
        match section_entry(section, scores) {
            Ok((diagnostic, recommendation)) => {
                debug!("Row {}: {} = {:?}", row + 1, section.slot, scores.get(section.slot));
                table.set_cell_text(row + 1, 0, diagnostic);
                table.set_cell_text(row + 1, 1, recommendation);
            }
            Err(failure) => {
                warn!("Section left blank: {}", failure);
                failures.push(failure);
            }
        }

        row += 2;
    }

    failures
}
