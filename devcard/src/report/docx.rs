//! Word document access
//!
//! A .docx file is a ZIP of XML parts; docx-rs parses it into a typed tree
//! and packs it back. Only body-level tables are searched:
//! Document → Table → TableRow → TableCell → Paragraph → Run → Text.

use super::table::{is_recommendation_table, ReportTable};
use devcard_common::{Error, Result};
use docx_rs::{
    read_docx, DocumentChild, Docx, Paragraph, ParagraphChild, Run, RunChild, Table, TableCell,
    TableCellContent, TableChild, TableRow, TableRowChild,
};
use std::fs::{self, File};
use std::path::Path;

/// Read and parse a .docx file
pub fn load_document(path: &Path) -> Result<Docx> {
    let bytes = fs::read(path)?;
    read_docx(&bytes).map_err(|e| {
        Error::Report(format!("Cannot parse document {}: {:?}", path.display(), e))
    })
}

/// Pack a document to `path`, removing the partial file on failure
pub fn save_document(docx: Docx, path: &Path) -> Result<()> {
    let file = File::create(path)?;
    if let Err(e) = docx.build().pack(file) {
        let _ = fs::remove_file(path);
        return Err(Error::Report(format!(
            "Cannot write document {}: {:?}",
            path.display(),
            e
        )));
    }
    Ok(())
}

/// First body table carrying the recommendation headers
pub fn find_recommendation_table(docx: &mut Docx) -> Option<DocxTable<'_>> {
    for child in docx.document.children.iter_mut() {
        if let DocumentChild::Table(table) = child {
            let table = DocxTable(table);
            if is_recommendation_table(&table) {
                return Some(table);
            }
        }
    }
    None
}

/// Text of every body table as rows of cell strings
pub fn tables_text(docx: &Docx) -> Vec<Vec<Vec<String>>> {
    docx.document
        .children
        .iter()
        .filter_map(|child| match child {
            DocumentChild::Table(table) => Some(
                table
                    .rows
                    .iter()
                    .filter_map(table_row)
                    .map(|row| {
                        row.cells
                            .iter()
                            .filter_map(row_cell)
                            .map(cell_text)
                            .collect::<Vec<String>>()
                    })
                    .collect::<Vec<_>>(),
            ),
            _ => None,
        })
        .collect()
}

#[allow(unreachable_patterns)]
fn table_row(child: &TableChild) -> Option<&TableRow> {
    match child {
        TableChild::TableRow(row) => Some(row),
        _ => None,
    }
}

#[allow(unreachable_patterns)]
fn table_row_mut(child: &mut TableChild) -> Option<&mut TableRow> {
    match child {
        TableChild::TableRow(row) => Some(row),
        _ => None,
    }
}

#[allow(unreachable_patterns)]
fn row_cell(child: &TableRowChild) -> Option<&TableCell> {
    match child {
        TableRowChild::TableCell(cell) => Some(cell),
        _ => None,
    }
}

#[allow(unreachable_patterns)]
fn row_cell_mut(child: &mut TableRowChild) -> Option<&mut TableCell> {
    match child {
        TableRowChild::TableCell(cell) => Some(cell),
        _ => None,
    }
}

fn paragraph_text(paragraph: &Paragraph) -> String {
    let mut text = String::new();
    for child in &paragraph.children {
        if let ParagraphChild::Run(run) = child {
            for run_child in &run.children {
                if let RunChild::Text(t) = run_child {
                    text.push_str(&t.text);
                }
            }
        }
    }
    text
}

/// Paragraphs of a cell joined by newlines
#[allow(unreachable_patterns)]
pub fn cell_text(cell: &TableCell) -> String {
    cell.children
        .iter()
        .filter_map(|content| match content {
            TableCellContent::Paragraph(p) => Some(paragraph_text(p)),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn text_paragraph(text: &str) -> Paragraph {
    Paragraph::new().add_run(Run::new().add_text(text))
}

fn empty_cell() -> TableCell {
    TableCell::new().add_paragraph(Paragraph::new())
}

/// Borrowed docx table
pub struct DocxTable<'a>(&'a mut Table);

impl DocxTable<'_> {
    fn row(&self, index: usize) -> Option<&TableRow> {
        self.0.rows.get(index).and_then(table_row)
    }

    fn cell(&self, row: usize, column: usize) -> Option<&TableCell> {
        self.row(row)?.cells.get(column).and_then(row_cell)
    }
}

impl ReportTable for DocxTable<'_> {
    fn row_count(&self) -> usize {
        self.0.rows.len()
    }

    fn cell_count(&self, row: usize) -> usize {
        self.row(row).map_or(0, |r| r.cells.len())
    }

    fn cell_text(&self, row: usize, column: usize) -> Option<String> {
        self.cell(row, column).map(cell_text)
    }

    fn set_cell_text(&mut self, row: usize, column: usize, text: &str) {
        let Some(row) = self.0.rows.get_mut(row).and_then(table_row_mut) else {
            return;
        };
        while row.cells.len() <= column {
            row.cells.push(TableRowChild::TableCell(empty_cell()));
        }
        if let Some(cell) = row.cells.get_mut(column).and_then(row_cell_mut) {
            // Rebuilding through the builder keeps the cell's properties
            let mut rebuilt = std::mem::replace(cell, TableCell::new());
            rebuilt.children.clear();
            *cell = rebuilt.add_paragraph(text_paragraph(text));
        }
    }

    fn append_row(&mut self) {
        let width = self
            .0
            .rows
            .last()
            .and_then(table_row)
            .map_or(2, |r| r.cells.len().max(1));
        let row = TableRow::new(vec![empty_cell(); width]);
        self.0.rows.push(TableChild::TableRow(row));
    }
}
