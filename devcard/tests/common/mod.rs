//! Fixture builders shared by the integration tests
//!
//! Workbooks are written with rust_xlsxwriter and report templates with
//! docx-rs, both into a caller-provided temp dir.

#![allow(dead_code)]

use devcard::extract::{column_index, LayoutKind};
use devcard_common::{ScoreMap, Slot};
use docx_rs::{Docx, Paragraph, Run, Table, TableCell, TableRow};
use rust_xlsxwriter::Workbook;
use std::fs::File;
use std::path::{Path, PathBuf};

pub const NEEDS_HEADER: &str =
    "Особые образовательные потребности ребенка по отношению к группе, в которой он находится";
pub const TASKS_HEADER: &str = "Задачи";

/// Content of one score cell
#[derive(Debug, Clone)]
pub enum CellInput {
    Number(f64),
    Text(String),
    Blank,
}

/// Every slot of `kind` set to a score cycling through 1..=4
pub fn cycling_scores(kind: LayoutKind) -> ScoreMap {
    kind.spec()
        .cells
        .iter()
        .enumerate()
        .map(|(i, (slot, _))| (*slot, (i as i64 % 4) + 1))
        .collect()
}

/// Write a workbook named after `kind` with one cell per slot
///
/// `cell` decides each slot's content. Sheets listed in `skip_sheets` are
/// left out of the workbook entirely.
pub fn write_workbook_with(
    dir: &Path,
    kind: LayoutKind,
    skip_sheets: &[&str],
    cell: impl Fn(Slot) -> CellInput,
) -> PathBuf {
    let spec = kind.spec();
    let path = dir.join(spec.file_name);

    let mut sheets: Vec<&str> = Vec::new();
    for (_, cell_ref) in spec.cells {
        if !sheets.contains(&cell_ref.sheet) && !skip_sheets.contains(&cell_ref.sheet) {
            sheets.push(cell_ref.sheet);
        }
    }

    let mut workbook = Workbook::new();
    for sheet_name in sheets {
        let sheet = workbook.add_worksheet();
        sheet.set_name(sheet_name).unwrap();
        sheet.write_string(0, 0, "Показатель").unwrap();

        for (slot, cell_ref) in spec.cells.iter().filter(|(_, c)| c.sheet == sheet_name) {
            let column = column_index(cell_ref.column) as u16;
            match cell(*slot) {
                CellInput::Number(n) => {
                    sheet.write_number(cell_ref.row, column, n).unwrap();
                }
                CellInput::Text(s) => {
                    sheet.write_string(cell_ref.row, column, &s).unwrap();
                }
                CellInput::Blank => {}
            }
        }
    }
    workbook.save(&path).unwrap();
    path
}

/// Workbook holding exactly `scores` as numbers
pub fn write_workbook(dir: &Path, kind: LayoutKind, scores: &ScoreMap) -> PathBuf {
    write_workbook_with(dir, kind, &[], |slot| match scores.get(slot) {
        Some(v) => CellInput::Number(v as f64),
        None => CellInput::Blank,
    })
}

fn text_cell(text: &str) -> TableCell {
    TableCell::new().add_paragraph(Paragraph::new().add_run(Run::new().add_text(text)))
}

fn table(headers: (&str, &str), rows: usize) -> Table {
    let mut table_rows = vec![TableRow::new(vec![text_cell(headers.0), text_cell(headers.1)])];
    for _ in 1..rows {
        table_rows.push(TableRow::new(vec![text_cell(""), text_cell("")]));
    }
    Table::new(table_rows)
}

fn save(docx: Docx, path: &Path) {
    let file = File::create(path).unwrap();
    docx.build().pack(file).unwrap();
}

/// Template with one unrelated table followed by the recommendation table
pub fn write_template(path: &Path, rows: usize) {
    let docx = Docx::new()
        .add_paragraph(Paragraph::new().add_run(Run::new().add_text("Карта развития")))
        .add_table(table(("Фамилия", "Имя"), 2))
        .add_table(table((NEEDS_HEADER, TASKS_HEADER), rows));
    save(docx, path);
}

/// Template whose only table has different headers
pub fn write_template_without_table(path: &Path) {
    let docx = Docx::new()
        .add_paragraph(Paragraph::new().add_run(Run::new().add_text("Карта развития")))
        .add_table(table(("Фамилия", TASKS_HEADER), 4));
    save(docx, path);
}

/// Cell text of every table in a saved document
pub fn read_tables(path: &Path) -> Vec<Vec<Vec<String>>> {
    let docx = devcard::report::docx::load_document(path).unwrap();
    devcard::report::docx::tables_text(&docx)
}
