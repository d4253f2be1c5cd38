//! Report filling
//!
//! Locates the recommendation table in a Word template, writes one
//! title + diagnostic/recommendation row pair per section of the pupil's
//! layout and saves the result under a new name.

pub mod docx;
pub mod recommendations;
pub mod table;

pub use recommendations::{Entry, LayoutText, RecommendationBook, Section};
pub use table::{fill_table, is_recommendation_table, ReportTable, SectionFailure};

use crate::extract::LayoutKind;
use devcard_common::{Error, Result, ScoreMap, Slot};
use docx_rs::Docx;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Fills templates from a recommendation book
#[derive(Debug, Clone)]
pub struct ReportFiller {
    book: RecommendationBook,
}

impl ReportFiller {
    pub fn new(book: RecommendationBook) -> Self {
        Self { book }
    }

    /// Filler over the embedded recommendation table
    pub fn builtin() -> Result<Self> {
        Ok(Self::new(RecommendationBook::builtin()?))
    }

    /// Embedded table, or the one at `path` when configured
    pub fn from_config(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Ok(Self::new(RecommendationBook::load(path)?)),
            None => Self::builtin(),
        }
    }

    pub fn book(&self) -> &RecommendationBook {
        &self.book
    }

    /// Fill the template in memory
    ///
    /// Fails with `TableNotFound` when no table carries the recommendation
    /// headers. Per-section problems do not fail the fill; they are listed in
    /// [`FilledReport::failures`].
    pub fn fill(&self, template: &Path, scores: &ScoreMap, layout: LayoutKind) -> Result<FilledReport> {
        let text = self
            .book
            .layout(layout)
            .ok_or_else(|| Error::Report(format!("No recommendation text for the {} layout", layout)))?;

        let mut docx = docx::load_document(template)?;
        let mut table = docx::find_recommendation_table(&mut docx).ok_or(Error::TableNotFound)?;

        let unreported: Vec<Slot> = scores
            .iter()
            .map(|(slot, _)| slot)
            .filter(|slot| !text.sections.iter().any(|s| s.slot == *slot))
            .collect();
        if !unreported.is_empty() {
            warn!(
                "{} layout has no report section for {}",
                layout,
                unreported
                    .iter()
                    .map(Slot::to_string)
                    .collect::<Vec<_>>()
                    .join(", ")
            );
        }

        let failures = fill_table(&mut table, text, scores);
        info!(
            "Filled {} section(s) of {} ({} layout, {} blank)",
            text.sections.len(),
            template.display(),
            layout,
            failures.len()
        );

        Ok(FilledReport {
            docx,
            template: template.to_path_buf(),
            layout,
            failures,
        })
    }
}

/// A filled document not yet written to disk
#[derive(Debug)]
pub struct FilledReport {
    docx: Docx,
    template: PathBuf,
    pub layout: LayoutKind,
    /// Sections left blank
    pub failures: Vec<SectionFailure>,
}

impl FilledReport {
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }

    /// Write the document to `output`; the template itself is never overwritten
    pub fn save(self, output: &Path) -> Result<()> {
        if same_file(&self.template, output) {
            return Err(Error::Report(format!(
                "Refusing to overwrite the template {}",
                self.template.display()
            )));
        }

        docx::save_document(self.docx, output)?;
        info!("Saved report {}", output.display());
        Ok(())
    }
}

fn same_file(a: &Path, b: &Path) -> bool {
    match (a.canonicalize(), b.canonicalize()) {
        (Ok(a), Ok(b)) => a == b,
        _ => a == b,
    }
}

/// Fill `template` and save it to `output`
///
/// `Ok(false)` when no output path was chosen; nothing is written then.
pub fn fill_report(
    filler: &ReportFiller,
    template: &Path,
    scores: &ScoreMap,
    layout: LayoutKind,
    output: Option<&Path>,
) -> Result<bool> {
    let report = filler.fill(template, scores, layout)?;
    let Some(output) = output else {
        info!("Report not saved: no output path chosen");
        return Ok(false);
    };
    report.save(output)?;
    Ok(true)
}
