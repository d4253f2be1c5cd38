//! Recommendation text table
//!
//! Pure data: for each layout, the ordered report sections, and for each
//! section the diagnostic/recommendation pair per score. The built-in table is
//! compiled in from `resources/recommendations.toml`; an alternative file with
//! the same shape can be loaded at runtime.

use crate::extract::LayoutKind;
use devcard_common::{Error, Result, Score, Slot};
use serde::Deserialize;
use std::collections::HashSet;
use std::path::Path;
use tracing::info;

const BUILTIN: &str = include_str!("../../resources/recommendations.toml");

/// Diagnostic and recommendation for one score value
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Entry {
    pub score: i64,
    pub diagnostic: String,
    pub recommendation: String,
}

/// One report section bound to a score slot
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Section {
    pub slot: Slot,
    pub title: String,
    #[serde(rename = "entry", default)]
    pub entries: Vec<Entry>,
}

impl Section {
    pub fn entry(&self, score: Score) -> Option<&Entry> {
        self.entries
            .iter()
            .find(|e| e.score == i64::from(score.value()))
    }
}

/// Report structure for one layout
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LayoutText {
    pub kind: LayoutKind,
    /// Group heading written above the first section
    pub heading: String,
    #[serde(rename = "section", default)]
    pub sections: Vec<Section>,
}

#[derive(Debug, Deserialize)]
struct BookFile {
    #[serde(default)]
    layout: Vec<LayoutText>,
}

/// All layouts' report text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecommendationBook {
    layouts: Vec<LayoutText>,
}

impl RecommendationBook {
    /// Table compiled into the binary
    pub fn builtin() -> Result<Self> {
        Self::from_toml_str(BUILTIN)
    }

    /// Load an alternative table from disk
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::Config(format!("Read recommendations {} failed: {}", path.display(), e))
        })?;
        let book = Self::from_toml_str(&content)?;
        info!("Loaded recommendation table {}", path.display());
        Ok(book)
    }

    /// Parse and validate a table
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let file: BookFile = toml::from_str(content)
            .map_err(|e| Error::Config(format!("Parse recommendations failed: {}", e)))?;
        let book = Self {
            layouts: file.layout,
        };
        book.validate()?;
        Ok(book)
    }

    pub fn layout(&self, kind: LayoutKind) -> Option<&LayoutText> {
        self.layouts.iter().find(|l| l.kind == kind)
    }

    pub fn layouts(&self) -> &[LayoutText] {
        &self.layouts
    }

    fn validate(&self) -> Result<()> {
        let mut kinds = HashSet::new();
        for layout in &self.layouts {
            if !kinds.insert(layout.kind) {
                return Err(Error::Config(format!("Layout '{}' defined twice", layout.kind)));
            }
            for section in &layout.sections {
                let mut scores = HashSet::new();
                for entry in &section.entries {
                    if Score::try_from(entry.score).is_err() {
                        return Err(Error::Config(format!(
                            "{} / {}: score {} outside 1..=4",
                            layout.kind, section.title, entry.score
                        )));
                    }
                    if !scores.insert(entry.score) {
                        return Err(Error::Config(format!(
                            "{} / {}: score {} defined twice",
                            layout.kind, section.title, entry.score
                        )));
                    }
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn slots(book: &RecommendationBook, kind: LayoutKind) -> Vec<Slot> {
        book.layout(kind)
            .unwrap()
            .sections
            .iter()
            .map(|s| s.slot)
            .collect()
    }

    #[test]
    fn test_builtin_table_parses() {
        let book = RecommendationBook::builtin().unwrap();
        assert_eq!(book.layouts().len(), 3);
        for layout in book.layouts() {
            assert_eq!(layout.heading, "ЛОГОПЕДИЯ");
            for section in &layout.sections {
                assert_eq!(section.entries.len(), 4, "{} / {}", layout.kind, section.title);
            }
        }
    }

    #[test]
    fn test_builtin_section_bindings() {
        let book = RecommendationBook::builtin().unwrap();

        let younger = slots(&book, LayoutKind::Younger);
        assert_eq!(younger.len(), 10);
        assert!(!younger.contains(&Slot::Df8));
        assert_eq!(younger.last(), Some(&Slot::Df11));

        assert_eq!(slots(&book, LayoutKind::Middle), vec![Slot::Df1, Slot::Df2]);

        let older = slots(&book, LayoutKind::Older);
        assert_eq!(older, Slot::ALL[..10].to_vec());
    }

    #[test]
    fn test_entry_lookup_by_score() {
        let book = RecommendationBook::builtin().unwrap();
        let section = &book.layout(LayoutKind::Older).unwrap().sections[2];
        assert_eq!(section.title, "Фонематические процессы");

        let entry = section.entry(Score::try_from(3).unwrap()).unwrap();
        assert_eq!(entry.score, 3);
        assert!(!entry.diagnostic.is_empty());
        assert!(!entry.recommendation.is_empty());
    }

    #[test]
    fn test_duplicate_layout_rejected() {
        let text = r#"
            [[layout]]
            kind = "older"
            heading = "A"
            [[layout]]
            kind = "older"
            heading = "B"
        "#;
        assert!(matches!(RecommendationBook::from_toml_str(text), Err(Error::Config(_))));
    }

    #[test]
    fn test_out_of_range_entry_rejected() {
        let text = r#"
            [[layout]]
            kind = "middle"
            heading = "A"
            [[layout.section]]
            slot = "df1"
            title = "T"
            [[layout.section.entry]]
            score = 5
            diagnostic = "d"
            recommendation = "r"
        "#;
        assert!(matches!(RecommendationBook::from_toml_str(text), Err(Error::Config(_))));
    }

    #[test]
    fn test_duplicate_score_rejected() {
        let text = r#"
            [[layout]]
            kind = "middle"
            heading = "A"
            [[layout.section]]
            slot = "df1"
            title = "T"
            [[layout.section.entry]]
            score = 2
            diagnostic = "d"
            recommendation = "r"
            [[layout.section.entry]]
            score = 2
            diagnostic = "d2"
            recommendation = "r2"
        "#;
        let err = RecommendationBook::from_toml_str(text).unwrap_err();
        assert!(matches!(&err, Error::Config(msg) if msg.contains("defined twice")));
    }

    #[test]
    fn test_unknown_slot_rejected() {
        let text = r#"
            [[layout]]
            kind = "middle"
            heading = "A"
            [[layout.section]]
            slot = "df12"
            title = "T"
        "#;
        assert!(RecommendationBook::from_toml_str(text).is_err());
    }
}
