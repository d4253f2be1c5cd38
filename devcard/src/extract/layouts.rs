//! Age-group workbook layouts
//!
//! Each recognized workbook is identified purely by its file name and reads
//! every score from one fixed cell. Adding a layout means adding a row to
//! [`LAYOUTS`].

use devcard_common::Slot;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// One of the three age-group layouts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LayoutKind {
    Younger,
    Middle,
    Older,
}

impl LayoutKind {
    pub const ALL: [LayoutKind; 3] = [LayoutKind::Younger, LayoutKind::Middle, LayoutKind::Older];

    pub fn as_str(self) -> &'static str {
        match self {
            LayoutKind::Younger => "younger",
            LayoutKind::Middle => "middle",
            LayoutKind::Older => "older",
        }
    }

    /// Cell map for this layout
    pub fn spec(self) -> &'static LayoutSpec {
        match self {
            LayoutKind::Younger => &LAYOUTS[0],
            LayoutKind::Middle => &LAYOUTS[1],
            LayoutKind::Older => &LAYOUTS[2],
        }
    }

    /// Exact workbook base name for this layout
    pub fn file_name(self) -> &'static str {
        self.spec().file_name
    }

    /// Match a workbook base name
    pub fn from_file_name(name: &str) -> Option<LayoutKind> {
        LAYOUTS
            .iter()
            .find(|layout| layout.file_name == name)
            .map(|layout| layout.kind)
    }
}

impl fmt::Display for LayoutKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LayoutKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        LayoutKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| format!("unknown layout '{}'", s))
    }
}

/// Single-cell location inside a workbook
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellRef {
    pub sheet: &'static str,
    /// Column letters, e.g. `E`
    pub column: &'static str,
    /// Zero-based sheet row (Excel row number minus one)
    pub row: u32,
}

impl CellRef {
    const fn new(sheet: &'static str, column: &'static str, row: u32) -> Self {
        Self { sheet, column, row }
    }

    /// Zero-based (row, column) position
    pub fn position(&self) -> (u32, u32) {
        (self.row, column_index(self.column))
    }
}

impl fmt::Display for CellRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "'{}'!{}{}", self.sheet, self.column, self.row + 1)
    }
}

/// Recognized workbook: file name plus ordered slot → cell map
#[derive(Debug)]
pub struct LayoutSpec {
    pub kind: LayoutKind,
    pub file_name: &'static str,
    pub cells: &'static [(Slot, CellRef)],
}

const SPEECH: &str = "Логопедия";
const SURROUNDINGS: &str = "ОЗОМ";
const MATH: &str = "ФЭМП";
const CONSTRUCTION: &str = "Конструирование";

pub const LAYOUTS: &[LayoutSpec] = &[
    LayoutSpec {
        kind: LayoutKind::Younger,
        file_name: "Карта развития. Младший возраст.xlsx",
        cells: &[
            (Slot::Df1, CellRef::new(SPEECH, "E", 5)),
            (Slot::Df2, CellRef::new(SPEECH, "E", 7)),
            (Slot::Df3, CellRef::new(SPEECH, "E", 9)),
            (Slot::Df4, CellRef::new(SPEECH, "E", 11)),
            (Slot::Df5, CellRef::new(SPEECH, "E", 13)),
            (Slot::Df6, CellRef::new(SPEECH, "E", 15)),
            (Slot::Df7, CellRef::new(SPEECH, "E", 17)),
            (Slot::Df8, CellRef::new(SPEECH, "E", 19)),
            (Slot::Df9, CellRef::new(SURROUNDINGS, "H", 12)),
            (Slot::Df10, CellRef::new(MATH, "H", 7)),
            (Slot::Df11, CellRef::new(CONSTRUCTION, "H", 5)),
        ],
    },
    LayoutSpec {
        kind: LayoutKind::Middle,
        file_name: "Карта развития. Средний возраст.xlsx",
        cells: &[
            (Slot::Df1, CellRef::new(SPEECH, "H", 6)),
            (Slot::Df2, CellRef::new(SPEECH, "H", 8)),
            (Slot::Df3, CellRef::new(SPEECH, "H", 10)),
            (Slot::Df4, CellRef::new(SPEECH, "H", 12)),
            (Slot::Df5, CellRef::new(SPEECH, "H", 14)),
            (Slot::Df6, CellRef::new(SPEECH, "H", 16)),
            (Slot::Df7, CellRef::new(SPEECH, "H", 18)),
            (Slot::Df8, CellRef::new(SPEECH, "H", 20)),
            (Slot::Df9, CellRef::new(SURROUNDINGS, "H", 13)),
            (Slot::Df10, CellRef::new(MATH, "H", 10)),
            (Slot::Df11, CellRef::new(CONSTRUCTION, "H", 6)),
        ],
    },
    // The older-group workbook has ten assessments; df11 stays unset.
    LayoutSpec {
        kind: LayoutKind::Older,
        file_name: "Карта развития. Старший возраст.xlsx",
        cells: &[
            (Slot::Df1, CellRef::new(SPEECH, "E", 5)),
            (Slot::Df2, CellRef::new(SPEECH, "E", 7)),
            (Slot::Df3, CellRef::new(SPEECH, "E", 9)),
            (Slot::Df4, CellRef::new(SPEECH, "E", 11)),
            (Slot::Df5, CellRef::new(SPEECH, "E", 13)),
            (Slot::Df6, CellRef::new(SPEECH, "E", 15)),
            (Slot::Df7, CellRef::new(SPEECH, "E", 17)),
            (Slot::Df8, CellRef::new(SURROUNDINGS, "E", 12)),
            (Slot::Df9, CellRef::new(MATH, "E", 11)),
            (Slot::Df10, CellRef::new(CONSTRUCTION, "E", 6)),
        ],
    },
];

/// Zero-based index of spreadsheet column letters (`A` = 0, `Z` = 25, `AA` = 26)
pub fn column_index(letters: &str) -> u32 {
    letters
        .bytes()
        .filter(u8::is_ascii_alphabetic)
        .fold(0u32, |acc, b| acc * 26 + u32::from(b.to_ascii_uppercase() - b'A' + 1))
        .saturating_sub(1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_column_index() {
        assert_eq!(column_index("A"), 0);
        assert_eq!(column_index("E"), 4);
        assert_eq!(column_index("H"), 7);
        assert_eq!(column_index("Z"), 25);
        assert_eq!(column_index("AA"), 26);
        assert_eq!(column_index("ab"), 27);
    }

    #[test]
    fn test_every_kind_has_exactly_one_layout() {
        assert_eq!(LAYOUTS.len(), LayoutKind::ALL.len());
        for kind in LayoutKind::ALL {
            assert_eq!(LAYOUTS.iter().filter(|l| l.kind == kind).count(), 1);
            assert_eq!(kind.spec().kind, kind);
        }
    }

    #[test]
    fn test_file_name_lookup() {
        assert_eq!(
            LayoutKind::from_file_name("Карта развития. Младший возраст.xlsx"),
            Some(LayoutKind::Younger)
        );
        assert_eq!(
            LayoutKind::from_file_name("Карта развития. Старший возраст.xlsx"),
            Some(LayoutKind::Older)
        );
        assert_eq!(LayoutKind::from_file_name("Карта развития.xlsx"), None);
        assert_eq!(LayoutKind::from_file_name("карта развития. младший возраст.xlsx"), None);
    }

    #[test]
    fn test_slot_counts_per_layout() {
        assert_eq!(LayoutKind::Younger.spec().cells.len(), 11);
        assert_eq!(LayoutKind::Middle.spec().cells.len(), 11);
        assert_eq!(LayoutKind::Older.spec().cells.len(), 10);
        assert!(LayoutKind::Older
            .spec()
            .cells
            .iter()
            .all(|(slot, _)| *slot != Slot::Df11));
    }

    #[test]
    fn test_slots_are_listed_in_order_without_duplicates() {
        for layout in LAYOUTS {
            let slots: Vec<Slot> = layout.cells.iter().map(|(slot, _)| *slot).collect();
            let mut sorted = slots.clone();
            sorted.sort();
            sorted.dedup();
            assert_eq!(slots, sorted, "{} layout", layout.kind);
        }
    }

    #[test]
    fn test_cell_ref_display_uses_excel_row_numbers() {
        let cell = LayoutKind::Younger.spec().cells[0].1;
        assert_eq!(cell.to_string(), "'Логопедия'!E6");
        assert_eq!(cell.position(), (5, 4));
    }

    #[test]
    fn test_layout_kind_parse() {
        assert_eq!("middle".parse::<LayoutKind>(), Ok(LayoutKind::Middle));
        assert!("toddler".parse::<LayoutKind>().is_err());
    }
}
