//! Assessment slots and score values
//!
//! A pupil carries eleven integer assessment slots, `df1`..`df11`. Each slot is
//! either unset or a score from 1 to 4. Scores read back from the database are
//! kept as raw integers in [`ScoreMap`]; consumers that need a guaranteed range
//! go through [`Score`].

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// One of the eleven named assessment slots
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Slot {
    Df1,
    Df2,
    Df3,
    Df4,
    Df5,
    Df6,
    Df7,
    Df8,
    Df9,
    Df10,
    Df11,
}

impl Slot {
    /// All slots in column order
    pub const ALL: [Slot; 11] = [
        Slot::Df1,
        Slot::Df2,
        Slot::Df3,
        Slot::Df4,
        Slot::Df5,
        Slot::Df6,
        Slot::Df7,
        Slot::Df8,
        Slot::Df9,
        Slot::Df10,
        Slot::Df11,
    ];

    /// Column name in the `pupils` table (`df1`..`df11`)
    pub fn column(self) -> &'static str {
        match self {
            Slot::Df1 => "df1",
            Slot::Df2 => "df2",
            Slot::Df3 => "df3",
            Slot::Df4 => "df4",
            Slot::Df5 => "df5",
            Slot::Df6 => "df6",
            Slot::Df7 => "df7",
            Slot::Df8 => "df8",
            Slot::Df9 => "df9",
            Slot::Df10 => "df10",
            Slot::Df11 => "df11",
        }
    }
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.column())
    }
}

impl FromStr for Slot {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Slot::ALL
            .into_iter()
            .find(|slot| slot.column() == s)
            .ok_or_else(|| format!("unknown score slot '{}'", s))
    }
}

impl TryFrom<String> for Slot {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Slot> for String {
    fn from(slot: Slot) -> Self {
        slot.column().to_string()
    }
}

/// A score guaranteed to be in 1..=4
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Score(u8);

impl Score {
    pub const MIN: i64 = 1;
    pub const MAX: i64 = 4;

    pub fn value(self) -> u8 {
        self.0
    }
}

impl TryFrom<i64> for Score {
    type Error = i64;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        if (Self::MIN..=Self::MAX).contains(&value) {
            Ok(Score(value as u8))
        } else {
            Err(value)
        }
    }
}

impl fmt::Display for Score {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Slot → raw score mapping
///
/// Absent slots are unset (NULL in the database).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ScoreMap(BTreeMap<Slot, i64>);

impl ScoreMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, slot: Slot) -> Option<i64> {
        self.0.get(&slot).copied()
    }

    pub fn insert(&mut self, slot: Slot, value: i64) -> Option<i64> {
        self.0.insert(slot, value)
    }

    /// Set or clear a slot
    pub fn set(&mut self, slot: Slot, value: Option<i64>) {
        match value {
            Some(v) => {
                self.0.insert(slot, v);
            }
            None => {
                self.0.remove(&slot);
            }
        }
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate set slots in slot order
    pub fn iter(&self) -> impl Iterator<Item = (Slot, i64)> + '_ {
        self.0.iter().map(|(slot, value)| (*slot, *value))
    }
}

impl FromIterator<(Slot, i64)> for ScoreMap {
    fn from_iter<I: IntoIterator<Item = (Slot, i64)>>(iter: I) -> Self {
        ScoreMap(iter.into_iter().collect())
    }
}
