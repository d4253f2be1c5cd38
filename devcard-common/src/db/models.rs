//! Database models

use crate::scores::ScoreMap;
use crate::time::parse_user_date;
use crate::{Error, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Identity fields of a pupil
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersonalInfo {
    pub surname: String,
    pub name: String,
    pub patronymic: String,
    pub birth_date: NaiveDate,
}

impl PersonalInfo {
    /// Validate form input
    ///
    /// Every field must be non-empty, then the birth date must be `DD-MM-YYYY`.
    pub fn parse(surname: &str, name: &str, patronymic: &str, birth_date: &str) -> Result<Self> {
        let fields = [
            ("surname", surname),
            ("name", name),
            ("patronymic", patronymic),
            ("birth date", birth_date),
        ];
        if let Some((label, _)) = fields.iter().find(|(_, value)| value.trim().is_empty()) {
            return Err(Error::EmptyRequiredField(label.to_string()));
        }

        Ok(Self {
            surname: surname.trim().to_string(),
            name: name.trim().to_string(),
            patronymic: patronymic.trim().to_string(),
            birth_date: parse_user_date(birth_date)?,
        })
    }

    /// "Surname Name Patronymic"
    pub fn full_name(&self) -> String {
        format!("{} {} {}", self.surname, self.name, self.patronymic)
    }
}

/// One row of the `pupils` table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pupil {
    pub id: i64,
    #[serde(flatten)]
    pub info: PersonalInfo,
    pub scores: ScoreMap,
}
