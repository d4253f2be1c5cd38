//! Pupil record store
//!
//! Create/read/update/delete over the `pupils` table. Each operation acquires
//! its own connection, runs a single statement and closes the connection; an
//! error on any step drops the connection before the error is returned.

use super::init::{create_pupils_table, open_connection};
use super::models::{PersonalInfo, Pupil};
use crate::scores::{ScoreMap, Slot};
use crate::Result;
use chrono::NaiveDate;
use sqlx::sqlite::SqliteRow;
use sqlx::{Connection, Row};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

const SELECT_PUPILS: &str = r#"
    SELECT id, surname, name, patronymic, birth_date,
           df1, df2, df3, df4, df5, df6, df7, df8, df9, df10, df11
    FROM pupils
"#;

/// Stateless handle on the pupil database file
#[derive(Debug, Clone)]
pub struct PupilStore {
    db_path: PathBuf,
}

impl PupilStore {
    pub fn new(db_path: impl Into<PathBuf>) -> Self {
        Self {
            db_path: db_path.into(),
        }
    }

    pub fn db_path(&self) -> &Path {
        &self.db_path
    }

    /// Create the pupils table if absent; safe to call repeatedly
    pub async fn create_table(&self) -> Result<()> {
        let mut conn = open_connection(&self.db_path).await?;
        create_pupils_table(&mut conn).await?;
        conn.close().await?;
        Ok(())
    }

    /// Insert a pupil with all score slots unset; returns the new id
    pub async fn add_pupil(&self, info: &PersonalInfo) -> Result<i64> {
        let mut conn = open_connection(&self.db_path).await?;
        let id = sqlx::query(
            r#"
            INSERT INTO pupils (surname, name, patronymic, birth_date)
            VALUES (?, ?, ?, ?)
            "#,
        )
        .bind(&info.surname)
        .bind(&info.name)
        .bind(&info.patronymic)
        .bind(info.birth_date)
        .execute(&mut conn)
        .await?
        .last_insert_rowid();
        conn.close().await?;

        info!("Added pupil {} ({})", id, info.full_name());
        Ok(id)
    }

    /// All pupils in insertion order
    pub async fn get_all_pupils(&self) -> Result<Vec<Pupil>> {
        let mut conn = open_connection(&self.db_path).await?;
        let rows = sqlx::query(&format!("{} ORDER BY id", SELECT_PUPILS))
            .fetch_all(&mut conn)
            .await?;
        conn.close().await?;

        rows.iter().map(pupil_from_row).collect()
    }

    /// One pupil by id
    pub async fn get_pupil(&self, id: i64) -> Result<Option<Pupil>> {
        let mut conn = open_connection(&self.db_path).await?;
        let row = sqlx::query(&format!("{} WHERE id = ?", SELECT_PUPILS))
            .bind(id)
            .fetch_optional(&mut conn)
            .await?;
        conn.close().await?;

        row.as_ref().map(pupil_from_row).transpose()
    }

    /// Replace the four identity fields
    ///
    /// An unknown id is not an error: nothing is updated and the call succeeds.
    pub async fn update_personal_info(&self, id: i64, info: &PersonalInfo) -> Result<()> {
        let mut conn = open_connection(&self.db_path).await?;
        let affected = sqlx::query(
            r#"
            UPDATE pupils
            SET surname = ?, name = ?, patronymic = ?, birth_date = ?
            WHERE id = ?
            "#,
        )
        .bind(&info.surname)
        .bind(&info.name)
        .bind(&info.patronymic)
        .bind(info.birth_date)
        .bind(id)
        .execute(&mut conn)
        .await?
        .rows_affected();
        conn.close().await?;

        if affected == 0 {
            warn!("Personal info update matched no pupil with id {}", id);
        } else {
            info!("Updated personal info of pupil {}", id);
        }
        Ok(())
    }

    /// Replace all eleven score slots in one statement
    ///
    /// Slots absent from `scores` are written as NULL, clearing any previous value.
    pub async fn update_scores(&self, id: i64, scores: &ScoreMap) -> Result<()> {
        let assignments = Slot::ALL
            .iter()
            .map(|slot| format!("{} = ?", slot.column()))
            .collect::<Vec<_>>()
            .join(", ");
        let sql = format!("UPDATE pupils SET {} WHERE id = ?", assignments);

        let mut query = sqlx::query(&sql);
        for slot in Slot::ALL {
            query = query.bind(scores.get(slot));
        }

        let mut conn = open_connection(&self.db_path).await?;
        let affected = query.bind(id).execute(&mut conn).await?.rows_affected();
        conn.close().await?;

        if affected == 0 {
            warn!("Score update matched no pupil with id {}", id);
        } else {
            info!("Updated {} score(s) of pupil {}", scores.len(), id);
        }
        Ok(())
    }

    /// Remove a pupil; an unknown id is a no-op
    pub async fn delete_pupil(&self, id: i64) -> Result<()> {
        let mut conn = open_connection(&self.db_path).await?;
        let affected = sqlx::query("DELETE FROM pupils WHERE id = ?")
            .bind(id)
            .execute(&mut conn)
            .await?
            .rows_affected();
        conn.close().await?;

        if affected == 0 {
            warn!("Delete matched no pupil with id {}", id);
        } else {
            info!("Deleted pupil {}", id);
        }
        Ok(())
    }
}

fn pupil_from_row(row: &SqliteRow) -> Result<Pupil> {
    let mut scores = ScoreMap::new();
    for slot in Slot::ALL {
        scores.set(slot, row.try_get::<Option<i64>, _>(slot.column())?);
    }

    Ok(Pupil {
        id: row.try_get("id")?,
        info: PersonalInfo {
            surname: row.try_get::<Option<String>, _>("surname")?.unwrap_or_default(),
            name: row.try_get::<Option<String>, _>("name")?.unwrap_or_default(),
            patronymic: row.try_get::<Option<String>, _>("patronymic")?.unwrap_or_default(),
            birth_date: row.try_get::<NaiveDate, _>("birth_date")?,
        },
        scores,
    })
}
