//! Trial-period access gate
//!
//! A key file next to the database means the copy has not been activated yet:
//! the user must type the key stored in it. A correct key removes the file and
//! records today's date; from then on access is granted for 31 days counted
//! from that date. The key is plain text; this is a soft gate only.

use chrono::NaiveDate;
use devcard_common::config::AppPaths;
use devcard_common::time::{format_iso_date, parse_iso_date, today};
use devcard_common::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Length of the access window in days
pub const LICENSE_DAYS: i64 = 31;

/// On-disk form of the activation file: `{"date":"YYYY-MM-DD"}`
#[derive(Debug, Serialize, Deserialize)]
struct ActivationRecord {
    date: String,
}

#[derive(Debug, Clone)]
pub struct AccessGate {
    key_file: PathBuf,
    activation_file: PathBuf,
}

impl AccessGate {
    pub fn new(key_file: impl Into<PathBuf>, activation_file: impl Into<PathBuf>) -> Self {
        Self {
            key_file: key_file.into(),
            activation_file: activation_file.into(),
        }
    }

    pub fn from_paths(paths: &AppPaths) -> Self {
        Self::new(&paths.key_file, &paths.activation_file)
    }

    pub fn key_file(&self) -> &Path {
        &self.key_file
    }

    pub fn activation_file(&self) -> &Path {
        &self.activation_file
    }

    /// Whether a key still has to be entered
    pub fn needs_key(&self) -> bool {
        self.key_file.exists()
    }

    /// Check access against the local clock
    pub fn check_access<F>(&self, prompt: F) -> Result<()>
    where
        F: FnOnce() -> Option<String>,
    {
        self.check_access_on(today(), prompt)
    }

    /// Check access as of `today`
    ///
    /// `prompt` is only called when a key file is present; `None` means the
    /// user entered nothing. `Ok(())` grants access; a denial is
    /// `Err(Error::InvalidActivation)`.
    pub fn check_access_on<F>(&self, today: NaiveDate, prompt: F) -> Result<()>
    where
        F: FnOnce() -> Option<String>,
    {
        if self.needs_key() {
            self.activate(today, prompt)
        } else {
            self.check_period(today)
        }
    }

    fn activate<F>(&self, today: NaiveDate, prompt: F) -> Result<()>
    where
        F: FnOnce() -> Option<String>,
    {
        let stored = fs::read_to_string(&self.key_file)?;
        let entered = prompt()
            .map(|line| line.trim_end_matches(['\r', '\n']).to_string())
            .unwrap_or_default();

        if entered.is_empty() {
            return Err(Error::InvalidActivation("no key entered".to_string()));
        }
        if entered != stored.trim() {
            warn!("Rejected activation key");
            return Err(Error::InvalidActivation("invalid key".to_string()));
        }

        self.write_activation_date(today)?;
        fs::remove_file(&self.key_file)?;
        info!("Activated on {}", format_iso_date(today));
        Ok(())
    }

    fn check_period(&self, today: NaiveDate) -> Result<()> {
        let Some(activated) = self.activation_date() else {
            return Err(Error::InvalidActivation(
                "no activation date recorded, the license period has expired".to_string(),
            ));
        };

        let elapsed = (today - activated).num_days();
        debug!("Activated {} ({} day(s) ago)", activated, elapsed);
        if elapsed < LICENSE_DAYS {
            Ok(())
        } else {
            Err(Error::InvalidActivation(format!(
                "the license period has expired (activated {})",
                format_iso_date(activated)
            )))
        }
    }

    /// Recorded activation date; `None` when the file is missing or unparsable
    pub fn activation_date(&self) -> Option<NaiveDate> {
        let content = fs::read_to_string(&self.activation_file).ok()?;
        let record: ActivationRecord = match serde_json::from_str(&content) {
            Ok(record) => record,
            Err(e) => {
                warn!("Unreadable activation file {}: {}", self.activation_file.display(), e);
                return None;
            }
        };
        parse_iso_date(&record.date)
    }

    /// Write the activation file via a temp file and rename
    fn write_activation_date(&self, date: NaiveDate) -> Result<()> {
        if let Some(parent) = self.activation_file.parent() {
            fs::create_dir_all(parent)?;
        }

        let record = ActivationRecord {
            date: format_iso_date(date),
        };
        let json = serde_json::to_string(&record)
            .map_err(|e| Error::Config(format!("Encode activation date failed: {}", e)))?;

        let mut temp = self.activation_file.clone().into_os_string();
        temp.push(".tmp");
        let temp = PathBuf::from(temp);

        fs::write(&temp, json)?;
        fs::rename(&temp, &self.activation_file)?;
        Ok(())
    }
}
