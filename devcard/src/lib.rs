//! devcard library
//!
//! Pupil development cards: scores are read from age-group workbooks
//! ([`extract`]), stored with the pupil record
//! ([`devcard_common::db::PupilStore`]) and turned into the speech therapy
//! section of a Word report ([`report`]). [`access`] gates startup and [`ui`]
//! drives the interactive flows.

pub mod access;
pub mod extract;
pub mod report;
pub mod ui;

pub use access::AccessGate;
pub use extract::{Extraction, LayoutKind, ScoreExtractor};
pub use report::{fill_report, FilledReport, RecommendationBook, ReportFiller};
pub use ui::{AppState, Console, Services, View};
