//! Terminal presentation
//!
//! The controller keeps only the current view and the selected pupil id in an
//! [`AppState`] value. Each view renders from that state, runs one user
//! interaction against the stateless [`Services`] and returns the next state.
//! Every library error is shown once as a notice; no error ends the loop.

mod console;
mod views;

pub use console::Console;
pub use views::{extraction_flow, list_pupils, render_pupil_table};

use crate::extract::ScoreExtractor;
use crate::report::ReportFiller;
use devcard_common::config::AppPaths;
use devcard_common::db::PupilStore;
use devcard_common::Result;
use std::io::{BufRead, Write};
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    MainMenu,
    PupilList,
    AddPupil,
    EditInfo,
    Exit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AppState {
    pub view: View,
    /// Pupil id picked in the list view
    pub selection: Option<i64>,
}

impl AppState {
    pub fn start() -> Self {
        Self {
            view: View::MainMenu,
            selection: None,
        }
    }

    pub fn go(self, view: View) -> Self {
        Self { view, ..self }
    }

    pub fn select(self, id: Option<i64>) -> Self {
        Self {
            selection: id,
            ..self
        }
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::start()
    }
}

/// Core components used by the views
#[derive(Debug, Clone)]
pub struct Services {
    pub store: PupilStore,
    pub extractor: ScoreExtractor,
    pub filler: ReportFiller,
}

impl Services {
    /// Services over the files under `paths`; creates the pupils table
    pub async fn open(paths: &AppPaths) -> Result<Self> {
        let store = PupilStore::new(&paths.database);
        store.create_table().await?;

        Ok(Self {
            store,
            extractor: ScoreExtractor::new(),
            filler: ReportFiller::from_config(paths.recommendations.as_deref())?,
        })
    }
}

/// Run views until the user exits or input ends
pub async fn run<R: BufRead, W: Write>(services: &Services, console: &mut Console<R, W>) -> AppState {
    let mut state = AppState::start();
    loop {
        debug!("View {:?}, selection {:?}", state.view, state.selection);
        state = match state.view {
            View::MainMenu => views::main_menu(state, console),
            View::PupilList => views::pupil_list(state, services, console).await,
            View::AddPupil => views::add_pupil(state, services, console).await,
            View::EditInfo => views::edit_info(state, services, console).await,
            View::Exit => return state,
        };
    }
}
