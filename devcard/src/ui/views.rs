//! View render functions and the score extraction flow

use super::{AppState, Console, Services, View};
use devcard_common::db::{PersonalInfo, Pupil};
use devcard_common::time::format_user_date;
use devcard_common::{Error, Slot};
use std::io::{BufRead, Write};
use std::path::Path;
use tracing::{info, warn};

const SELECT_FIRST: &str = "Select a pupil first";

pub(super) fn main_menu<R: BufRead, W: Write>(state: AppState, console: &mut Console<R, W>) -> AppState {
    console.print("");
    console.print("== Pupil development cards ==");
    console.print("1) View pupils");
    console.print("2) Add pupil");
    console.print("0) Exit");

    match console.ask("Choice").as_deref() {
        Some("1") => state.go(View::PupilList),
        Some("2") => state.go(View::AddPupil),
        Some("0") | None => state.go(View::Exit),
        Some(other) => {
            console.error(format!("Unknown choice '{}'", other));
            state
        }
    }
}

/// Pupil table with the selected row marked by `*`
pub fn render_pupil_table(pupils: &[Pupil], selection: Option<i64>) -> String {
    let mut header = vec![
        String::new(),
        "ID".to_string(),
        "Surname".to_string(),
        "Name".to_string(),
        "Patronymic".to_string(),
        "Birth date".to_string(),
    ];
    header.extend(Slot::ALL.iter().map(Slot::to_string));

    let mut rows = vec![header];
    for pupil in pupils {
        let mut row = vec![
            (if selection == Some(pupil.id) { "*" } else { "" }).to_string(),
            pupil.id.to_string(),
            pupil.info.surname.clone(),
            pupil.info.name.clone(),
            pupil.info.patronymic.clone(),
            format_user_date(pupil.info.birth_date),
        ];
        row.extend(
            Slot::ALL
                .iter()
                .map(|slot| pupil.scores.get(*slot).map(|v| v.to_string()).unwrap_or_default()),
        );
        rows.push(row);
    }

    let columns = rows[0].len();
    let widths: Vec<usize> = (0..columns)
        .map(|c| rows.iter().map(|r| r[c].chars().count()).max().unwrap_or(0))
        .collect();

    rows.iter()
        .map(|row| {
            row.iter()
                .zip(&widths)
                .map(|(cell, width)| format!("{:<width$}", cell, width = *width))
                .collect::<Vec<_>>()
                .join(" | ")
                .trim_end()
                .to_string()
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// All pupils, or an empty list plus one notice when the read fails
async fn load_pupils<R: BufRead, W: Write>(services: &Services, console: &mut Console<R, W>) -> Vec<Pupil> {
    match services.store.get_all_pupils().await {
        Ok(pupils) => pupils,
        Err(e) => {
            console.error(e);
            Vec::new()
        }
    }
}

/// One-shot listing as a table or as JSON
pub async fn list_pupils<R: BufRead, W: Write>(services: &Services, console: &mut Console<R, W>, json: bool) {
    let pupils = load_pupils(services, console).await;
    if json {
        match serde_json::to_string_pretty(&pupils) {
            Ok(text) => console.print(text),
            Err(e) => console.error(e),
        }
    } else if pupils.is_empty() {
        console.print("(no pupils)");
    } else {
        console.print(render_pupil_table(&pupils, None));
    }
}

pub(super) async fn pupil_list<R: BufRead, W: Write>(
    state: AppState,
    services: &Services,
    console: &mut Console<R, W>,
) -> AppState {
    let pupils = load_pupils(services, console).await;

    // Drop a selection whose row has gone
    let state = state.select(state.selection.filter(|id| pupils.iter().any(|p| p.id == *id)));

    console.print("");
    if pupils.is_empty() {
        console.print("(no pupils)");
    } else {
        console.print(render_pupil_table(&pupils, state.selection));
    }

    let Some(command) = console.ask("s <id> select, e edit info, c edit scores, d delete, b back") else {
        return state.go(View::MainMenu);
    };
    let mut parts = command.split_whitespace();

    match (parts.next(), parts.next()) {
        (Some("s"), Some(id)) => match id.parse::<i64>() {
            Ok(id) if pupils.iter().any(|p| p.id == id) => state.select(Some(id)),
            _ => {
                console.error(format!("No pupil with id {}", id));
                state
            }
        },
        (Some("e"), None) => match state.selection {
            Some(_) => state.go(View::EditInfo),
            None => {
                console.error(SELECT_FIRST);
                state
            }
        },
        (Some("c"), None) => match state.selection {
            Some(id) => {
                extraction_flow(id, services, console).await;
                state.go(View::MainMenu)
            }
            None => {
                console.error(SELECT_FIRST);
                state
            }
        },
        (Some("d"), None) => match state.selection {
            Some(id) => match services.store.delete_pupil(id).await {
                Ok(()) => {
                    console.info("Pupil deleted");
                    state.select(None)
                }
                Err(e) => {
                    console.error(e);
                    state
                }
            },
            None => {
                console.error(SELECT_FIRST);
                state
            }
        },
        (Some("b"), None) | (None, _) => state.go(View::MainMenu),
        _ => {
            console.error(format!("Unknown command '{}'", command));
            state
        }
    }
}

/// Ask for the four identity fields; `None` when input ended
fn ask_personal_info<R: BufRead, W: Write>(
    console: &mut Console<R, W>,
    current: Option<&PersonalInfo>,
) -> Option<[String; 4]> {
    let birth_date = current.map(|c| format_user_date(c.birth_date));
    let defaults = [
        current.map(|c| c.surname.as_str()),
        current.map(|c| c.name.as_str()),
        current.map(|c| c.patronymic.as_str()),
        birth_date.as_deref(),
    ];
    let labels = ["Surname", "Name", "Patronymic", "Birth date (DD-MM-YYYY)"];

    let mut answers: [String; 4] = Default::default();
    for ((answer, label), default) in answers.iter_mut().zip(labels).zip(defaults) {
        *answer = match default {
            Some(default) => console.ask_default(label, default)?,
            None => console.ask(label)?,
        };
    }
    Some(answers)
}

pub(super) async fn add_pupil<R: BufRead, W: Write>(
    state: AppState,
    services: &Services,
    console: &mut Console<R, W>,
) -> AppState {
    console.print("");
    console.print("== New pupil ==");
    let Some([surname, name, patronymic, birth_date]) = ask_personal_info(console, None) else {
        return state.go(View::MainMenu);
    };

    let info = match PersonalInfo::parse(&surname, &name, &patronymic, &birth_date) {
        Ok(info) => info,
        Err(e) => {
            console.error(e);
            return state;
        }
    };

    match services.store.add_pupil(&info).await {
        Ok(id) => {
            console.info(format!("Pupil added (id {})", id));
            extraction_flow(id, services, console).await;
            state.select(Some(id)).go(View::MainMenu)
        }
        Err(e) => {
            console.error(e);
            state.go(View::MainMenu)
        }
    }
}

pub(super) async fn edit_info<R: BufRead, W: Write>(
    state: AppState,
    services: &Services,
    console: &mut Console<R, W>,
) -> AppState {
    let Some(id) = state.selection else {
        console.error(SELECT_FIRST);
        return state.go(View::PupilList);
    };

    let pupil = match services.store.get_pupil(id).await {
        Ok(Some(pupil)) => pupil,
        Ok(None) => {
            console.error(Error::NotFound(format!("pupil {}", id)));
            return state.select(None).go(View::PupilList);
        }
        Err(e) => {
            console.error(e);
            return state.go(View::PupilList);
        }
    };

    console.print("");
    console.print(format!("== Edit {} ==", pupil.info.full_name()));
    let Some([surname, name, patronymic, birth_date]) = ask_personal_info(console, Some(&pupil.info)) else {
        return state.go(View::PupilList);
    };

    let info = match PersonalInfo::parse(&surname, &name, &patronymic, &birth_date) {
        Ok(info) => info,
        Err(e) => {
            console.error(e);
            return state;
        }
    };

    match services.store.update_personal_info(id, &info).await {
        Ok(()) => console.info("Personal info updated"),
        Err(e) => console.error(e),
    }
    state.go(View::PupilList)
}

/// Read scores for pupil `id`, store them, then optionally fill a report
///
/// Returns whether a report was saved. An extraction failure leaves the
/// stored scores untouched.
pub async fn extraction_flow<R: BufRead, W: Write>(
    id: i64,
    services: &Services,
    console: &mut Console<R, W>,
) -> bool {
    let Some(workbook) = console.ask_path("Development card workbook (.xlsx), empty to skip") else {
        console.print("Scores not loaded");
        return false;
    };

    let extraction = match services.extractor.read_scores(Path::new(&workbook)) {
        Ok(extraction) => extraction,
        Err(e) => {
            console.error(e);
            return false;
        }
    };

    if let Err(e) = services.store.update_scores(id, &extraction.scores).await {
        console.error(e);
        return false;
    }
    console.info(format!(
        "{} score(s) saved ({} group)",
        extraction.scores.len(),
        extraction.layout
    ));

    let Some(template) = console.ask_path("Report template (.docx), empty to skip") else {
        return false;
    };

    let report = match services
        .filler
        .fill(Path::new(&template), &extraction.scores, extraction.layout)
    {
        Ok(report) => report,
        Err(e) => {
            console.error(e);
            return false;
        }
    };
    for failure in &report.failures {
        console.error(failure);
    }

    let Some(output) = console.ask_path("Save report as (.docx)") else {
        console.print("Report not saved");
        info!("Report for pupil {} discarded", id);
        return false;
    };

    match report.save(Path::new(&output)) {
        Ok(()) => {
            console.info(format!("Report saved to {}", output));
            true
        }
        Err(e) => {
            warn!("Report for pupil {} not saved: {}", id, e);
            console.error(e);
            false
        }
    }
}
