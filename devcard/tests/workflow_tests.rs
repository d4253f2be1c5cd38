//! End-to-end flows: store + extractor + filler, and scripted console sessions

mod common;

use common::{cycling_scores, read_tables, write_template, write_workbook};
use devcard::extract::{LayoutKind, ScoreExtractor};
use devcard::report::{fill_report, ReportFiller};
use devcard::ui::{self, extraction_flow, Console, Services, View};
use devcard_common::config::{AppPaths, TomlConfig};
use devcard_common::db::{PersonalInfo, PupilStore};
use devcard_common::{ScoreMap, Slot};
use std::io::Cursor;
use std::path::Path;
use tempfile::TempDir;

async fn services(dir: &TempDir) -> Services {
    let paths = AppPaths::new(dir.path().to_path_buf(), &TomlConfig::default());
    Services::open(&paths).await.unwrap()
}

fn scripted(lines: &[&str]) -> Console<Cursor<Vec<u8>>, Vec<u8>> {
    let mut input = lines.join("\n");
    input.push('\n');
    Console::new(Cursor::new(input.into_bytes()), Vec::new())
}

fn transcript(console: Console<Cursor<Vec<u8>>, Vec<u8>>) -> String {
    String::from_utf8(console.into_output()).unwrap()
}

fn path_str(path: &Path) -> &str {
    path.to_str().unwrap()
}

#[tokio::test]
async fn test_add_extract_fill_scenario() {
    let dir = TempDir::new().unwrap();
    let store = PupilStore::new(dir.path().join("pupil_db.db"));
    store.create_table().await.unwrap();

    let info = PersonalInfo::parse("Ivanova", "Maria", "Petrovna", "15-05-2019").unwrap();
    let id = store.add_pupil(&info).await.unwrap();

    let expected = cycling_scores(LayoutKind::Younger);
    let workbook = write_workbook(dir.path(), LayoutKind::Younger, &expected);
    let extraction = ScoreExtractor::new().read_scores(&workbook).unwrap();
    assert_eq!(extraction.layout, LayoutKind::Younger);
    store.update_scores(id, &extraction.scores).await.unwrap();

    let pupils = store.get_all_pupils().await.unwrap();
    let pupil = pupils.iter().find(|p| p.id == id).unwrap();
    assert_eq!(pupil.info, info);
    assert_eq!(pupil.scores.len(), 11);
    assert_eq!(pupil.scores, expected);

    let template = dir.path().join("template.docx");
    let output = dir.path().join("Ivanova.docx");
    write_template(&template, 4);
    let filler = ReportFiller::builtin().unwrap();
    let saved = fill_report(&filler, &template, &pupil.scores, extraction.layout, Some(&output)).unwrap();
    assert!(saved);

    // One title + content row pair per younger-group section
    let sections = filler.book().layout(LayoutKind::Younger).unwrap().sections.len();
    let table = &read_tables(&output)[1];
    assert_eq!(table.len(), 2 + 2 * sections);
    assert!(table[3..].iter().step_by(2).all(|row| !row[0].is_empty() && !row[1].is_empty()));
}

#[tokio::test]
async fn test_menu_add_pupil_runs_extraction_and_report() {
    let dir = TempDir::new().unwrap();
    let services = services(&dir).await;
    let scores = cycling_scores(LayoutKind::Older);
    let workbook = write_workbook(dir.path(), LayoutKind::Older, &scores);
    let template = dir.path().join("template.docx");
    let output = dir.path().join("out.docx");
    write_template(&template, 4);

    let mut console = scripted(&[
        "2",
        "Ivanova",
        "Maria",
        "Petrovna",
        "15-05-2019",
        path_str(&workbook),
        path_str(&template),
        path_str(&output),
        "0",
    ]);
    let state = ui::run(&services, &mut console).await;
    assert_eq!(state.view, View::Exit);

    let pupils = services.store.get_all_pupils().await.unwrap();
    assert_eq!(pupils.len(), 1);
    assert_eq!(pupils[0].info.full_name(), "Ivanova Maria Petrovna");
    assert_eq!(pupils[0].scores, scores);
    assert!(output.exists());

    let out = transcript(console);
    assert!(out.contains("[OK] Pupil added"));
    assert!(out.contains("[OK] 10 score(s) saved (older group)"));
    assert!(out.contains("[OK] Report saved"));
}

#[tokio::test]
async fn test_menu_add_pupil_rejects_bad_date() {
    let dir = TempDir::new().unwrap();
    let services = services(&dir).await;

    let mut console = scripted(&["2", "Ivanova", "Maria", "Petrovna", "2019-05-15"]);
    ui::run(&services, &mut console).await;

    assert!(services.store.get_all_pupils().await.unwrap().is_empty());
    assert!(transcript(console).contains("[ERROR] Invalid date format '2019-05-15'"));
}

#[tokio::test]
async fn test_menu_add_pupil_rejects_empty_field() {
    let dir = TempDir::new().unwrap();
    let services = services(&dir).await;

    let mut console = scripted(&["2", "Ivanova", "", "Petrovna", "15-05-2019"]);
    ui::run(&services, &mut console).await;

    assert!(services.store.get_all_pupils().await.unwrap().is_empty());
    assert!(transcript(console).contains("[ERROR] All fields must be filled in"));
}

#[tokio::test]
async fn test_list_actions_need_a_selection() {
    let dir = TempDir::new().unwrap();
    let services = services(&dir).await;

    let mut console = scripted(&["1", "e", "c", "d", "b", "0"]);
    ui::run(&services, &mut console).await;

    let out = transcript(console);
    assert_eq!(out.matches("[ERROR] Select a pupil first").count(), 3);
}

#[tokio::test]
async fn test_edit_info_prefills_current_values() {
    let dir = TempDir::new().unwrap();
    let services = services(&dir).await;
    let info = PersonalInfo::parse("Ivanova", "Maria", "Petrovna", "15-05-2019").unwrap();
    let id = services.store.add_pupil(&info).await.unwrap();
    let select = format!("s {}", id);

    // Keep every field except the name
    let mut console = scripted(&["1", &select, "e", "", "Anna", "", "", "b", "0"]);
    ui::run(&services, &mut console).await;

    let pupil = services.store.get_pupil(id).await.unwrap().unwrap();
    assert_eq!(pupil.info.full_name(), "Ivanova Anna Petrovna");
    assert_eq!(pupil.info.birth_date, info.birth_date);
    assert!(transcript(console).contains("[OK] Personal info updated"));
}

#[tokio::test]
async fn test_delete_selected_pupil() {
    let dir = TempDir::new().unwrap();
    let services = services(&dir).await;
    let info = PersonalInfo::parse("Petrov", "Ivan", "Sergeevich", "01-02-2018").unwrap();
    let id = services.store.add_pupil(&info).await.unwrap();
    let select = format!("s {}", id);

    let mut console = scripted(&["1", &select, "d", "b", "0"]);
    ui::run(&services, &mut console).await;

    assert!(services.store.get_all_pupils().await.unwrap().is_empty());
    assert!(transcript(console).contains("[OK] Pupil deleted"));
}

#[tokio::test]
async fn test_selecting_unknown_id_is_reported() {
    let dir = TempDir::new().unwrap();
    let services = services(&dir).await;

    let mut console = scripted(&["1", "s 42", "b", "0"]);
    ui::run(&services, &mut console).await;

    assert!(transcript(console).contains("[ERROR] No pupil with id 42"));
}

#[tokio::test]
async fn test_failed_extraction_keeps_stored_scores() {
    let dir = TempDir::new().unwrap();
    let services = services(&dir).await;
    let info = PersonalInfo::parse("Ivanova", "Maria", "Petrovna", "15-05-2019").unwrap();
    let id = services.store.add_pupil(&info).await.unwrap();
    let stored: ScoreMap = [(Slot::Df1, 2), (Slot::Df2, 3)].into_iter().collect();
    services.store.update_scores(id, &stored).await.unwrap();

    let bogus = dir.path().join("scores.xlsx");
    let mut console = scripted(&[path_str(&bogus)]);
    let saved = extraction_flow(id, &services, &mut console).await;

    assert!(!saved);
    let pupil = services.store.get_pupil(id).await.unwrap().unwrap();
    assert_eq!(pupil.scores, stored);
    assert!(transcript(console).contains("[ERROR] Unsupported spreadsheet: scores.xlsx"));
}

#[tokio::test]
async fn test_edit_scores_replaces_all_slots() {
    let dir = TempDir::new().unwrap();
    let services = services(&dir).await;
    let info = PersonalInfo::parse("Ivanova", "Maria", "Petrovna", "15-05-2019").unwrap();
    let id = services.store.add_pupil(&info).await.unwrap();
    let stored: ScoreMap = [(Slot::Df11, 4)].into_iter().collect();
    services.store.update_scores(id, &stored).await.unwrap();

    let scores = cycling_scores(LayoutKind::Older);
    let workbook = write_workbook(dir.path(), LayoutKind::Older, &scores);
    let select = format!("s {}", id);

    // Load scores, skip the report
    let mut console = scripted(&["1", &select, "c", path_str(&workbook), "", "0"]);
    ui::run(&services, &mut console).await;

    let pupil = services.store.get_pupil(id).await.unwrap().unwrap();
    assert_eq!(pupil.scores, scores);
    // The older layout has no df11, so the earlier value is cleared
    assert_eq!(pupil.scores.get(Slot::Df11), None);
}

#[tokio::test]
async fn test_list_shows_every_pupil() {
    let dir = TempDir::new().unwrap();
    let services = services(&dir).await;
    let info = PersonalInfo::parse("Ivanova", "Maria", "Petrovna", "15-05-2019").unwrap();
    services.store.add_pupil(&info).await.unwrap();

    let mut console = scripted(&[]);
    ui::list_pupils(&services, &mut console, false).await;

    let out = transcript(console);
    assert!(out.contains("Ivanova"));
    assert!(out.contains("15-05-2019"));
    assert!(!out.contains("[ERROR]"));
}

#[tokio::test]
async fn test_failed_list_shows_empty_list_and_one_notice() {
    let dir = TempDir::new().unwrap();
    // No pupils table in this file, so every read fails
    let services = Services {
        store: PupilStore::new(dir.path().join("empty.db")),
        extractor: ScoreExtractor::new(),
        filler: ReportFiller::builtin().unwrap(),
    };

    let mut console = scripted(&[]);
    ui::list_pupils(&services, &mut console, false).await;

    let out = transcript(console);
    assert_eq!(out.matches("[ERROR]").count(), 1);
    assert!(out.contains("(no pupils)"));

    let mut console = scripted(&[]);
    ui::list_pupils(&services, &mut console, true).await;

    let out = transcript(console);
    assert_eq!(out.matches("[ERROR]").count(), 1);
    assert!(out.contains("[]"));
}
