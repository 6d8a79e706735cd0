//! Loading selection tables from files on disk.

use icon2fontello::selection::load_selection_file;
use std::fs;
use tempfile::tempdir;

#[test]
fn test_load_text_selection() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("selection.txt");
    fs::write(&path, "home\nstar favorite\n\n").unwrap();

    let table = load_selection_file(&path).expect("text selection should load");
    assert_eq!(table.len(), 2);
    assert_eq!(table.desired_name("home"), Some("home"));
    assert_eq!(table.desired_name("star"), Some("favorite"));
}

#[test]
fn test_load_json_selection_with_comments() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("selection.json");
    fs::write(
        &path,
        r#"[
            // plain identifiers keep their name
            "home",
            ["star", "favorite"], /* renamed */
            ["trash", false]
        ]"#,
    )
    .unwrap();

    let table = load_selection_file(&path).expect("json selection should load");
    assert_eq!(table.desired_name("home"), Some("home"));
    assert_eq!(table.desired_name("star"), Some("favorite"));
    assert_eq!(table.desired_name("trash"), None);
}

#[test]
fn test_unsupported_or_broken_selection_is_absent() {
    let dir = tempdir().unwrap();

    let yaml = dir.path().join("selection.yaml");
    fs::write(&yaml, "home: home\n").unwrap();
    assert!(load_selection_file(&yaml).is_none());

    let broken = dir.path().join("selection.json");
    fs::write(&broken, "{ \"home\": ").unwrap();
    assert!(load_selection_file(&broken).is_none());

    assert!(load_selection_file(dir.path().join("missing.txt")).is_none());
}

#[test]
fn test_explicit_loader_ignores_extension() {
    use icon2fontello::selection::{load_selection_with, TextSelectionLoader};

    let dir = tempdir().unwrap();
    let path = dir.path().join("icons.selection");
    fs::write(&path, "home house\n").unwrap();

    assert!(load_selection_file(&path).is_none());
    let table = load_selection_with(&path, &TextSelectionLoader).unwrap();
    assert_eq!(table.desired_name("home"), Some("house"));
}
