use super::*;
use std::path::PathBuf;
use tempfile::tempdir;

fn e(label: &str) -> PickerEntry {
    PickerEntry {
        path: PathBuf::from("/music").join(label),
        label: label.into(),
    }
}

fn picker(labels: &[&str]) -> Picker {
    Picker::new(PathBuf::from("/music"), labels.iter().map(|l| e(l)).collect())
}

#[test]
fn pick_returns_locator_of_selected_entry() {
    let mut p = picker(&["alpha.mp3", "beta.mp3"]);
    p.next();
    match p.pick() {
        PickOutcome::Picked(loc) => assert_eq!(loc.path(), PathBuf::from("/music/beta.mp3")),
        other => panic!("unexpected outcome {other:?}"),
    }
}

#[test]
fn pick_on_empty_list_cancels() {
    let p = picker(&[]);
    assert_eq!(p.pick(), PickOutcome::Cancelled);
}

#[test]
fn query_filters_fuzzily_and_moves_selection() {
    let mut p = picker(&[
        "Metallica - Blackened.flac",
        "Black Sabbath - Paranoid.mp3",
        "Slayer - Angel of Death.mp3",
    ]);
    p.selected = 2;
    for c in "bsp".chars() {
        p.push_char(c);
    }
    assert_eq!(p.visible(), vec![1]);
    assert_eq!(p.selected, 1);
    assert_eq!(p.match_positions(1), Some(vec![0, 6, 16]));

    p.push_char('z');
    assert!(p.visible().is_empty());
    assert_eq!(p.pick(), PickOutcome::Cancelled);

    p.pop_char();
    assert_eq!(p.visible(), vec![1]);
}

#[test]
fn next_and_prev_wrap_within_visible_entries() {
    let mut p = picker(&["a.mp3", "b.mp3", "c.mp3"]);
    p.prev();
    assert_eq!(p.selected, 2);
    p.next();
    assert_eq!(p.selected, 0);

    p.push_char('b');
    p.next();
    assert_eq!(p.selected, 1);
    p.prev();
    assert_eq!(p.selected, 1);
}

#[test]
fn check_read_access_reports_missing_dir() {
    let dir = tempdir().unwrap();
    assert!(check_read_access(dir.path()).is_ok());

    let missing = dir.path().join("missing");
    assert!(matches!(
        check_read_access(&missing),
        Err(AccessError::NotFound(_))
    ));
}

#[test]
fn check_read_access_on_a_file_is_an_io_error() {
    let dir = tempdir().unwrap();
    let file = dir.path().join("song.mp3");
    std::fs::write(&file, b"x").unwrap();
    assert!(matches!(
        check_read_access(&file),
        Err(AccessError::Io { .. })
    ));
}

#[test]
fn permission_errors_map_to_permission_denied() {
    let dir = PathBuf::from("/root/private");
    let err = access::access_error(&dir, std::io::Error::from(std::io::ErrorKind::PermissionDenied));
    assert!(matches!(&err, AccessError::PermissionDenied(p) if p == &dir));
    assert_eq!(err.to_string(), "Permission denied");

    let err = access::access_error(&dir, std::io::Error::from(std::io::ErrorKind::NotFound));
    assert!(matches!(err, AccessError::NotFound(_)));
}

#[test]
fn match_positions_index_the_original_label() {
    let mut p = picker(&["İstanbul.mp3"]);
    p.push_char('S');
    p.push_char('t');
    assert_eq!(p.visible(), vec![0]);
    assert_eq!(p.match_positions(0), Some(vec![1, 2]));

    p.clear_query();
    p.push_char('İ');
    assert_eq!(p.match_positions(0), Some(vec![0]));
}
