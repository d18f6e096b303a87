use super::*;
use crate::config::LibrarySettings;
use crate::error::Error;
use std::fs;
use tempfile::tempdir;

fn library_in(dir: &std::path::Path) -> PlaylistLibrary {
    let settings = LibrarySettings {
        root: dir.to_path_buf(),
        ..LibrarySettings::default()
    };
    PlaylistLibrary::new(&settings).unwrap()
}

#[test]
fn create_then_list_contains_name() {
    let dir = tempdir().unwrap();
    let lib = library_in(dir.path());

    assert_eq!(lib.create("My Mix").unwrap(), "My Mix");
    assert_eq!(lib.list().unwrap(), vec!["My Mix".to_string()]);
    assert!(dir.path().join("playlists").join("My Mix").is_dir());
}

#[test]
fn create_stores_sanitized_name() {
    let dir = tempdir().unwrap();
    let lib = library_in(dir.path());

    assert_eq!(lib.create("rock/roll...").unwrap(), "rock_roll");
    assert!(lib.playlist_dir("rock_roll").is_dir());
}

#[test]
fn create_rejects_empty_after_sanitizing() {
    let dir = tempdir().unwrap();
    let lib = library_in(dir.path());

    assert!(matches!(lib.create(" .. "), Err(Error::InvalidName(_))));
}

#[test]
fn create_rejects_duplicates() {
    let dir = tempdir().unwrap();
    let lib = library_in(dir.path());

    lib.create("Chill").unwrap();
    assert!(matches!(lib.create("Chill"), Err(Error::AlreadyExists(n)) if n == "Chill"));
    // Sanitizes to the same folder name.
    assert!(matches!(lib.create("Chill."), Err(Error::AlreadyExists(_))));
}

#[test]
fn list_is_case_insensitive_and_skips_files() {
    let dir = tempdir().unwrap();
    let lib = library_in(dir.path());

    lib.create("beta").unwrap();
    lib.create("Alpha").unwrap();
    lib.create("gamma").unwrap();
    fs::write(lib.playlists_root().join("stray.mp3"), b"x").unwrap();

    assert_eq!(lib.list().unwrap(), vec!["Alpha", "beta", "gamma"]);
}

#[test]
fn list_without_playlists_folder_is_empty() {
    let dir = tempdir().unwrap();
    let lib = library_in(dir.path());
    assert!(lib.list().unwrap().is_empty());
}

#[test]
fn entries_lists_files_sorted() {
    let dir = tempdir().unwrap();
    let lib = library_in(dir.path());
    lib.create("Mix").unwrap();
    let pl = lib.playlist_dir("Mix");
    fs::write(pl.join("b.mp3"), b"x").unwrap();
    fs::write(pl.join("A.m4a"), b"x").unwrap();

    assert_eq!(lib.entries("Mix").unwrap(), vec!["A.m4a", "b.mp3"]);
    assert!(matches!(lib.entries("Nope"), Err(Error::DirectoryNotFound(_))));
}

#[test]
fn entry_paths_cannot_escape_the_playlist() {
    let dir = tempdir().unwrap();
    let lib = library_in(dir.path());

    let paths = lib
        .entry_paths("Mix", &["../../etc/passwd".to_string(), "a.mp3".to_string()])
        .unwrap();
    assert_eq!(
        paths,
        vec![lib.playlist_dir("Mix").join("passwd"), lib.playlist_dir("Mix").join("a.mp3")]
    );
}

#[test]
fn playlist_names_are_reduced_before_touching_entries() {
    let dir = tempdir().unwrap();
    let lib = library_in(dir.path());
    lib.create("Mix").unwrap();
    fs::write(dir.path().join("loose.mp3"), b"x").unwrap();

    let files = vec!["loose.mp3".to_string()];
    for name in ["..", ".", ""] {
        assert!(matches!(lib.entry_paths(name, &files), Err(Error::InvalidName(_))));
        assert!(matches!(lib.entries(name), Err(Error::InvalidName(_))));
    }
    assert_eq!(
        lib.entry_paths("a/../Mix", &files).unwrap(),
        vec![lib.playlist_dir("Mix").join("loose.mp3")]
    );
    assert!(lib.entries("../Mix").unwrap().is_empty());
    assert!(dir.path().join("loose.mp3").exists());
}

#[test]
fn remove_paths_reports_only_the_targets_that_failed() {
    let dir = tempdir().unwrap();
    let lib = library_in(dir.path());
    lib.create("Mix").unwrap();
    let pl = lib.playlist_dir("Mix");
    fs::write(pl.join("good.mp3"), b"x").unwrap();
    fs::write(pl.join("blocker.mp3"), b"x").unwrap();

    let targets = vec![pl.join("blocker.mp3").join("child.mp3"), pl.join("good.mp3")];
    match remove_paths(&targets) {
        Err(Error::Deletion { failures }) => {
            assert_eq!(failures.len(), 1);
            assert!(failures[0].starts_with("child.mp3: "), "{failures:?}");
        }
        other => panic!("expected a deletion failure, got {other:?}"),
    }
    assert!(!pl.join("good.mp3").exists());
    assert!(pl.join("blocker.mp3").exists());
}

#[test]
fn remove_paths_deletes_dirs_recursively_and_skips_missing() {
    let dir = tempdir().unwrap();
    let lib = library_in(dir.path());
    lib.create("Gone").unwrap();
    fs::write(lib.playlist_dir("Gone").join("song.mp3"), b"x").unwrap();

    let targets = lib.playlist_dirs(&["Gone".to_string(), "Never".to_string()]);
    assert_eq!(remove_paths(&targets).unwrap(), 1);
    assert!(!lib.playlist_dir("Gone").exists());
    assert!(lib.list().unwrap().is_empty());
}

#[test]
fn playlist_dirs_never_escape_the_playlists_folder() {
    let dir = tempdir().unwrap();
    let lib = library_in(dir.path());
    let targets = lib.playlist_dirs(&["..".to_string(), String::new(), "a/../Mix".to_string()]);
    assert_eq!(targets, vec![lib.playlist_dir("Mix")]);
}
