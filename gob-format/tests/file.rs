//! Tests for opening and saving GOB archives on disk.

use gob_format::{GobFile, OpenError, SIGNATURE};
use tempfile::TempDir;

/// Helper to create a temp dir and the path of an archive inside it
fn archive_path(name: &str) -> (TempDir, std::path::PathBuf) {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join(name);
    (temp_dir, path)
}

#[test]
fn test_save_and_open() {
    let (_temp_dir, path) = archive_path("level.gob");

    {
        let mut file = GobFile::create(&path);
        let archive = file.archive_mut();
        archive.import("LEVEL1.LEV", vec![1, 2, 3, 4]).unwrap();
        archive.import("INTRO.TXT", b"welcome".to_vec()).unwrap();
        let written = file.save().unwrap();
        assert_eq!(written, 12 + 2 * 21 + 4 + 7);
    }

    let bytes = std::fs::read(&path).unwrap();
    assert_eq!(&bytes[..4], SIGNATURE);

    let file = GobFile::open(&path).unwrap();
    let archive = file.archive();
    assert_eq!(archive.len(), 2);

    let level = archive.find("level1.lev").unwrap();
    assert_eq!(level.start, 8);
    assert_eq!(level.size(), 4);
    assert_eq!(archive.export("INTRO.TXT").unwrap(), b"welcome");
}

#[test]
fn test_save_empty_archive() {
    let (_temp_dir, path) = archive_path("empty.gob");

    GobFile::create(&path).save().unwrap();

    let bytes = std::fs::read(&path).unwrap();
    assert_eq!(bytes, b"GOB\n\x08\0\0\0\0\0\0\0");
    assert!(GobFile::open(&path).unwrap().archive().is_empty());
}

#[test]
fn test_resave_over_loaded_archive() {
    let (_temp_dir, path) = archive_path("resave.gob");

    let mut file = GobFile::create(&path);
    file.archive_mut().import("A.BIN", b"aaaa".to_vec()).unwrap();
    file.archive_mut().import("B.BIN", b"bb".to_vec()).unwrap();
    file.save().unwrap();
    let original = std::fs::read(&path).unwrap();

    // Entries now point into the buffer that was just written; saving again
    // over the same path must reproduce it exactly.
    let mut file = GobFile::open(&path).unwrap();
    file.save().unwrap();
    assert_eq!(std::fs::read(&path).unwrap(), original);

    file.archive_mut().remove("A.BIN").unwrap();
    file.archive_mut().import("C.BIN", b"c".to_vec()).unwrap();
    file.save().unwrap();

    let file = GobFile::open(&path).unwrap();
    let names: Vec<String> = file
        .archive()
        .iter()
        .map(|entry| entry.name.to_string())
        .collect();
    assert_eq!(names, ["B.BIN", "C.BIN"]);
    assert_eq!(file.archive().export("b.bin").unwrap(), b"bb");
    assert!(!path.with_file_name("resave.gob.tmp").exists());
}

#[test]
fn test_save_as_moves_path() {
    let (temp_dir, path) = archive_path("first.gob");
    let other = temp_dir.path().join("second.gob");

    let mut file = GobFile::create(&path);
    file.archive_mut().import("X.DAT", vec![0xff]).unwrap();
    file.save_as(&other).unwrap();

    assert_eq!(file.path(), other.as_path());
    assert!(!path.exists());
    assert_eq!(GobFile::open(&other).unwrap().archive().len(), 1);
}

#[test]
fn test_reload_discards_unsaved_changes() {
    let (_temp_dir, path) = archive_path("reload.gob");

    let mut file = GobFile::create(&path);
    file.archive_mut().import("KEEP.TXT", b"keep".to_vec()).unwrap();
    file.save().unwrap();

    file.archive_mut().import("DROP.TXT", b"drop".to_vec()).unwrap();
    assert_eq!(file.archive().len(), 2);

    file.reload().unwrap();
    assert_eq!(file.archive().len(), 1);
    assert!(file.archive().find("DROP.TXT").is_none());
}

#[test]
fn test_open_missing_file() {
    let (_temp_dir, path) = archive_path("missing.gob");
    assert!(matches!(
        GobFile::open(&path),
        Err(OpenError::ReadFailed(_, p)) if p == path
    ));
}

#[test]
fn test_open_corrupt_file() {
    let (_temp_dir, path) = archive_path("corrupt.gob");

    // Directory claims one entry reaching far past the end of the file.
    let mut bytes = b"GOB\n\x08\0\0\0".to_vec();
    bytes.extend_from_slice(&1u32.to_le_bytes());
    bytes.extend_from_slice(&8u32.to_le_bytes());
    bytes.extend_from_slice(&0x1000u32.to_le_bytes());
    bytes.extend_from_slice(b"BIG.BIN\0\0\0\0\0\0");
    std::fs::write(&path, &bytes).unwrap();

    match GobFile::open(&path) {
        Err(OpenError::InvalidArchive(err, _)) => {
            assert!(err.to_string().contains("BIG.BIN"), "{}", err)
        }
        other => panic!("unexpected {:?}", other),
    }
}
