use rankflow_common::error::RankFlowError;
use rankflow_runtime::io::storage::{part_file_name, LocalFileSystem, Storage};
use std::io::Read;

#[test]
fn test_write_location_publishes_parts() {
    let dir = tempfile::tempdir().unwrap();
    let target = dir.path().join("ranks0");
    let fs = LocalFileSystem;

    fs.write_location(&target, vec![b"a\n".to_vec(), Vec::new(), b"c\n".to_vec()])
        .unwrap();

    assert!(target.is_dir());
    assert!(!dir.path().join("_temporary_ranks0").exists());
    let files = fs.list_files(&target).unwrap();
    let names: Vec<String> = files
        .iter()
        .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
        .collect();
    assert_eq!(names, vec![part_file_name(0), part_file_name(1), part_file_name(2)]);

    let mut text = String::new();
    fs.open(&files[2]).unwrap().read_to_string(&mut text).unwrap();
    assert_eq!(text, "c\n");
}

#[test]
fn test_write_location_refuses_existing_target() {
    let dir = tempfile::tempdir().unwrap();
    let target = dir.path().join("ranking");
    std::fs::create_dir(&target).unwrap();

    let err = LocalFileSystem
        .write_location(&target, vec![b"x".to_vec()])
        .unwrap_err();
    assert!(matches!(err, RankFlowError::Configuration(_)));
}

#[test]
fn test_list_files_skips_bookkeeping() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("part-r-00001"), "b").unwrap();
    std::fs::write(dir.path().join("part-r-00000"), "a").unwrap();
    std::fs::write(dir.path().join("_SUCCESS"), "").unwrap();
    std::fs::write(dir.path().join(".part-r-00000.crc"), "").unwrap();

    let files = LocalFileSystem.list_files(dir.path()).unwrap();
    assert_eq!(files.len(), 2);
    assert!(files[0].ends_with("part-r-00000"));
}

#[test]
fn test_missing_location_is_missing_output() {
    let dir = tempfile::tempdir().unwrap();
    let gone = dir.path().join("ranks7");

    assert!(matches!(
        LocalFileSystem.list_files(&gone),
        Err(RankFlowError::MissingOutput(_))
    ));
    assert!(matches!(
        LocalFileSystem.open(&gone),
        Err(RankFlowError::MissingOutput(_))
    ));

    std::fs::create_dir(&gone).unwrap();
    assert!(matches!(
        LocalFileSystem.list_files(&gone),
        Err(RankFlowError::MissingOutput(_))
    ));
}

#[test]
fn test_delete_recursive() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("out");
    LocalFileSystem
        .write_location(&out.join("ranks0"), vec![b"0\t0.5,1\n".to_vec()])
        .unwrap();

    LocalFileSystem.delete_recursive(&out).unwrap();
    assert!(!LocalFileSystem.exists(&out));
    LocalFileSystem.delete_recursive(&out).unwrap();
}
