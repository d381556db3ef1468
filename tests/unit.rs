use reccat::classify::{SAMPLE_LEN, classify};
use reccat::fs::OsFileSystem;
use reccat::output::file_header;
use reccat::{BinaryDetection, Classification, ExclusionRules, ReccatBuilder, SkipReason, reccat};
use std::fs;
use std::path::Path;
use tempfile::tempdir;
#[test]
fn test_null_byte_file_is_binary() {
    let dir = tempdir().unwrap();
    let file_path = dir.path().join("data.bin");
    let mut content = b"looks like text ".repeat(8);
    content.push(0);
    fs::write(&file_path, &content).unwrap();
    assert_eq!(
        classify(&OsFileSystem, &file_path, BinaryDetection::Heuristic),
        Classification::Binary
    );
}
#[test]
fn test_printable_file_is_text() {
    let dir = tempdir().unwrap();
    let file_path = dir.path().join("notes.txt");
    fs::write(&file_path, "line one\n\tline two\r\n".repeat(100)).unwrap();
    assert_eq!(
        classify(&OsFileSystem, &file_path, BinaryDetection::Heuristic),
        Classification::Text
    );
}
#[test]
fn test_only_head_is_sampled() {
    let dir = tempdir().unwrap();
    let file_path = dir.path().join("tail.dat");
    let mut content = vec![b'a'; SAMPLE_LEN];
    content.extend_from_slice(&[0, 0, 0]);
    fs::write(&file_path, &content).unwrap();
    assert_eq!(
        classify(&OsFileSystem, &file_path, BinaryDetection::Heuristic),
        Classification::Text
    );
}
#[test]
fn test_missing_file_is_binary() {
    let dir = tempdir().unwrap();
    assert_eq!(
        classify(
            &OsFileSystem,
            &dir.path().join("gone.txt"),
            BinaryDetection::Heuristic
        ),
        Classification::Binary
    );
}
#[test]
fn test_yarn_lock_always_excluded() {
    let dir = tempdir().unwrap();
    let src = dir.path().join("src");
    fs::create_dir(&src).unwrap();
    fs::write(src.join("yarn.lock"), "# plain text lockfile\n").unwrap();
    let output = dir.path().join("out.txt");
    let summary = reccat(&ReccatBuilder::new(&src, &output).build()).unwrap();
    assert!(summary.files_emitted.is_empty());
    assert_eq!(fs::read(&output).unwrap(), b"");
    assert_eq!(summary.skipped_for(SkipReason::ExcludedFile).count(), 1);
}
#[test]
fn test_extra_extension_exclusion() {
    let dir = tempdir().unwrap();
    let src = dir.path().join("src");
    fs::create_dir(&src).unwrap();
    fs::write(src.join("a.md"), "doc").unwrap();
    fs::write(src.join("b.rs"), "code").unwrap();
    let output = dir.path().join("out.txt");
    let options = ReccatBuilder::new(&src, &output)
        .rules(ExclusionRules::none())
        .exclude_extension("md")
        .build();
    reccat(&options).unwrap();
    let mut expected = file_header(&src.join("b.rs"));
    expected.extend_from_slice(b"code");
    assert_eq!(fs::read(&output).unwrap(), expected);
}
#[test]
fn test_header_format() {
    assert_eq!(
        file_header(Path::new("dir/x.c")),
        b"\n===== FILE: dir/x.c =====\n"
    );
}
