//! Failure paths: arguments, snapshots, filesystem

use crate::common::TestTree;
use crate::patchdir;
use anyhow::Result;
use std::fs;

#[test]
fn test_missing_input_dir_argument() -> Result<()> {
    let tree = TestTree::new();

    let result = patchdir!(tree.root(), "-u").assert_failure()?;
    assert_eq!(result.exit_code, 2);
    assert!(result.contains_stderr("INPUT_DIR"));
    Ok(())
}

#[test]
fn test_mode_required() -> Result<()> {
    let tree = TestTree::new();

    let result = patchdir!(tree.root(), "input").assert_failure()?;
    assert_eq!(result.exit_code, 2);

    let result = patchdir!(tree.root(), "-u", "-c", "input").assert_failure()?;
    assert_eq!(result.exit_code, 2);
    Ok(())
}

#[test]
fn test_compare_without_snapshot() -> Result<()> {
    let tree = TestTree::new();
    tree.write("a.txt", b"a", 1_000);
    fs::create_dir_all(tree.root().join("target"))?;
    fs::write(tree.root().join("target/previous.txt"), b"keep")?;

    let result = patchdir!(tree.root(), "-c", "input").assert_failure()?;

    assert_eq!(result.exit_code, 1);
    assert!(result.contains_stderr("snapshot-read"));
    assert!(result.contains_stderr("storage.xml"));
    assert_eq!(tree.files_in("target"), vec!["previous.txt"]);
    Ok(())
}

#[test]
fn test_compare_with_malformed_snapshot() -> Result<()> {
    let tree = TestTree::new();
    tree.write("a.txt", b"a", 1_000);
    fs::write(tree.root().join("storage.xml"), "<files><file name=\"a.txt\" last_modif=\"x\"/></files>")?;

    let result = patchdir!(tree.root(), "-c", "input").assert_failure()?;

    assert_eq!(result.exit_code, 1);
    assert!(result.contains_stderr("last_modif"));
    assert!(!tree.root().join("target").exists());
    Ok(())
}

#[test]
fn test_update_nonexistent_input() -> Result<()> {
    let tree = TestTree::new();

    let result = patchdir!(tree.root(), "-u", "no-such-dir").assert_failure()?;

    assert_eq!(result.exit_code, 1);
    assert!(result.contains_stderr("filesystem"));
    assert!(result.contains_stderr("no-such-dir"));
    assert!(!tree.root().join("storage.xml").exists());
    Ok(())
}

#[test]
fn test_out_dir_overlapping_input_is_rejected() -> Result<()> {
    let tree = TestTree::new();
    tree.write("a.txt", b"a", 1_000);
    patchdir!(tree.root(), "-u", "input").assert_success()?;

    let result = patchdir!(tree.root(), "-c", "-t", "input", "input").assert_failure()?;

    assert_eq!(result.exit_code, 1);
    assert!(result.contains_stderr("argument"));
    assert!(tree.input().join("a.txt").exists());
    Ok(())
}

#[test]
fn test_invalid_settings_file() -> Result<()> {
    let tree = TestTree::new();
    fs::write(tree.root().join("bad.toml"), "unknown_key = 1\n")?;

    let result = patchdir!(tree.root(), "-u", "--config", "bad.toml", "input").assert_failure()?;

    assert_eq!(result.exit_code, 1);
    assert!(result.contains_stderr("bad.toml"));
    Ok(())
}

#[test]
fn test_storage_inside_out_dir_is_rejected() -> Result<()> {
    let tree = TestTree::new();
    tree.write("a.txt", b"a", 1_000);
    fs::create_dir_all(tree.root().join("patch"))?;
    patchdir!(tree.root(), "-u", "-s", "patch/storage.xml", "input").assert_success()?;

    let result = patchdir!(tree.root(), "-c", "-s", "patch/storage.xml", "-t", "patch", "input")
        .assert_failure()?;

    assert_eq!(result.exit_code, 1);
    assert!(result.contains_stderr("argument"));
    assert!(tree.root().join("patch/storage.xml").exists());
    Ok(())
}

#[test]
fn test_invalid_exclude_pattern() -> Result<()> {
    let tree = TestTree::new();
    tree.write("a.txt", b"a", 1_000);

    let result = patchdir!(tree.root(), "-u", "-x", "a{b", "input").assert_failure()?;

    assert_eq!(result.exit_code, 1);
    assert!(result.contains_stderr("argument"));
    assert!(!tree.root().join("storage.xml").exists());
    Ok(())
}

#[cfg(unix)]
#[test]
fn test_skipped_entry_reported_once() -> Result<()> {
    let tree = TestTree::new();
    tree.write("a.txt", b"a", 1_000);
    std::os::unix::fs::symlink(tree.input().join("gone.txt"), tree.input().join("dangling.txt"))?;

    let result = patchdir!(tree.root(), "-u", "input").assert_success()?;

    assert_eq!(result.stdout.matches("dangling.txt").count(), 1);
    assert!(result.contains_stdout("[skip]"));
    assert!(!result.contains_stderr("dangling.txt"));
    Ok(())
}
