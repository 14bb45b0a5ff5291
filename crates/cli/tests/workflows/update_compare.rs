//! Full update -> edit -> compare cycles through the binary

use crate::common::TestTree;
use crate::patchdir;
use anyhow::Result;
use std::fs;

#[test]
fn test_scenario_readme_and_icon() -> Result<()> {
    let tree = TestTree::new();
    tree.write("docs/readme.txt", b"read me", 1_700_000_000);
    tree.write("img/logo.png", b"logo", 1_700_000_100);

    let result = patchdir!(tree.root(), "-u", "input").assert_success()?;
    assert!(result.contains_stdout("Recorded 2 files"));
    assert!(tree.root().join("storage.xml").is_file());

    tree.touch("docs/readme.txt", 1_700_000_900);
    tree.write("img/icon.png", b"icon", 1_700_000_950);

    let result = patchdir!(tree.root(), "-c", "input").assert_success()?;
    assert!(result.contains_stdout("docs/readme.txt"));
    assert!(result.contains_stdout("img/icon.png"));
    assert!(!result.contains_stdout("logo.png"));
    assert!(result.contains_stdout("1 new, 1 modified"));

    assert_eq!(tree.files_in("target"), vec!["docs/readme.txt", "img/icon.png"]);
    assert_eq!(fs::read(tree.root().join("target/img/icon.png"))?, b"icon");
    Ok(())
}

#[test]
fn test_unchanged_tree_produces_empty_patch() -> Result<()> {
    let tree = TestTree::new();
    tree.write("a.txt", b"a", 1_000);
    tree.write("b/c.txt", b"c", 1_000);

    patchdir!(tree.root(), "--update", "input").assert_success()?;
    let result = patchdir!(tree.root(), "--compare", "input").assert_success()?;

    assert!(result.contains_stdout("No changes"));
    assert!(tree.root().join("target").is_dir());
    assert!(tree.files_in("target").is_empty());
    Ok(())
}

#[test]
fn test_deleted_file_is_not_in_patch() -> Result<()> {
    let tree = TestTree::new();
    tree.write("keep.txt", b"k", 1_000);
    tree.write("drop.txt", b"d", 1_000);

    patchdir!(tree.root(), "-u", "input").assert_success()?;
    tree.remove("drop.txt");
    let result = patchdir!(tree.root(), "-c", "input").assert_success()?;

    assert!(!result.contains_stdout("drop.txt"));
    assert!(tree.files_in("target").is_empty());
    Ok(())
}

#[test]
fn test_custom_storage_and_out_dir() -> Result<()> {
    let tree = TestTree::new();
    tree.write("data/level1.bin", b"one", 1_000);

    patchdir!(tree.root(), "-u", "-s", "snaps/game.xml", "input").assert_success()?;
    assert!(tree.root().join("snaps/game.xml").is_file());

    tree.write("data/level2.bin", b"two", 2_000);
    patchdir!(tree.root(), "-c", "-s", "snaps/game.xml", "-t", "patch-v2", "input")
        .assert_success()?;

    assert_eq!(tree.files_in("patch-v2"), vec!["data/level2.bin"]);
    assert!(!tree.root().join("target").exists());
    Ok(())
}

#[test]
fn test_output_dir_is_reset_each_run() -> Result<()> {
    let tree = TestTree::new();
    tree.write("a.txt", b"a", 1_000);
    tree.write("b.txt", b"b", 1_000);
    patchdir!(tree.root(), "-u", "input").assert_success()?;

    tree.touch("a.txt", 2_000);
    patchdir!(tree.root(), "-c", "input").assert_success()?;
    assert_eq!(tree.files_in("target"), vec!["a.txt"]);

    // Snapshot is unchanged, so a.txt still differs; b.txt joins it
    tree.touch("b.txt", 3_000);
    fs::write(tree.root().join("target/stale.txt"), b"stale")?;
    patchdir!(tree.root(), "-c", "input").assert_success()?;
    assert_eq!(tree.files_in("target"), vec!["a.txt", "b.txt"]);

    // After a fresh snapshot nothing differs and the patch empties
    patchdir!(tree.root(), "-u", "input").assert_success()?;
    patchdir!(tree.root(), "-c", "input").assert_success()?;
    assert!(tree.files_in("target").is_empty());
    Ok(())
}

#[test]
fn test_settings_file_and_exclude() -> Result<()> {
    let tree = TestTree::new();
    tree.write("game.pak", b"pak", 1_000);
    tree.write("logs/session.log", b"log", 1_000);
    fs::write(
        tree.root().join("patchdir.toml"),
        "storage = \"state/storage.xml\"\nout_dir = \"release\"\nexclude = [\"logs/\"]\n",
    )?;

    patchdir!(tree.root(), "-u", "--config", "patchdir.toml", "input").assert_success()?;
    let stored = fs::read_to_string(tree.root().join("state/storage.xml"))?;
    assert!(stored.contains("game.pak"));
    assert!(!stored.contains("session.log"));

    tree.write("logs/session.log", b"more log", 2_000);
    tree.write("game.pak", b"new pak", 2_000);
    tree.write("notes.tmp", b"tmp", 2_000);
    patchdir!(tree.root(), "-c", "--config", "patchdir.toml", "-x", "*.tmp", "input")
        .assert_success()?;

    assert_eq!(tree.files_in("release"), vec!["game.pak"]);
    Ok(())
}

#[test]
fn test_quiet_suppresses_listing() -> Result<()> {
    let tree = TestTree::new();
    tree.write("a.txt", b"a", 1_000);
    patchdir!(tree.root(), "-u", "-q", "input").assert_success()?;

    tree.touch("a.txt", 2_000);
    let result = patchdir!(tree.root(), "-c", "-q", "input").assert_success()?;

    assert!(result.stdout.trim().is_empty());
    assert_eq!(tree.files_in("target"), vec!["a.txt"]);
    Ok(())
}
