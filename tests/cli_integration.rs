#![allow(deprecated)]

use assert_cmd::Command;
use clipscan::test_utils::clip_archive;
use filetime::FileTime;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use std::time::{Duration, SystemTime};
use tempfile::TempDir;

fn write_clip(dir: &Path, name: &str, bytes: &[u8], age_secs: u64) {
    let path = dir.join(name);
    fs::write(&path, bytes).unwrap();
    let modified = SystemTime::now() - Duration::from_secs(age_secs);
    filetime::set_file_mtime(&path, FileTime::from_system_time(modified)).unwrap();
}

/// A clipscan command isolated from the user's config.
fn clipscan_cmd(config_dir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("clipscan").unwrap();
    cmd.env("CLIPSCAN_CONFIG_DIR", config_dir)
        .env_remove("RUST_LOG");
    cmd
}

fn stdout_of(cmd: &mut Command) -> String {
    let output = cmd.output().unwrap();
    assert!(output.status.success());
    String::from_utf8(output.stdout).unwrap()
}

#[test]
fn test_lists_valid_and_corrupt_files() {
    let temp = TempDir::new().unwrap();
    let clips = temp.path().join("Clipy");
    fs::create_dir(&clips).unwrap();
    write_clip(&clips, "good.data", &clip_archive("hello"), 10);
    write_clip(&clips, "broken.data", b"", 100);

    clipscan_cmd(temp.path())
        .arg(&clips)
        .assert()
        .success()
        .stdout(predicate::str::contains(format!(
            "Reading clipboard history from: {}",
            clips.display()
        )))
        .stdout(predicate::str::contains(
            "Found 2 clipboard history files.\n\n",
        ))
        .stdout(predicate::str::contains("=".repeat(80)))
        .stdout(predicate::str::contains("[1] good.data"))
        .stdout(predicate::str::contains("    Length: 5 characters"))
        .stdout(predicate::str::contains("    Content: hello"))
        .stdout(predicate::str::contains("[2] broken.data"))
        .stdout(predicate::str::contains(
            "    Content: (Could not extract text)",
        ))
        .stdout(predicate::str::contains(format!(
            "Error reading {}",
            clips.join("broken.data").display()
        )))
        .stdout(
            predicate::str::is_match(r"    Modified: \d{4}-\d{2}-\d{2} \d{2}:\d{2}:\d{2}\n")
                .unwrap(),
        );
}

#[test]
fn test_error_line_precedes_its_entry() {
    let temp = TempDir::new().unwrap();
    write_clip(temp.path(), "fine.data", &clip_archive("fine"), 10);
    write_clip(temp.path(), "junk.data", b"definitely not a plist", 20);

    let stdout = stdout_of(clipscan_cmd(temp.path()).arg(temp.path()));
    let first_block = stdout.find("[1] fine.data").unwrap();
    let error = stdout.find("Error reading").unwrap();
    let second_block = stdout.find("[2] junk.data").unwrap();
    assert!(first_block < error && error < second_block);
    assert_eq!(stdout.matches("Length:").count(), 1);
}

#[cfg(unix)]
#[test]
fn test_dangling_symlink_is_reported() {
    let temp = TempDir::new().unwrap();
    let clips = temp.path().join("clips");
    fs::create_dir(&clips).unwrap();
    write_clip(&clips, "ok.data", &clip_archive("fine"), 10);
    std::os::unix::fs::symlink(clips.join("missing.data"), clips.join("dangling.data")).unwrap();

    let stdout = stdout_of(clipscan_cmd(temp.path()).arg(&clips));
    assert!(stdout.contains("Found 2 clipboard history files."));
    assert!(stdout.contains(&format!(
        "Error reading {}",
        clips.join("dangling.data").display()
    )));
    let block = stdout.find("[2] dangling.data").unwrap();
    assert!(stdout[block..].contains("    Content: (Could not extract text)"));
}

#[test]
fn test_sorted_newest_first() {
    let temp = TempDir::new().unwrap();
    write_clip(temp.path(), "b.data", &clip_archive("second"), 60);
    write_clip(temp.path(), "c.data", &clip_archive("third"), 600);
    write_clip(temp.path(), "a.data", &clip_archive("first"), 5);

    let stdout = stdout_of(clipscan_cmd(temp.path()).arg(temp.path()));
    let first = stdout.find("[1] a.data").unwrap();
    let second = stdout.find("[2] b.data").unwrap();
    let third = stdout.find("[3] c.data").unwrap();
    assert!(first < second && second < third);
    assert_eq!(stdout.matches(&"-".repeat(80)).count(), 3);
}

#[test]
fn test_long_content_is_truncated() {
    let temp = TempDir::new().unwrap();
    let text = "x".repeat(250);
    write_clip(temp.path(), "long.data", &clip_archive(&text), 0);

    clipscan_cmd(temp.path())
        .arg(temp.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("    Length: 250 characters"))
        .stdout(predicate::str::contains(format!(
            "    Content: {}...\n",
            "x".repeat(200)
        )))
        .stdout(predicate::str::contains("x".repeat(201)).not());
}

#[test]
fn test_preview_chars_flag() {
    let temp = TempDir::new().unwrap();
    write_clip(temp.path(), "clip.data", &clip_archive("abcdefghij"), 0);

    clipscan_cmd(temp.path())
        .arg("--preview-chars")
        .arg("4")
        .arg(temp.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("    Content: abcd...\n"))
        .stdout(predicate::str::contains("    Length: 10 characters"));
}

#[test]
fn test_missing_directory_prints_usage() {
    let temp = TempDir::new().unwrap();
    let missing = temp.path().join("does-not-exist");

    clipscan_cmd(temp.path())
        .arg(&missing)
        .assert()
        .success()
        .stdout(predicate::str::contains(format!(
            "Error: Directory not found: {}",
            missing.display()
        )))
        .stdout(predicate::str::contains("Usage: clipscan [clipy_directory]"))
        .stdout(predicate::str::contains("Default directory: "))
        .stdout(predicate::str::contains("Reading clipboard history").not());
}

#[test]
fn test_file_is_not_a_directory() {
    let temp = TempDir::new().unwrap();
    let file = temp.path().join("single.data");
    fs::write(&file, clip_archive("x")).unwrap();

    clipscan_cmd(temp.path())
        .arg(&file)
        .assert()
        .success()
        .stdout(predicate::str::contains(format!(
            "Error: {} is not a directory",
            file.display()
        )));
}

#[test]
fn test_no_data_files() {
    let temp = TempDir::new().unwrap();
    let clips = temp.path().join("clips");
    fs::create_dir(&clips).unwrap();
    fs::write(clips.join("readme.txt"), "nothing here").unwrap();

    clipscan_cmd(temp.path())
        .arg(&clips)
        .assert()
        .success()
        .stdout(predicate::str::contains(format!(
            "No .data files found in {}",
            clips.display()
        )));
}

#[test]
fn test_directory_from_config() {
    let temp = TempDir::new().unwrap();
    let config_dir = temp.path().join("config");
    let clips = temp.path().join("from-config");
    fs::create_dir_all(&config_dir).unwrap();
    fs::create_dir_all(&clips).unwrap();
    write_clip(&clips, "clip.data", &clip_archive("configured"), 0);

    let config = serde_json::json!({ "directory": clips, "preview_chars": 5 });
    fs::write(config_dir.join("config.json"), config.to_string()).unwrap();

    clipscan_cmd(&config_dir)
        .assert()
        .success()
        .stdout(predicate::str::contains("    Content: confi...\n"));
}

#[test]
fn test_invalid_config_fails() {
    let temp = TempDir::new().unwrap();
    fs::write(temp.path().join("config.json"), "{ not json").unwrap();

    clipscan_cmd(temp.path())
        .arg(temp.path())
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::starts_with("Error:"));
}
