//! End-to-end tests for the install command

use filetime::FileTime;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};
use tempfile::TempDir;
use winstall::commands::install::{exit_status, run_with_reporter, EXIT_FAILURE, EXIT_USAGE};
use winstall::types::BackupMode;
use winstall::ui::Reporter;
use winstall::{Config, InstallError};

fn create_test_file(path: &Path, content: &[u8]) {
    fs::write(path, content).expect("Failed to write test file");
}

fn quiet() -> Reporter {
    Reporter::with_writers(false, Box::new(io::sink()), Box::new(io::sink()))
}

fn config_with(operands: Vec<PathBuf>) -> Config {
    Config {
        operands,
        ..Config::default()
    }
}

#[test]
fn test_create_leading_directories_for_destination() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let root = temp_dir.path();
    fs::create_dir_all(root.join("a/b/c")).expect("create source dirs");
    create_test_file(&root.join("a/b/c/file.txt"), b"payload");

    let config = Config {
        create_leading: true,
        ..config_with(vec![
            root.join("a/b/c/file.txt"),
            root.join("dest/x/y/out.txt"),
        ])
    };
    let result = run_with_reporter(&config, &quiet());

    assert_eq!(exit_status(&result), 0);
    assert_eq!(
        fs::read(root.join("dest/x/y/out.txt")).expect("read dest"),
        b"payload"
    );
}

#[test]
fn test_directory_mode_with_existing_prefix() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let root = temp_dir.path();
    fs::create_dir(root.join("newdir")).expect("create newdir");

    let config = Config {
        directory_args: true,
        ..config_with(vec![root.join("newdir/sub1/sub2"), root.join("other")])
    };
    let stats = run_with_reporter(&config, &quiet()).expect("run install");

    assert!(stats.is_success());
    assert!(root.join("newdir/sub1/sub2").is_dir());
    assert!(root.join("other").is_dir());
}

#[test]
fn test_directory_mode_through_file_fails() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let root = temp_dir.path();
    create_test_file(&root.join("blocker"), b"");

    let config = Config {
        directory_args: true,
        ..config_with(vec![root.join("blocker/sub"), root.join("fine")])
    };
    let result = run_with_reporter(&config, &quiet());

    assert_eq!(exit_status(&result), EXIT_FAILURE);
    assert!(root.join("fine").is_dir());
}

#[test]
fn test_multiple_sources_into_directory() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let root = temp_dir.path();
    fs::create_dir(root.join("D")).expect("create D");
    create_test_file(&root.join("a.txt"), b"a");
    create_test_file(&root.join("b.txt"), b"bb");

    let config = config_with(vec![root.join("a.txt"), root.join("b.txt"), root.join("D")]);
    let stats = run_with_reporter(&config, &quiet()).expect("run install");

    assert_eq!(stats.completed_steps, 2);
    assert_eq!(stats.bytes_copied, 3);
    assert_eq!(fs::read(root.join("D/a.txt")).expect("read a"), b"a");
    assert_eq!(fs::read(root.join("D/b.txt")).expect("read b"), b"bb");
}

#[test]
fn test_multiple_sources_missing_directory() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let root = temp_dir.path();
    create_test_file(&root.join("a.txt"), b"a");
    create_test_file(&root.join("b.txt"), b"b");

    let config = config_with(vec![root.join("a.txt"), root.join("b.txt"), root.join("D")]);
    let result = run_with_reporter(&config, &quiet());

    assert!(matches!(result, Err(InstallError::NoSuchDirectory { .. })));
    assert_eq!(exit_status(&result), EXIT_USAGE);
    assert!(!root.join("D").exists());
}

#[test]
fn test_same_file_leaves_destination_untouched() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let root = temp_dir.path();
    let old = root.join("old.txt");
    create_test_file(&old, b"keep me");

    let config = Config {
        backup_mode: BackupMode::Simple,
        backup_suffix: ".bak".to_string(),
        ..config_with(vec![old.clone(), old.clone()])
    };
    let result = run_with_reporter(&config, &quiet());

    assert_eq!(exit_status(&result), EXIT_FAILURE);
    assert_eq!(fs::read(&old).expect("read old"), b"keep me");
    assert!(!root.join("old.txt.bak").exists());
}

#[test]
fn test_numbered_backups_across_runs() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let root = temp_dir.path();
    let report = root.join("report.txt");
    create_test_file(&report, b"v0");

    for version in [b"v1", b"v2"] {
        let src = root.join("incoming.txt");
        create_test_file(&src, version);
        let config = Config {
            backup_mode: BackupMode::Numbered,
            ..config_with(vec![src, report.clone()])
        };
        run_with_reporter(&config, &quiet()).expect("run install");
    }

    assert_eq!(fs::read(&report).expect("read report"), b"v2");
    assert_eq!(fs::read(root.join("report.txt.~1~")).expect("read ~1~"), b"v0");
    assert_eq!(fs::read(root.join("report.txt.~2~")).expect("read ~2~"), b"v1");
}

#[test]
fn test_preserve_timestamps() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let root = temp_dir.path();
    let src = root.join("src.txt");
    create_test_file(&src, b"stamp");
    let old = SystemTime::now() - Duration::from_secs(3 * 24 * 60 * 60);
    filetime::set_file_mtime(&src, FileTime::from_system_time(old)).expect("set mtime");
    let src_mtime = FileTime::from_last_modification_time(&fs::metadata(&src).expect("stat src"));

    let kept = root.join("kept.txt");
    let config = Config {
        preserve_timestamps: true,
        ..config_with(vec![src.clone(), kept.clone()])
    };
    run_with_reporter(&config, &quiet()).expect("run install with -p");

    let fresh = root.join("fresh.txt");
    let copy_started = FileTime::now();
    run_with_reporter(&config_with(vec![src, fresh.clone()]), &quiet())
        .expect("run install without -p");

    let kept_mtime =
        FileTime::from_last_modification_time(&fs::metadata(&kept).expect("stat kept"));
    let fresh_mtime =
        FileTime::from_last_modification_time(&fs::metadata(&fresh).expect("stat fresh"));

    assert_eq!(kept_mtime, src_mtime);
    // Filesystem clocks may be coarser than the system clock; compare whole seconds
    assert!(
        fresh_mtime.unix_seconds() >= copy_started.unix_seconds(),
        "mtime {:?} predates copy start {:?}",
        fresh_mtime,
        copy_started
    );
}

#[test]
fn test_target_directory_created_with_create_leading() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let root = temp_dir.path();
    create_test_file(&root.join("tool.exe"), b"MZ");

    let config = Config {
        create_leading: true,
        target_directory: Some(root.join("opt/bin")),
        ..config_with(vec![root.join("tool.exe")])
    };
    let stats = run_with_reporter(&config, &quiet()).expect("run install");

    assert!(stats.is_success());
    assert_eq!(fs::read(root.join("opt/bin/tool.exe")).expect("read"), b"MZ");
}
