//! Subcommands executed against packages on disk.

use clap::Parser;
use nestjar_cli::{Cli, execute};
use nestjar_core::{FAILURE_STATUS, LoaderConfig, ProtocolRegistry, SystemProperties};
use nestjar_runtime::{Launcher, builtin};
use std::io::{Cursor, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tempfile::TempDir;

fn write_package(path: &Path, entries: &[(&str, &[u8])]) {
    let mut zip = zip::ZipWriter::new(Cursor::new(Vec::new()));
    let options = zip::write::SimpleFileOptions::default();
    for (name, data) in entries {
        zip.start_file(*name, options).unwrap();
        zip.write_all(data).unwrap();
    }
    std::fs::write(path, zip.finish().unwrap().into_inner()).unwrap();
}

fn launcher() -> Launcher {
    Launcher::new(LoaderConfig::default())
        .with_registry(Arc::new(ProtocolRegistry::new()))
        .with_environment(Arc::new(SystemProperties::new()))
}

fn package(dir: &TempDir, descriptor: &str) -> PathBuf {
    let path = dir.path().join("app.jar");
    write_package(
        &path,
        &[
            ("nestjar.boot", descriptor.as_bytes()),
            ("conf/app.txt", b"mode=test"),
        ],
    );
    path
}

fn execute_args(args: &[&str]) -> anyhow::Result<i32> {
    let cli = Cli::try_parse_from(args).unwrap();
    execute(&launcher(), cli.command)
}

#[test]
fn test_run_builtin_entry_point() {
    let dir = TempDir::new().unwrap();
    let path = package(&dir, builtin::NOOP);
    let path = path.to_str().unwrap();

    let status = execute_args(&["nestjar", "run", path, "--", "extra"]).unwrap();
    assert_eq!(status, 0);
}

#[test]
fn test_run_unknown_entry_point_fails() {
    let dir = TempDir::new().unwrap();
    let path = package(&dir, "com.example.Nope");
    let path = path.to_str().unwrap();

    let status = execute_args(&["nestjar", "run", path]).unwrap();
    assert_eq!(status, FAILURE_STATUS);
}

#[test]
fn test_inspection_commands() {
    let dir = TempDir::new().unwrap();
    let path = package(&dir, "com.example.Main\nmode=dev");
    let path = path.to_str().unwrap();

    assert_eq!(execute_args(&["nestjar", "classpath", path]).unwrap(), 0);
    assert_eq!(execute_args(&["nestjar", "describe", path]).unwrap(), 0);
    assert_eq!(
        execute_args(&["nestjar", "cat", path, "conf/app.txt", "--locate"]).unwrap(),
        0
    );
}

#[test]
fn test_cat_missing_resource_is_an_error() {
    let dir = TempDir::new().unwrap();
    let path = package(&dir, "com.example.Main");
    let path = path.to_str().unwrap();

    assert!(execute_args(&["nestjar", "cat", path, "missing.txt"]).is_err());
}
