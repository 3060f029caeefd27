// Integration tests for profile-driven commands
use reconciler::commands::{pending_command, run_command};
use reconciler::error::{ConfigError, ReconcileError};
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn write_profile(dir: &Path) -> std::path::PathBuf {
    let root = dir.display();
    let config = format!(
        r#"
[profiles.test]
reference_path = "{root}/reference.csv"
batch_root = "{root}/batches"
output_dir = "{root}/output"
tracker_path = "{root}/processed_files.log"
sort_batches = true
batch_extensions = ["csv"]

[profiles.test.columns]
subject = "EmployeeId"
indicator = "hsbc_indicator"
"#
    );
    let path = dir.join("reconcile.toml");
    fs::write(&path, config).unwrap();
    path
}

fn seed(dir: &Path) {
    fs::create_dir_all(dir.join("batches")).unwrap();
    fs::write(dir.join("reference.csv"), "global_id\n1001\n1023\n").unwrap();
    fs::write(dir.join("batches/jan.csv"), "EmployeeId\n100\n102\n").unwrap();
    fs::write(dir.join("batches/feb.csv"), "EmployeeId\n100\n").unwrap();
    fs::write(dir.join("batches/notes.txt"), "not a batch").unwrap();
}

#[tokio::test]
async fn test_run_command_uses_profile() {
    let dir = TempDir::new().unwrap();
    seed(dir.path());
    let config = write_profile(dir.path());

    let summary = run_command(&config, "test").await.unwrap();

    assert_eq!(summary.discovered, 2);
    assert_eq!(summary.written, 1);
    assert_eq!(summary.incomplete, 1);
    assert!(dir.path().join("output/jan.xlsx").exists());
    assert!(!dir.path().join("output/feb.xlsx").exists());

    let tracked = fs::read_to_string(dir.path().join("processed_files.log")).unwrap();
    assert_eq!(tracked.lines().count(), 2);
    assert!(!tracked.contains("notes.txt"));
}

#[tokio::test]
async fn test_run_command_reports_fatal_error() {
    let dir = TempDir::new().unwrap();
    seed(dir.path());
    fs::remove_file(dir.path().join("reference.csv")).unwrap();
    let config = write_profile(dir.path());

    let result = run_command(&config, "test").await;
    assert!(matches!(result, Err(ReconcileError::Reference { .. })));
    assert!(!dir.path().join("processed_files.log").exists());
}

#[tokio::test]
async fn test_unknown_profile() {
    let dir = TempDir::new().unwrap();
    let config = write_profile(dir.path());

    let result = run_command(&config, "prod").await;
    assert!(matches!(
        result,
        Err(ReconcileError::Config(ConfigError::UnknownProfile { .. }))
    ));
}

#[tokio::test]
async fn test_pending_command() {
    let dir = TempDir::new().unwrap();
    seed(dir.path());
    let config = write_profile(dir.path());

    let before = pending_command(&config, "test").await.unwrap();
    assert_eq!(
        before,
        vec![
            dir.path().join("batches/feb.csv"),
            dir.path().join("batches/jan.csv"),
        ]
    );

    run_command(&config, "test").await.unwrap();
    assert!(pending_command(&config, "test").await.unwrap().is_empty());
}
