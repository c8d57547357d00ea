use std::{fs, thread::sleep, time::Duration};

use serial_test::serial;
use tempfile::tempdir;

#[test]
#[serial]
fn writes_log_file_and_ignores_later_init() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("memely.log");

    memely::logging::init(true, Some(path.clone()));
    tracing::info!("first line");

    sleep(Duration::from_millis(100));

    assert!(path.exists(), "log file was not created");
    let contents = fs::read_to_string(&path).unwrap();
    assert!(contents.contains("first line"));

    let other = dir.path().join("other.log");
    memely::logging::init(false, Some(other.clone()));
    tracing::info!("second line");

    sleep(Duration::from_millis(100));

    assert!(!other.exists(), "second init must not install a new sink");
    let contents = fs::read_to_string(&path).unwrap();
    assert!(contents.contains("second line"));
}
