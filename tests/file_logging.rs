use crm_dashboard::logging::{init_logging, logging_status};
use std::fs;

#[test]
fn file_logging_writes_rotating_log_in_directory() {
    let dir = tempfile::tempdir().unwrap();
    let log_dir = dir.path().join("logs");

    init_logging("info", Some(&log_dir)).unwrap();
    init_logging("info", Some(&log_dir)).expect("same config should be idempotent");
    log::warn!("disk check marker");

    let (level, active_dir) = logging_status().unwrap();
    assert_eq!(level, "info");
    assert_eq!(active_dir.as_deref(), Some(log_dir.as_path()));

    let logs: Vec<_> = fs::read_dir(&log_dir)
        .unwrap()
        .map(|entry| entry.unwrap().path())
        .filter(|path| {
            path.file_name()
                .and_then(|name| name.to_str())
                .is_some_and(|name| name.starts_with("crm-dashboard") && name.ends_with(".log"))
        })
        .collect();
    assert_eq!(logs.len(), 1, "expected one log file in {log_dir:?}");
    let text = fs::read_to_string(&logs[0]).unwrap();
    assert!(text.contains("disk check marker"));

    let err = init_logging("info", None).unwrap_err();
    assert!(err.contains("refusing"));
}
