use colonist_core::LogConfig;
use colonist_ui::logging_setup;
use std::fs;

#[test]
fn test_init_creates_dated_log_file_once() {
    let dir = tempfile::tempdir().unwrap();
    let log_dir = dir.path().join("logs");
    fs::create_dir_all(&log_dir).unwrap();
    for day in 1..=4 {
        fs::write(log_dir.join(format!("colonist.2020-01-0{day}.log")), "old").unwrap();
    }
    let config = LogConfig {
        console_output: false,
        file_output: true,
        log_dir,
        max_log_files: 2,
        ..LogConfig::default()
    };

    let guard = logging_setup::init(&config).unwrap();
    assert!(guard.is_some());
    assert!(config.current_log_path().exists());

    // Two earlier files survive the startup cleanup, plus today's.
    let logs = fs::read_dir(&config.log_dir).unwrap().count();
    assert!(logs <= 3, "{logs} log files kept");
    assert!(!config.log_dir.join("colonist.2020-01-01.log").exists());
    assert!(!config.log_dir.join("colonist.2020-01-02.log").exists());

    // The global subscriber can only be installed once per process.
    assert!(logging_setup::init(&config).is_err());
    drop(guard);
}
