// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use sel_engine::WatchdogEnabledSource;
use tempfile::TempDir;

#[test]
fn missing_file_gives_defaults() {
    let dir = TempDir::new().unwrap();
    let config = Config::from_file(&dir.path().join("absent.toml")).unwrap();
    assert_eq!(config, Config::default());
    assert_eq!(config.sink, SinkConfig::Journal { reload_unit: None });
}

#[test]
fn parses_full_config() {
    let config: Config = toml::from_str(
        r#"
        log_dir = "/tmp/sel"
        log_prefix = "sel"
        max_file_bytes = 65536
        max_files = 2

        [sink]
        type = "logging_service"
        url = "http://127.0.0.1:8080/logging"

        [monitors]
        pulse = false
        watchdog_enabled_source = "property"
        "#,
    )
    .unwrap();

    assert_eq!(config.log_dir, PathBuf::from("/tmp/sel"));
    assert_eq!(config.max_files, 2);
    assert_eq!(
        config.sink,
        SinkConfig::LoggingService {
            url: "http://127.0.0.1:8080/logging".to_string()
        }
    );
    assert!(!config.monitors.pulse);
    assert!(config.monitors.threshold);
    assert_eq!(
        config.monitors.watchdog_enabled_source,
        WatchdogEnabledSource::Property
    );

    let store = config.store_config();
    assert_eq!(store.prefix, "sel");
    assert_eq!(store.max_file_bytes, 65536);
}

#[test]
fn journal_sink_with_reload_unit() {
    let config: Config = toml::from_str(
        "[sink]\ntype = \"journal\"\nreload_unit = \"rsyslog.service\"\n",
    )
    .unwrap();
    assert_eq!(
        config.sink,
        SinkConfig::Journal {
            reload_unit: Some("rsyslog.service".to_string())
        }
    );
}

#[test]
fn unknown_field_is_rejected() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("seld.toml");
    std::fs::write(&path, "log_directory = \"/tmp\"\n").unwrap();
    assert!(matches!(
        Config::from_file(&path),
        Err(ConfigError::Parse { .. })
    ));
}

#[test]
fn state_dir_relocates_everything() {
    let mut config = Config::default();
    config.apply_overrides(Some(PathBuf::from("/tmp/state")), None);

    assert_eq!(config.log_dir, PathBuf::from("/tmp/state/log"));
    assert_eq!(config.erase_marker, PathBuf::from("/tmp/state/sel_erase_time"));
    assert_eq!(config.daemon_log, PathBuf::from("/tmp/state/seld.log"));
    assert_eq!(config.socket_path, PathBuf::from("/tmp/state/seld.sock"));
    assert_eq!(config.lock_path(), PathBuf::from("/tmp/state/seld.pid"));
}

#[test]
fn socket_override_wins_over_state_dir() {
    let mut config = Config::default();
    config.apply_overrides(
        Some(PathBuf::from("/tmp/state")),
        Some(PathBuf::from("/tmp/s.sock")),
    );
    assert_eq!(config.socket_path, PathBuf::from("/tmp/s.sock"));
    assert_eq!(config.log_dir, PathBuf::from("/tmp/state/log"));
}
