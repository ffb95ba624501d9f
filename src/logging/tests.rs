// coho-rs: Multi-Repository Release Coordinator
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

use super::{FileFormat, LogConfig, LogLevel};

#[test]
fn test_log_level_bounds() {
    assert!(LogLevel::new(6).is_ok());
    let err = LogLevel::new(7).unwrap_err();
    assert!(err.to_string().contains("0-6"), "{err}");
    assert_eq!(LogLevel::from_u8(9), None);
    assert_eq!(LogLevel::from_u8(4), Some(LogLevel::DEBUG));
}

#[test]
fn test_log_level_filters() {
    let filters: Vec<_> = (0..=6)
        .filter_map(LogLevel::from_u8)
        .map(LogLevel::to_filter_string)
        .collect();
    insta::assert_debug_snapshot!(filters, @r#"
    [
        "off",
        "error",
        "warn",
        "warn,coho_rs=info,coho=info",
        "warn,coho_rs=debug,coho=debug",
        "warn,coho_rs=trace,coho=trace",
        "trace",
    ]
    "#);
}

#[test]
fn test_log_level_serde() {
    let level: LogLevel = serde_json::from_str("5").unwrap();
    assert_eq!(level, LogLevel::TRACE);
    assert!(serde_json::from_str::<LogLevel>("12").is_err());
    assert_eq!(serde_json::to_string(&LogLevel::WARN).unwrap(), "2");
}

#[test]
fn test_log_config_defaults() {
    let config = LogConfig::default();
    assert_eq!(config.console_level(), LogLevel::INFO);
    assert_eq!(config.file_level(), LogLevel::TRACE);
    assert_eq!(config.log_file(), None);
    assert_eq!(config.file_format(), FileFormat::Text);

    let config = LogConfig::builder()
        .with_log_file("coho.log".to_string())
        .with_file_format(FileFormat::Json)
        .build();
    assert_eq!(config.log_file(), Some("coho.log"));
    assert_eq!(config.file_format(), FileFormat::Json);
}

#[test]
fn test_file_format_from_config() {
    let config = crate::config::Config::parse("[global]\nlog_format = \"json\"\n").unwrap();
    assert_eq!(config.global.log_format, FileFormat::Json);
    assert_eq!(config.global.log_format.to_string(), "json");
    assert!(crate::config::Config::parse("[global]\nlog_format = \"xml\"\n").is_err());
}

#[test]
fn test_json_file_layer_writes_objects() {
    use tracing_subscriber::layer::SubscriberExt;

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("logs").join("coho.json");
    let config = LogConfig::builder()
        .with_file_level(LogLevel::INFO)
        .with_file_format(FileFormat::Json)
        .build();

    let (layer, guard) =
        super::file_layer::<tracing_subscriber::Registry>(&path, &config).unwrap();
    let subscriber = tracing_subscriber::registry().with(layer);
    tracing::subscriber::with_default(subscriber, || {
        tracing::info!(repo = "cordova-ios", "updated");
    });
    drop(guard);

    let contents = std::fs::read_to_string(&path).unwrap();
    let line = contents.lines().next().expect("one event");
    let event: serde_json::Value = serde_json::from_str(line).unwrap();
    assert_eq!(event["level"], "INFO");
    assert_eq!(event["fields"]["message"], "updated");
    assert_eq!(event["fields"]["repo"], "cordova-ios");
}
