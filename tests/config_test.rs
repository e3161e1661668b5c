//! 設定ファイルテスト

use service_colors::config::Config;
use service_colors::error::CliError;
use service_colors_common::{Category, MatchStrategy, PatternEntry};
use tempfile::tempdir;

/// ファイルがなければ既定値
#[test]
fn test_load_missing_file() {
    let dir = tempdir().expect("Failed to create temp dir");
    let path = dir.path().join("config.json");

    let config = Config::load(Some(path.as_path())).expect("読み込み失敗");
    assert_eq!(config.colors.debounce_ms, 100);
    assert_eq!(config.path, path);
}

/// 保存と再読み込み
#[test]
fn test_save_and_load() {
    let dir = tempdir().expect("Failed to create temp dir");
    let path = dir.path().join("nested").join("config.json");

    let mut config = Config::load(Some(path.as_path())).expect("読み込み失敗");
    config.colors.match_strategy = MatchStrategy::Longest;
    config.colors.patterns.push(PatternEntry {
        pattern: "veneer".to_string(),
        category: Category::Whitening,
    });
    config.save().expect("保存失敗");

    let loaded = Config::load(Some(path.as_path())).expect("再読み込み失敗");
    assert_eq!(loaded.colors, config.colors);
    assert_eq!(loaded.colors.table().classify(Some("Porcelain veneer")), Category::Whitening);
}

/// 不正なJSON
#[test]
fn test_load_invalid_json() {
    let dir = tempdir().expect("Failed to create temp dir");
    let path = dir.path().join("config.json");
    std::fs::write(&path, "{ not json").unwrap();

    let result = Config::load(Some(path.as_path()));
    assert!(matches!(result, Err(CliError::Common(_))));
}
