//! 色分け設定
//!
//! ブラウザ側は `configureServiceColors` で、CLIは設定ファイルで渡される。

use crate::error::{Error, Result};
use crate::mapping::{MappingTable, MatchStrategy, PatternEntry};
use serde::{Deserialize, Serialize};

/// 再適用までの既定遅延（ミリ秒）
pub const DEFAULT_DEBOUNCE_MS: u32 = 100;

/// 色分け設定
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ColorConfig {
    /// DOM変更後、再適用までの遅延
    pub debounce_ms: u32,
    /// 選択ウィジェットのid
    pub select_ids: Vec<String>,
    /// 選択ウィジェットのname属性（変更ハンドラのみ対象）
    pub select_names: Vec<String>,
    /// 部分一致の優先規則
    pub match_strategy: MatchStrategy,
    /// 追加パターン（組み込みテーブルに追記）
    pub patterns: Vec<PatternEntry>,
}

impl Default for ColorConfig {
    fn default() -> Self {
        Self {
            debounce_ms: DEFAULT_DEBOUNCE_MS,
            select_ids: vec!["serviceTypeSelect".into(), "service".into()],
            select_names: vec!["service_id".into()],
            match_strategy: MatchStrategy::default(),
            patterns: Vec::new(),
        }
    }
}

impl ColorConfig {
    /// JSON文字列から読み込み
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// 空のパターン・idは受け付けない
    pub fn validate(&self) -> Result<()> {
        if let Some(entry) = self.patterns.iter().find(|e| e.pattern.trim().is_empty()) {
            return Err(Error::Config(format!("空のパターン（区分: {}）", entry.category)));
        }
        if self.select_ids.iter().chain(&self.select_names).any(|s| s.is_empty()) {
            return Err(Error::Config("選択ウィジェットのid/nameが空です".into()));
        }
        Ok(())
    }

    /// JSONファイルから読み込み（非WASM環境のみ）
    #[cfg(not(target_arch = "wasm32"))]
    pub fn from_file(path: &std::path::Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    /// 組み込みの区分を別の区分で上書きする追加パターン
    pub fn overridden_builtins(&self) -> Vec<&PatternEntry> {
        let builtin = MappingTable::default_table();
        self.patterns
            .iter()
            .filter(|entry| {
                let pattern = entry.pattern.to_lowercase();
                builtin
                    .entries()
                    .iter()
                    .any(|b| b.pattern == pattern && b.category != entry.category)
            })
            .collect()
    }

    /// 有効なマッピングテーブルを構築
    pub fn table(&self) -> MappingTable {
        if self.patterns.is_empty() && self.match_strategy == MatchStrategy::FirstInTable {
            return MappingTable::default_table().clone();
        }

        for entry in self.overridden_builtins() {
            tracing::warn!(
                "pattern {:?} overrides built-in category with {}",
                entry.pattern,
                entry.category
            );
        }

        let mut table = MappingTable::builtin().with_strategy(self.match_strategy);
        table.extend(&self.patterns);
        tracing::debug!(
            "mapping table built: {} entries, strategy {:?}",
            table.len(),
            self.match_strategy
        );
        table
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::category::Category;

    #[test]
    fn test_default_config() {
        let config = ColorConfig::default();
        assert_eq!(config.debounce_ms, 100);
        assert_eq!(config.select_ids, vec!["serviceTypeSelect", "service"]);
        assert_eq!(config.select_names, vec!["service_id"]);
        assert_eq!(config.match_strategy, MatchStrategy::FirstInTable);
    }

    #[test]
    fn test_from_json_partial() {
        let config = ColorConfig::from_json(r#"{"debounceMs": 250}"#).unwrap();
        assert_eq!(config.debounce_ms, 250);
        assert_eq!(config.select_ids.len(), 2);
    }

    #[test]
    fn test_from_json_patterns() {
        let json = r#"{
            "matchStrategy": "longest",
            "patterns": [{"pattern": "Scaling", "category": "cleaning"}]
        }"#;
        let config = ColorConfig::from_json(json).unwrap();
        assert_eq!(config.match_strategy, MatchStrategy::Longest);

        let table = config.table();
        assert_eq!(table.strategy(), MatchStrategy::Longest);
        assert_eq!(table.classify(Some("scaling")), Category::Cleaning);
    }

    #[test]
    fn test_from_json_invalid_category() {
        let json = r#"{"patterns": [{"pattern": "x", "category": "surgery"}]}"#;
        assert!(ColorConfig::from_json(json).is_err());
    }

    #[test]
    fn test_from_json_empty_pattern() {
        let json = r#"{"patterns": [{"pattern": " ", "category": "cleaning"}]}"#;
        assert!(matches!(ColorConfig::from_json(json), Err(Error::Config(_))));

        let json = r#"{"selectIds": [""]}"#;
        assert!(matches!(ColorConfig::from_json(json), Err(Error::Config(_))));
    }

    #[test]
    fn test_overridden_builtins() {
        let json = r#"{"patterns": [
            {"pattern": "Braces", "category": "other"},
            {"pattern": "checkup", "category": "checkup"},
            {"pattern": "veneer", "category": "whitening"}
        ]}"#;
        let config = ColorConfig::from_json(json).unwrap();

        let overridden = config.overridden_builtins();
        assert_eq!(overridden.len(), 1);
        assert_eq!(overridden[0].pattern, "Braces");

        let table = config.table();
        assert_eq!(table.len(), 26);
        assert_eq!(table.classify(Some("braces")), Category::Other);
    }

    #[test]
    fn test_default_table_is_builtin() {
        assert_eq!(ColorConfig::default().table(), MappingTable::builtin());
    }
}
