//! サービス名→区分のマッピングテーブルと分類
//!
//! 1. 完全一致を優先
//! 2. 部分一致（既定はテーブル順で最初の一致、設定で最長一致も選択可）
//! 3. どれにも一致しなければ `Other`

use crate::category::Category;
use serde::{Deserialize, Serialize};

lazy_static::lazy_static! {
    static ref DEFAULT_TABLE: MappingTable = MappingTable::builtin();
}

/// 部分一致の優先規則
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MatchStrategy {
    /// テーブル順で最初に一致したパターン
    #[default]
    FirstInTable,
    /// 最も長いパターン（同じ長さならテーブル順）
    Longest,
}

/// パターン定義
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatternEntry {
    pub pattern: String,
    pub category: Category,
}

/// 順序付きマッピングテーブル
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MappingTable {
    entries: Vec<PatternEntry>,
    strategy: MatchStrategy,
}

impl MappingTable {
    /// 組み込みテーブルへの参照
    pub fn default_table() -> &'static MappingTable {
        &DEFAULT_TABLE
    }

    /// 組み込みテーブル
    pub fn builtin() -> Self {
        let mut table = Self::default();

        // 区分コード（恒等）
        for category in Category::ALL {
            table.insert(category.as_class(), category);
        }

        // 名称ベース
        table.insert("regular cleaning", Category::Cleaning);
        table.insert("deep cleaning", Category::Cleaning);
        table.insert("dental cleaning", Category::Cleaning);
        table.insert("cavity filling", Category::Filling);
        table.insert("composite filling", Category::Filling);
        table.insert("teeth whitening", Category::Whitening);
        table.insert("professional whitening", Category::Whitening);
        table.insert("tooth whitening", Category::Whitening);
        table.insert("root canal", Category::RootCanal);
        table.insert("root canal treatment", Category::RootCanal);
        table.insert("tooth extraction", Category::Extraction);
        table.insert("dental extraction", Category::Extraction);
        table.insert("braces", Category::Orthodontics);
        table.insert("orthodontic", Category::Orthodontics);
        table.insert("dental checkup", Category::Checkup);
        table.insert("regular checkup", Category::Checkup);
        table.insert("examination", Category::Checkup);

        table
    }

    /// 部分一致規則を指定
    pub fn with_strategy(mut self, strategy: MatchStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    pub fn strategy(&self) -> MatchStrategy {
        self.strategy
    }

    /// パターンを追加（既存パターンは位置を保ったまま区分を上書き）
    pub fn insert(&mut self, pattern: &str, category: Category) {
        let pattern = pattern.to_lowercase();
        if pattern.is_empty() {
            return;
        }

        match self.entries.iter_mut().find(|e| e.pattern == pattern) {
            Some(entry) => entry.category = category,
            None => self.entries.push(PatternEntry { pattern, category }),
        }
    }

    /// テーブルを追加マージ
    pub fn extend<'a, I>(&mut self, entries: I)
    where
        I: IntoIterator<Item = &'a PatternEntry>,
    {
        for entry in entries {
            self.insert(&entry.pattern, entry.category);
        }
    }

    pub fn entries(&self) -> &[PatternEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// サービス名または区分コードを分類
    pub fn classify(&self, input: Option<&str>) -> Category {
        let input = match input {
            Some(s) if !s.is_empty() => s.to_lowercase(),
            _ => return Category::Other,
        };

        // 完全一致を優先
        if let Some(entry) = self.entries.iter().find(|e| e.pattern == input) {
            return entry.category;
        }

        let matched = match self.strategy {
            MatchStrategy::FirstInTable => self
                .entries
                .iter()
                .find(|e| input.contains(e.pattern.as_str())),
            MatchStrategy::Longest => {
                let mut best: Option<&PatternEntry> = None;
                for entry in &self.entries {
                    // 長さは文字数で比較
                    if input.contains(entry.pattern.as_str())
                        && best.map_or(true, |b| {
                            entry.pattern.chars().count() > b.pattern.chars().count()
                        })
                    {
                        best = Some(entry);
                    }
                }
                best
            }
        };

        matched.map(|e| e.category).unwrap_or(Category::Other)
    }
}

/// 組み込みテーブルで分類
pub fn get_service_class(input: Option<&str>) -> Category {
    MappingTable::default_table().classify(input)
}
