//! サービス区分の型定義
//!
//! 分類結果は8種類の固定タグのいずれか。`Other` が既定のフォールバック。

use serde::{Deserialize, Serialize};

/// サービス区分
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Cleaning,
    Filling,
    Whitening,
    RootCanal,
    Extraction,
    Orthodontics,
    Checkup,
    #[default]
    Other,
}

impl Category {
    /// 全区分（テーブルの恒等エントリと同じ順序）
    pub const ALL: [Category; 8] = [
        Category::Cleaning,
        Category::Filling,
        Category::Whitening,
        Category::RootCanal,
        Category::Extraction,
        Category::Orthodontics,
        Category::Checkup,
        Category::Other,
    ];

    /// CSSクラス名
    pub fn as_class(&self) -> &'static str {
        match self {
            Category::Cleaning => "cleaning",
            Category::Filling => "filling",
            Category::Whitening => "whitening",
            Category::RootCanal => "root_canal",
            Category::Extraction => "extraction",
            Category::Orthodontics => "orthodontics",
            Category::Checkup => "checkup",
            Category::Other => "other",
        }
    }

    /// 全区分のCSSクラス名
    pub fn all_classes() -> impl Iterator<Item = &'static str> {
        Self::ALL.iter().map(Category::as_class)
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_class())
    }
}

impl std::str::FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|c| c.as_class() == s)
            .ok_or_else(|| format!("Unknown category: {}", s))
    }
}
