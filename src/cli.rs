use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "service-colors")]
#[command(about = "歯科サービス名の色分け区分ツール", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// 詳細ログを出力
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// 設定ファイル（デフォルト: ~/.config/service-colors/config.json）
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// サービス名を区分に分類（引数なしで対話入力）
    Classify {
        /// サービス名または区分コード
        inputs: Vec<String>,

        /// JSONで出力
        #[arg(long)]
        json: bool,

        /// 部分一致で最長パターンを優先
        #[arg(long)]
        longest: bool,
    },

    /// 有効なマッピングテーブルを表示
    Table {
        /// JSONで出力
        #[arg(long)]
        json: bool,
    },

    /// 色付きラベル/ボタンのHTMLを出力
    Render {
        /// 要素の種類 (label/button)
        kind: ElementKind,

        /// サービス名（表示テキスト）
        name: String,

        /// サービス種別（指定時はこちらで分類）
        #[arg(short = 't', long = "type")]
        service_type: Option<String>,

        /// 追加クラス
        #[arg(short, long = "class")]
        classes: Vec<String>,

        /// 追加属性 (KEY=VALUE)
        #[arg(short, long = "attr")]
        attributes: Vec<String>,
    },

    /// 設定を表示/初期化
    Config {
        /// 設定を表示
        #[arg(long)]
        show: bool,

        /// 既定の設定ファイルを書き出す
        #[arg(long)]
        init: bool,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ElementKind {
    Label,
    Button,
}

impl std::str::FromStr for ElementKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "label" | "span" => Ok(ElementKind::Label),
            "button" | "btn" => Ok(ElementKind::Button),
            _ => Err(format!("Unknown element: {}. Use label or button", s)),
        }
    }
}
