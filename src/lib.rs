//! Service Colors CLI
//!
//! サービス名の分類・テーブル表示・色付き要素のHTML出力

pub mod cli;
pub mod config;
pub mod error;
pub mod render;
