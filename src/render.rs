//! 分類結果・HTMLの出力

use crate::cli::ElementKind;
use crate::error::{CliError, Result};
use serde::Serialize;
use service_colors_common::{
    create_service_button, create_service_label, Category, ElementOptions, MappingTable,
    MemoryDocument,
};

/// 分類結果
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClassifiedService {
    pub input: String,
    pub category: Category,
}

/// 入力をまとめて分類
pub fn classify_all(inputs: &[String], table: &MappingTable) -> Vec<ClassifiedService> {
    inputs
        .iter()
        .map(|input| ClassifiedService {
            input: input.clone(),
            category: table.classify(Some(input)),
        })
        .collect()
}

/// `KEY=VALUE` を分解
pub fn parse_attribute(arg: &str) -> Result<(String, String)> {
    match arg.split_once('=') {
        Some((key, value)) if !key.trim().is_empty() => {
            Ok((key.trim().to_string(), value.to_string()))
        }
        _ => Err(CliError::InvalidAttribute(arg.to_string())),
    }
}

/// 色付き要素のHTMLを生成
pub fn render_element(
    kind: ElementKind,
    name: &str,
    service_type: Option<&str>,
    classes: &[String],
    attributes: &[String],
    table: &MappingTable,
) -> Result<String> {
    let mut options = ElementOptions::default();
    if !classes.is_empty() {
        options.classes = Some(classes.join(" "));
    }
    for arg in attributes {
        let (key, value) = parse_attribute(arg)?;
        options.attributes.insert(key, value);
    }

    let doc = MemoryDocument::new();
    let element = match kind {
        ElementKind::Label => create_service_label(&doc, table, name, service_type, &options)?,
        ElementKind::Button => create_service_button(&doc, table, name, service_type, &options)?,
    };

    Ok(element.outer_html())
}

/// テーブルを表形式で出力
pub fn format_table(table: &MappingTable) -> String {
    let width = table
        .entries()
        .iter()
        .map(|e| e.pattern.chars().count())
        .max()
        .unwrap_or(0);

    table
        .entries()
        .iter()
        .map(|e| format!("{:width$}  {}", e.pattern, e.category, width = width))
        .collect::<Vec<_>>()
        .join("\n")
}
