//! 色分けの同期処理
//!
//! ドキュメントを走査し、サービスを宣言している要素に区分クラスを付与する。
//!
//! ## 対象
//! 1. `data-service-type` / `data-service-name` 属性を持つ要素 → `service-label` + 区分
//! 2. 選択ウィジェット内の `<option>` → `data-service-class` 属性
//! 3. `.service-btn` 要素 → 区分
//!
//! クラスは追加のみ。同じ文書に何度適用しても結果は変わらない。

use crate::config::ColorConfig;
use crate::dom::{ServiceDocument, ServiceElement};
use crate::error::Result;
use crate::mapping::MappingTable;
use crate::category::Category;

pub const SERVICE_LABEL_CLASS: &str = "service-label";
pub const SERVICE_BUTTON_CLASS: &str = "service-btn";
pub const ATTR_SERVICE_TYPE: &str = "data-service-type";
pub const ATTR_SERVICE_NAME: &str = "data-service-name";
pub const ATTR_TYPE: &str = "data-type";
pub const ATTR_SERVICE_CLASS: &str = "data-service-class";

/// 1回の同期処理の集計
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SyncReport {
    pub labels: usize,
    pub buttons: usize,
    pub options: usize,
}

impl SyncReport {
    pub fn total(&self) -> usize {
        self.labels + self.buttons + self.options
    }
}

/// 文書全体に色分けを適用
pub fn apply_service_colors<D>(
    doc: &D,
    table: &MappingTable,
    config: &ColorConfig,
) -> Result<SyncReport>
where
    D: ServiceDocument,
{
    let mut report = SyncReport::default();

    // 属性で宣言されたラベル
    for attr in [ATTR_SERVICE_TYPE, ATTR_SERVICE_NAME] {
        for element in doc.elements_with_attribute(attr) {
            let category = table.classify(element.attribute(attr).as_deref());
            element.add_class(SERVICE_LABEL_CLASS)?;
            element.add_class(category.as_class())?;
            report.labels += 1;
        }
    }

    // サービスボタン
    for element in doc.elements_with_class(SERVICE_BUTTON_CLASS) {
        let category = table.classify(button_source(&element).as_deref());
        element.add_class(category.as_class())?;
        report.buttons += 1;
    }

    // 選択ウィジェットの選択肢
    for id in &config.select_ids {
        let Some(select) = doc.element_by_id(id) else {
            continue;
        };
        for option in select.options() {
            let value = option.value().unwrap_or_default();
            let text = option.text_content().unwrap_or_default();
            if value.is_empty() || text.is_empty() {
                continue;
            }
            let category = table.classify(Some(&text));
            option.set_attribute(ATTR_SERVICE_CLASS, category.as_class())?;
            report.options += 1;
        }
    }

    tracing::debug!(
        "service colors applied: {} labels, {} buttons, {} options",
        report.labels,
        report.buttons,
        report.options
    );

    Ok(report)
}

/// ボタンの分類元（data-type → data-service-type → 表示テキスト）
fn button_source<E: ServiceElement>(element: &E) -> Option<String> {
    element
        .attribute(ATTR_TYPE)
        .filter(|s| !s.is_empty())
        .or_else(|| element.attribute(ATTR_SERVICE_TYPE).filter(|s| !s.is_empty()))
        .or_else(|| element.text_content())
}

/// 選択ウィジェット（id指定 + name指定、重複なし）
pub fn selection_widgets<D>(doc: &D, config: &ColorConfig) -> Vec<D::Element>
where
    D: ServiceDocument,
    D::Element: PartialEq,
{
    let mut widgets: Vec<D::Element> = Vec::new();

    let by_id = config.select_ids.iter().filter_map(|id| doc.element_by_id(id));
    let by_name = config
        .select_names
        .iter()
        .flat_map(|name| doc.elements_by_name(name));

    for widget in by_id.chain(by_name) {
        if !widgets.contains(&widget) {
            widgets.push(widget);
        }
    }

    widgets
}

/// 選択変更時の処理
///
/// 選択中の選択肢を分類し、ウィジェット上の区分クラスを1つだけにする。
/// 選択肢がない・テキストが空の場合は何もしない。
pub fn apply_selection_change<E>(widget: &E, table: &MappingTable) -> Result<Option<Category>>
where
    E: ServiceElement,
{
    let Some(text) = widget
        .selected_option()
        .and_then(|o| o.text_content())
        .filter(|t| !t.is_empty())
    else {
        return Ok(None);
    };

    let category = table.classify(Some(&text));

    for class in Category::all_classes() {
        widget.remove_class(class)?;
    }
    widget.add_class(category.as_class())?;

    Ok(Some(category))
}
