//! 色付きサービス要素の生成
//!
//! クリックハンドラはプラットフォーム依存なので、ブラウザ側で登録する。

use crate::dom::{ServiceDocument, ServiceElement};
use crate::error::Result;
use crate::mapping::MappingTable;
use crate::sync::{SERVICE_BUTTON_CLASS, SERVICE_LABEL_CLASS};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// 生成オプション
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ElementOptions {
    /// 追加クラス（空白区切り）
    pub classes: Option<String>,
    /// 追加属性（挿入順に適用）
    pub attributes: IndexMap<String, String>,
}

impl ElementOptions {
    pub fn with_classes(mut self, classes: &str) -> Self {
        self.classes = Some(classes.to_string());
        self
    }

    pub fn with_attribute(mut self, name: &str, value: &str) -> Self {
        self.attributes.insert(name.to_string(), value.to_string());
        self
    }
}

/// 色付きサービスボタン（`<button class="service-btn {区分} ...">`）
pub fn create_service_button<D>(
    doc: &D,
    table: &MappingTable,
    service_name: &str,
    service_type: Option<&str>,
    options: &ElementOptions,
) -> Result<D::Element>
where
    D: ServiceDocument,
{
    build(doc, "button", SERVICE_BUTTON_CLASS, table, service_name, service_type, options)
}

/// 色付きサービスラベル（`<span class="service-label {区分} ...">`）
pub fn create_service_label<D>(
    doc: &D,
    table: &MappingTable,
    service_name: &str,
    service_type: Option<&str>,
    options: &ElementOptions,
) -> Result<D::Element>
where
    D: ServiceDocument,
{
    build(doc, "span", SERVICE_LABEL_CLASS, table, service_name, service_type, options)
}

fn build<D>(
    doc: &D,
    tag: &str,
    base_class: &str,
    table: &MappingTable,
    service_name: &str,
    service_type: Option<&str>,
    options: &ElementOptions,
) -> Result<D::Element>
where
    D: ServiceDocument,
{
    let element = doc.create_element(tag)?;

    // 種別が指定されていれば種別、なければ名称で分類
    let source = service_type.filter(|t| !t.is_empty()).unwrap_or(service_name);
    let category = table.classify(Some(source));

    element.add_class(base_class)?;
    element.add_class(category.as_class())?;
    if let Some(classes) = &options.classes {
        for class in classes.split_whitespace() {
            element.add_class(class)?;
        }
    }

    element.set_text_content(service_name);

    for (name, value) in &options.attributes {
        element.set_attribute(name, value)?;
    }

    Ok(element)
}
