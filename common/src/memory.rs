//! メモリ上のドキュメント実装
//!
//! ブラウザ外（CLIのHTML出力、ネイティブテスト）で同期処理を動かすための最小DOM。

use crate::dom::{ServiceDocument, ServiceElement};
use crate::error::{Error, Result};
use indexmap::IndexMap;
use std::cell::RefCell;
use std::rc::Rc;

/// 子ノード（テキストと要素が混在する）
#[derive(Debug, Clone)]
enum Node {
    Text(String),
    Element(MemoryElement),
}

#[derive(Debug, Default)]
struct NodeData {
    tag: String,
    attributes: IndexMap<String, String>,
    classes: Vec<String>,
    children: Vec<Node>,
}

/// 共有参照の要素ハンドル
#[derive(Debug, Clone)]
pub struct MemoryElement(Rc<RefCell<NodeData>>);

impl PartialEq for MemoryElement {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl Eq for MemoryElement {}

impl MemoryElement {
    pub fn new(tag: &str) -> Self {
        Self(Rc::new(RefCell::new(NodeData {
            tag: tag.to_lowercase(),
            ..Default::default()
        })))
    }

    pub fn with_attr(self, name: &str, value: &str) -> Self {
        self.write_attribute(name, value);
        self
    }

    pub fn with_class(self, class: &str) -> Self {
        self.push_class(class);
        self
    }

    pub fn with_text(self, text: &str) -> Self {
        self.set_text_content(text);
        self
    }

    pub fn with_child(self, child: MemoryElement) -> Self {
        self.append_child(child);
        self
    }

    /// 末尾に子要素を追加（既存のテキストは残る）
    pub fn append_child(&self, child: MemoryElement) {
        self.0.borrow_mut().children.push(Node::Element(child));
    }

    pub fn tag(&self) -> String {
        self.0.borrow().tag.clone()
    }

    /// クラス一覧（追加順）
    pub fn classes(&self) -> Vec<String> {
        self.0.borrow().classes.clone()
    }

    /// `index` 番目の `<option>` を選択状態にする
    pub fn select(&self, index: usize) {
        for (i, option) in self.options().iter().enumerate() {
            let mut node = option.0.borrow_mut();
            if i == index {
                node.attributes.insert("selected".into(), String::new());
            } else {
                node.attributes.shift_remove("selected");
            }
        }
    }

    /// HTML文字列に変換
    pub fn outer_html(&self) -> String {
        let node = self.0.borrow();
        let mut html = format!("<{}", node.tag);

        if !node.classes.is_empty() {
            html.push_str(&format!(" class=\"{}\"", escape(&node.classes.join(" "))));
        }
        for (name, value) in &node.attributes {
            html.push_str(&format!(" {}=\"{}\"", name, escape(value)));
        }
        html.push('>');

        for child in &node.children {
            match child {
                Node::Text(text) => html.push_str(&escape(text)),
                Node::Element(element) => html.push_str(&element.outer_html()),
            }
        }

        html.push_str(&format!("</{}>", node.tag));
        html
    }

    fn collect_descendants(&self, out: &mut Vec<MemoryElement>) {
        for child in self.0.borrow().children.iter() {
            if let Node::Element(element) = child {
                out.push(element.clone());
                element.collect_descendants(out);
            }
        }
    }

    fn descendants(&self) -> Vec<MemoryElement> {
        let mut out = Vec::new();
        self.collect_descendants(&mut out);
        out
    }

    fn push_class(&self, class: &str) {
        let mut node = self.0.borrow_mut();
        if !node.classes.iter().any(|c| c == class) {
            node.classes.push(class.to_string());
        }
    }

    fn write_attribute(&self, name: &str, value: &str) {
        let name = name.to_lowercase();
        let mut node = self.0.borrow_mut();
        if name == "class" {
            node.classes.clear();
            for token in value.split_whitespace() {
                if !node.classes.iter().any(|c| c == token) {
                    node.classes.push(token.to_string());
                }
            }
        } else {
            node.attributes.insert(name, value.to_string());
        }
    }
}

/// クラストークンの検証（DOMTokenListと同じ規則）
fn validate_token(class: &str) -> Result<()> {
    if class.is_empty() {
        return Err(Error::Dom("empty class token".into()));
    }
    if class.chars().any(char::is_whitespace) {
        return Err(Error::Dom(format!("class token contains whitespace: {:?}", class)));
    }
    Ok(())
}

fn escape(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

impl ServiceElement for MemoryElement {
    fn attribute(&self, name: &str) -> Option<String> {
        let node = self.0.borrow();
        let name = name.to_lowercase();
        if name == "class" {
            return if node.classes.is_empty() {
                None
            } else {
                Some(node.classes.join(" "))
            };
        }
        node.attributes.get(&name).cloned()
    }

    fn set_attribute(&self, name: &str, value: &str) -> Result<()> {
        if name.is_empty() || name.chars().any(char::is_whitespace) {
            return Err(Error::Dom(format!("invalid attribute name: {:?}", name)));
        }
        self.write_attribute(name, value);
        Ok(())
    }

    fn text_content(&self) -> Option<String> {
        let node = self.0.borrow();
        let mut text = String::new();
        for child in &node.children {
            match child {
                Node::Text(t) => text.push_str(t),
                Node::Element(element) => {
                    text.push_str(&element.text_content().unwrap_or_default())
                }
            }
        }
        Some(text)
    }

    fn set_text_content(&self, text: &str) {
        let mut node = self.0.borrow_mut();
        node.children.clear();
        if !text.is_empty() {
            node.children.push(Node::Text(text.to_string()));
        }
    }

    fn add_class(&self, class: &str) -> Result<()> {
        validate_token(class)?;
        self.push_class(class);
        Ok(())
    }

    fn remove_class(&self, class: &str) -> Result<()> {
        validate_token(class)?;
        self.0.borrow_mut().classes.retain(|c| c != class);
        Ok(())
    }

    fn has_class(&self, class: &str) -> bool {
        self.0.borrow().classes.iter().any(|c| c == class)
    }

    fn value(&self) -> Option<String> {
        self.attribute("value").or_else(|| self.text_content())
    }

    fn options(&self) -> Vec<Self> {
        self.descendants()
            .into_iter()
            .filter(|e| e.tag() == "option")
            .collect()
    }

    fn selected_option(&self) -> Option<Self> {
        let options = self.options();
        options
            .iter()
            .find(|o| o.attribute("selected").is_some())
            .or_else(|| options.first())
            .cloned()
    }
}

/// メモリ上のドキュメント（`<body>` を根に持つ）
#[derive(Debug, Clone)]
pub struct MemoryDocument {
    body: MemoryElement,
}

impl Default for MemoryDocument {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryDocument {
    pub fn new() -> Self {
        Self {
            body: MemoryElement::new("body"),
        }
    }

    pub fn body(&self) -> &MemoryElement {
        &self.body
    }

    /// `<body>` 直下に追加
    pub fn append(&self, element: MemoryElement) {
        self.body.append_child(element);
    }

    fn all_elements(&self) -> Vec<MemoryElement> {
        self.body.descendants()
    }
}

impl ServiceDocument for MemoryDocument {
    type Element = MemoryElement;

    fn elements_with_attribute(&self, name: &str) -> Vec<MemoryElement> {
        self.all_elements()
            .into_iter()
            .filter(|e| e.attribute(name).is_some())
            .collect()
    }

    fn elements_with_class(&self, class: &str) -> Vec<MemoryElement> {
        self.all_elements()
            .into_iter()
            .filter(|e| e.has_class(class))
            .collect()
    }

    fn elements_by_name(&self, name: &str) -> Vec<MemoryElement> {
        self.all_elements()
            .into_iter()
            .filter(|e| e.attribute("name").as_deref() == Some(name))
            .collect()
    }

    fn element_by_id(&self, id: &str) -> Option<MemoryElement> {
        self.all_elements()
            .into_iter()
            .find(|e| e.attribute("id").as_deref() == Some(id))
    }

    fn create_element(&self, tag: &str) -> Result<MemoryElement> {
        if tag.is_empty() {
            return Err(Error::Dom("empty tag name".into()));
        }
        Ok(MemoryElement::new(tag))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_content_concatenates_children() {
        let el = MemoryElement::new("div")
            .with_child(MemoryElement::new("span").with_text("Deep "))
            .with_child(MemoryElement::new("b").with_text("Cleaning"));
        assert_eq!(el.text_content().as_deref(), Some("Deep Cleaning"));
    }

    #[test]
    fn test_append_keeps_existing_text() {
        let el = MemoryElement::new("button")
            .with_text("Root ")
            .with_child(MemoryElement::new("b").with_text("Canal"));
        assert_eq!(el.text_content().as_deref(), Some("Root Canal"));
        assert_eq!(el.outer_html(), "<button>Root <b>Canal</b></button>");

        el.set_text_content("Braces");
        assert_eq!(el.outer_html(), "<button>Braces</button>");
        assert!(el.descendants().is_empty());
    }

    #[test]
    fn test_class_set_semantics() {
        let el = MemoryElement::new("span");
        el.add_class("cleaning").unwrap();
        el.add_class("cleaning").unwrap();
        assert_eq!(el.classes(), vec!["cleaning"]);

        el.remove_class("cleaning").unwrap();
        assert!(el.classes().is_empty());
        assert!(el.add_class("two words").is_err());
        assert!(el.add_class("").is_err());
    }

    #[test]
    fn test_class_attribute_replaces_list() {
        let el = MemoryElement::new("span").with_class("a");
        el.set_attribute("class", "b  c b").unwrap();
        assert_eq!(el.classes(), vec!["b", "c"]);
        assert_eq!(el.attribute("class").as_deref(), Some("b c"));
    }

    #[test]
    fn test_option_value_falls_back_to_text() {
        let opt = MemoryElement::new("option").with_text("Braces");
        assert_eq!(opt.value().as_deref(), Some("Braces"));

        let placeholder = MemoryElement::new("option").with_attr("value", "").with_text("Select");
        assert_eq!(placeholder.value().as_deref(), Some(""));
    }

    #[test]
    fn test_selected_option() {
        let select = MemoryElement::new("select")
            .with_child(MemoryElement::new("option").with_text("A"))
            .with_child(MemoryElement::new("option").with_text("B"));
        assert_eq!(select.selected_option().unwrap().text_content().as_deref(), Some("A"));

        select.select(1);
        assert_eq!(select.selected_option().unwrap().text_content().as_deref(), Some("B"));
    }

    #[test]
    fn test_document_queries() {
        let doc = MemoryDocument::new();
        doc.append(
            MemoryElement::new("div")
                .with_attr("id", "list")
                .with_child(MemoryElement::new("span").with_attr("data-service-type", "filling"))
                .with_child(MemoryElement::new("button").with_class("service-btn")),
        );
        doc.append(MemoryElement::new("select").with_attr("name", "service_id"));

        assert_eq!(doc.elements_with_attribute("data-service-type").len(), 1);
        assert_eq!(doc.elements_with_class("service-btn").len(), 1);
        assert_eq!(doc.elements_by_name("service_id").len(), 1);
        assert_eq!(doc.element_by_id("list").unwrap().tag(), "div");
        assert!(doc.element_by_id("missing").is_none());
    }

    #[test]
    fn test_outer_html_escapes() {
        let el = MemoryElement::new("span")
            .with_class("service-label")
            .with_attr("title", "a \"b\"")
            .with_text("<Fill & Polish>");
        assert_eq!(
            el.outer_html(),
            "<span class=\"service-label\" title=\"a &quot;b&quot;\">&lt;Fill &amp; Polish&gt;</span>"
        );
    }
}
