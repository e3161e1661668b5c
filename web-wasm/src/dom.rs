//! web-sys によるドキュメント実装

use service_colors_common::{Error, Result, ServiceDocument, ServiceElement};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Document, Element, HtmlOptionElement, HtmlSelectElement, NodeList};

/// JsValueのエラーを共通エラーに変換
pub fn dom_error(value: JsValue) -> Error {
    let message = value
        .dyn_ref::<js_sys::Error>()
        .map(|e| String::from(e.message()))
        .or_else(|| value.as_string())
        .unwrap_or_else(|| format!("{:?}", value));
    Error::Dom(message)
}

/// 共通エラーをJS例外に変換
pub fn to_js_error(error: Error) -> JsValue {
    js_sys::Error::new(&error.to_string()).into()
}

/// ブラウザのドキュメント
#[derive(Clone)]
pub struct WebDocument(pub Document);

impl WebDocument {
    /// 現在のウィンドウのドキュメント
    pub fn current() -> Result<Self> {
        web_sys::window()
            .and_then(|w| w.document())
            .map(WebDocument)
            .ok_or_else(|| Error::Dom("document is not available".into()))
    }

    fn query_all(&self, selector: &str) -> Vec<WebElement> {
        match self.0.query_selector_all(selector) {
            Ok(list) => elements_of(&list),
            Err(e) => {
                gloo::console::warn!(format!("invalid selector {}: {}", selector, dom_error(e)));
                Vec::new()
            }
        }
    }
}

/// ブラウザの要素
#[derive(Clone, PartialEq, Eq)]
pub struct WebElement(pub Element);

fn elements_of(list: &NodeList) -> Vec<WebElement> {
    (0..list.length())
        .filter_map(|i| list.get(i))
        .filter_map(|node| node.dyn_into::<Element>().ok())
        .map(WebElement)
        .collect()
}

/// CSS属性セレクタ用の文字列エスケープ
fn quote_selector_value(value: &str) -> String {
    format!("\"{}\"", value.replace('\\', "\\\\").replace('"', "\\\""))
}

impl ServiceElement for WebElement {
    fn attribute(&self, name: &str) -> Option<String> {
        self.0.get_attribute(name)
    }

    fn set_attribute(&self, name: &str, value: &str) -> Result<()> {
        self.0.set_attribute(name, value).map_err(dom_error)
    }

    fn text_content(&self) -> Option<String> {
        self.0.text_content()
    }

    fn set_text_content(&self, text: &str) {
        self.0.set_text_content(Some(text));
    }

    fn add_class(&self, class: &str) -> Result<()> {
        self.0.class_list().add_1(class).map_err(dom_error)
    }

    fn remove_class(&self, class: &str) -> Result<()> {
        self.0.class_list().remove_1(class).map_err(dom_error)
    }

    fn has_class(&self, class: &str) -> bool {
        self.0.class_list().contains(class)
    }

    fn value(&self) -> Option<String> {
        match self.0.dyn_ref::<HtmlOptionElement>() {
            Some(option) => Some(option.value()),
            None => self.attribute("value"),
        }
    }

    fn options(&self) -> Vec<Self> {
        match self.0.query_selector_all("option") {
            Ok(list) => elements_of(&list),
            Err(_) => Vec::new(),
        }
    }

    fn selected_option(&self) -> Option<Self> {
        let select = self.0.dyn_ref::<HtmlSelectElement>()?;
        let index = select.selected_index();
        if index < 0 {
            return None;
        }
        select.item(index as u32).map(WebElement)
    }
}

impl ServiceDocument for WebDocument {
    type Element = WebElement;

    fn elements_with_attribute(&self, name: &str) -> Vec<WebElement> {
        self.query_all(&format!("[{}]", name))
    }

    fn elements_with_class(&self, class: &str) -> Vec<WebElement> {
        self.query_all(&format!(".{}", class))
    }

    fn elements_by_name(&self, name: &str) -> Vec<WebElement> {
        self.query_all(&format!("[name={}]", quote_selector_value(name)))
    }

    fn element_by_id(&self, id: &str) -> Option<WebElement> {
        self.0.get_element_by_id(id).map(WebElement)
    }

    fn create_element(&self, tag: &str) -> Result<WebElement> {
        self.0.create_element(tag).map(WebElement).map_err(dom_error)
    }
}


#[cfg(all(target_arch = "wasm32", test))]
mod wasm_tests {
    use super::*;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    #[wasm_bindgen_test]
    fn wasm_selected_option_follows_index() {
        let doc = WebDocument::current().unwrap();
        let select = doc.create_element("select").unwrap();
        select
            .0
            .set_inner_html("<option>Braces</option><option>Deep Cleaning</option>");

        let html: &HtmlSelectElement = select.0.dyn_ref().unwrap();
        html.set_selected_index(1);

        let selected = select.selected_option().unwrap();
        assert_eq!(selected.text_content().as_deref(), Some("Deep Cleaning"));
    }

    #[wasm_bindgen_test]
    fn wasm_option_value_falls_back_to_text() {
        let doc = WebDocument::current().unwrap();
        let option = doc.create_element("option").unwrap();
        option.set_text_content("Braces");
        assert_eq!(option.value().as_deref(), Some("Braces"));
    }
}
