//! JavaScript向けの公開API
//!
//! `window.ServiceColors` と同じ関数をモジュールのエクスポートとしても公開する。

use crate::dom::{dom_error, to_js_error, WebDocument, WebElement};
use crate::{dropdown, observer, state};
use service_colors_common::{
    apply_service_colors, create_service_button, create_service_label, ColorConfig,
    ElementOptions, Result, SyncReport,
};
use wasm_bindgen::prelude::*;
use web_sys::Element;

// ============================================
// 内部ヘルパー
// ============================================

/// 現在のドキュメントに色分けを適用
pub fn apply_current_document() -> Result<SyncReport> {
    let doc = WebDocument::current()?;
    state::with_active(|config, table| apply_service_colors(&doc, table, config))
}

/// JSのオプションオブジェクトを読み取る
///
/// `classes` は文字列、`attributes` は任意の値を文字列化して使う。
/// `onclick` は関数のときだけ返す。
fn read_options(options: &JsValue) -> (ElementOptions, Option<js_sys::Function>) {
    let mut parsed = ElementOptions::default();
    if !options.is_object() {
        return (parsed, None);
    }

    let get = |key: &str| js_sys::Reflect::get(options, &JsValue::from_str(key)).ok();

    parsed.classes = get("classes").and_then(|v| v.as_string());

    if let Some(attributes) = get("attributes").filter(|v| v.is_object()) {
        let entries = js_sys::Object::entries(attributes.unchecked_ref());
        for entry in entries.iter() {
            let pair: js_sys::Array = entry.unchecked_into();
            let (Some(name), value) = (pair.get(0).as_string(), pair.get(1)) else {
                continue;
            };
            parsed.attributes.insert(name, js_to_attribute_value(&value));
        }
    }

    let onclick = get("onclick").and_then(|v| v.dyn_into::<js_sys::Function>().ok());
    (parsed, onclick)
}

#[wasm_bindgen]
extern "C" {
    /// グローバルの `String()`（setAttribute と同じ文字列化）
    #[wasm_bindgen(js_name = "String")]
    fn js_string(value: &JsValue) -> String;
}

fn js_to_attribute_value(value: &JsValue) -> String {
    value.as_string().unwrap_or_else(|| js_string(value))
}

// ============================================
// 公開関数
// ============================================

/// サービス名または種別から区分クラス名を取得
#[wasm_bindgen(js_name = "getServiceClass")]
pub fn get_service_class(input: Option<String>) -> String {
    state::with_active(|_, table| table.classify(input.as_deref()))
        .as_class()
        .to_string()
}

/// ページ全体に色分けを適用
#[wasm_bindgen(js_name = "applyServiceColors")]
pub fn apply_service_colors_js() -> std::result::Result<(), JsValue> {
    apply_current_document().map(|_| ()).map_err(to_js_error)
}

/// 色付きサービスボタンを作成
#[wasm_bindgen(js_name = "createServiceButton")]
pub fn create_service_button_js(
    service_name: String,
    service_type: Option<String>,
    options: JsValue,
) -> std::result::Result<Element, JsValue> {
    let doc = WebDocument::current().map_err(to_js_error)?;
    let (options, onclick) = read_options(&options);

    let button: WebElement = state::with_active(|_, table| {
        create_service_button(&doc, table, &service_name, service_type.as_deref(), &options)
    })
    .map_err(to_js_error)?;

    if let Some(handler) = onclick {
        button
            .0
            .add_event_listener_with_callback("click", &handler)
            .map_err(|e| to_js_error(dom_error(e)))?;
    }

    Ok(button.0)
}

/// 色付きサービスラベルを作成
#[wasm_bindgen(js_name = "createServiceLabel")]
pub fn create_service_label_js(
    service_name: String,
    service_type: Option<String>,
    options: JsValue,
) -> std::result::Result<Element, JsValue> {
    let doc = WebDocument::current().map_err(to_js_error)?;
    let (options, _) = read_options(&options);

    let label: WebElement = state::with_active(|_, table| {
        create_service_label(&doc, table, &service_name, service_type.as_deref(), &options)
    })
    .map_err(to_js_error)?;

    Ok(label.0)
}

/// 選択ウィジェットに変更ハンドラを登録
#[wasm_bindgen(js_name = "updateServiceDropdownStyling")]
pub fn update_service_dropdown_styling() -> std::result::Result<(), JsValue> {
    let doc = WebDocument::current().map_err(to_js_error)?;
    dropdown::bind_selection_widgets(&doc)
        .map(|_| ())
        .map_err(to_js_error)
}

/// 初期化（色分け適用 → 変更ハンドラ登録 → DOM監視開始）
#[wasm_bindgen(js_name = "initServiceColors")]
pub fn init_service_colors() -> std::result::Result<(), JsValue> {
    let doc = WebDocument::current().map_err(to_js_error)?;

    let report = state::with_active(|config, table| apply_service_colors(&doc, table, config))
        .map_err(to_js_error)?;
    let bound = dropdown::bind_selection_widgets(&doc).map_err(to_js_error)?;
    let started = observer::init_observer(&doc).map_err(to_js_error)?;

    gloo::console::debug!(format!(
        "service colors: {} elements styled, {} dropdowns bound ({} total), observer {}",
        report.total(),
        bound,
        dropdown::bound_count(),
        if started { "started" } else { "already running" }
    ));
    Ok(())
}

/// 監視と変更ハンドラを解除
#[wasm_bindgen(js_name = "teardownServiceColors")]
pub fn teardown_service_colors() -> bool {
    observer::teardown()
}

/// 設定を差し替える（以後の適用に反映）
///
/// 監視中の遅延時間は次回の初期化から有効。
#[wasm_bindgen(js_name = "configureServiceColors")]
pub fn configure_service_colors(config: JsValue) -> std::result::Result<(), JsValue> {
    let config: ColorConfig = if config.is_undefined() || config.is_null() {
        ColorConfig::default()
    } else {
        serde_wasm_bindgen::from_value(config)
            .map_err(|e| JsValue::from(js_sys::Error::new(&format!("Config error: {}", e))))?
    };
    config.validate().map_err(to_js_error)?;
    state::set_config(config);
    Ok(())
}

#[cfg(all(target_arch = "wasm32", test))]
mod wasm_tests {
    use super::*;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    #[wasm_bindgen_test]
    fn wasm_get_service_class() {
        assert_eq!(get_service_class(Some("TEETH WHITENING".into())), "whitening");
        assert_eq!(get_service_class(None), "other");
    }

    #[wasm_bindgen_test]
    fn wasm_create_label_with_options() {
        let options = js_sys::Object::new();
        let attributes = js_sys::Object::new();
        js_sys::Reflect::set(&attributes, &"data-id".into(), &JsValue::from_f64(5.0)).unwrap();
        js_sys::Reflect::set(&options, &"classes".into(), &"big".into()).unwrap();
        js_sys::Reflect::set(&options, &"attributes".into(), &attributes).unwrap();

        let label = create_service_label_js("Deep Cleaning".into(), None, options.into()).unwrap();
        let classes = label.class_list();
        assert!(classes.contains("service-label"));
        assert!(classes.contains("cleaning"));
        assert!(classes.contains("big"));
        assert_eq!(label.get_attribute("data-id").as_deref(), Some("5"));
        assert_eq!(label.text_content().as_deref(), Some("Deep Cleaning"));
    }

    #[wasm_bindgen_test]
    fn wasm_apply_is_idempotent() {
        let doc = WebDocument::current().unwrap();
        let span = doc.0.create_element("span").unwrap();
        span.set_attribute("data-service-name", "Regular Checkup").unwrap();
        doc.0.body().unwrap().append_child(&span).unwrap();

        apply_service_colors_js().unwrap();
        apply_service_colors_js().unwrap();
        assert_eq!(span.class_name(), "service-label checkup");

        span.remove();
    }

    #[wasm_bindgen_test]
    fn wasm_configure_rejects_bad_config() {
        let bad = js_sys::JSON::parse(r#"{"matchStrategy": "random"}"#).unwrap();
        assert!(configure_service_colors(bad).is_err());
        configure_service_colors(JsValue::UNDEFINED).unwrap();
    }
}
