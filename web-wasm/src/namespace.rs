//! `window.ServiceColors` 名前空間の公開

use crate::api;
use service_colors_common::{Error, Result};
use wasm_bindgen::prelude::*;

/// エラーをJS例外として投げる
fn throw_on_err<T: Into<JsValue>>(result: std::result::Result<T, JsValue>) -> JsValue {
    match result {
        Ok(value) => value.into(),
        Err(e) => wasm_bindgen::throw_val(e),
    }
}

fn set(target: &js_sys::Object, key: &str, value: JsValue) -> Result<()> {
    js_sys::Reflect::set(target, &JsValue::from_str(key), &value)
        .map(|_| ())
        .map_err(crate::dom::dom_error)
}

/// 公開APIを `window.ServiceColors` に登録する
pub fn publish() -> Result<()> {
    let window = web_sys::window().ok_or_else(|| Error::Dom("window is not available".into()))?;
    let namespace = js_sys::Object::new();

    let get_service_class = Closure::wrap(
        Box::new(api::get_service_class) as Box<dyn Fn(Option<String>) -> String>
    );
    set(&namespace, "getServiceClass", get_service_class.into_js_value())?;

    let apply = Closure::wrap(Box::new(|| {
        throw_on_err(api::apply_service_colors_js().map(|_| JsValue::UNDEFINED))
    }) as Box<dyn Fn() -> JsValue>);
    set(&namespace, "applyServiceColors", apply.into_js_value())?;

    let create_button = Closure::wrap(Box::new(|name: String, ty: Option<String>, options: JsValue| {
        throw_on_err(api::create_service_button_js(name, ty, options))
    }) as Box<dyn Fn(String, Option<String>, JsValue) -> JsValue>);
    set(&namespace, "createServiceButton", create_button.into_js_value())?;

    let create_label = Closure::wrap(Box::new(|name: String, ty: Option<String>, options: JsValue| {
        throw_on_err(api::create_service_label_js(name, ty, options))
    }) as Box<dyn Fn(String, Option<String>, JsValue) -> JsValue>);
    set(&namespace, "createServiceLabel", create_label.into_js_value())?;

    let update_dropdowns = Closure::wrap(Box::new(|| {
        throw_on_err(api::update_service_dropdown_styling().map(|_| JsValue::UNDEFINED))
    }) as Box<dyn Fn() -> JsValue>);
    set(&namespace, "updateServiceDropdownStyling", update_dropdowns.into_js_value())?;

    let init = Closure::wrap(Box::new(|| {
        throw_on_err(api::init_service_colors().map(|_| JsValue::UNDEFINED))
    }) as Box<dyn Fn() -> JsValue>);
    set(&namespace, "initServiceColors", init.into_js_value())?;

    let teardown = Closure::wrap(
        Box::new(api::teardown_service_colors) as Box<dyn Fn() -> bool>
    );
    set(&namespace, "teardownServiceColors", teardown.into_js_value())?;

    let configure = Closure::wrap(Box::new(|config: JsValue| {
        throw_on_err(api::configure_service_colors(config).map(|_| JsValue::UNDEFINED))
    }) as Box<dyn Fn(JsValue) -> JsValue>);
    set(&namespace, "configureServiceColors", configure.into_js_value())?;

    set(&window, "ServiceColors", namespace.into())
}

#[cfg(all(target_arch = "wasm32", test))]
mod wasm_tests {
    use super::*;
    use wasm_bindgen::JsCast;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    #[wasm_bindgen_test]
    fn wasm_namespace_exposes_api() {
        publish().unwrap();
        let window = web_sys::window().unwrap();
        let namespace = js_sys::Reflect::get(&window, &"ServiceColors".into()).unwrap();

        let get: js_sys::Function = js_sys::Reflect::get(&namespace, &"getServiceClass".into())
            .unwrap()
            .dyn_into()
            .unwrap();
        let result = get.call1(&JsValue::NULL, &"Deep Cleaning".into()).unwrap();
        assert_eq!(result.as_string().as_deref(), Some("cleaning"));

        for name in [
            "applyServiceColors",
            "createServiceButton",
            "createServiceLabel",
            "updateServiceDropdownStyling",
            "initServiceColors",
        ] {
            let value = js_sys::Reflect::get(&namespace, &name.into()).unwrap();
            assert!(value.is_function(), "{} is not a function", name);
        }
    }
}
