//! 選択ウィジェットの変更ハンドラ
//!
//! 選択が変わるたびにウィジェット自身の区分クラスを付け替える。
//! 同じウィジェットへの二重登録はしない。

use crate::dom::{dom_error, WebDocument, WebElement};
use crate::state;
use service_colors_common::{apply_selection_change, selection_widgets, Result};
use std::cell::RefCell;
use wasm_bindgen::prelude::*;
use web_sys::{Element, Event};

struct Binding {
    element: Element,
    listener: Closure<dyn FnMut(Event)>,
}

thread_local! {
    static BINDINGS: RefCell<Vec<Binding>> = const { RefCell::new(Vec::new()) };
}

/// ページ上の選択ウィジェットに変更ハンドラを登録する
///
/// # Returns
/// 新たに登録したウィジェット数
pub fn bind_selection_widgets(doc: &WebDocument) -> Result<usize> {
    let widgets = state::with_active(|config, _| selection_widgets(doc, config));

    BINDINGS.with(|bindings| {
        let mut bindings = bindings.borrow_mut();
        let mut added = 0;

        for widget in widgets {
            if bindings.iter().any(|b| b.element == widget.0) {
                continue;
            }

            let listener = Closure::wrap(Box::new(on_change) as Box<dyn FnMut(Event)>);
            widget
                .0
                .add_event_listener_with_callback("change", listener.as_ref().unchecked_ref())
                .map_err(dom_error)?;

            bindings.push(Binding {
                element: widget.0,
                listener,
            });
            added += 1;
        }

        Ok(added)
    })
}

/// 登録済みのハンドラをすべて解除する
pub fn unbind_all() {
    let bindings = BINDINGS.with(|bindings| std::mem::take(&mut *bindings.borrow_mut()));
    for binding in bindings {
        let _ = binding
            .element
            .remove_event_listener_with_callback("change", binding.listener.as_ref().unchecked_ref());
    }
}

pub fn bound_count() -> usize {
    BINDINGS.with(|bindings| bindings.borrow().len())
}

fn on_change(event: Event) {
    let Some(target) = event
        .current_target()
        .and_then(|t| t.dyn_into::<Element>().ok())
    else {
        return;
    };

    let widget = WebElement(target);
    if let Err(e) = state::with_active(|_, table| apply_selection_change(&widget, table)) {
        gloo::console::error!(format!("service color update failed: {}", e));
    }
}

#[cfg(all(target_arch = "wasm32", test))]
mod wasm_tests {
    use super::*;
    use service_colors_common::{Category, ServiceDocument, ServiceElement};
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    #[wasm_bindgen_test]
    fn wasm_change_event_sets_single_category() {
        let doc = WebDocument::current().unwrap();
        let select = doc.create_element("select").unwrap();
        select.set_attribute("id", "serviceTypeSelect").unwrap();
        select
            .0
            .set_inner_html("<option>Braces</option><option>Root Canal</option>");
        doc.0.body().unwrap().append_child(&select.0).unwrap();

        bind_selection_widgets(&doc).unwrap();
        bind_selection_widgets(&doc).unwrap();
        assert_eq!(bound_count(), 1);

        let html: &web_sys::HtmlSelectElement = select.0.dyn_ref().unwrap();
        for index in [1, 0, 1] {
            html.set_selected_index(index);
            select.0.dispatch_event(&Event::new("change").unwrap()).unwrap();
            let present = Category::all_classes().filter(|c| select.has_class(c)).count();
            assert_eq!(present, 1);
        }
        assert!(select.has_class("root_canal"));

        unbind_all();
        select.0.remove();
        assert_eq!(bound_count(), 0);
    }
}
