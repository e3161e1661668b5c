//! DOM変更監視
//!
//! `<body>` 配下への子ノード追加を監視し、一定時間後に色分けを再適用する。
//! 監視はページ全体で1つ。`teardown` で解除できる。

use crate::dom::{dom_error, WebDocument};
use crate::{api, dropdown, state};
use gloo::timers::callback::Timeout;
use service_colors_common::{
    batch_requires_resync, Debouncer, Error, Lifecycle, MutationKind, MutationSummary, Result,
    Scheduler,
};
use std::cell::Cell;
use wasm_bindgen::prelude::*;
use web_sys::{Element, MutationObserver, MutationObserverInit, MutationRecord};

/// setTimeout によるスケジューラ（Timeoutのdropで取り消し）
pub struct GlooScheduler;

impl Scheduler for GlooScheduler {
    type Handle = Timeout;

    fn schedule(&self, delay_ms: u32, task: Box<dyn FnOnce()>) -> Timeout {
        Timeout::new(delay_ms, task)
    }
}

struct ObserverState {
    observer: MutationObserver,
    _callback: Closure<dyn FnMut(js_sys::Array, MutationObserver)>,
    debouncer: Debouncer<GlooScheduler>,
}

thread_local! {
    static OBSERVER: Lifecycle<ObserverState> = const { Lifecycle::new() };
    static PASSES: Cell<u32> = const { Cell::new(0) };
}

/// 監視を開始する（開始済みなら何もしない）
///
/// # Returns
/// 新たに開始した場合は `true`
pub fn init_observer(doc: &WebDocument) -> Result<bool> {
    OBSERVER.with(|lifecycle| lifecycle.init_with(|| start(doc)))
}

/// 監視を解除し、保留中の再適用と変更ハンドラも破棄する
pub fn teardown() -> bool {
    let state = OBSERVER.with(|lifecycle| lifecycle.teardown());
    dropdown::unbind_all();

    match state {
        Some(state) => {
            state.observer.disconnect();
            state.debouncer.cancel();
            true
        }
        None => false,
    }
}

fn start(doc: &WebDocument) -> Result<ObserverState> {
    let root: Element = match doc.0.body() {
        Some(body) => body.into(),
        None => doc
            .0
            .document_element()
            .ok_or_else(|| Error::Dom("document has no root element".into()))?,
    };

    let delay_ms = state::config().debounce_ms;
    let debouncer = Debouncer::new(GlooScheduler, delay_ms, run_pass);

    let callback = Closure::wrap(
        Box::new(on_mutations) as Box<dyn FnMut(js_sys::Array, MutationObserver)>
    );
    let observer = MutationObserver::new(callback.as_ref().unchecked_ref()).map_err(dom_error)?;

    let options = MutationObserverInit::new();
    options.set_child_list(true);
    options.set_subtree(true);
    observer
        .observe_with_options(&root, &options)
        .map_err(dom_error)?;

    gloo::console::debug!(format!("service colors: observing DOM (debounce {}ms)", delay_ms));

    Ok(ObserverState {
        observer,
        _callback: callback,
        debouncer,
    })
}

fn summarize(records: &js_sys::Array) -> Vec<MutationSummary> {
    records
        .iter()
        .filter_map(|value| value.dyn_into::<MutationRecord>().ok())
        .filter_map(|record| {
            MutationKind::from_record_type(&record.type_()).map(|kind| MutationSummary {
                kind,
                added_nodes: record.added_nodes().length(),
            })
        })
        .collect()
}

fn on_mutations(records: js_sys::Array, _observer: MutationObserver) {
    if !batch_requires_resync(&summarize(&records)) {
        return;
    }
    OBSERVER.with(|lifecycle| {
        lifecycle.with(|state| state.debouncer.trigger());
    });
}

fn run_pass() {
    let pass = PASSES.with(|count| {
        count.set(count.get() + 1);
        count.get()
    });
    match api::apply_current_document() {
        Ok(report) => gloo::console::debug!(format!(
            "service colors: re-apply #{}: {} elements styled",
            pass,
            report.total()
        )),
        Err(e) => gloo::console::error!(format!("service colors: re-apply failed: {}", e)),
    }
}

#[cfg(all(target_arch = "wasm32", test))]
mod wasm_tests {
    use super::*;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    fn pass_count() -> u32 {
        PASSES.with(Cell::get)
    }

    #[wasm_bindgen_test]
    fn wasm_init_once_and_teardown() {
        let doc = WebDocument::current().unwrap();
        teardown();

        assert!(init_observer(&doc).unwrap());
        assert!(!init_observer(&doc).unwrap());
        assert!(OBSERVER.with(|l| l.is_active()));

        assert!(teardown());
        assert!(!OBSERVER.with(|l| l.is_active()));
        assert!(!teardown());
    }

    async fn sleep(ms: u32) {
        let promise = js_sys::Promise::new(&mut |resolve, _| {
            web_sys::window()
                .unwrap()
                .set_timeout_with_callback_and_timeout_and_arguments_0(&resolve, ms as i32)
                .unwrap();
        });
        wasm_bindgen_futures::JsFuture::from(promise).await.unwrap();
    }

    /// 連続した追加は待ち時間後の1回の再適用にまとまる
    #[wasm_bindgen_test]
    async fn wasm_mutation_burst_runs_one_pass() {
        let doc = WebDocument::current().unwrap();
        teardown();
        assert!(init_observer(&doc).unwrap());
        let before = pass_count();

        let body = doc.0.body().unwrap();
        let mut spans = Vec::new();
        for _ in 0..5 {
            let span = doc.0.create_element("span").unwrap();
            span.set_attribute("data-service-name", "Deep Cleaning").unwrap();
            body.append_child(&span).unwrap();
            spans.push(span);
            sleep(10).await;
        }
        assert_eq!(pass_count(), before);

        sleep(state::config().debounce_ms + 200).await;
        assert_eq!(pass_count(), before + 1);
        for span in &spans {
            assert!(span.class_list().contains("service-label"));
            assert!(span.class_list().contains("cleaning"));
        }

        for span in &spans {
            span.remove();
        }
        teardown();
    }
}
