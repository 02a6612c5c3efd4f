use glam::Vec2;
use wasm_bindgen::convert::FromWasmAbi;
use wasm_bindgen::{closure::Closure, JsCast, JsValue};
use web_sys::{Document, Element, HtmlElement, Window};

use crate::error::SketchError;
use crate::present::Presenter;

pub fn js_err(err: JsValue) -> SketchError {
    SketchError::Js(format!("{err:?}"))
}

pub fn viewport(window: &Window) -> Vec2 {
    let dim = |v: Result<JsValue, JsValue>| v.ok().and_then(|v| v.as_f64()).unwrap_or(0.0) as f32;
    Vec2::new(dim(window.inner_width()), dim(window.inner_height()))
}

/// Registers `handler` for `event` on `target` for the lifetime of the page.
pub fn listen<E, F>(
    target: &web_sys::EventTarget,
    event: &str,
    handler: F,
) -> Result<(), SketchError>
where
    E: FromWasmAbi + 'static,
    F: FnMut(E) + 'static,
{
    let closure = Closure::<dyn FnMut(E)>::new(handler);
    target
        .add_event_listener_with_callback(event, closure.as_ref().unchecked_ref())
        .map_err(js_err)?;
    closure.forget();
    Ok(())
}

/// One-shot timer. Never cancelled.
pub fn after_ms<F: FnOnce() + 'static>(window: &Window, ms: f64, f: F) -> Result<(), SketchError> {
    let callback = Closure::once_into_js(f);
    window
        .set_timeout_with_callback_and_timeout_and_arguments_0(callback.unchecked_ref(), ms as i32)
        .map_err(js_err)?;
    Ok(())
}

/// Writes straight into the page's prompt, readout and footer elements.
/// Every element but the canvas is optional.
pub struct DomPresenter {
    prompts: Vec<HtmlElement>,
    metric_display: Option<HtmlElement>,
    metric_value: Option<Element>,
    footer: Option<HtmlElement>,
    body: Option<HtmlElement>,
}

impl DomPresenter {
    pub fn attach(document: &Document) -> Self {
        let mut prompts = Vec::new();
        match document.query_selector_all(".prompt") {
            Ok(list) => {
                for i in 0..list.length() {
                    if let Some(el) = list.get(i).and_then(|n| n.dyn_into::<HtmlElement>().ok()) {
                        prompts.push(el);
                    }
                }
            }
            Err(err) => log::warn!("prompt lookup failed: {err:?}"),
        }
        if prompts.is_empty() {
            log::warn!("no .prompt elements; skipping the intro");
        }

        Self {
            prompts,
            metric_display: html_by_id(document, "delta-display"),
            metric_value: optional(document, "delta-value"),
            footer: html_by_id(document, "footer"),
            body: document.body(),
        }
    }

    pub fn prompt_count(&self) -> usize {
        self.prompts.len()
    }
}

fn optional(document: &Document, id: &str) -> Option<Element> {
    let el = document.get_element_by_id(id);
    if el.is_none() {
        log::warn!("#{id} not found");
    }
    el
}

fn html_by_id(document: &Document, id: &str) -> Option<HtmlElement> {
    optional(document, id).and_then(|el| el.dyn_into::<HtmlElement>().ok())
}

fn set_style(el: &HtmlElement, property: &str, value: &str) {
    if let Err(err) = el.style().set_property(property, value) {
        log::warn!("could not set {property}: {err:?}");
    }
}

impl Presenter for DomPresenter {
    fn set_prompt_visible(&mut self, index: usize, visible: bool) {
        if let Some(el) = self.prompts.get(index) {
            set_style(el, "opacity", if visible { "1" } else { "0" });
        }
    }

    fn show_metric(&mut self) {
        if let Some(el) = &self.metric_display {
            set_style(el, "display", "block");
        }
    }

    fn set_metric_text(&mut self, text: &str) {
        if let Some(el) = &self.metric_value {
            el.set_text_content(Some(text));
        }
    }

    fn show_footer(&mut self) {
        if let Some(el) = &self.footer {
            set_style(el, "opacity", "1");
        }
    }

    fn set_cursor_hidden(&mut self, hidden: bool) {
        if let Some(body) = &self.body {
            set_style(body, "cursor", if hidden { "none" } else { "default" });
        }
    }
}
