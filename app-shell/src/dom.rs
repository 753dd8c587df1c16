//! Thin helpers over `web_sys`. A missing element is `None`, never an error.

use js_sys::Reflect;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{
    AddEventListenerOptions, Document, Element, Event, EventTarget, HtmlElement, Storage, Window,
};

use crate::ShellError;

pub fn window() -> Result<Window, ShellError> {
    web_sys::window().ok_or(ShellError::NoWindow)
}

pub fn document() -> Result<Document, ShellError> {
    window()?.document().ok_or(ShellError::NoDocument)
}

pub fn query(selector: &str) -> Option<Element> {
    document().ok()?.query_selector(selector).ok().flatten()
}

pub fn query_all(selector: &str) -> Vec<Element> {
    let Ok(doc) = document() else {
        return Vec::new();
    };
    let Ok(list) = doc.query_selector_all(selector) else {
        return Vec::new();
    };
    (0..list.length())
        .filter_map(|i| list.get(i))
        .filter_map(|node| node.dyn_into::<Element>().ok())
        .collect()
}

pub fn query_within(root: &Element, selector: &str) -> Option<Element> {
    root.query_selector(selector).ok().flatten()
}

pub fn by_id(id: &str) -> Option<Element> {
    document().ok()?.get_element_by_id(id)
}

pub fn cast<T: JsCast>(el: Element) -> Option<T> {
    el.dyn_into::<T>().ok()
}

pub fn text(el: &Element) -> String {
    el.text_content().unwrap_or_default()
}

pub fn set_text(el: &Element, value: &str) {
    el.set_text_content(Some(value));
}

pub fn add_class(el: &Element, class: &str) {
    let _ = el.class_list().add_1(class);
}

pub fn remove_class(el: &Element, class: &str) {
    let _ = el.class_list().remove_1(class);
}

pub fn toggle_class(el: &Element, class: &str) {
    let _ = el.class_list().toggle(class);
}

/// Make `active` exclusive among everything matching `group`.
pub fn activate_exclusive(group: &str, active: &Element) {
    for el in query_all(group) {
        remove_class(&el, "active");
    }
    add_class(active, "active");
}

pub fn set_style(el: &Element, property: &str, value: &str) {
    if let Some(html) = el.dyn_ref::<HtmlElement>() {
        let _ = html.style().set_property(property, value);
    }
}

pub fn create(tag: &str, class: &str) -> Result<Element, ShellError> {
    let el = document()?.create_element(tag)?;
    el.set_class_name(class);
    Ok(el)
}

pub fn append_to_body(el: &Element) -> Result<(), ShellError> {
    let body = document()?.body().ok_or(ShellError::NoDocument)?;
    body.append_child(el)?;
    Ok(())
}

pub fn body_class_name() -> String {
    document()
        .ok()
        .and_then(|d| d.body())
        .map(|b| b.class_name())
        .unwrap_or_default()
}

/// Attach `handler` for the lifetime of the page.
pub fn on<F>(target: &EventTarget, event: &str, handler: F) -> Result<(), ShellError>
where
    F: FnMut(Event) + 'static,
{
    let closure = Closure::<dyn FnMut(Event)>::wrap(Box::new(handler));
    target.add_event_listener_with_callback(event, closure.as_ref().unchecked_ref())?;
    closure.forget();
    Ok(())
}

pub fn on_passive<F>(target: &EventTarget, event: &str, handler: F) -> Result<(), ShellError>
where
    F: FnMut(Event) + 'static,
{
    let options = AddEventListenerOptions::new();
    options.set_passive(true);
    let closure = Closure::<dyn FnMut(Event)>::wrap(Box::new(handler));
    target.add_event_listener_with_callback_and_add_event_listener_options(
        event,
        closure.as_ref().unchecked_ref(),
        &options,
    )?;
    closure.forget();
    Ok(())
}

pub fn local_storage() -> Result<Storage, ShellError> {
    window()?
        .local_storage()?
        .ok_or_else(|| ShellError::Dom("localStorage unavailable".into()))
}

pub fn read_global(key: &str) -> Option<String> {
    Reflect::get(&js_sys::global(), &JsValue::from_str(key))
        .ok()
        .and_then(|v| v.as_string())
}

pub fn now_ms() -> u64 {
    js_sys::Date::now() as u64
}
