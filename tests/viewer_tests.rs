//! Browser tests for the `HotMapView` binding.
//!
//! Run with: wasm-pack test --headless --firefox
#![cfg(target_arch = "wasm32")]
#![allow(clippy::unwrap_used, clippy::expect_used, clippy::indexing_slicing)]

use std::cell::RefCell;
use std::rc::Rc;

use hotmap::HotMapView;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_test::{wasm_bindgen_test, wasm_bindgen_test_configure};

wasm_bindgen_test_configure!(run_in_browser);

const SHEET: &str = "\"TC Community ready? (1 = VERY, 5 = Not possible)\",Technologies,Technology Type,Widely Used on TC\n\
                     3,Docker,DevOps,Y\n\
                     1,Rust,Language,Y\n\
                     2,Kotlin,Language,\n";

fn container() -> web_sys::HtmlElement {
    let document = web_sys::window().unwrap().document().unwrap();
    document.create_element("div").unwrap().dyn_into().unwrap()
}

fn view() -> Rc<HotMapView> {
    Rc::new(HotMapView::new(container(), JsValue::UNDEFINED, None).unwrap())
}

#[wasm_bindgen_test]
fn test_error_callback_can_call_back_into_view() {
    let view = view();
    let seen = Rc::new(RefCell::new(Vec::new()));
    let callback = {
        let view = Rc::clone(&view);
        let seen = Rc::clone(&seen);
        Closure::wrap(Box::new(move |message: JsValue| {
            let categories = view.categories().unwrap();
            seen.borrow_mut().push((
                message.as_string().unwrap_or_default(),
                view.stage(),
                js_sys::Array::from(&categories).length(),
            ));
        }) as Box<dyn FnMut(JsValue)>)
    };
    view.on_error(callback.as_ref().unchecked_ref::<js_sys::Function>().clone());

    view.load_csv("").unwrap();

    let seen = seen.borrow();
    assert_eq!(seen.len(), 1);
    assert!(seen[0].0.contains("no rows"));
    assert_eq!(seen[0].1, "Idle");
    assert_eq!(seen[0].2, 0);
}

#[wasm_bindgen_test]
fn test_load_csv_and_select_category() {
    let view = view();
    view.load_csv(SHEET).unwrap();
    assert_eq!(view.stage(), "Rendered");

    let categories = js_sys::Array::from(&view.categories().unwrap());
    assert_eq!(categories.get(0).as_string().unwrap(), "Language");
    assert_eq!(categories.get(1).as_string().unwrap(), "DevOps");

    view.select_category("DevOps");
    let svg = view.svg_markup().unwrap();
    assert!(svg.contains("Docker"));
    assert!(!svg.contains("Kotlin"));
}

#[wasm_bindgen_test]
fn test_render_csv_export() {
    let svg = hotmap::render_csv(SHEET, 800.0).unwrap();
    assert!(svg.starts_with("<svg"));
    assert!(svg.contains("Rust"));
    assert!(hotmap::render_csv("", 800.0).is_err());
}
