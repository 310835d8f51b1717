//! Debounced window-resize handling for `HotMapView`.

use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::prelude::*;

use super::{now_ms, HotMapView, SharedState};

impl HotMapView {
    pub(crate) fn handle_resize_event(state: &Rc<RefCell<SharedState>>) {
        state.borrow_mut().debouncer.trigger(now_ms());
        Self::schedule_resize_settle(state, None);
    }

    pub(crate) fn schedule_resize_settle(state: &Rc<RefCell<SharedState>>, delay_ms: Option<f64>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let mut s = state.borrow_mut();
        if let Some(timer_id) = s.resize_timer.take() {
            window.clear_timeout_with_handle(timer_id);
        }
        if s.resize_closure.is_none() {
            let weak_state = Rc::downgrade(state);
            let closure = Closure::wrap(Box::new(move || {
                if let Some(state) = weak_state.upgrade() {
                    HotMapView::handle_resize_settle(&state);
                }
            }) as Box<dyn FnMut()>);
            s.resize_closure = Some(closure);
        }
        let delay = delay_ms.unwrap_or_else(|| s.debouncer.window_ms());
        #[allow(clippy::cast_possible_truncation)]
        let delay = delay.ceil().clamp(0.0, f64::from(i32::MAX)) as i32;
        let Some(callback) = s.resize_closure.as_ref() else {
            return;
        };
        match window.set_timeout_with_callback_and_timeout_and_arguments_0(
            callback.as_ref().unchecked_ref(),
            delay,
        ) {
            Ok(id) => s.resize_timer = Some(id),
            Err(_) => s.resize_timer = None,
        }
    }

    pub(crate) fn handle_resize_settle(state: &Rc<RefCell<SharedState>>) {
        let now = now_ms();
        let mut s = state.borrow_mut();
        s.resize_timer = None;
        if !s.debouncer.poll(now) {
            // Another resize arrived inside the window; wait out the rest.
            let remaining = s.debouncer.remaining(now);
            drop(s);
            if remaining.is_some() {
                Self::schedule_resize_settle(state, remaining);
            }
            return;
        }
        let width = f64::from(s.container.client_width());
        if s.controller.resize(width).is_some() {
            Self::mount(&s);
        }
        drop(s);
        Self::deliver_errors(state);
    }
}
