//! Browser binding: the WASM-exported `HotMapView`.
//!
//! The view owns a [`HeatMapController`] behind `Rc<RefCell<_>>` so the
//! window resize listener and the fetch future can reach it. It provides:
//! - Fetching the published sheet and drawing the first map
//! - One method per UI control (category dropdown, reset, readiness
//!   button, saleability slider, export)
//! - Debounced relayout on window resize
//!
//! The rendered SVG is written into the host container as markup.

mod resize;

use std::cell::RefCell;
use std::rc::Rc;

use js_sys::{Function, Promise};
use wasm_bindgen::closure::Closure;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::future_to_promise;
use web_sys::HtmlElement;

use crate::config::HotmapConfig;
use crate::controller::{
    saleability_for_level, Debouncer, ErrorQueue, ExportFormat, ExportRequest,
    HeatMapController, PipelineStage, PipelineStatus, UiEvent,
};
use crate::csv::{parse_rows, Delimiter};
use crate::source::{FetchCsvSource, RecordSource};

/// Class toggled on the map container and the loading indicator.
const HIDE_CLASS: &str = "hide";

pub(crate) fn now_ms() -> f64 {
    if let Some(window) = web_sys::window() {
        if let Some(perf) = window.performance() {
            return perf.now();
        }
    }
    js_sys::Date::now()
}

fn to_js<T: serde::Serialize>(value: &T) -> Result<JsValue, JsValue> {
    serde_wasm_bindgen::to_value(value).map_err(|e| JsValue::from_str(&e.to_string()))
}

/// State shared between the exported view and its event callbacks.
pub(crate) struct SharedState {
    pub(crate) controller: HeatMapController,
    pub(crate) container: HtmlElement,
    pub(crate) loading_indicator: Option<HtmlElement>,
    pub(crate) debouncer: Debouncer,
    pub(crate) resize_timer: Option<i32>,
    pub(crate) resize_closure: Option<Closure<dyn FnMut()>>,
    /// Errors reported by the controller, delivered after the borrow ends.
    pub(crate) errors: ErrorQueue,
    pub(crate) error_callback: Option<Function>,
}

#[wasm_bindgen]
pub struct HotMapView {
    state: Rc<RefCell<SharedState>>,
    resize_listener: Option<Closure<dyn FnMut()>>,
}

#[wasm_bindgen]
impl HotMapView {
    /// Create a view drawing into `container`.
    ///
    /// `config` is a (possibly partial) `HotmapConfig` object; `undefined`
    /// selects the defaults.
    #[wasm_bindgen(constructor)]
    pub fn new(
        container: HtmlElement,
        config: JsValue,
        loading_indicator: Option<HtmlElement>,
    ) -> Result<HotMapView, JsValue> {
        console_error_panic_hook::set_once();

        let config: HotmapConfig = if config.is_undefined() || config.is_null() {
            HotmapConfig::default()
        } else {
            serde_wasm_bindgen::from_value(config)
                .map_err(|e| JsValue::from_str(&format!("invalid config: {e}")))?
        };
        let debouncer = Debouncer::new(config.resize_debounce_ms);
        let mut controller = HeatMapController::new(config);
        controller.set_container_width(f64::from(container.client_width()));
        let errors = ErrorQueue::new();
        controller.on_error(errors.sink());

        let state = Rc::new(RefCell::new(SharedState {
            controller,
            container,
            loading_indicator,
            debouncer,
            resize_timer: None,
            resize_closure: None,
            errors,
            error_callback: None,
        }));

        let resize_listener = web_sys::window().and_then(|window| {
            let weak_state = Rc::downgrade(&state);
            let closure = Closure::wrap(Box::new(move || {
                if let Some(state) = weak_state.upgrade() {
                    HotMapView::handle_resize_event(&state);
                }
            }) as Box<dyn FnMut()>);
            window
                .add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref())
                .ok()
                .map(|()| closure)
        });

        Ok(HotMapView {
            state,
            resize_listener,
        })
    }

    /// Fetch the configured data source and draw the current category.
    ///
    /// Resolves to the pipeline status name. A newer `load` supersedes this
    /// one.
    pub fn load(&self) -> Promise {
        let state = Rc::clone(&self.state);
        future_to_promise(async move {
            let (ticket, source) = {
                let mut s = state.borrow_mut();
                Self::set_loading(&s, true);
                let ticket = s.controller.begin_load();
                let category = s.controller.category().to_string();
                // Held by the controller until the rows arrive.
                s.controller.redraw(&category);
                let url = s.controller.config().data_source.clone();
                (ticket, FetchCsvSource::new(url))
            };
            let fetched = source.fetch().await;
            let status = {
                let mut s = state.borrow_mut();
                let status = s.controller.complete_load(ticket, fetched);
                if status != PipelineStatus::Superseded {
                    Self::mount(&s);
                }
                status
            };
            Self::deliver_errors(&state);
            to_js(&status)
        })
    }

    /// Load rows from CSV text already on the page and draw them.
    pub fn load_csv(&self, text: &str) -> Result<JsValue, JsValue> {
        let status = {
            let mut s = self.state.borrow_mut();
            let ticket = s.controller.begin_load();
            let category = s.controller.category().to_string();
            s.controller.redraw(&category);
            let status = s
                .controller
                .complete_load(ticket, parse_rows(text.as_bytes(), Delimiter::Comma));
            Self::mount(&s);
            status
        };
        Self::deliver_errors(&self.state);
        to_js(&status)
    }

    /// Category dropdown: redraw with only `category` ("*" for all).
    pub fn select_category(&self, category: &str) {
        self.dispatch_event(UiEvent::CategorySelected(category.to_string()));
    }

    /// Reset button: clear emphasis and markers and show every category.
    pub fn reset(&self) {
        self.dispatch_event(UiEvent::Reset);
    }

    /// Readiness button: show or hide the readiness markers.
    pub fn toggle_readiness(&self) {
        self.dispatch_event(UiEvent::ReadinessToggle);
    }

    /// Saleability slider, levels 1 to 4. Other levels are ignored.
    pub fn set_saleability_level(&self, level: u8) {
        if let Some(tags) = saleability_for_level(level) {
            self.dispatch_event(UiEvent::SaleabilityFilter(tags));
        }
    }

    /// Build an export request (`{ fileName, mime, svg }`) for `format`
    /// ("png", "jpg" or "svg").
    pub fn export(&self, format: &str) -> Result<JsValue, JsValue> {
        let format = ExportFormat::parse(format)
            .ok_or_else(|| JsValue::from_str(&format!("unknown export format: {format}")))?;
        let request = self.state.borrow().controller.export(format)?;
        to_js(&request)
    }

    /// Raise an event by its configured name.
    ///
    /// Returns the export request for export events, `undefined` otherwise.
    pub fn dispatch(&self, name: &str, payload: Option<String>) -> Result<JsValue, JsValue> {
        let event = {
            let s = self.state.borrow();
            UiEvent::from_named(&s.controller.config().events, name, payload.as_deref())
        };
        let Some(event) = event else {
            return Err(JsValue::from_str(&format!("unknown event or payload: {name}")));
        };
        match self.dispatch_event(event) {
            Some(request) => to_js(&request),
            None => Ok(JsValue::UNDEFINED),
        }
    }

    /// Distinct categories for the dropdown, in sheet order.
    pub fn categories(&self) -> Result<JsValue, JsValue> {
        to_js(&self.state.borrow().controller.categories())
    }

    pub fn svg_markup(&self) -> Result<String, JsValue> {
        Ok(self.state.borrow().controller.svg_markup()?)
    }

    /// Current pipeline stage name.
    pub fn stage(&self) -> String {
        self.state.borrow().controller.stage().name().to_string()
    }

    /// Register `callback(message)` for pipeline errors.
    ///
    /// The callback runs after the view has finished the call that failed,
    /// so it may call back into the view.
    pub fn on_error(&self, callback: Function) {
        self.state.borrow_mut().error_callback = Some(callback);
    }

    /// Relayout now for the container's current width.
    pub fn refresh(&self) {
        {
            let mut s = self.state.borrow_mut();
            let width = f64::from(s.container.client_width());
            if s.controller.resize(width).is_some() {
                Self::mount(&s);
            }
        }
        Self::deliver_errors(&self.state);
    }
}

impl HotMapView {
    fn dispatch_event(&self, event: UiEvent) -> Option<ExportRequest> {
        let request = {
            let mut s = self.state.borrow_mut();
            let redraws = !matches!(event, UiEvent::Export(_));
            let request = s.controller.handle(event);
            if redraws {
                Self::mount(&s);
            }
            request
        };
        Self::deliver_errors(&self.state);
        request
    }

    /// Hand queued errors to the registered callback, or log them.
    ///
    /// Must be called with no borrow of `state` outstanding.
    pub(crate) fn deliver_errors(state: &Rc<RefCell<SharedState>>) {
        let (callback, messages) = {
            let s = state.borrow();
            (s.error_callback.clone(), s.errors.drain())
        };
        for message in messages {
            match &callback {
                Some(callback) => {
                    if callback
                        .call1(&JsValue::NULL, &JsValue::from_str(&message))
                        .is_err()
                    {
                        tracing::warn!("error callback threw");
                    }
                }
                None => tracing::error!(error = %message, "heat map pipeline failed"),
            }
        }
    }

    /// Write the current scene into the container and leave loading mode.
    pub(crate) fn mount(s: &SharedState) {
        match s.controller.svg_markup() {
            Ok(svg) => s.container.set_inner_html(&svg),
            Err(err) => tracing::error!(error = %err, "could not serialize heat map"),
        }
        if s.controller.stage() != PipelineStage::Loading {
            Self::set_loading(s, false);
        }
    }

    fn set_loading(s: &SharedState, loading: bool) {
        let _ = s
            .container
            .class_list()
            .toggle_with_force(HIDE_CLASS, loading);
        if let Some(indicator) = &s.loading_indicator {
            let _ = indicator.class_list().toggle_with_force(HIDE_CLASS, !loading);
        }
    }
}

impl Drop for HotMapView {
    fn drop(&mut self) {
        let Some(window) = web_sys::window() else {
            return;
        };
        if let Some(listener) = self.resize_listener.take() {
            let _ = window
                .remove_event_listener_with_callback("resize", listener.as_ref().unchecked_ref());
        }
        if let Ok(mut s) = self.state.try_borrow_mut() {
            if let Some(timer_id) = s.resize_timer.take() {
                window.clear_timeout_with_handle(timer_id);
            }
        }
    }
}
