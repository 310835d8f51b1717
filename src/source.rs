//! Data sources for the heat map.
//!
//! A source performs the single asynchronous fetch of the pipeline and
//! yields raw rows; everything after that is synchronous.

use crate::csv::{parse_rows, Delimiter};
use crate::error::Result;
use crate::types::RawRow;

/// Something that can produce the spreadsheet rows once.
///
/// Futures are not required to be `Send`: the browser fetch is bound to the
/// main thread.
#[allow(async_fn_in_trait)]
pub trait RecordSource {
    async fn fetch(&self) -> Result<Vec<RawRow>>;
}

/// CSV text already in memory (CLI input, tests, inlined data).
#[derive(Debug, Clone)]
pub struct CsvSource {
    data: Vec<u8>,
}

impl CsvSource {
    pub fn new(data: impl Into<Vec<u8>>) -> Self {
        Self { data: data.into() }
    }
}

impl RecordSource for CsvSource {
    async fn fetch(&self) -> Result<Vec<RawRow>> {
        parse_rows(&self.data, Delimiter::Comma)
    }
}

/// Rows handed over directly by the host.
#[derive(Debug, Clone, Default)]
pub struct StaticSource {
    rows: Vec<RawRow>,
}

impl StaticSource {
    pub fn new(rows: Vec<RawRow>) -> Self {
        Self { rows }
    }
}

impl RecordSource for StaticSource {
    async fn fetch(&self) -> Result<Vec<RawRow>> {
        Ok(self.rows.clone())
    }
}

/// Published-sheet CSV fetched over HTTP with the browser `fetch` API.
#[cfg(target_arch = "wasm32")]
#[derive(Debug, Clone)]
pub struct FetchCsvSource {
    url: String,
}

#[cfg(target_arch = "wasm32")]
impl FetchCsvSource {
    pub fn new(url: impl Into<String>) -> Self {
        Self { url: url.into() }
    }
}

#[cfg(target_arch = "wasm32")]
impl RecordSource for FetchCsvSource {
    async fn fetch(&self) -> Result<Vec<RawRow>> {
        use crate::error::HotmapError;
        use wasm_bindgen::JsCast;
        use wasm_bindgen_futures::JsFuture;

        let window =
            web_sys::window().ok_or_else(|| HotmapError::data_source("no window object"))?;
        let resp_value = JsFuture::from(window.fetch_with_str(&self.url))
            .await
            .map_err(|e| HotmapError::data_source(format!("fetch {} failed: {e:?}", self.url)))?;
        let resp: web_sys::Response = resp_value
            .dyn_into()
            .map_err(|_| HotmapError::data_source("fetch did not return a Response"))?;
        if !resp.ok() {
            return Err(HotmapError::data_source(format!(
                "{} answered HTTP {}",
                self.url,
                resp.status()
            )));
        }
        let text_promise = resp
            .text()
            .map_err(|e| HotmapError::data_source(format!("reading body: {e:?}")))?;
        let text = JsFuture::from(text_promise)
            .await
            .map_err(|e| HotmapError::data_source(format!("reading body: {e:?}")))?
            .as_string()
            .ok_or_else(|| HotmapError::data_source("response body is not text"))?;
        parse_rows(text.as_bytes(), Delimiter::Comma)
    }
}
