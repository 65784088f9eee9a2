//! Fetch API transport.
//!
//! Streams a response body through its `ReadableStreamDefaultReader`, so the
//! loader sees bytes as they arrive instead of after the whole download.

use async_trait::async_trait;
use futures::StreamExt;
use futures::stream;
use js_sys::{Reflect, Uint8Array};
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys::{ReadableStreamDefaultReader, Request, RequestInit, RequestMode, Response};

use crate::core::error::FetchError;
use crate::core::{ByteStream, Transport};

/// Transport resolving content refs against a base URL.
#[derive(Clone, Debug, Default)]
pub struct FetchTransport {
    base_url: String,
}

impl FetchTransport {
    /// `base_url` is prepended to every ref; empty means page-relative.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
        }
    }

    fn url(&self, resource: &str) -> String {
        if self.base_url.is_empty() {
            resource.to_string()
        } else {
            format!("{}/{}", self.base_url.trim_end_matches('/'), resource)
        }
    }
}

fn js_message(value: &JsValue) -> String {
    value
        .as_string()
        .or_else(|| {
            Reflect::get(value, &JsValue::from_str("message"))
                .ok()
                .and_then(|m| m.as_string())
        })
        .unwrap_or_else(|| "network error".to_string())
}

/// Read the next chunk; `None` once the body is exhausted.
async fn read_chunk(reader: &ReadableStreamDefaultReader) -> Option<Result<Vec<u8>, FetchError>> {
    let result = match JsFuture::from(reader.read()).await {
        Ok(result) => result,
        Err(err) => return Some(Err(FetchError::Transport(js_message(&err)))),
    };

    let done = Reflect::get(&result, &JsValue::from_str("done"))
        .ok()
        .and_then(|d| d.as_bool())
        .unwrap_or(true);
    if done {
        return None;
    }

    match Reflect::get(&result, &JsValue::from_str("value")) {
        Ok(value) => Some(Ok(Uint8Array::new(&value).to_vec())),
        Err(err) => Some(Err(FetchError::Transport(js_message(&err)))),
    }
}

#[async_trait(?Send)]
impl Transport for FetchTransport {
    async fn fetch(&self, resource: &str) -> Result<ByteStream, FetchError> {
        let window = web_sys::window().ok_or_else(|| FetchError::Transport("no window".to_string()))?;

        let opts = RequestInit::new();
        opts.set_method("GET");
        opts.set_mode(RequestMode::Cors);

        let request = Request::new_with_str_and_init(&self.url(resource), &opts)
            .map_err(|err| FetchError::Transport(js_message(&err)))?;

        let resp: Response = JsFuture::from(window.fetch_with_request(&request))
            .await
            .map_err(|err| FetchError::Transport(js_message(&err)))?
            .dyn_into()
            .map_err(|_| FetchError::Transport("invalid response".to_string()))?;

        if resp.status() == 404 {
            return Err(FetchError::NotFound);
        }
        if !resp.ok() {
            return Err(FetchError::HttpError {
                status: resp.status(),
                reason: resp.status_text(),
            });
        }

        let Some(body) = resp.body() else {
            return Ok(stream::empty().boxed_local());
        };
        let reader: ReadableStreamDefaultReader = body.get_reader().unchecked_into();

        Ok(stream::unfold(reader, |reader| async move {
            let chunk = read_chunk(&reader).await?;
            Some((chunk, reader))
        })
        .boxed_local())
    }
}
