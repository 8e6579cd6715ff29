//! Fetch plumbing and endpoint URLs.

use thiserror::Error;
use wasm_bindgen::JsCast;
use wasm_bindgen::JsValue;
use wasm_bindgen_futures::JsFuture;
use web_sys::Response;

use crate::model::GeoPosition;

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request failed: {0}")]
    Request(String),
    #[error("server answered {0}")]
    Status(u16),
    #[error("response body unreadable: {0}")]
    Body(String),
    #[error("unexpected payload: {0}")]
    Decode(#[from] serde_json::Error),
}

fn js_detail(value: JsValue) -> String {
    value.as_string().unwrap_or_else(|| format!("{value:?}"))
}

/// GET `url` and hand back the body as text.
pub async fn fetch_text(url: &str) -> Result<String, FetchError> {
    let window = web_sys::window().ok_or_else(|| FetchError::Request("no window".into()))?;
    let response = JsFuture::from(window.fetch_with_str(url))
        .await
        .map_err(|e| FetchError::Request(js_detail(e)))?;
    let response: Response = response
        .dyn_into()
        .map_err(|e| FetchError::Request(js_detail(e)))?;
    if !response.ok() {
        return Err(FetchError::Status(response.status()));
    }
    let body = JsFuture::from(response.text().map_err(|e| FetchError::Body(js_detail(e)))?)
        .await
        .map_err(|e| FetchError::Body(js_detail(e)))?;
    body.as_string()
        .ok_or_else(|| FetchError::Body("body is not text".into()))
}

/// Schedule fragment for a resolved position.
pub fn schedule_url(position: &GeoPosition) -> String {
    format!(
        "/vaktija?latitude={}&longitude={}&timezone={}",
        position.latitude, position.longitude, position.timezone_offset_secs
    )
}

/// City search fragment for a query string.
pub fn search_url(query: &str) -> String {
    let encoded: String = js_sys::encode_uri_component(query).into();
    format!("/search?q={encoded}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::PositionSource;

    #[test]
    fn schedule_url_carries_the_whole_position() {
        let position = GeoPosition {
            latitude: 43.14,
            longitude: 20.52,
            timezone_offset_secs: 7200,
            source: Some(PositionSource::Coarse),
            generation: 1,
        };
        assert_eq!(
            schedule_url(&position),
            "/vaktija?latitude=43.14&longitude=20.52&timezone=7200"
        );
    }

    #[test]
    fn schedule_url_keeps_negative_offsets() {
        let mut position = GeoPosition::unresolved(-18000);
        position.latitude = 40.7;
        position.longitude = -74.0;
        assert_eq!(
            schedule_url(&position),
            "/vaktija?latitude=40.7&longitude=-74&timezone=-18000"
        );
    }
}
