//! Position resolution: coarse IP lookup, device geolocation, and the
//! in-flight guard that keeps a manual city pick from racing the automatic
//! pipeline.

use std::cell::Cell;
use std::rc::Rc;

use serde::Deserialize;
use wasm_bindgen::JsCast;
use wasm_bindgen::closure::Closure;
use web_sys::{Position, PositionError};
use yew::Callback;

use crate::dom::sleep_ms;
use crate::net::{self, FetchError};

const COARSE_LOOKUP_URL: &str = "https://ipwho.is?fields=latitude,longitude,city";

/// How long a pending manual override waits for the automatic pipeline.
const SETTLE_POLL_MS: i32 = 100;
const SETTLE_POLL_LIMIT: u32 = 30;

/// City-level fix derived from the caller's IP.
#[derive(Debug, Deserialize)]
pub struct CoarsePlace {
    pub latitude: f64,
    pub longitude: f64,
    #[serde(default)]
    pub city: Option<String>,
}

/// Ask the IP lookup service where this connection appears to be.
pub async fn coarse_lookup() -> Result<CoarsePlace, FetchError> {
    let body = net::fetch_text(COARSE_LOOKUP_URL).await?;
    Ok(serde_json::from_str(&body)?)
}

/// Ask the device for a precise fix, once. `on_done` receives `None` when
/// geolocation is unavailable, denied, or errors out; the coarse result
/// (if any) stays applied in that case.
pub fn request_fine(on_done: Callback<Option<(f64, f64)>>) {
    let geolocation = web_sys::window().and_then(|w| w.navigator().geolocation().ok());
    let Some(geolocation) = geolocation else {
        on_done.emit(None);
        return;
    };

    let success = {
        let on_done = on_done.clone();
        Closure::once_into_js(move |fix: Position| {
            let coords = fix.coords();
            on_done.emit(Some((coords.latitude(), coords.longitude())));
        })
    };
    let failure = {
        let on_done = on_done.clone();
        Closure::once_into_js(move |_err: PositionError| {
            on_done.emit(None);
        })
    };
    if geolocation
        .get_current_position_with_error_callback(
            success.unchecked_ref(),
            Some(failure.unchecked_ref()),
        )
        .is_err()
    {
        on_done.emit(None);
    }
}

/// Tracks whether the once-per-load automatic resolution is still running.
///
/// The page shows whatever fix is available immediately; a manual pick only
/// has to wait out this flag so a slow automatic answer cannot clobber the
/// viewer's explicit choice moments later.
#[derive(Clone, Default)]
pub struct InFlight(Rc<Cell<bool>>);

impl InFlight {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn begin(&self) {
        self.0.set(true);
    }

    pub fn finish(&self) {
        self.0.set(false);
    }

    pub fn is_active(&self) -> bool {
        self.0.get()
    }

    /// Wait until the automatic pipeline settles, polling the flag on the
    /// timer queue. Bounded: after `SETTLE_POLL_LIMIT` rounds the caller
    /// proceeds anyway rather than hang on a lookup that never answers.
    pub async fn settled(&self) {
        for _ in 0..SETTLE_POLL_LIMIT {
            if !self.is_active() {
                return;
            }
            sleep_ms(SETTLE_POLL_MS).await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn in_flight_flag_round_trips() {
        let flag = InFlight::new();
        assert!(!flag.is_active());
        flag.begin();
        assert!(flag.is_active());
        // clones share the underlying flag
        let viewer = flag.clone();
        flag.finish();
        assert!(!viewer.is_active());
    }

    #[test]
    fn coarse_payload_decodes_with_and_without_city() {
        let with_city: CoarsePlace =
            serde_json::from_str(r#"{"latitude":43.14,"longitude":20.52,"city":"Novi Pazar"}"#)
                .unwrap();
        assert_eq!(with_city.city.as_deref(), Some("Novi Pazar"));

        let bare: CoarsePlace =
            serde_json::from_str(r#"{"latitude":43.14,"longitude":20.52}"#).unwrap();
        assert!(bare.city.is_none());
        assert_eq!(bare.longitude, 20.52);
    }
}
