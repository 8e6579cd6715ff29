//! web-sys glue for the countdown machinery: the DOM-backed [`ClockHost`],
//! RAII guards for intervals and event listeners, and a promise-backed sleep.

use js_sys::Promise;
use wasm_bindgen::JsCast;
use wasm_bindgen::closure::Closure;
use wasm_bindgen_futures::JsFuture;
use web_sys::{CustomEvent, CustomEventInit, Element};

use crate::countdown::{ClockHost, Countdown, DisplayMode, HostError};
use crate::util::cerror;

/// Attribute carrying the next-event Unix timestamp (server markup contract).
pub const TIMESTAMP_ATTR: &str = "data-timestamp";
/// Bubbling event dispatched when the primary clock crosses zero.
pub const EXPIRED_EVENT: &str = "vaktija:expired";

/// [`ClockHost`] over a live element.
pub struct DomClockHost {
    element: Element,
}

impl DomClockHost {
    pub fn new(element: Element) -> Self {
        Self { element }
    }
}

impl ClockHost for DomClockHost {
    fn timestamp(&self) -> Result<i64, HostError> {
        let raw = self
            .element
            .get_attribute(TIMESTAMP_ATTR)
            .ok_or(HostError::MissingTimestamp)?;
        raw.trim()
            .parse()
            .map_err(|_| HostError::InvalidTimestamp(raw))
    }

    fn now_millis(&self) -> f64 {
        js_sys::Date::now()
    }

    fn set_text(&mut self, text: &str) {
        // The fragment this element lives in may have been swapped out
        // between arming and this tick; writing into a detached node would
        // be invisible churn.
        if !self.element.is_connected() {
            return;
        }
        self.element.set_text_content(Some(text));
    }

    fn emit_refresh(&mut self) {
        let init = CustomEventInit::new();
        init.set_bubbles(true);
        match CustomEvent::new_with_event_init_dict(EXPIRED_EVENT, &init) {
            Ok(event) => {
                let _ = self.element.dispatch_event(&event);
            }
            Err(err) => cerror(&format!("failed to build {EXPIRED_EVENT} event: {err:?}")),
        }
    }
}

/// A `setInterval` registration that is cleared on drop, so a swapped-out
/// fragment cannot leave its tickers running.
pub struct IntervalGuard {
    id: i32,
    _tick: Closure<dyn FnMut()>,
}

impl IntervalGuard {
    pub fn every_second(mut callback: impl FnMut() + 'static) -> Option<Self> {
        let window = web_sys::window()?;
        let tick = Closure::wrap(Box::new(move || callback()) as Box<dyn FnMut()>);
        match window
            .set_interval_with_callback_and_timeout_and_arguments_0(tick.as_ref().unchecked_ref(), 1000)
        {
            Ok(id) => Some(Self { id, _tick: tick }),
            Err(err) => {
                cerror(&format!("failed to arm interval: {err:?}"));
                None
            }
        }
    }
}

impl Drop for IntervalGuard {
    fn drop(&mut self) {
        if let Some(window) = web_sys::window() {
            window.clear_interval_with_handle(self.id);
        }
    }
}

/// Render `element` immediately, then re-render it at 1 Hz until the
/// returned guard is dropped. Each element gets its own interval, so phases
/// may drift apart but every element is internally consistent.
pub fn arm_countdown(element: Element, mode: DisplayMode, utc_offset_secs: i32) -> Option<IntervalGuard> {
    let mut countdown = Countdown::new(mode, utc_offset_secs);
    let mut host = DomClockHost::new(element);
    countdown.tick(&mut host);
    IntervalGuard::every_second(move || {
        countdown.tick(&mut host);
    })
}

/// An `addEventListener` registration removed on drop.
pub struct ListenerGuard {
    target: Element,
    event: &'static str,
    callback: Closure<dyn FnMut(web_sys::Event)>,
}

impl ListenerGuard {
    pub fn attach(
        target: Element,
        event: &'static str,
        handler: impl FnMut(web_sys::Event) + 'static,
    ) -> Option<Self> {
        let callback = Closure::wrap(Box::new(handler) as Box<dyn FnMut(web_sys::Event)>);
        if let Err(err) =
            target.add_event_listener_with_callback(event, callback.as_ref().unchecked_ref())
        {
            cerror(&format!("failed to attach {event} listener: {err:?}"));
            return None;
        }
        Some(Self {
            target,
            event,
            callback,
        })
    }
}

impl Drop for ListenerGuard {
    fn drop(&mut self) {
        let _ = self
            .target
            .remove_event_listener_with_callback(self.event, self.callback.as_ref().unchecked_ref());
    }
}

/// Resolve after roughly `ms` milliseconds on the browser's timer queue.
pub async fn sleep_ms(ms: i32) {
    let promise = Promise::new(&mut |resolve, _reject| {
        if let Some(window) = web_sys::window() {
            if window
                .set_timeout_with_callback_and_timeout_and_arguments_0(&resolve, ms)
                .is_err()
            {
                let _ = resolve.call0(&wasm_bindgen::JsValue::NULL);
            }
        }
    });
    let _ = JsFuture::from(promise).await;
}
