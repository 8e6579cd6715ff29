// Console logging and the per-load clock offset snapshot.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::JsValue;

pub fn clog(msg: &str) {
    #[cfg(target_arch = "wasm32")]
    web_sys::console::log_1(&JsValue::from_str(msg));
    #[cfg(not(target_arch = "wasm32"))]
    println!("{msg}");
}

pub fn cerror(msg: &str) {
    #[cfg(target_arch = "wasm32")]
    web_sys::console::error_1(&JsValue::from_str(msg));
    #[cfg(not(target_arch = "wasm32"))]
    eprintln!("{msg}");
}

/// The viewer's offset from UTC in seconds, read once at startup and passed
/// down explicitly. `getTimezoneOffset` reports minutes *behind* UTC while
/// the schedule math treats the offset as *ahead*, hence the negation.
pub fn local_utc_offset_seconds() -> i32 {
    (js_sys::Date::new_0().get_timezone_offset() * -60.0) as i32
}
