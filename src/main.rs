mod components;
mod countdown;
mod dom;
mod duration;
mod model;
mod net;
mod position;
mod util;

use components::app::{App, AppProps};

fn main() {
    // Snapshotted once per page load; every duration computation reuses it.
    let utc_offset_secs = util::local_utc_offset_seconds();
    yew::Renderer::<App>::with_props(AppProps { utc_offset_secs }).render();
}
