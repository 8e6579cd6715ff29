use web_sys::Element;
use yew::prelude::*;

use crate::countdown::DisplayMode;
use crate::dom::{self, IntervalGuard, ListenerGuard};

/// Element ids/classes the server promises in the schedule fragment.
pub const PRIMARY_CLOCK_ID: &str = "time";
pub const BADGE_CLASS: &str = "kasno";

#[derive(Properties, PartialEq)]
pub struct ScheduleViewProps {
    /// Server-rendered schedule markup, swapped wholesale on refresh.
    pub fragment: AttrValue,
    pub utc_offset_secs: i32,
    /// Fired once when the primary clock rolls over.
    pub on_expired: Callback<()>,
}

/// Renders the schedule fragment and keeps its countdown elements ticking.
///
/// Every fragment swap re-runs the effect: the old tickers and listener are
/// dropped (cancelling their intervals) before fresh ones attach to the new
/// elements, so nothing keeps mutating detached nodes.
#[function_component(ScheduleView)]
pub fn schedule_view(props: &ScheduleViewProps) -> Html {
    let container_ref = use_node_ref();

    {
        let container_ref = container_ref.clone();
        let on_expired = props.on_expired.clone();
        let utc_offset_secs = props.utc_offset_secs;
        use_effect_with(props.fragment.clone(), move |_| {
            let mut tickers: Vec<IntervalGuard> = Vec::new();
            if let Some(document) = web_sys::window().and_then(|w| w.document()) {
                if let Some(el) = document.get_element_by_id(PRIMARY_CLOCK_ID) {
                    tickers.extend(dom::arm_countdown(el, DisplayMode::Clock, utc_offset_secs));
                }
                let badges = document.get_elements_by_class_name(BADGE_CLASS);
                for i in 0..badges.length() {
                    if let Some(el) = badges.item(i) {
                        tickers.extend(dom::arm_countdown(el, DisplayMode::Relative, utc_offset_secs));
                    }
                }
            }
            let expiry_listener = container_ref.cast::<Element>().and_then(|container| {
                ListenerGuard::attach(container, dom::EXPIRED_EVENT, move |_event| {
                    on_expired.emit(());
                })
            });
            move || {
                drop(tickers);
                drop(expiry_listener);
            }
        });
    }

    html! {
        <div id="vaktija" ref={container_ref}>
            { Html::from_html_unchecked(props.fragment.clone()) }
        </div>
    }
}
