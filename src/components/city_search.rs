use wasm_bindgen::JsCast;
use wasm_bindgen_futures::spawn_local;
use web_sys::{Element, HtmlInputElement};
use yew::events::InputEvent;
use yew::prelude::*;

use crate::dom::ListenerGuard;
use crate::net;
use crate::util::cerror;

const MIN_QUERY_LEN: usize = 2;

#[derive(Properties, PartialEq)]
pub struct CitySearchProps {
    /// Receives `(latitude, longitude)` of the picked city.
    pub on_pick: Callback<(f64, f64)>,
}

#[function_component(CitySearch)]
pub fn city_search(props: &CitySearchProps) -> Html {
    let input_ref = use_node_ref();
    let results_ref = use_node_ref();
    let results = use_state(|| AttrValue::from(""));

    let oninput = {
        let input_ref = input_ref.clone();
        let results = results.clone();
        Callback::from(move |_event: InputEvent| {
            let Some(input) = input_ref.cast::<HtmlInputElement>() else {
                return;
            };
            let query = input.value().trim().to_string();
            if query.chars().count() < MIN_QUERY_LEN {
                results.set(AttrValue::from(""));
                return;
            }
            let results = results.clone();
            spawn_local(async move {
                match net::fetch_text(&net::search_url(&query)).await {
                    Ok(html) => results.set(AttrValue::from(html)),
                    Err(err) => cerror(&format!("city search failed: {err}")),
                }
            });
        })
    };

    // The result list is server markup, so picks are caught with one
    // delegated listener on the container instead of per-row callbacks.
    {
        let input_ref = input_ref.clone();
        let results_ref = results_ref.clone();
        let results = results.clone();
        let on_pick = props.on_pick.clone();
        use_effect_with((), move |_| {
            let listener = results_ref.cast::<Element>().and_then(|container| {
                ListenerGuard::attach(container, "click", move |event| {
                    let Some(picked) = picked_coordinates(&event) else {
                        return;
                    };
                    on_pick.emit(picked);
                    if let Some(input) = input_ref.cast::<HtmlInputElement>() {
                        input.set_value("");
                    }
                    results.set(AttrValue::from(""));
                })
            });
            move || drop(listener)
        });
    }

    html! {
        <div style="position:relative; min-width:220px;">
            <input
                ref={input_ref}
                type="search"
                placeholder="Grad..."
                {oninput}
                style="width:100%; padding:6px 10px; font-size:14px;"
            />
            <div ref={results_ref} style="position:absolute; left:0; right:0; z-index:10;">
                { Html::from_html_unchecked((*results).clone()) }
            </div>
        </div>
    }
}

fn picked_coordinates(event: &web_sys::Event) -> Option<(f64, f64)> {
    let target: Element = event.target()?.dyn_into().ok()?;
    let row = target.closest("[data-latitude]").ok()??;
    let latitude = row.get_attribute("data-latitude")?.parse().ok()?;
    let longitude = row.get_attribute("data-longitude")?.parse().ok()?;
    Some((latitude, longitude))
}
