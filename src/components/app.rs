use wasm_bindgen_futures::spawn_local;
use yew::prelude::*;

use super::city_search::CitySearch;
use super::schedule_view::ScheduleView;
use crate::model::{GeoPosition, PositionAction, PositionSource};
use crate::net;
use crate::position::{self, InFlight};
use crate::util::{cerror, clog};

#[derive(Properties, PartialEq)]
pub struct AppProps {
    /// Seconds ahead of UTC, snapshotted once in `main`.
    pub utc_offset_secs: i32,
}

#[function_component(App)]
pub fn app(props: &AppProps) -> Html {
    let position = use_reducer({
        let offset = props.utc_offset_secs;
        move || GeoPosition::unresolved(offset)
    });
    let fragment = use_state(|| AttrValue::from(""));
    let refresh_epoch = use_state(|| 0u32);
    let in_flight = use_memo((), |_| InFlight::new());

    // One automatic resolution pass per page load: the coarse IP lookup
    // first, then the device fix once the coarse attempt settles either way.
    {
        let position = position.clone();
        let in_flight = (*in_flight).clone();
        use_effect_with((), move |_| {
            in_flight.begin();
            let on_fine = {
                let position = position.clone();
                let in_flight = in_flight.clone();
                Callback::from(move |fix: Option<(f64, f64)>| {
                    in_flight.finish();
                    if let Some((latitude, longitude)) = fix {
                        position.dispatch(PositionAction::Resolved {
                            source: PositionSource::Fine,
                            latitude,
                            longitude,
                        });
                    }
                })
            };
            spawn_local(async move {
                match position::coarse_lookup().await {
                    Ok(place) => {
                        if let Some(city) = &place.city {
                            clog(&format!("coarse position: {city}"));
                        }
                        position.dispatch(PositionAction::Resolved {
                            source: PositionSource::Coarse,
                            latitude: place.latitude,
                            longitude: place.longitude,
                        });
                    }
                    Err(err) => cerror(&format!("coarse position lookup failed: {err}")),
                }
                position::request_fine(on_fine);
            });
            || ()
        });
    }

    // Refetch the schedule fragment on every position update and on every
    // rollover of the primary clock.
    {
        let snapshot = *position;
        let fragment = fragment.clone();
        use_effect_with((snapshot.generation, *refresh_epoch), move |_| {
            if snapshot.is_resolved() {
                spawn_local(async move {
                    match net::fetch_text(&net::schedule_url(&snapshot)).await {
                        Ok(html) => fragment.set(AttrValue::from(html)),
                        Err(err) => cerror(&format!("schedule refresh failed: {err}")),
                    }
                });
            }
            || ()
        });
    }

    let on_expired = {
        let refresh_epoch = refresh_epoch.clone();
        Callback::from(move |_| refresh_epoch.set(*refresh_epoch + 1))
    };

    // A manual pick waits out any in-flight automatic lookup so a slow
    // automatic answer cannot immediately clobber the viewer's choice.
    let on_pick = {
        let position = position.clone();
        let in_flight = (*in_flight).clone();
        Callback::from(move |(latitude, longitude): (f64, f64)| {
            let position = position.clone();
            let in_flight = in_flight.clone();
            spawn_local(async move {
                in_flight.settled().await;
                position.dispatch(PositionAction::Resolved {
                    source: PositionSource::Manual,
                    latitude,
                    longitude,
                });
            });
        })
    };

    let waiting = !position.is_resolved();
    html! {
        <div id="root" style="max-width:680px; margin:0 auto; padding:16px; display:flex; flex-direction:column; gap:16px;">
            <header style="display:flex; align-items:center; justify-content:space-between; gap:12px;">
                <h1 style="margin:0; font-size:24px;">{"Vaktija"}</h1>
                <CitySearch on_pick={on_pick} />
            </header>
            { if waiting {
                html! { <div style="opacity:0.7; font-size:14px;">{"Tražim lokaciju..."}</div> }
            } else {
                html! {}
            } }
            <ScheduleView
                fragment={(*fragment).clone()}
                utc_offset_secs={props.utc_offset_secs}
                on_expired={on_expired}
            />
        </div>
    }
}
