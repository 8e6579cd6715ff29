//! Viewer position state shared across the page.

use std::rc::Rc;
use yew::Reducible;

/// Where a position fix came from. Precision ranks Coarse < Fine < Manual,
/// but resolution order is not guaranteed and the state is deliberately
/// last-write-wins.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PositionSource {
    /// IP-derived, city-level accuracy, arrives first on most loads.
    Coarse,
    /// Device geolocation, if the viewer grants it.
    Fine,
    /// A city picked from the search box.
    Manual,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GeoPosition {
    pub latitude: f64,
    pub longitude: f64,
    /// Seconds ahead of UTC, snapshotted once per page load.
    pub timezone_offset_secs: i32,
    /// `None` until the first resolution lands.
    pub source: Option<PositionSource>,
    /// Bumped on every write so each update is observable even when the
    /// coordinates themselves do not change.
    pub generation: u32,
}

impl GeoPosition {
    pub fn unresolved(timezone_offset_secs: i32) -> Self {
        Self {
            latitude: 0.0,
            longitude: 0.0,
            timezone_offset_secs,
            source: None,
            generation: 0,
        }
    }

    pub fn is_resolved(&self) -> bool {
        self.source.is_some()
    }
}

#[derive(Clone, Debug)]
pub enum PositionAction {
    Resolved {
        source: PositionSource,
        latitude: f64,
        longitude: f64,
    },
}

impl Reducible for GeoPosition {
    type Action = PositionAction;

    fn reduce(self: Rc<Self>, action: Self::Action) -> Rc<Self> {
        match action {
            PositionAction::Resolved {
                source,
                latitude,
                longitude,
            } => Rc::new(Self {
                latitude,
                longitude,
                timezone_offset_secs: self.timezone_offset_secs,
                source: Some(source),
                generation: self.generation.wrapping_add(1),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resolve(state: Rc<GeoPosition>, source: PositionSource, lat: f64, lon: f64) -> Rc<GeoPosition> {
        state.reduce(PositionAction::Resolved {
            source,
            latitude: lat,
            longitude: lon,
        })
    }

    #[test]
    fn fine_overwrites_coarse() {
        let state = Rc::new(GeoPosition::unresolved(3600));
        let state = resolve(state, PositionSource::Coarse, 43.14, 20.52);
        let state = resolve(state, PositionSource::Fine, 43.1406976, 20.5213617);
        assert_eq!(state.source, Some(PositionSource::Fine));
        assert_eq!(state.latitude, 43.1406976);
        assert_eq!(state.timezone_offset_secs, 3600);
    }

    #[test]
    fn late_coarse_still_wins_after_fine() {
        // no ordering guarantee: whoever writes last is visible
        let state = Rc::new(GeoPosition::unresolved(0));
        let state = resolve(state, PositionSource::Fine, 44.0, 21.0);
        let state = resolve(state, PositionSource::Coarse, 43.0, 20.0);
        assert_eq!(state.source, Some(PositionSource::Coarse));
        assert_eq!(state.longitude, 20.0);
    }

    #[test]
    fn every_write_bumps_the_generation() {
        let state = Rc::new(GeoPosition::unresolved(0));
        assert_eq!(state.generation, 0);
        assert!(!state.is_resolved());
        let state = resolve(state, PositionSource::Coarse, 1.0, 1.0);
        assert_eq!(state.generation, 1);
        // identical coordinates still count as an update
        let state = resolve(state, PositionSource::Manual, 1.0, 1.0);
        assert_eq!(state.generation, 2);
        assert_eq!(state.source, Some(PositionSource::Manual));
    }
}
