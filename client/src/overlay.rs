use std::cell::RefCell;
use std::rc::Rc;

use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::{debug, warn};

use fleet_map_shared::colors::random_path_color;
use fleet_map_shared::{Endpoints, Itinerary, Rgb, Waypoint};

use crate::config::{END_MARKER_TITLE, OverlayConfig, START_MARKER_TITLE};
use crate::map::{MapSurface, MarkerHandle, MarkerIcon, MarkerOptions, PathHandle, PathOptions};
use crate::spawn::spawn_local;
use crate::telemetry::ObservabilityCounters;

pub fn endpoint_options(waypoint: &Waypoint, is_end: bool, color: Rgb) -> MarkerOptions {
    let title = if is_end {
        END_MARKER_TITLE
    } else {
        START_MARKER_TITLE
    };
    MarkerOptions {
        position: waypoint.position(),
        icon: Some(MarkerIcon::Tint(color)),
        title: Some(title.to_string()),
    }
}

struct OverlayState<M: MapSurface> {
    generation: u64,
    active: bool,
    color: Option<Rgb>,
    path: Option<M::Path>,
    start: Option<M::Marker>,
    end: Option<M::Marker>,
}

impl<M: MapSurface> Default for OverlayState<M> {
    fn default() -> Self {
        Self {
            generation: 0,
            active: false,
            color: None,
            path: None,
            start: None,
            end: None,
        }
    }
}

impl<M: MapSurface> OverlayState<M> {
    fn holds_anything(&self) -> bool {
        self.active || self.path.is_some() || self.start.is_some() || self.end.is_some()
    }
}

/// Draws one itinerary at a time: the route polyline plus start and end pins.
pub struct TrajectoryOverlay<M: MapSurface> {
    map: Rc<M>,
    config: OverlayConfig,
    rng: RefCell<StdRng>,
    counters: Rc<ObservabilityCounters>,
    state: Rc<RefCell<OverlayState<M>>>,
}

impl<M: MapSurface> TrajectoryOverlay<M> {
    pub fn new(map: Rc<M>, config: OverlayConfig) -> Self {
        Self {
            map,
            config,
            rng: RefCell::new(StdRng::from_os_rng()),
            counters: Rc::new(ObservabilityCounters::default()),
            state: Rc::new(RefCell::new(OverlayState::default())),
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = RefCell::new(StdRng::seed_from_u64(seed));
        self
    }

    pub fn with_counters(mut self, counters: Rc<ObservabilityCounters>) -> Self {
        self.counters = counters;
        self
    }

    pub fn counters(&self) -> &Rc<ObservabilityCounters> {
        &self.counters
    }

    /// Draw `itinerary`, replacing whatever overlay is currently shown.
    pub fn show(&self, itinerary: &Itinerary) {
        if self.state.borrow().holds_anything() {
            self.hide();
        }

        let color = random_path_color(&mut *self.rng.borrow_mut());
        let generation = {
            let mut state = self.state.borrow_mut();
            state.generation += 1;
            state.active = true;
            state.color = Some(color);
            state.generation
        };
        self.counters.record_overlay_shown();

        match itinerary.endpoints() {
            Some(endpoints) => self.spawn_endpoints(endpoints, color, generation),
            None => debug!(
                waypoints = itinerary.len(),
                "itinerary has fewer than two outbound waypoints, skipping endpoints"
            ),
        }

        let points = itinerary.path_points();
        if points.len() >= 2 {
            self.spawn_path(
                PathOptions {
                    points,
                    color,
                    width: self.config.path_width,
                    z_index: self.config.path_z_index,
                },
                generation,
            );
        } else {
            debug!(points = points.len(), "itinerary too short for a path");
        }
    }

    fn spawn_endpoints(&self, endpoints: Endpoints, color: Rgb, generation: u64) {
        let map = self.map.clone();
        let state = self.state.clone();
        let counters = self.counters.clone();

        spawn_local(async move {
            if state.borrow().generation != generation {
                counters.record_discarded_completion();
                return;
            }
            let start = map
                .add_marker(endpoint_options(&endpoints.from, false, color))
                .await;
            let start = match start {
                Ok(marker) => marker,
                Err(e) => {
                    warn!(error = %e, "map rejected itinerary start marker");
                    counters.record_map_call_failure();
                    return;
                }
            };
            if !store(&*state, generation, &counters, start, |s, m| s.start = Some(m)) {
                return;
            }

            let end = map
                .add_marker(endpoint_options(&endpoints.to, true, color))
                .await;
            match end {
                Ok(marker) => {
                    store(&*state, generation, &counters, marker, |s, m| s.end = Some(m));
                }
                Err(e) => {
                    warn!(error = %e, "map rejected itinerary end marker");
                    counters.record_map_call_failure();
                }
            }
        });
    }

    fn spawn_path(&self, options: PathOptions, generation: u64) {
        let create = self.map.add_path(options);
        let state = self.state.clone();
        let counters = self.counters.clone();

        spawn_local(async move {
            let path = match create.await {
                Ok(path) => path,
                Err(e) => {
                    warn!(error = %e, "map rejected itinerary path");
                    counters.record_map_call_failure();
                    return;
                }
            };

            let mut guard = state.borrow_mut();
            if guard.generation != generation {
                drop(guard);
                counters.record_discarded_completion();
                path.remove();
                return;
            }
            guard.path = Some(path);
        });
    }

    /// Remove the path and both endpoint markers. No-op when nothing is shown.
    pub fn hide(&self) {
        let (path, start, end) = {
            let mut state = self.state.borrow_mut();
            if !state.holds_anything() {
                return;
            }
            state.generation += 1;
            state.active = false;
            state.color = None;
            (state.path.take(), state.start.take(), state.end.take())
        };

        if let Some(path) = path {
            path.remove();
        }
        if let Some(start) = start {
            start.remove();
        }
        if let Some(end) = end {
            end.remove();
        }
    }

    pub fn is_shown(&self) -> bool {
        self.state.borrow().active
    }

    /// Color of the overlay currently shown.
    pub fn color(&self) -> Option<Rgb> {
        self.state.borrow().color
    }

    pub fn has_path(&self) -> bool {
        self.state.borrow().path.is_some()
    }

    pub fn endpoint_count(&self) -> usize {
        let state = self.state.borrow();
        usize::from(state.start.is_some()) + usize::from(state.end.is_some())
    }
}

/// Keep `marker` if its overlay is still current, otherwise take it off the map.
fn store<M: MapSurface>(
    state: &RefCell<OverlayState<M>>,
    generation: u64,
    counters: &ObservabilityCounters,
    marker: M::Marker,
    put: impl FnOnce(&mut OverlayState<M>, M::Marker),
) -> bool {
    let mut guard = state.borrow_mut();
    if guard.generation != generation {
        drop(guard);
        counters.record_discarded_completion();
        marker.remove();
        return false;
    }
    put(&mut *guard, marker);
    true
}
