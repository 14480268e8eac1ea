use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use chrono::{DateTime, Utc};
use tracing::{debug, warn};

use fleet_map_shared::staleness::tier_at;
use fleet_map_shared::time_format::format_age_between;
use fleet_map_shared::{EntityId, EntitySnapshot, LatLng, StalenessTier};

use crate::config::{IconSet, TrackerConfig};
use crate::map::{MapSurface, MarkerHandle, MarkerOptions};
use crate::spawn::spawn_local;
use crate::telemetry::ObservabilityCounters;

pub type Clock = Rc<dyn Fn() -> DateTime<Utc>>;

/// Info window text shown when a vehicle marker is tapped.
pub fn marker_title(snapshot: &EntitySnapshot, now: DateTime<Utc>) -> String {
    format!(
        "{} ({})\nVelocidade: {:.0} Km/h\nDireção: {}\nAtualizado há {}",
        snapshot.id,
        snapshot.label,
        snapshot.speed,
        snapshot.heading,
        format_age_between(snapshot.last_update, now)
    )
}

pub fn marker_options(
    snapshot: &EntitySnapshot,
    now: DateTime<Utc>,
    icons: &IconSet,
) -> MarkerOptions {
    MarkerOptions {
        position: snapshot.position(),
        icon: Some(icons.icon(tier_at(snapshot.last_update, now))),
        title: Some(marker_title(snapshot, now)),
    }
}

/// A vehicle currently drawn on the map.
pub struct TrackedMarker<H> {
    pub handle: H,
    pub snapshot: EntitySnapshot,
    /// Tier of the icon currently painted.
    pub tier: StalenessTier,
}

enum Slot<H> {
    /// `add_marker` is in flight; holds the latest snapshot that arrived meanwhile.
    Pending {
        latest: EntitySnapshot,
        created_from_seq: u64,
        latest_seq: u64,
        painted: StalenessTier,
    },
    Live(TrackedMarker<H>),
}

struct TrackerState<H> {
    slots: HashMap<EntityId, Slot<H>>,
    /// Live ids in creation order, used to frame the camera.
    order: Vec<EntityId>,
    generation: u64,
    next_seq: u64,
}

impl<H> Default for TrackerState<H> {
    fn default() -> Self {
        Self {
            slots: HashMap::new(),
            order: Vec::new(),
            generation: 0,
            next_seq: 0,
        }
    }
}

impl<H> TrackerState<H> {
    fn live(&self, id: &EntityId) -> Option<&TrackedMarker<H>> {
        match self.slots.get(id) {
            Some(Slot::Live(entry)) => Some(entry),
            _ => None,
        }
    }

    fn viewport_positions(&self) -> Vec<LatLng> {
        self.order
            .iter()
            .filter_map(|id| self.live(id))
            .map(|entry| entry.snapshot.position())
            .collect()
    }
}

/// Keeps one map marker per vehicle and moves it as snapshots arrive.
///
/// All methods must be called from the thread that owns the map. Marker
/// creation runs as a local task; see [`crate::spawn::spawn_local`].
pub struct EntityMarkerTracker<M: MapSurface> {
    map: Rc<M>,
    config: TrackerConfig,
    clock: Clock,
    counters: Rc<ObservabilityCounters>,
    state: Rc<RefCell<TrackerState<M::Marker>>>,
}

impl<M: MapSurface> EntityMarkerTracker<M> {
    pub fn new(map: Rc<M>, config: TrackerConfig) -> Self {
        Self {
            map,
            config,
            clock: Rc::new(Utc::now),
            counters: Rc::new(ObservabilityCounters::default()),
            state: Rc::new(RefCell::new(TrackerState::default())),
        }
    }

    pub fn with_clock(mut self, clock: impl Fn() -> DateTime<Utc> + 'static) -> Self {
        self.clock = Rc::new(clock);
        self
    }

    pub fn with_counters(mut self, counters: Rc<ObservabilityCounters>) -> Self {
        self.counters = counters;
        self
    }

    pub fn counters(&self) -> &Rc<ObservabilityCounters> {
        &self.counters
    }

    /// Create the vehicle's marker on first sight, otherwise move it.
    pub fn upsert(&self, snapshot: EntitySnapshot) {
        if let Err(e) = snapshot.validate() {
            warn!(error = %e, "ignoring malformed snapshot");
            self.counters.record_rejected_snapshot();
            return;
        }

        let mut guard = self.state.borrow_mut();
        let state = &mut *guard;
        state.next_seq += 1;
        let seq = state.next_seq;

        match state.slots.get_mut(&snapshot.id) {
            Some(Slot::Live(entry)) => {
                entry.handle.set_position(snapshot.position());
                entry.snapshot = snapshot;
                self.counters.record_position_update();
            }
            Some(Slot::Pending {
                latest, latest_seq, ..
            }) => {
                *latest = snapshot;
                *latest_seq = seq;
                self.counters.record_coalesced_update();
            }
            None => {
                let generation = state.generation;
                let id = snapshot.id.clone();
                let now = (self.clock)();
                let options = marker_options(&snapshot, now, &self.config.icons);
                let painted = tier_at(snapshot.last_update, now);
                state.slots.insert(
                    id.clone(),
                    Slot::Pending {
                        latest: snapshot,
                        created_from_seq: seq,
                        latest_seq: seq,
                        painted,
                    },
                );
                drop(guard);
                self.spawn_create(id, options, generation);
            }
        }
    }

    fn spawn_create(&self, id: EntityId, options: MarkerOptions, generation: u64) {
        let creator = Creator {
            map: self.map.clone(),
            state: self.state.clone(),
            counters: self.counters.clone(),
            clock: self.clock.clone(),
            icons: self.config.icons.clone(),
        };
        creator.spawn(id, options, generation);
    }

    /// Repaint icons and info text against the current time.
    ///
    /// Icons are only chosen at creation, so callers run this on a timer to
    /// let markers age between snapshots. Returns how many icons changed.
    pub fn refresh(&self) -> usize {
        let now = (self.clock)();
        let mut state = self.state.borrow_mut();
        let mut changed = 0;
        for slot in state.slots.values_mut() {
            let Slot::Live(entry) = slot else {
                continue;
            };
            let tier = tier_at(entry.snapshot.last_update, now);
            if tier != entry.tier {
                entry.handle.set_icon(self.config.icons.icon(tier));
                entry.tier = tier;
                changed += 1;
            }
            entry.handle.set_title(marker_title(&entry.snapshot, now));
        }
        drop(state);
        if changed > 0 {
            self.counters.record_icon_refreshes(changed as u64);
        }
        changed
    }

    /// Remove every vehicle marker. Creations still in flight are dropped
    /// when they complete.
    pub fn clear_all(&self) {
        let mut state = self.state.borrow_mut();
        state.generation += 1;
        state.order.clear();
        let slots = std::mem::take(&mut state.slots);
        drop(state);

        let mut removed = 0usize;
        for slot in slots.into_values() {
            if let Slot::Live(entry) = slot {
                entry.handle.remove();
                removed += 1;
            }
        }
        if removed > 0 {
            debug!(removed, "cleared vehicle markers");
        }
    }

    pub fn len(&self) -> usize {
        self.state.borrow().order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn is_pending(&self, id: &EntityId) -> bool {
        matches!(self.state.borrow().slots.get(id), Some(Slot::Pending { .. }))
    }

    /// Live ids in creation order.
    pub fn tracked_ids(&self) -> Vec<EntityId> {
        self.state.borrow().order.clone()
    }

    pub fn position(&self, id: &EntityId) -> Option<LatLng> {
        self.state
            .borrow()
            .live(id)
            .map(|entry| entry.snapshot.position())
    }

    pub fn tier(&self, id: &EntityId) -> Option<StalenessTier> {
        self.state.borrow().live(id).map(|entry| entry.tier)
    }

    pub fn viewport_positions(&self) -> Vec<LatLng> {
        self.state.borrow().viewport_positions()
    }
}

/// Everything a marker creation task needs once it outlives the `upsert` call.
struct Creator<M: MapSurface> {
    map: Rc<M>,
    state: Rc<RefCell<TrackerState<M::Marker>>>,
    counters: Rc<ObservabilityCounters>,
    clock: Clock,
    icons: IconSet,
}

impl<M: MapSurface> Creator<M> {
    fn spawn(self, id: EntityId, options: MarkerOptions, generation: u64) {
        let create = self.map.add_marker(options);

        spawn_local(async move {
            let result = create.await;
            let mut state = self.state.borrow_mut();

            let handle = match result {
                Ok(handle) => handle,
                Err(e) => {
                    warn!(id = %id, error = %e, "map rejected vehicle marker");
                    self.counters.record_map_call_failure();
                    if state.generation != generation {
                        return;
                    }
                    let pending = matches!(state.slots.get(&id), Some(Slot::Pending { .. }));
                    let mut retry = None;
                    // A newer snapshot arrived while the rejected call was in flight.
                    if let Some(Slot::Pending {
                        latest,
                        created_from_seq,
                        latest_seq,
                        painted,
                    }) = state.slots.get_mut(&id)
                    {
                        if *latest_seq > *created_from_seq {
                            let now = (self.clock)();
                            *created_from_seq = *latest_seq;
                            *painted = tier_at(latest.last_update, now);
                            retry = Some(marker_options(latest, now, &self.icons));
                        }
                    }
                    if pending && retry.is_none() {
                        state.slots.remove(&id);
                    }
                    drop(state);
                    if let Some(options) = retry {
                        debug!(id = %id, "retrying vehicle marker with newer snapshot");
                        self.spawn(id, options, generation);
                    }
                    return;
                }
            };

            if state.generation != generation {
                debug!(id = %id, "discarding marker created before clear");
                self.counters.record_discarded_completion();
                drop(state);
                handle.remove();
                return;
            }

            let (latest, created_from_seq, latest_seq, painted) = match state.slots.remove(&id) {
                Some(Slot::Pending {
                    latest,
                    created_from_seq,
                    latest_seq,
                    painted,
                }) => (latest, created_from_seq, latest_seq, painted),
                other => {
                    if let Some(slot) = other {
                        state.slots.insert(id.clone(), slot);
                    }
                    debug!(id = %id, "marker completion has no pending slot");
                    self.counters.record_discarded_completion();
                    drop(state);
                    handle.remove();
                    return;
                }
            };

            // Snapshots that arrived while the marker was being created win.
            if latest_seq > created_from_seq {
                handle.set_position(latest.position());
                self.counters.record_position_update();
            }

            state.slots.insert(
                id.clone(),
                Slot::Live(TrackedMarker {
                    handle,
                    snapshot: latest,
                    tier: painted,
                }),
            );
            state.order.push(id.clone());
            self.counters.record_marker_created();

            let positions = state.viewport_positions();
            drop(state);
            debug!(id = %id, tracked = positions.len(), "vehicle marker created");
            self.map.fit_camera(&positions);
        });
    }
}
