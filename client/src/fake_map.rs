//! In-memory map surface for controller tests. Completions can be held back
//! with [`FakeMap::hold`] to reproduce in-flight races.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use futures::future::LocalBoxFuture;
use tokio::sync::watch;

use fleet_map_shared::LatLng;

use crate::map::{MapSurface, MarkerHandle, MarkerIcon, MarkerOptions, PathHandle, PathOptions};

#[derive(Debug, Clone)]
pub struct MarkerRecord {
    pub options: MarkerOptions,
    pub position: LatLng,
    pub icon: Option<MarkerIcon>,
    pub title: Option<String>,
    pub removed: bool,
}

#[derive(Debug, Clone)]
pub struct PathRecord {
    pub options: PathOptions,
    pub removed: bool,
}

#[derive(Debug, Default)]
pub struct FakeState {
    pub markers: Vec<MarkerRecord>,
    pub paths: Vec<PathRecord>,
    pub camera_fits: Vec<Vec<LatLng>>,
    pub add_marker_calls: usize,
    pub add_path_calls: usize,
}

impl FakeState {
    pub fn live_markers(&self) -> usize {
        self.markers.iter().filter(|m| !m.removed).count()
    }

    pub fn live_paths(&self) -> usize {
        self.paths.iter().filter(|p| !p.removed).count()
    }

    pub fn live_handles(&self) -> usize {
        self.live_markers() + self.live_paths()
    }
}

pub struct FakeMap {
    pub state: Rc<RefCell<FakeState>>,
    gate: watch::Sender<bool>,
    fail_markers: Cell<bool>,
    fail_paths: Cell<bool>,
}

impl FakeMap {
    pub fn new() -> Rc<Self> {
        let (gate, _) = watch::channel(true);
        Rc::new(Self {
            state: Rc::new(RefCell::new(FakeState::default())),
            gate,
            fail_markers: Cell::new(false),
            fail_paths: Cell::new(false),
        })
    }

    /// Park every pending and future add call until [`FakeMap::release`].
    pub fn hold(&self) {
        self.gate.send_replace(false);
    }

    pub fn release(&self) {
        self.gate.send_replace(true);
    }

    pub fn fail_markers(&self, fail: bool) {
        self.fail_markers.set(fail);
    }

    pub fn fail_paths(&self, fail: bool) {
        self.fail_paths.set(fail);
    }
}

pub struct FakeMarker {
    index: usize,
    state: Rc<RefCell<FakeState>>,
}

impl MarkerHandle for FakeMarker {
    fn set_position(&self, position: LatLng) {
        self.state.borrow_mut().markers[self.index].position = position;
    }

    fn set_icon(&self, icon: MarkerIcon) {
        self.state.borrow_mut().markers[self.index].icon = Some(icon);
    }

    fn set_title(&self, title: String) {
        self.state.borrow_mut().markers[self.index].title = Some(title);
    }

    fn remove(self) {
        self.state.borrow_mut().markers[self.index].removed = true;
    }
}

pub struct FakePath {
    index: usize,
    state: Rc<RefCell<FakeState>>,
}

impl PathHandle for FakePath {
    fn remove(self) {
        self.state.borrow_mut().paths[self.index].removed = true;
    }
}

impl MapSurface for FakeMap {
    type Marker = FakeMarker;
    type Path = FakePath;

    fn add_marker(
        &self,
        options: MarkerOptions,
    ) -> LocalBoxFuture<'static, Result<Self::Marker, String>> {
        self.state.borrow_mut().add_marker_calls += 1;
        let state = self.state.clone();
        let mut gate = self.gate.subscribe();
        let fail = self.fail_markers.get();
        Box::pin(async move {
            let _ = gate.wait_for(|open| *open).await;
            if fail {
                return Err("marker rejected by map".to_string());
            }
            let mut guard = state.borrow_mut();
            guard.markers.push(MarkerRecord {
                position: options.position,
                icon: options.icon.clone(),
                title: options.title.clone(),
                options,
                removed: false,
            });
            let index = guard.markers.len() - 1;
            drop(guard);
            Ok(FakeMarker { index, state })
        })
    }

    fn add_path(
        &self,
        options: PathOptions,
    ) -> LocalBoxFuture<'static, Result<Self::Path, String>> {
        self.state.borrow_mut().add_path_calls += 1;
        let state = self.state.clone();
        let mut gate = self.gate.subscribe();
        let fail = self.fail_paths.get();
        Box::pin(async move {
            let _ = gate.wait_for(|open| *open).await;
            if fail {
                return Err("path rejected by map".to_string());
            }
            let mut guard = state.borrow_mut();
            guard.paths.push(PathRecord {
                options,
                removed: false,
            });
            let index = guard.paths.len() - 1;
            drop(guard);
            Ok(FakePath { index, state })
        })
    }

    fn fit_camera(&self, positions: &[LatLng]) {
        self.state.borrow_mut().camera_fits.push(positions.to_vec());
    }
}

/// Give spawned local tasks a chance to run to completion.
pub async fn settle() {
    for _ in 0..32 {
        tokio::task::yield_now().await;
    }
}
