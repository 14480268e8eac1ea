//! Map surface that only logs draw calls. Lets the controllers run headless.

use std::cell::Cell;

use futures::FutureExt;
use futures::future::LocalBoxFuture;
use tracing::{debug, info};

use fleet_map_client::{
    MapSurface, MarkerHandle, MarkerIcon, MarkerOptions, PathHandle, PathOptions,
};
use fleet_map_shared::LatLng;

#[derive(Debug, Default)]
pub struct TracingMap {
    next_id: Cell<u64>,
}

impl TracingMap {
    fn allocate(&self) -> u64 {
        let id = self.next_id.get() + 1;
        self.next_id.set(id);
        id
    }
}

pub struct TracingMarker {
    id: u64,
}

impl MarkerHandle for TracingMarker {
    fn set_position(&self, position: LatLng) {
        debug!(marker = self.id, lat = position.lat, lng = position.lng, "move marker");
    }

    fn set_icon(&self, icon: MarkerIcon) {
        debug!(marker = self.id, ?icon, "repaint marker");
    }

    fn set_title(&self, _title: String) {}

    fn remove(self) {
        debug!(marker = self.id, "remove marker");
    }
}

pub struct TracingPath {
    id: u64,
}

impl PathHandle for TracingPath {
    fn remove(self) {
        debug!(path = self.id, "remove path");
    }
}

impl MapSurface for TracingMap {
    type Marker = TracingMarker;
    type Path = TracingPath;

    fn add_marker(
        &self,
        options: MarkerOptions,
    ) -> LocalBoxFuture<'static, Result<Self::Marker, String>> {
        let id = self.allocate();
        info!(
            marker = id,
            lat = options.position.lat,
            lng = options.position.lng,
            title = options.title.as_deref().unwrap_or_default(),
            "add marker"
        );
        futures::future::ready(Ok(TracingMarker { id })).boxed_local()
    }

    fn add_path(
        &self,
        options: PathOptions,
    ) -> LocalBoxFuture<'static, Result<Self::Path, String>> {
        let id = self.allocate();
        info!(
            path = id,
            points = options.points.len(),
            color = %options.color.to_hex(),
            "add path"
        );
        futures::future::ready(Ok(TracingPath { id })).boxed_local()
    }

    fn fit_camera(&self, positions: &[LatLng]) {
        debug!(positions = positions.len(), "fit camera");
    }
}
