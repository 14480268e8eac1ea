//! Capability surface the controllers draw through. Implemented by whatever
//! map widget hosts the fleet view.

use futures::future::LocalBoxFuture;

use fleet_map_shared::{LatLng, Rgb};

#[derive(Debug, Clone, PartialEq)]
pub enum MarkerIcon {
    /// Image asset with its display size in pixels.
    Asset {
        url: String,
        width: u32,
        height: u32,
    },
    /// Provider's default pin tinted with a color.
    Tint(Rgb),
}

#[derive(Debug, Clone, PartialEq)]
pub struct MarkerOptions {
    pub position: LatLng,
    pub icon: Option<MarkerIcon>,
    pub title: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PathOptions {
    pub points: Vec<LatLng>,
    pub color: Rgb,
    pub width: u32,
    pub z_index: i32,
}

pub trait MarkerHandle {
    fn set_position(&self, position: LatLng);
    fn set_icon(&self, icon: MarkerIcon);
    fn set_title(&self, title: String);
    fn remove(self);
}

pub trait PathHandle {
    fn remove(self);
}

/// Asynchronous drawing calls resolve on the UI thread, so futures are `!Send`.
pub trait MapSurface: 'static {
    type Marker: MarkerHandle + 'static;
    type Path: PathHandle + 'static;

    fn add_marker(&self, options: MarkerOptions)
    -> LocalBoxFuture<'static, Result<Self::Marker, String>>;

    fn add_path(&self, options: PathOptions) -> LocalBoxFuture<'static, Result<Self::Path, String>>;

    /// Best effort; providers may ignore it while the camera is animating.
    fn fit_camera(&self, positions: &[LatLng]);
}
