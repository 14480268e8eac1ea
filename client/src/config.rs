pub const DEFAULT_ICON_BASE_DIR: &str = "www/assets/img";
pub const BUS_ICON_WIDTH: u32 = 36;
pub const BUS_ICON_HEIGHT: u32 = 42;

pub const PATH_WIDTH: u32 = 6;
pub const PATH_Z_INDEX: i32 = 4;

pub const START_MARKER_TITLE: &str = "PONTO INICIAL";
pub const END_MARKER_TITLE: &str = "PONTO FINAL";

#[derive(Debug, Clone, PartialEq)]
pub struct IconSet {
    pub base_dir: String,
    pub width: u32,
    pub height: u32,
}

impl Default for IconSet {
    fn default() -> Self {
        Self {
            base_dir: DEFAULT_ICON_BASE_DIR.to_string(),
            width: BUS_ICON_WIDTH,
            height: BUS_ICON_HEIGHT,
        }
    }
}

impl IconSet {
    pub fn with_base_dir(base_dir: impl Into<String>) -> Self {
        Self {
            base_dir: base_dir.into(),
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct TrackerConfig {
    pub icons: IconSet,
}

#[derive(Debug, Clone, PartialEq)]
pub struct OverlayConfig {
    pub path_width: u32,
    pub path_z_index: i32,
}

impl Default for OverlayConfig {
    fn default() -> Self {
        Self {
            path_width: PATH_WIDTH,
            path_z_index: PATH_Z_INDEX,
        }
    }
}
