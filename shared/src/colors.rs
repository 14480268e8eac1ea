use rand::Rng;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// CSS hex notation, `#rrggbb`.
    pub fn to_hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    /// Neither red nor green dominates the other two channels combined.
    pub fn is_path_visible(&self) -> bool {
        let (r, g, b) = (self.r as u16, self.g as u16, self.b as u16);
        r <= g + b && g <= r + b
    }
}

/// Random route color, redrawn until it stays readable over map tiles.
pub fn random_path_color<R: Rng + ?Sized>(rng: &mut R) -> Rgb {
    loop {
        let color = Rgb::new(rng.random(), rng.random(), rng.random());
        if color.is_path_visible() {
            return color;
        }
    }
}
