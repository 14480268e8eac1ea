pub mod colors;
pub mod entity;
pub mod itinerary;
pub mod staleness;
pub mod time_format;

pub use colors::Rgb;
pub use entity::*;
pub use itinerary::*;
pub use staleness::StalenessTier;
