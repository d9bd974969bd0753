pub mod geocode;
pub mod polyline;
pub mod render;
pub mod route;
pub mod share;
pub mod view;

pub use geocode::Geocoder;
pub use route::Directions;
pub use view::{ColorScheme, MapView};
