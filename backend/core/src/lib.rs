pub mod error;
pub mod traits;
pub mod types;

pub use error::StorymapError;
pub use traits::PlaceExtractor;
pub use types::{
    CanonicalPlace, GeocodedPlace, PlaceCandidate, Route, RouteStep, Sentiment, TravelMode,
};
