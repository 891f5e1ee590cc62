//! Place search for the location inputs.
//!
//! Provides the GeoNames client, a client of the site's suggestion endpoint,
//! a reverse geocoder, and a file cache in front of them.

pub mod cache;
pub mod directory;
pub mod providers;
pub mod types;

pub use cache::PlaceCache;
pub use directory::PlaceDirectory;
pub use providers::{EndpointPlaces, GeonamesClient, GEONAMES_BASE_URL};
pub use types::{Place, PlaceError, PlaceList, PlaceSearch, PlaceSource, ReverseGeocode};
