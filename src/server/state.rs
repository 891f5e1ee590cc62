use crate::config::Config;
use crate::places::{GeonamesClient, PlaceCache, PlaceDirectory, PlaceSearch, ReverseGeocode};

pub type SearchBackend = Box<dyn PlaceSearch + Send + Sync>;
pub type GeocodeBackend = Box<dyn ReverseGeocode + Send + Sync>;

pub struct AppState {
    pub places: PlaceDirectory<SearchBackend>,
    pub geocoder: GeocodeBackend,
    /// Empty means travel responses carry no map URL.
    pub maps_key: String,
}

impl AppState {
    pub fn new(places: PlaceDirectory<SearchBackend>, geocoder: GeocodeBackend, maps_key: impl Into<String>) -> Self {
        Self {
            places,
            geocoder,
            maps_key: maps_key.into(),
        }
    }

    /// GeoNames for both search and reverse lookups, with the file cache
    /// unless it is disabled.
    pub fn from_config(config: &Config, offline: bool) -> Self {
        let client = || {
            GeonamesClient::new(config.geonames_url.clone(), config.geonames_user.clone())
                .with_max_rows(config.max_rows)
        };
        let cache = if config.cache {
            PlaceCache::load(config.cache_ttl_secs)
        } else {
            PlaceCache::in_memory(config.cache_ttl_secs)
        };

        let mut places = PlaceDirectory::new(Box::new(client()) as SearchBackend, cache);
        places.set_offline(offline);

        Self::new(places, Box::new(client()), config.maps_key.clone())
    }
}
