/// External data provider abstraction
///
/// Places and weather come from third-party APIs. Each concern sits behind its
/// own trait so the recommendation logic can be exercised without the network
/// and so a provider can be swapped without touching handlers.
use crate::{
    error::AppResult,
    models::{Location, Place, PlaceDetails, Weather},
};

pub mod google_places;
pub mod openweather;

pub use google_places::GooglePlacesProvider;
pub use openweather::OpenWeatherProvider;

/// Default nearby-search radius in meters
pub const DEFAULT_SEARCH_RADIUS: u32 = 5000;

/// Largest radius the places provider accepts, in meters
pub const MAX_SEARCH_RADIUS: u32 = 50_000;

/// Parameters of a single nearby search
#[derive(Debug, Clone, PartialEq)]
pub struct NearbyQuery {
    pub location: Location,
    pub radius: u32,
    pub place_type: String,
}

impl NearbyQuery {
    pub fn new(location: Location, place_type: impl Into<String>) -> Self {
        Self {
            location,
            radius: DEFAULT_SEARCH_RADIUS,
            place_type: place_type.into(),
        }
    }

    pub fn with_radius(mut self, radius: u32) -> Self {
        self.radius = radius;
        self
    }
}

/// Trait for points-of-interest providers
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait PlacesProvider: Send + Sync {
    /// Search for places of one type around a point
    ///
    /// Results are in provider order, at most 10 per search.
    async fn nearby_search(&self, query: &NearbyQuery) -> AppResult<Vec<Place>>;

    /// Fetch full details for a single place
    ///
    /// Returns `AppError::NotFound` when the provider does not know the id.
    async fn place_details(&self, place_id: &str) -> AppResult<PlaceDetails>;

    /// Provider name for logging and debugging
    fn name(&self) -> &'static str;
}

/// Trait for current-weather providers
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait WeatherProvider: Send + Sync {
    async fn current_weather(&self, location: Location) -> AppResult<Weather>;

    /// Provider name for logging and debugging
    fn name(&self) -> &'static str;
}
