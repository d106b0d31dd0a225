pub mod budget;
pub mod interest;
pub mod place;
pub mod recommendation;
pub mod weather;

pub use budget::BudgetTier;
pub use interest::{Interest, PlaceType};
pub use place::{
    ApiDetailsResponse, ApiNearbyResponse, ApiPlace, ApiPlaceDetails, Location, OpeningHours,
    Place, PlaceDetails, Review,
};
pub use recommendation::{
    ActivitiesResponse, LatLng, NearbyPlacesResponse, NearbySearchParams, PersonalizedParameters,
    PersonalizedRequest, PersonalizedResponse, RestaurantFilters, RestaurantsResponse,
};
pub use weather::{ApiWeatherResponse, Weather, WeatherCondition};
