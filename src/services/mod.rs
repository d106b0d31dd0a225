pub mod auth;
pub mod places;
pub mod providers;
pub mod recommendations;
pub mod weather;

pub use auth::{Authenticator, Caller, StaticTokenAuthenticator};
pub use providers::{PlacesProvider, WeatherProvider};
pub use recommendations::RecommendationSettings;
