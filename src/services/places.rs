use std::sync::Arc;

use crate::{
    error::{AppError, AppResult},
    models::{Location, Place, PlaceDetails, PlaceType, Weather},
    services::providers::{NearbyQuery, PlacesProvider, WeatherProvider, MAX_SEARCH_RADIUS},
};

/// Default radius for restaurant searches, in meters
pub const RESTAURANT_SEARCH_RADIUS: u32 = 2000;

/// Highest provider price level
const MAX_PRICE_LEVEL: u8 = 4;

pub fn validate_radius(radius: u32) -> AppResult<()> {
    if radius == 0 || radius > MAX_SEARCH_RADIUS {
        return Err(AppError::InvalidInput(format!(
            "Radius must be between 1 and {} meters, got {}",
            MAX_SEARCH_RADIUS, radius
        )));
    }
    Ok(())
}

/// Places of one type near a point, together with the current weather there
///
/// Both lookups run concurrently. Weather is best-effort: a failure is logged
/// and reported as `None`.
pub async fn nearby_with_weather(
    places: Arc<dyn PlacesProvider>,
    weather: Arc<dyn WeatherProvider>,
    query: NearbyQuery,
) -> AppResult<(Vec<Place>, Option<Weather>)> {
    query.location.validate()?;
    validate_radius(query.radius)?;
    if query.place_type.trim().is_empty() {
        return Err(AppError::InvalidInput(
            "Place type cannot be empty".to_string(),
        ));
    }

    let (found, current) = tokio::join!(
        places.nearby_search(&query),
        weather.current_weather(query.location)
    );

    let current = match current {
        Ok(w) => Some(w),
        Err(e) => {
            tracing::warn!(error = %e, provider = weather.name(), "Weather lookup failed");
            None
        }
    };

    Ok((found?, current))
}

/// Nearby restaurants, optionally narrowed by cuisine and exact price level
pub async fn restaurants(
    provider: Arc<dyn PlacesProvider>,
    location: Location,
    radius: u32,
    cuisine: Option<&str>,
    price_level: Option<u8>,
) -> AppResult<Vec<Place>> {
    location.validate()?;
    validate_radius(radius)?;
    if let Some(level) = price_level {
        if level > MAX_PRICE_LEVEL {
            return Err(AppError::InvalidInput(format!(
                "Price level must be between 0 and {}, got {}",
                MAX_PRICE_LEVEL, level
            )));
        }
    }

    let query = NearbyQuery::new(location, PlaceType::Restaurant.as_str()).with_radius(radius);
    let found = provider.nearby_search(&query).await?;

    Ok(filter_restaurants(found, cuisine, price_level))
}

/// Cuisine matches as a case-insensitive substring of the joined type tags
fn filter_restaurants(
    places: Vec<Place>,
    cuisine: Option<&str>,
    price_level: Option<u8>,
) -> Vec<Place> {
    let cuisine = cuisine
        .map(|c| c.trim().to_lowercase())
        .filter(|c| !c.is_empty());

    places
        .into_iter()
        .filter(|place| match &cuisine {
            Some(c) => place.types.join(" ").to_lowercase().contains(c.as_str()),
            None => true,
        })
        .filter(|place| match price_level {
            Some(level) => place.price_level == Some(level),
            None => true,
        })
        .collect()
}

/// Resolves an activity alias to the provider type actually searched;
/// unknown aliases are passed through unchanged
pub fn resolve_activity_type(activity_type: &str) -> String {
    PlaceType::from_activity(activity_type)
        .map(|t| t.as_str().to_string())
        .unwrap_or_else(|| activity_type.trim().to_string())
}

pub async fn activities(
    provider: Arc<dyn PlacesProvider>,
    location: Location,
    activity_type: &str,
) -> AppResult<Vec<Place>> {
    location.validate()?;

    let place_type = resolve_activity_type(activity_type);
    if place_type.is_empty() {
        return Err(AppError::InvalidInput(
            "Activity type cannot be empty".to_string(),
        ));
    }

    provider
        .nearby_search(&NearbyQuery::new(location, place_type))
        .await
}

pub async fn place_details(
    provider: Arc<dyn PlacesProvider>,
    place_id: &str,
) -> AppResult<PlaceDetails> {
    provider.place_details(place_id).await
}
