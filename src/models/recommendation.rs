use serde::{Deserialize, Serialize};

use super::{BudgetTier, Location, Place, Weather};

fn default_budget() -> String {
    BudgetTier::default().as_str().to_string()
}

/// Body of `POST /recommendations/personalized`
///
/// `budget` stays a raw string here so that an unrecognized tier surfaces as a
/// validation error rather than a body-rejection from the extractor.
#[derive(Debug, Clone, Deserialize)]
pub struct PersonalizedRequest {
    pub location: Location,
    #[serde(default)]
    pub interests: Vec<String>,
    #[serde(default = "default_budget")]
    pub budget: String,
}

/// Echo of the request parameters
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct PersonalizedParameters {
    pub interests: Vec<String>,
    pub budget: BudgetTier,
    pub location: Location,
}

#[derive(Debug, Clone, Serialize)]
pub struct PersonalizedResponse {
    pub recommendations: Vec<Place>,
    pub parameters: PersonalizedParameters,
}

/// Latitude/longitude pair as accepted in query strings
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

impl From<LatLng> for Location {
    fn from(point: LatLng) -> Self {
        Location::new(point.lat, point.lng)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct NearbySearchParams {
    #[serde(rename = "type")]
    pub place_type: String,
    pub radius: u32,
}

#[derive(Debug, Clone, Serialize)]
pub struct NearbyPlacesResponse {
    pub places: Vec<Place>,
    pub weather: Option<Weather>,
    pub location: LatLng,
    pub search_params: NearbySearchParams,
}

#[derive(Debug, Clone, Serialize)]
pub struct RestaurantFilters {
    pub cuisine: Option<String>,
    pub price_level: Option<u8>,
    pub radius: u32,
}

#[derive(Debug, Clone, Serialize)]
pub struct RestaurantsResponse {
    pub restaurants: Vec<Place>,
    pub filters: RestaurantFilters,
}

#[derive(Debug, Clone, Serialize)]
pub struct ActivitiesResponse {
    pub activities: Vec<Place>,
    pub activity_type: String,
    pub location: LatLng,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_personalized_request_defaults() {
        let request: PersonalizedRequest =
            serde_json::from_str(r#"{"location": {"latitude": 48.85, "longitude": 2.35}}"#)
                .unwrap();

        assert!(request.interests.is_empty());
        assert_eq!(request.budget, "medium");
    }

    #[test]
    fn test_search_params_serialize_type_key() {
        let params = NearbySearchParams {
            place_type: "park".to_string(),
            radius: 5000,
        };
        let json = serde_json::to_value(&params).unwrap();
        assert_eq!(json["type"], "park");
        assert_eq!(json["radius"], 5000);
    }
}
