use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};

/// Upper bound on photo references kept per place
pub const MAX_PHOTOS_PER_PLACE: usize = 3;

/// A geographic point
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Location {
    pub latitude: f64,
    pub longitude: f64,
}

impl Location {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Rejects non-finite or out-of-range coordinates
    pub fn validate(&self) -> AppResult<()> {
        if !self.latitude.is_finite() || !(-90.0..=90.0).contains(&self.latitude) {
            return Err(AppError::InvalidInput(format!(
                "Latitude must be between -90 and 90, got {}",
                self.latitude
            )));
        }
        if !self.longitude.is_finite() || !(-180.0..=180.0).contains(&self.longitude) {
            return Err(AppError::InvalidInput(format!(
                "Longitude must be between -180 and 180, got {}",
                self.longitude
            )));
        }
        Ok(())
    }
}

/// A point of interest returned by the places provider
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Place {
    pub place_id: String,
    pub name: String,
    pub rating: Option<f64>,
    pub price_level: Option<u8>,
    pub types: Vec<String>,
    pub vicinity: Option<String>,
    pub location: Option<Location>,
    pub photos: Vec<String>,
}

impl Place {
    /// Rating used for ranking; absent ratings rank as zero
    pub fn ranking_score(&self) -> f64 {
        self.rating.unwrap_or(0.0)
    }
}

/// Full details for a single place
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PlaceDetails {
    pub place_id: String,
    pub name: String,
    pub formatted_address: Option<String>,
    pub international_phone_number: Option<String>,
    pub website: Option<String>,
    pub rating: Option<f64>,
    pub price_level: Option<u8>,
    pub types: Vec<String>,
    pub opening_hours: Option<OpeningHours>,
    pub reviews: Vec<Review>,
    pub location: Option<Location>,
    pub photos: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OpeningHours {
    pub open_now: Option<bool>,
    pub weekday_text: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Review {
    pub author_name: String,
    pub rating: Option<f64>,
    pub text: Option<String>,
    pub relative_time_description: Option<String>,
}

// ============================================================================
// Google Places API Types
// ============================================================================

/// Raw response from `/nearbysearch/json`
#[derive(Debug, Clone, Deserialize)]
pub struct ApiNearbyResponse {
    #[serde(default)]
    pub results: Vec<ApiPlace>,
    pub status: String,
    #[serde(default)]
    pub error_message: Option<String>,
}

/// Raw response from `/details/json`
#[derive(Debug, Clone, Deserialize)]
pub struct ApiDetailsResponse {
    #[serde(default)]
    pub result: Option<ApiPlaceDetails>,
    pub status: String,
    #[serde(default)]
    pub error_message: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiPlace {
    pub place_id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub rating: Option<f64>,
    #[serde(default)]
    pub price_level: Option<u8>,
    #[serde(default)]
    pub types: Vec<String>,
    #[serde(default)]
    pub vicinity: Option<String>,
    #[serde(default)]
    pub geometry: Option<ApiGeometry>,
    #[serde(default)]
    pub photos: Vec<ApiPhoto>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiPlaceDetails {
    #[serde(default)]
    pub place_id: Option<String>,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub formatted_address: Option<String>,
    #[serde(default)]
    pub international_phone_number: Option<String>,
    #[serde(default)]
    pub website: Option<String>,
    #[serde(default)]
    pub rating: Option<f64>,
    #[serde(default)]
    pub price_level: Option<u8>,
    #[serde(default)]
    pub types: Vec<String>,
    #[serde(default)]
    pub opening_hours: Option<ApiOpeningHours>,
    #[serde(default)]
    pub reviews: Vec<ApiReview>,
    #[serde(default)]
    pub geometry: Option<ApiGeometry>,
    #[serde(default)]
    pub photos: Vec<ApiPhoto>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiGeometry {
    pub location: ApiLatLng,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiLatLng {
    pub lat: f64,
    pub lng: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiPhoto {
    pub photo_reference: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiOpeningHours {
    #[serde(default)]
    pub open_now: Option<bool>,
    #[serde(default)]
    pub weekday_text: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiReview {
    #[serde(default)]
    pub author_name: String,
    #[serde(default)]
    pub rating: Option<f64>,
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub relative_time_description: Option<String>,
}

fn photo_references(photos: Vec<ApiPhoto>) -> Vec<String> {
    photos
        .into_iter()
        .take(MAX_PHOTOS_PER_PLACE)
        .map(|photo| photo.photo_reference)
        .collect()
}

impl From<ApiGeometry> for Location {
    fn from(geometry: ApiGeometry) -> Self {
        Location::new(geometry.location.lat, geometry.location.lng)
    }
}

impl From<ApiPlace> for Place {
    fn from(api: ApiPlace) -> Self {
        Place {
            place_id: api.place_id,
            name: api.name,
            rating: api.rating,
            price_level: api.price_level,
            types: api.types,
            vicinity: api.vicinity,
            location: api.geometry.map(Location::from),
            photos: photo_references(api.photos),
        }
    }
}

impl ApiPlaceDetails {
    /// Converts to the public model, falling back to the requested id when the
    /// provider omits it
    pub fn into_details(self, requested_id: &str) -> PlaceDetails {
        PlaceDetails {
            place_id: self.place_id.unwrap_or_else(|| requested_id.to_string()),
            name: self.name,
            formatted_address: self.formatted_address,
            international_phone_number: self.international_phone_number,
            website: self.website,
            rating: self.rating,
            price_level: self.price_level,
            types: self.types,
            opening_hours: self.opening_hours.map(|hours| OpeningHours {
                open_now: hours.open_now,
                weekday_text: hours.weekday_text,
            }),
            reviews: self
                .reviews
                .into_iter()
                .map(|review| Review {
                    author_name: review.author_name,
                    rating: review.rating,
                    text: review.text,
                    relative_time_description: review.relative_time_description,
                })
                .collect(),
            location: self.geometry.map(Location::from),
            photos: photo_references(self.photos),
        }
    }
}
