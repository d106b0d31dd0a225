/// Google Places web service provider
///
/// API Flow:
/// 1. Nearby search: /nearbysearch/json?location=lat,lng&radius=..&type=..
/// 2. Details: /details/json?place_id=..&fields=..
///
/// Both endpoints answer HTTP 200 for most failures and report the outcome in a
/// `status` field, so that field is checked on every response.
use crate::{
    cached,
    db::{Cache, CacheKey},
    error::{AppError, AppResult},
    models::{ApiDetailsResponse, ApiNearbyResponse, Place, PlaceDetails},
    services::providers::{NearbyQuery, PlacesProvider},
};
use reqwest::Client as HttpClient;
use std::time::Duration;

const NEARBY_CACHE_TTL: u64 = 3600; // 1 hour
const DETAILS_CACHE_TTL: u64 = 86400; // 1 day
const MAX_NEARBY_RESULTS: usize = 10;
const DETAIL_FIELDS: &str = "place_id,name,formatted_address,international_phone_number,website,\
rating,reviews,opening_hours,price_level,photos,geometry,types";

#[derive(Clone)]
pub struct GooglePlacesProvider {
    http_client: HttpClient,
    api_key: String,
    api_url: String,
    cache: Cache,
}

impl GooglePlacesProvider {
    pub fn new(
        cache: Cache,
        api_key: String,
        api_url: String,
        timeout: Duration,
    ) -> AppResult<Self> {
        let http_client = HttpClient::builder().timeout(timeout).build()?;

        Ok(Self {
            http_client,
            api_key,
            api_url,
            cache,
        })
    }

    async fn fetch_nearby(&self, query: &NearbyQuery) -> AppResult<Vec<Place>> {
        let url = format!("{}/nearbysearch/json", self.api_url);
        let location = format!("{},{}", query.location.latitude, query.location.longitude);
        let radius = query.radius.to_string();

        let response = self
            .http_client
            .get(&url)
            .query(&[
                ("location", location.as_str()),
                ("radius", radius.as_str()),
                ("type", query.place_type.as_str()),
                ("key", self.api_key.as_str()),
            ])
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::ExternalApi(format!(
                "Places API returned status {}: {}",
                status, body
            )));
        }

        let body: ApiNearbyResponse = response.json().await?;
        let places = convert_nearby_response(body)?;

        tracing::info!(
            place_type = %query.place_type,
            radius = query.radius,
            results = places.len(),
            provider = "google_places",
            "Nearby search completed"
        );

        Ok(places)
    }

    async fn fetch_details(&self, place_id: &str) -> AppResult<PlaceDetails> {
        let url = format!("{}/details/json", self.api_url);

        let response = self
            .http_client
            .get(&url)
            .query(&[
                ("place_id", place_id),
                ("fields", DETAIL_FIELDS),
                ("key", self.api_key.as_str()),
            ])
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::ExternalApi(format!(
                "Places API returned status {}: {}",
                status, body
            )));
        }

        let body: ApiDetailsResponse = response.json().await?;
        let details = convert_details_response(place_id, body)?;

        tracing::info!(
            place_id = %place_id,
            reviews = details.reviews.len(),
            provider = "google_places",
            "Place details fetched"
        );

        Ok(details)
    }
}

/// Maps a nearby-search body to places, honoring the provider status
fn convert_nearby_response(body: ApiNearbyResponse) -> AppResult<Vec<Place>> {
    match body.status.as_str() {
        "OK" => Ok(body
            .results
            .into_iter()
            .take(MAX_NEARBY_RESULTS)
            .map(Place::from)
            .collect()),
        "ZERO_RESULTS" => Ok(Vec::new()),
        status => Err(AppError::ExternalApi(format!(
            "Places nearby search failed with status {}: {}",
            status,
            body.error_message.unwrap_or_default()
        ))),
    }
}

fn convert_details_response(place_id: &str, body: ApiDetailsResponse) -> AppResult<PlaceDetails> {
    match (body.status.as_str(), body.result) {
        ("OK", Some(result)) => Ok(result.into_details(place_id)),
        ("OK", None) | ("NOT_FOUND", _) | ("INVALID_REQUEST", _) | ("ZERO_RESULTS", _) => {
            Err(AppError::NotFound(format!("Place {} not found", place_id)))
        }
        (status, _) => Err(AppError::ExternalApi(format!(
            "Places details lookup failed with status {}: {}",
            status,
            body.error_message.unwrap_or_default()
        ))),
    }
}

#[async_trait::async_trait]
impl PlacesProvider for GooglePlacesProvider {
    async fn nearby_search(&self, query: &NearbyQuery) -> AppResult<Vec<Place>> {
        cached!(
            self.cache,
            CacheKey::NearbySearch {
                location: query.location,
                radius: query.radius,
                place_type: query.place_type.clone(),
            },
            NEARBY_CACHE_TTL,
            async move { self.fetch_nearby(query).await }
        )
    }

    async fn place_details(&self, place_id: &str) -> AppResult<PlaceDetails> {
        if place_id.trim().is_empty() {
            return Err(AppError::InvalidInput(
                "Place id cannot be empty".to_string(),
            ));
        }

        cached!(
            self.cache,
            CacheKey::PlaceDetails(place_id.to_string()),
            DETAILS_CACHE_TTL,
            async move { self.fetch_details(place_id).await }
        )
    }

    fn name(&self) -> &'static str {
        "google_places"
    }
}
