use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Path, Query, State,
    },
    Extension, Json,
};
use serde::Deserialize;
use std::sync::Arc;

use crate::{
    error::AppResult,
    middleware::RequestId,
    models::{
        ActivitiesResponse, LatLng, NearbyPlacesResponse, NearbySearchParams, PersonalizedRequest,
        PersonalizedResponse, PlaceDetails, PlaceType, RestaurantFilters, RestaurantsResponse,
        Weather,
    },
    routes::AppState,
    services::{
        places,
        providers::{NearbyQuery, DEFAULT_SEARCH_RADIUS},
        recommendations, weather, Caller,
    },
};

fn default_place_type() -> String {
    PlaceType::TouristAttraction.as_str().to_string()
}

fn default_radius() -> u32 {
    DEFAULT_SEARCH_RADIUS
}

fn default_restaurant_radius() -> u32 {
    places::RESTAURANT_SEARCH_RADIUS
}

#[derive(Debug, Deserialize)]
pub struct NearbyParams {
    lat: f64,
    lng: f64,
    #[serde(default = "default_place_type")]
    place_type: String,
    #[serde(default = "default_radius")]
    radius: u32,
}

#[derive(Debug, Deserialize)]
pub struct RestaurantParams {
    lat: f64,
    lng: f64,
    cuisine: Option<String>,
    price_level: Option<u8>,
    #[serde(default = "default_restaurant_radius")]
    radius: u32,
}

#[derive(Debug, Deserialize)]
pub struct ActivityParams {
    lat: f64,
    lng: f64,
    #[serde(default = "default_place_type")]
    activity_type: String,
}

#[derive(Debug, Deserialize)]
pub struct WeatherParams {
    lat: f64,
    lng: f64,
}

/// Handler for nearby places plus local weather
pub async fn nearby_places(
    State(state): State<Arc<AppState>>,
    caller: Caller,
    params: Result<Query<NearbyParams>, QueryRejection>,
) -> AppResult<Json<NearbyPlacesResponse>> {
    let Query(params) = params?;
    let point = LatLng {
        lat: params.lat,
        lng: params.lng,
    };
    tracing::info!(
        user_id = %caller.user_id,
        place_type = %params.place_type,
        radius = params.radius,
        "Processing nearby places request"
    );

    let query = NearbyQuery::new(point.into(), params.place_type.clone()).with_radius(params.radius);
    let (found, current) = places::nearby_with_weather(
        state.places_provider.clone(),
        state.weather_provider.clone(),
        query,
    )
    .await?;

    Ok(Json(NearbyPlacesResponse {
        places: found,
        weather: current,
        location: point,
        search_params: NearbySearchParams {
            place_type: params.place_type,
            radius: params.radius,
        },
    }))
}

/// Handler for single place details
pub async fn place_details(
    State(state): State<Arc<AppState>>,
    _caller: Caller,
    Path(place_id): Path<String>,
) -> AppResult<Json<PlaceDetails>> {
    let details = places::place_details(state.places_provider.clone(), &place_id).await?;
    Ok(Json(details))
}

/// Handler for restaurant recommendations
pub async fn restaurants(
    State(state): State<Arc<AppState>>,
    _caller: Caller,
    params: Result<Query<RestaurantParams>, QueryRejection>,
) -> AppResult<Json<RestaurantsResponse>> {
    let Query(params) = params?;
    let point = LatLng {
        lat: params.lat,
        lng: params.lng,
    };

    let restaurants = places::restaurants(
        state.places_provider.clone(),
        point.into(),
        params.radius,
        params.cuisine.as_deref(),
        params.price_level,
    )
    .await?;

    Ok(Json(RestaurantsResponse {
        restaurants,
        filters: RestaurantFilters {
            cuisine: params.cuisine,
            price_level: params.price_level,
            radius: params.radius,
        },
    }))
}

/// Handler for activity recommendations
pub async fn activities(
    State(state): State<Arc<AppState>>,
    _caller: Caller,
    params: Result<Query<ActivityParams>, QueryRejection>,
) -> AppResult<Json<ActivitiesResponse>> {
    let Query(params) = params?;
    let point = LatLng {
        lat: params.lat,
        lng: params.lng,
    };

    let activities = places::activities(
        state.places_provider.clone(),
        point.into(),
        &params.activity_type,
    )
    .await?;

    Ok(Json(ActivitiesResponse {
        activities,
        activity_type: params.activity_type,
        location: point,
    }))
}

/// Handler for current weather
pub async fn weather(
    State(state): State<Arc<AppState>>,
    _caller: Caller,
    params: Result<Query<WeatherParams>, QueryRejection>,
) -> AppResult<Json<Weather>> {
    let Query(params) = params?;
    let point = LatLng {
        lat: params.lat,
        lng: params.lng,
    };
    let current = weather::current_weather(state.weather_provider.clone(), point.into()).await?;
    Ok(Json(current))
}

/// Handler for personalized recommendations
pub async fn personalized(
    State(state): State<Arc<AppState>>,
    Extension(request_id): Extension<RequestId>,
    caller: Caller,
    payload: Result<Json<PersonalizedRequest>, JsonRejection>,
) -> AppResult<Json<PersonalizedResponse>> {
    let Json(request) = payload?;
    tracing::info!(
        request_id = %request_id,
        user_id = %caller.user_id,
        interests = ?request.interests,
        budget = %request.budget,
        "Processing personalized recommendation request"
    );

    let response = recommendations::personalized_recommendations(
        state.places_provider.clone(),
        &state.settings,
        &caller,
        request,
    )
    .await?;

    tracing::info!(
        request_id = %request_id,
        recommendations = response.recommendations.len(),
        "Personalized recommendations completed"
    );

    Ok(Json(response))
}
