use crate::{
    error::{AppError, AppResult},
    models::{Location, Weather},
    services::providers::WeatherProvider,
};
use std::sync::Arc;

/// Service function for current weather
///
/// Any provider failure is reported as "not available" to the caller; the
/// underlying error is logged.
pub async fn current_weather(
    provider: Arc<dyn WeatherProvider>,
    location: Location,
) -> AppResult<Weather> {
    location.validate()?;

    provider.current_weather(location).await.map_err(|e| {
        tracing::warn!(error = %e, provider = provider.name(), "Weather lookup failed");
        AppError::NotFound("Weather information not available".to_string())
    })
}
