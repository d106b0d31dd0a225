/// OpenWeather current-conditions provider
use crate::{
    cached,
    db::{Cache, CacheKey},
    error::{AppError, AppResult},
    models::{ApiWeatherResponse, Location, Weather},
    services::providers::WeatherProvider,
};
use reqwest::Client as HttpClient;
use std::time::Duration;

const WEATHER_CACHE_TTL: u64 = 600; // 10 minutes

#[derive(Clone)]
pub struct OpenWeatherProvider {
    http_client: HttpClient,
    api_key: String,
    api_url: String,
    cache: Cache,
}

impl OpenWeatherProvider {
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

    async fn fetch_weather(&self, location: Location) -> AppResult<Weather> {
        let url = format!("{}/weather", self.api_url);
        let lat = location.latitude.to_string();
        let lon = location.longitude.to_string();

        let response = self
            .http_client
            .get(&url)
            .query(&[
                ("lat", lat.as_str()),
                ("lon", lon.as_str()),
                ("appid", self.api_key.as_str()),
                ("units", "metric"),
            ])
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::ExternalApi(format!(
                "Weather API returned status {}: {}",
                status, body
            )));
        }

        let body: ApiWeatherResponse = response.json().await?;
        let weather = Weather::from(body);

        tracing::info!(
            latitude = location.latitude,
            longitude = location.longitude,
            temperature_c = weather.temperature_c,
            provider = "openweather",
            "Current weather fetched"
        );

        Ok(weather)
    }
}

#[async_trait::async_trait]
impl WeatherProvider for OpenWeatherProvider {
    async fn current_weather(&self, location: Location) -> AppResult<Weather> {
        cached!(
            self.cache,
            CacheKey::Weather(location),
            WEATHER_CACHE_TTL,
            async move { self.fetch_weather(location).await }
        )
    }

    fn name(&self) -> &'static str {
        "openweather"
    }
}
