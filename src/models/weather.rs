use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::Location;

/// Current weather at a location, in metric units
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Weather {
    pub location_name: Option<String>,
    pub country: Option<String>,
    pub location: Location,
    pub conditions: Vec<WeatherCondition>,
    pub temperature_c: f64,
    pub feels_like_c: f64,
    pub temp_min_c: Option<f64>,
    pub temp_max_c: Option<f64>,
    pub humidity_percent: Option<u8>,
    pub wind_speed_mps: Option<f64>,
    pub observed_at: Option<DateTime<Utc>>,
    pub sunrise: Option<DateTime<Utc>>,
    pub sunset: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WeatherCondition {
    pub main: String,
    pub description: String,
    pub icon: Option<String>,
}

// ============================================================================
// OpenWeather API Types
// ============================================================================

/// Raw response from OpenWeather `/weather`
#[derive(Debug, Clone, Deserialize)]
pub struct ApiWeatherResponse {
    #[serde(default)]
    pub name: Option<String>,
    pub coord: ApiCoord,
    #[serde(default)]
    pub weather: Vec<ApiWeatherCondition>,
    pub main: ApiWeatherMain,
    #[serde(default)]
    pub wind: Option<ApiWind>,
    #[serde(default)]
    pub dt: Option<i64>,
    #[serde(default)]
    pub sys: Option<ApiWeatherSys>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiCoord {
    pub lat: f64,
    pub lon: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiWeatherCondition {
    pub main: String,
    pub description: String,
    #[serde(default)]
    pub icon: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiWeatherMain {
    pub temp: f64,
    pub feels_like: f64,
    #[serde(default)]
    pub temp_min: Option<f64>,
    #[serde(default)]
    pub temp_max: Option<f64>,
    #[serde(default)]
    pub humidity: Option<u8>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiWind {
    pub speed: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiWeatherSys {
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default)]
    pub sunrise: Option<i64>,
    #[serde(default)]
    pub sunset: Option<i64>,
}

fn timestamp(secs: Option<i64>) -> Option<DateTime<Utc>> {
    secs.and_then(|s| DateTime::from_timestamp(s, 0))
}

impl From<ApiWeatherResponse> for Weather {
    fn from(api: ApiWeatherResponse) -> Self {
        let (country, sunrise, sunset) = match api.sys {
            Some(sys) => (sys.country, timestamp(sys.sunrise), timestamp(sys.sunset)),
            None => (None, None, None),
        };

        Weather {
            location_name: api.name.filter(|name| !name.is_empty()),
            country,
            location: Location::new(api.coord.lat, api.coord.lon),
            conditions: api
                .weather
                .into_iter()
                .map(|c| WeatherCondition {
                    main: c.main,
                    description: c.description,
                    icon: c.icon,
                })
                .collect(),
            temperature_c: api.main.temp,
            feels_like_c: api.main.feels_like,
            temp_min_c: api.main.temp_min,
            temp_max_c: api.main.temp_max,
            humidity_percent: api.main.humidity,
            wind_speed_mps: api.wind.map(|w| w.speed),
            observed_at: timestamp(api.dt),
            sunrise,
            sunset,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_weather_to_weather() {
        let json = r#"{
            "coord": {"lon": 28.98, "lat": 41.01},
            "weather": [{"id": 800, "main": "Clear", "description": "clear sky", "icon": "01d"}],
            "main": {"temp": 22.4, "feels_like": 21.9, "temp_min": 20.1, "temp_max": 24.0, "pressure": 1015, "humidity": 56},
            "wind": {"speed": 4.1, "deg": 40},
            "dt": 1700000000,
            "sys": {"country": "TR", "sunrise": 1699990000, "sunset": 1700030000},
            "name": "Istanbul"
        }"#;

        let api: ApiWeatherResponse = serde_json::from_str(json).unwrap();
        let weather: Weather = api.into();

        assert_eq!(weather.location_name.as_deref(), Some("Istanbul"));
        assert_eq!(weather.country.as_deref(), Some("TR"));
        assert_eq!(weather.conditions[0].description, "clear sky");
        assert_eq!(weather.temperature_c, 22.4);
        assert_eq!(weather.humidity_percent, Some(56));
        assert_eq!(weather.wind_speed_mps, Some(4.1));
        assert_eq!(
            weather.observed_at.map(|t| t.timestamp()),
            Some(1_700_000_000)
        );
        assert!(weather.sunrise.unwrap() < weather.sunset.unwrap());
    }

    #[test]
    fn test_empty_name_becomes_none() {
        let json = r#"{
            "coord": {"lon": 0.0, "lat": 0.0},
            "main": {"temp": 27.0, "feels_like": 29.5},
            "name": ""
        }"#;

        let api: ApiWeatherResponse = serde_json::from_str(json).unwrap();
        let weather: Weather = api.into();

        assert_eq!(weather.location_name, None);
        assert!(weather.conditions.is_empty());
        assert_eq!(weather.sunrise, None);
    }
}
