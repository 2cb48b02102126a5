use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, de::DeserializeOwned};
use std::time::Duration;

use crate::{
    config::DEFAULT_OPENWEATHER_URL,
    error::{ConfigError, truncate_body},
    model::{Coordinates, CurrentConditions, ForecastEntry},
};

use super::WeatherProvider;

const CURRENT_PATH: &str = "/data/2.5/weather";
const FORECAST_PATH: &str = "/data/2.5/forecast";

/// A place to ask for the UV index.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UvEndpoint {
    pub name: &'static str,
    pub path: &'static str,
}

/// Tried in order until one answers.
pub const UV_ENDPOINTS: &[UvEndpoint] = &[
    UvEndpoint {
        name: "One Call 3.0",
        path: "/data/3.0/onecall",
    },
    UvEndpoint {
        name: "One Call 2.5",
        path: "/data/2.5/onecall",
    },
];

#[derive(Clone)]
pub struct OpenWeatherProvider {
    api_key: String,
    base_url: String,
    lang: String,
    http: Client,
}

pub struct OpenWeatherProviderBuilder {
    api_key: String,
    base_url: String,
    lang: String,
    timeout: Duration,
}

impl std::fmt::Debug for OpenWeatherProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenWeatherProvider")
            .field("base_url", &self.base_url)
            .field("lang", &self.lang)
            .finish_non_exhaustive()
    }
}

impl OpenWeatherProviderBuilder {
    pub fn base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    pub fn lang(mut self, lang: &str) -> Self {
        self.lang = lang.to_string();
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn build(self) -> Result<OpenWeatherProvider, ConfigError> {
        let http = Client::builder()
            .timeout(self.timeout)
            .build()
            .map_err(ConfigError::HttpClient)?;

        Ok(OpenWeatherProvider {
            api_key: self.api_key,
            base_url: self.base_url,
            lang: self.lang,
            http,
        })
    }
}

impl OpenWeatherProvider {
    pub fn builder(api_key: String) -> OpenWeatherProviderBuilder {
        OpenWeatherProviderBuilder {
            api_key,
            base_url: DEFAULT_OPENWEATHER_URL.to_string(),
            lang: "ru".to_string(),
            timeout: Duration::from_secs(10),
        }
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        what: &str,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T> {
        let url = format!("{}{}", self.base_url, path);
        tracing::debug!(%path, "OpenWeather {what} request");

        // Keys travel in the query string; strip the URL from transport errors.
        let res = self
            .http
            .get(&url)
            .query(query)
            .query(&[("appid", self.api_key.as_str())])
            .send()
            .await
            .map_err(reqwest::Error::without_url)
            .with_context(|| format!("Failed to send request to OpenWeather ({what})"))?;

        let status = res.status();
        let body = res
            .text()
            .await
            .map_err(reqwest::Error::without_url)
            .with_context(|| format!("Failed to read OpenWeather {what} response body"))?;

        if !status.is_success() {
            return Err(anyhow!(
                "OpenWeather {} request failed with status {}: {}",
                what,
                status,
                truncate_body(&body),
            ));
        }

        let api_status: OwStatus = serde_json::from_str(&body)
            .with_context(|| format!("Failed to parse OpenWeather {what} JSON"))?;
        if let Some(code) = api_status.cod.as_ref().filter(|code| !code.is_ok()) {
            return Err(anyhow!(
                "OpenWeather {} request reported error {}: {}",
                what,
                code,
                api_status.message_text(),
            ));
        }

        serde_json::from_str(&body).with_context(|| format!("Failed to parse OpenWeather {what} JSON"))
    }

    fn city_query(&self, city: &str) -> Vec<(&'static str, String)> {
        vec![
            ("q", city.to_string()),
            ("units", "metric".to_string()),
            ("lang", self.lang.clone()),
        ]
    }

    async fn fetch_uv(&self, endpoint: &UvEndpoint, coord: Coordinates) -> Result<f64> {
        let query = [
            ("lat", coord.lat.to_string()),
            ("lon", coord.lon.to_string()),
            ("units", "metric".to_string()),
            ("exclude", "minutely,hourly,daily,alerts".to_string()),
        ];

        let parsed: OwOneCallResponse = self
            .get_json(&format!("UV ({})", endpoint.name), endpoint.path, &query)
            .await?;

        Ok(parsed.current.uvi)
    }
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum OwCode {
    Number(i64),
    Text(String),
}

impl OwCode {
    fn is_ok(&self) -> bool {
        match self {
            OwCode::Number(code) => *code == 200,
            OwCode::Text(code) => code.trim() == "200",
        }
    }
}

impl std::fmt::Display for OwCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OwCode::Number(code) => write!(f, "{code}"),
            OwCode::Text(code) => f.write_str(code),
        }
    }
}

/// Fields every OpenWeather payload may carry to signal an API-level error.
#[derive(Debug, Deserialize)]
struct OwStatus {
    #[serde(default)]
    cod: Option<OwCode>,
    #[serde(default)]
    message: Option<serde_json::Value>,
}

impl OwStatus {
    fn message_text(&self) -> String {
        match &self.message {
            Some(serde_json::Value::String(text)) => text.clone(),
            Some(other) => other.to_string(),
            None => "no message".to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct OwMain {
    temp: f64,
    feels_like: f64,
    humidity: u8,
    pressure: f64,
}

#[derive(Debug, Deserialize)]
struct OwWeather {
    description: String,
}

#[derive(Debug, Deserialize)]
struct OwWind {
    speed: f64,
}

#[derive(Debug, Deserialize)]
struct OwCoord {
    lat: f64,
    lon: f64,
}

#[derive(Debug, Deserialize)]
struct OwCurrentResponse {
    #[serde(default)]
    name: String,
    main: OwMain,
    weather: Vec<OwWeather>,
    wind: OwWind,
    coord: OwCoord,
}

#[derive(Debug, Deserialize)]
struct OwOneCallCurrent {
    #[serde(default)]
    uvi: f64,
}

#[derive(Debug, Deserialize)]
struct OwOneCallResponse {
    current: OwOneCallCurrent,
}

#[derive(Debug, Deserialize)]
struct OwForecastEntry {
    dt_txt: String,
    weather: Vec<OwWeather>,
}

#[derive(Debug, Deserialize)]
struct OwForecastResponse {
    list: Vec<OwForecastEntry>,
}

#[async_trait]
impl WeatherProvider for OpenWeatherProvider {
    async fn current(&self, city: &str) -> Result<CurrentConditions> {
        let parsed: OwCurrentResponse = self
            .get_json("current weather", CURRENT_PATH, &self.city_query(city))
            .await?;

        let description = parsed
            .weather
            .into_iter()
            .next()
            .map(|w| w.description)
            .ok_or_else(|| anyhow!("OpenWeather current response contained no weather description"))?;

        let location_name = if parsed.name.is_empty() {
            city.to_string()
        } else {
            parsed.name
        };

        Ok(CurrentConditions {
            location_name,
            temperature_c: parsed.main.temp,
            feels_like_c: parsed.main.feels_like,
            description,
            humidity_pct: parsed.main.humidity,
            pressure_hpa: parsed.main.pressure,
            wind_speed_mps: parsed.wind.speed,
            coord: Coordinates {
                lat: parsed.coord.lat,
                lon: parsed.coord.lon,
            },
        })
    }

    async fn uv_index(&self, coord: Coordinates) -> Result<f64> {
        let mut last_error = None;

        for endpoint in UV_ENDPOINTS {
            match self.fetch_uv(endpoint, coord).await {
                Ok(uvi) => return Ok(uvi),
                Err(err) => {
                    tracing::warn!(endpoint = endpoint.name, error = %format!("{err:#}"), "UV lookup failed");
                    last_error = Some(err);
                }
            }
        }

        let err = last_error.unwrap_or_else(|| anyhow!("no UV endpoints configured"));
        Err(err.context("All OpenWeather UV endpoints failed"))
    }

    async fn forecast(&self, city: &str) -> Result<Vec<ForecastEntry>> {
        let parsed: OwForecastResponse = self
            .get_json("forecast", FORECAST_PATH, &self.city_query(city))
            .await?;

        Ok(parsed
            .list
            .into_iter()
            .map(|entry| ForecastEntry {
                dt_txt: entry.dt_txt,
                description: entry
                    .weather
                    .into_iter()
                    .next()
                    .map(|w| w.description)
                    .unwrap_or_default(),
            })
            .collect())
    }
}
