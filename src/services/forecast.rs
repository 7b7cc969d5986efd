//! Forecast aggregation: city query → matched Mexican cities → daily forecasts.
//!
//! The pipeline for one request is
//! validate → resolve places → filter → fetch weather per city → map → aggregate.
//! Weather fetches run with bounded concurrency; the first failure aborts the
//! request and drops every fetch still in flight. Results keep the order in
//! which the place resolver returned the cities.

use crate::{
    config::ForecastConfig,
    error::{CITY_TOO_SHORT, ConfigError, ForecastError, UpstreamStage},
    models::CityForecast,
    services::{
        places::{CityPlace, PlaceResolver, ReservamosPlaces},
        upstream_client::UpstreamClient,
        weather::{OpenWeatherProvider, WeatherProvider},
    },
};
use chrono::Local;
use futures::{StreamExt, TryStreamExt, stream};
use std::sync::Arc;
use tracing::debug;

/// Shortest accepted city query, in characters
pub const MIN_CITY_LENGTH: usize = 3;

/// Builds the normalized forecast list for a city query
pub struct ForecastAggregator {
    places: Arc<dyn PlaceResolver>,
    weather: Arc<dyn WeatherProvider>,
    country_label: String,
    concurrency: usize,
}

impl ForecastAggregator {
    /// Create an aggregator over the given collaborators
    pub fn new(
        config: &ForecastConfig,
        places: Arc<dyn PlaceResolver>,
        weather: Arc<dyn WeatherProvider>,
    ) -> Self {
        Self {
            places,
            weather,
            country_label: config.country_label.clone(),
            concurrency: config.weather_fetch_concurrency.max(1),
        }
    }

    /// Create an aggregator talking to the real providers through `client`
    pub fn from_config(
        config: &ForecastConfig,
        client: UpstreamClient,
    ) -> Result<Self, ConfigError> {
        let places = ReservamosPlaces::new(client.clone(), &config.places_url).map_err(|source| {
            ConfigError::InvalidUrl {
                var: "PLACES_API_URL",
                source,
            }
        })?;

        let weather = OpenWeatherProvider::new(
            client,
            &config.weather_base_url,
            config.weather_api_key.clone(),
        )
        .map_err(|source| ConfigError::InvalidUrl {
            var: "OPENWEATHER_BASE_URL",
            source,
        })?;

        Ok(Self::new(config, Arc::new(places), Arc::new(weather)))
    }

    /// Forecasts for every Mexican city matching `city`, in resolver order
    pub async fn get_forecast(&self, city: &str) -> Result<Vec<CityForecast>, ForecastError> {
        if city.chars().count() < MIN_CITY_LENGTH {
            return Err(ForecastError::validation(CITY_TOO_SHORT));
        }

        let candidates = self
            .places
            .search(city)
            .await
            .map_err(|e| ForecastError::upstream(UpstreamStage::PlaceResolution, e))?;
        let candidate_count = candidates.len();

        let cities = candidates
            .into_iter()
            .filter(|candidate| candidate.is_city_in(&self.country_label))
            .map(CityPlace::try_from)
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| ForecastError::upstream(UpstreamStage::PlaceResolution, e))?;

        debug!(
            query = %city,
            candidates = candidate_count,
            matched = cities.len(),
            "Resolved place candidates"
        );

        let mut forecasts: Vec<(usize, CityForecast)> = stream::iter(cities.into_iter().enumerate())
            .map(|(index, place)| async move {
                self.city_forecast(place).await.map(|forecast| (index, forecast))
            })
            .buffer_unordered(self.concurrency)
            .try_collect()
            .await?;

        forecasts.sort_by_key(|(index, _)| *index);
        Ok(forecasts.into_iter().map(|(_, forecast)| forecast).collect())
    }

    async fn city_forecast(&self, place: CityPlace) -> Result<CityForecast, ForecastError> {
        let to_error = |e| ForecastError::upstream(UpstreamStage::WeatherFetch, e);

        let daily = self
            .weather
            .daily_forecast(place.lat, place.long)
            .await
            .map_err(to_error)?;

        // Dates follow the server's local time zone
        let weather = daily
            .iter()
            .map(|entry| entry.to_day_forecast(&Local))
            .collect::<Result<Vec<_>, _>>()
            .map_err(to_error)?;

        debug!(slug = %place.slug, days = weather.len(), "Mapped daily forecast");

        Ok(CityForecast {
            id: place.id,
            slug: place.slug,
            state: place.state,
            lat: place.lat,
            long: place.long,
            weather,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::{
        places::PlaceCandidate,
        upstream_client::UpstreamError,
        weather::{DailyEntry, DailyTemperature, format_forecast_date},
    };
    use async_trait::async_trait;
    use serde_json::json;
    use std::{
        sync::{
            Mutex,
            atomic::{AtomicUsize, Ordering},
        },
        time::Duration,
    };

    #[derive(Default)]
    struct FakePlaces {
        candidates: Vec<serde_json::Value>,
        fail_with_status: Option<u16>,
        calls: AtomicUsize,
    }

    #[async_trait]
    impl PlaceResolver for FakePlaces {
        async fn search(&self, _query: &str) -> Result<Vec<PlaceCandidate>, UpstreamError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if let Some(status) = self.fail_with_status {
                return Err(UpstreamError::Status(status));
            }
            Ok(self
                .candidates
                .iter()
                .map(|c| serde_json::from_value(c.clone()).unwrap())
                .collect())
        }
    }

    #[derive(Default)]
    struct FakeWeather {
        /// Fail requests for this latitude
        fail_for_lat: Option<f64>,
        /// Sleep `lat` milliseconds before answering
        delay_by_lat: bool,
        calls: Mutex<Vec<(f64, f64)>>,
    }

    #[async_trait]
    impl WeatherProvider for FakeWeather {
        async fn daily_forecast(
            &self,
            lat: f64,
            lon: f64,
        ) -> Result<Vec<DailyEntry>, UpstreamError> {
            self.calls.lock().unwrap().push((lat, lon));
            if self.delay_by_lat {
                tokio::time::sleep(Duration::from_millis(lat as u64)).await;
            }
            if self.fail_for_lat == Some(lat) {
                return Err(UpstreamError::Status(401));
            }
            Ok(vec![
                DailyEntry {
                    dt: 1_700_000_000,
                    temp: DailyTemperature { max: 28.5, min: 15.2 },
                },
                DailyEntry {
                    dt: 1_700_086_400,
                    temp: DailyTemperature { max: 29.0, min: 16.0 },
                },
            ])
        }
    }

    fn city(id: i64, slug: &str, country: &str, lat: f64, long: f64) -> serde_json::Value {
        json!({
            "id": id, "slug": slug, "state": "Estado", "country": country,
            "result_type": "city", "lat": lat.to_string(), "long": long.to_string()
        })
    }

    fn aggregator(
        places: Arc<FakePlaces>,
        weather: Arc<FakeWeather>,
        concurrency: usize,
    ) -> ForecastAggregator {
        let mut config = ForecastConfig::with_api_key("test-key");
        config.weather_fetch_concurrency = concurrency;
        ForecastAggregator::new(&config, places, weather)
    }

    #[tokio::test]
    async fn test_short_city_makes_no_upstream_calls() {
        let places = Arc::new(FakePlaces::default());
        let weather = Arc::new(FakeWeather::default());
        let service = aggregator(places.clone(), weather.clone(), 4);

        for query in ["", "a", "Mt", "Mé"] {
            let err = service.get_forecast(query).await.unwrap_err();
            assert!(matches!(err, ForecastError::Validation { .. }), "{query:?}");
        }

        assert_eq!(places.calls.load(Ordering::SeqCst), 0);
        assert!(weather.calls.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_three_characters_is_enough() {
        let places = Arc::new(FakePlaces::default());
        let weather = Arc::new(FakeWeather::default());
        let service = aggregator(places.clone(), weather.clone(), 4);

        let result = service.get_forecast("León").await.unwrap();
        assert!(result.is_empty());
        assert_eq!(places.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_only_mexican_cities_are_fetched() {
        let places = Arc::new(FakePlaces {
            candidates: vec![
                city(1, "monterrey", "México", 25.67, -100.31),
                json!({
                    "id": 2, "slug": "monterrey-terminal", "state": "Nuevo León",
                    "country": "México", "result_type": "terminal",
                    "lat": "25.7", "long": "-100.3"
                }),
                city(3, "laredo", "Estados Unidos", 27.5, -99.5),
                city(4, "ascii-mexico", "Mexico", 20.0, -100.0),
                city(5, "san-nicolas", "México", 25.75, -100.28),
            ],
            ..FakePlaces::default()
        });
        let weather = Arc::new(FakeWeather::default());
        let service = aggregator(places, weather.clone(), 1);

        let result = service.get_forecast("Monterrey").await.unwrap();

        let slugs: Vec<_> = result.iter().map(|c| c.slug.as_str()).collect();
        assert_eq!(slugs, ["monterrey", "san-nicolas"]);
        assert_eq!(
            *weather.calls.lock().unwrap(),
            vec![(25.67, -100.31), (25.75, -100.28)]
        );
    }

    #[tokio::test]
    async fn test_order_follows_resolver_not_completion() {
        // Earlier cities answer more slowly
        let places = Arc::new(FakePlaces {
            candidates: vec![
                city(1, "first", "México", 60.0, 1.0),
                city(2, "second", "México", 30.0, 1.0),
                city(3, "third", "México", 5.0, 1.0),
            ],
            ..FakePlaces::default()
        });
        let weather = Arc::new(FakeWeather {
            delay_by_lat: true,
            ..FakeWeather::default()
        });
        let service = aggregator(places, weather.clone(), 3);

        let result = service.get_forecast("ciudad").await.unwrap();

        let ids: Vec<_> = result.iter().map(|c| c.id).collect();
        assert_eq!(ids, [1, 2, 3]);
        assert_eq!(weather.calls.lock().unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_one_weather_failure_aborts_everything() {
        let places = Arc::new(FakePlaces {
            candidates: vec![
                city(1, "ok", "México", 10.0, 1.0),
                city(2, "broken", "México", 20.0, 1.0),
                city(3, "also-ok", "México", 30.0, 1.0),
            ],
            ..FakePlaces::default()
        });
        let weather = Arc::new(FakeWeather {
            fail_for_lat: Some(20.0),
            ..FakeWeather::default()
        });
        let service = aggregator(places, weather, 1);

        let err = service.get_forecast("ciudad").await.unwrap_err();
        assert!(matches!(
            err,
            ForecastError::Upstream {
                stage: UpstreamStage::WeatherFetch,
                source: UpstreamError::Status(401)
            }
        ));
        assert_eq!(err.detail(), "Error fetching weather data (3)");
    }

    #[tokio::test]
    async fn test_place_failure_skips_weather() {
        let places = Arc::new(FakePlaces {
            fail_with_status: Some(500),
            ..FakePlaces::default()
        });
        let weather = Arc::new(FakeWeather::default());
        let service = aggregator(places, weather.clone(), 4);

        let err = service.get_forecast("Monterrey").await.unwrap_err();
        assert!(matches!(
            err,
            ForecastError::Upstream {
                stage: UpstreamStage::PlaceResolution,
                ..
            }
        ));
        assert_eq!(err.detail(), "Error fetching city data (1)");
        assert!(weather.calls.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_incomplete_city_record_is_a_resolution_error() {
        let places = Arc::new(FakePlaces {
            candidates: vec![json!({"id": 1, "country": "México", "result_type": "city"})],
            ..FakePlaces::default()
        });
        let weather = Arc::new(FakeWeather::default());
        let service = aggregator(places, weather.clone(), 4);

        let err = service.get_forecast("Monterrey").await.unwrap_err();
        assert_eq!(err.detail(), "Error fetching city data (5)");
        assert!(weather.calls.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_country_label_comes_from_config() {
        let places = Arc::new(FakePlaces {
            candidates: vec![
                city(1, "accented", "México", 1.0, 1.0),
                city(2, "mojibake", "MÃ©xico", 2.0, 2.0),
            ],
            ..FakePlaces::default()
        });
        let weather = Arc::new(FakeWeather::default());
        let mut config = ForecastConfig::with_api_key("test-key");
        config.country_label = "MÃ©xico".to_string();
        let service = ForecastAggregator::new(&config, places, weather);

        let result = service.get_forecast("ciudad").await.unwrap();
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].slug, "mojibake");
    }

    #[tokio::test]
    async fn test_monterrey_end_to_end() {
        let places = Arc::new(FakePlaces {
            candidates: vec![json!({
                "id": 3, "slug": "monterrey", "state": "Nuevo Leon", "country": "México",
                "result_type": "city", "lat": 25.67, "long": -100.31
            })],
            ..FakePlaces::default()
        });
        let weather = Arc::new(FakeWeather::default());
        let service = aggregator(places, weather, 4);

        let result = service.get_forecast("Monterrey").await.unwrap();

        assert_eq!(result.len(), 1);
        let monterrey = &result[0];
        assert_eq!(monterrey.id, 3);
        assert_eq!(monterrey.slug, "monterrey");
        assert_eq!(monterrey.state, "Nuevo Leon");
        assert_eq!((monterrey.lat, monterrey.long), (25.67, -100.31));
        assert_eq!(monterrey.weather.len(), 2);
        assert_eq!(monterrey.weather[0].temp_max, 28.5);
        assert_eq!(monterrey.weather[0].temp_min, 15.2);
        assert_eq!(
            monterrey.weather[0].date,
            format_forecast_date(1_700_000_000, &Local).unwrap()
        );
        assert_eq!(monterrey.weather[1].temp_max, 29.0);
        assert_eq!(
            monterrey.weather[1].date,
            format_forecast_date(1_700_086_400, &Local).unwrap()
        );
    }
}
