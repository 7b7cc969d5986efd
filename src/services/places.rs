//! Place search collaborator: resolves a free-text city query to candidate places.

use crate::services::upstream_client::{UpstreamClient, UpstreamError};
use async_trait::async_trait;
use serde::{Deserialize, Deserializer};
use url::Url;

/// Default place search endpoint
pub const DEFAULT_PLACES_URL: &str = "https://search.reservamos.mx/api/v2/places";

/// Country label the place search provider uses for Mexico.
///
/// Compared byte-for-byte. If the provider ever changes the spelling or the
/// encoding of this label, filtering silently matches nothing; override it
/// with `PLACES_COUNTRY_LABEL` rather than loosening the comparison.
pub const MEXICO_COUNTRY_LABEL: &str = "México";

/// `result_type` of candidates that are cities (as opposed to terminals, airports...)
pub const CITY_RESULT_TYPE: &str = "city";

/// A place record as returned by the search provider.
///
/// Every field is optional here: only `result_type` and `country` are needed
/// to decide whether a candidate is kept, the rest is checked afterwards by
/// [`CityPlace::try_from`].
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PlaceCandidate {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub slug: Option<String>,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default)]
    pub result_type: Option<String>,
    #[serde(default, deserialize_with = "de_coordinate")]
    pub lat: Option<f64>,
    #[serde(default, deserialize_with = "de_coordinate")]
    pub long: Option<f64>,
}

impl PlaceCandidate {
    /// True for city records whose country is exactly `country_label`
    pub fn is_city_in(&self, country_label: &str) -> bool {
        self.result_type.as_deref() == Some(CITY_RESULT_TYPE)
            && self.country.as_deref() == Some(country_label)
    }
}

/// A candidate that passed the filter and carries every field the response needs
#[derive(Debug, Clone, PartialEq)]
pub struct CityPlace {
    pub id: i64,
    pub slug: String,
    pub state: String,
    pub lat: f64,
    pub long: f64,
}

impl TryFrom<PlaceCandidate> for CityPlace {
    type Error = UpstreamError;

    fn try_from(candidate: PlaceCandidate) -> Result<Self, Self::Error> {
        let missing = |field: &str| UpstreamError::Decode(format!("city record without `{field}`"));

        Ok(Self {
            id: candidate.id.ok_or_else(|| missing("id"))?,
            slug: candidate.slug.ok_or_else(|| missing("slug"))?,
            state: candidate.state.ok_or_else(|| missing("state"))?,
            lat: candidate.lat.ok_or_else(|| missing("lat"))?,
            long: candidate.long.ok_or_else(|| missing("long"))?,
        })
    }
}

/// The provider sends coordinates as numeric strings; plain numbers are accepted too.
fn de_coordinate<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Coordinate {
        Number(f64),
        Text(String),
    }

    Ok(match Option::<Coordinate>::deserialize(deserializer)? {
        Some(Coordinate::Number(value)) => Some(value),
        Some(Coordinate::Text(text)) => text.trim().parse().ok(),
        None => None,
    })
}

/// Resolves a city query to candidate places
#[async_trait]
pub trait PlaceResolver: Send + Sync {
    /// Search places matching `query`, in provider order
    async fn search(&self, query: &str) -> Result<Vec<PlaceCandidate>, UpstreamError>;
}

/// [`PlaceResolver`] backed by the Reservamos place search API
pub struct ReservamosPlaces {
    client: UpstreamClient,
    endpoint: Url,
}

impl ReservamosPlaces {
    pub fn new(client: UpstreamClient, endpoint: &str) -> Result<Self, url::ParseError> {
        Ok(Self {
            client,
            endpoint: Url::parse(endpoint)?,
        })
    }

    fn search_url(&self, query: &str) -> Url {
        let mut url = self.endpoint.clone();
        url.query_pairs_mut().append_pair("q", query);
        url
    }
}

#[async_trait]
impl PlaceResolver for ReservamosPlaces {
    async fn search(&self, query: &str) -> Result<Vec<PlaceCandidate>, UpstreamError> {
        self.client.get_json(&self.search_url(query)).await
    }
}
