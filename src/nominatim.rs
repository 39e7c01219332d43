//! Nominatim HTTP adapter for forward and reverse geocoding.

use serde::Deserialize;

use crate::error::ServiceError;
use crate::traits::{Geocoder, Placemark, ReverseGeocoder};

#[derive(Debug, Clone)]
pub struct NominatimConfig {
    pub base_url: String,
    /// Nominatim's usage policy requires an identifying user agent.
    pub user_agent: String,
    /// Maximum number of forward-geocoding candidates to request.
    pub limit: usize,
    pub timeout_secs: u64,
}

impl Default for NominatimConfig {
    fn default() -> Self {
        Self {
            base_url: "https://nominatim.openstreetmap.org".to_string(),
            user_agent: concat!("waypoint-router/", env!("CARGO_PKG_VERSION")).to_string(),
            limit: 5,
            timeout_secs: 10,
        }
    }
}

#[derive(Debug, Clone)]
pub struct NominatimClient {
    config: NominatimConfig,
    client: reqwest::blocking::Client,
}

impl NominatimClient {
    pub fn new(config: NominatimConfig) -> Result<Self, reqwest::Error> {
        let client = reqwest::blocking::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .user_agent(config.user_agent.clone())
            .build()?;

        Ok(Self { config, client })
    }

    fn base(&self) -> &str {
        self.config.base_url.trim_end_matches('/')
    }
}

impl Geocoder for NominatimClient {
    fn geocode(&self, address: &str) -> Result<Vec<Placemark>, ServiceError> {
        let url = format!("{}/search", self.base());
        tracing::debug!(%url, address, "requesting Nominatim search");

        let places = self
            .client
            .get(url)
            .query(&[("q", address), ("format", "jsonv2"), ("addressdetails", "1")])
            .query(&[("limit", self.config.limit)])
            .send()
            .and_then(|resp| resp.error_for_status())?
            .json::<Vec<NominatimPlace>>()?;

        places.into_iter().map(NominatimPlace::into_placemark).collect()
    }
}

impl ReverseGeocoder for NominatimClient {
    fn reverse_geocode(&self, coordinate: (f64, f64)) -> Result<Vec<Placemark>, ServiceError> {
        let url = format!("{}/reverse", self.base());
        let (lat, lng) = coordinate;
        tracing::debug!(%url, lat, lng, "requesting Nominatim reverse");

        let body = self
            .client
            .get(url)
            .query(&[("lat", lat), ("lon", lng)])
            .query(&[("format", "jsonv2"), ("addressdetails", "1")])
            .send()
            .and_then(|resp| resp.error_for_status())?
            .json::<ReverseResponse>()?;

        match body {
            // "Unable to geocode" is an empty result, not a failure.
            ReverseResponse::Error { error } => {
                tracing::debug!(%error, "Nominatim reverse returned no place");
                Ok(Vec::new())
            }
            ReverseResponse::Place(place) => Ok(vec![place.into_placemark()?]),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ReverseResponse {
    Error { error: String },
    Place(NominatimPlace),
}

#[derive(Debug, Deserialize)]
struct NominatimPlace {
    lat: String,
    lon: String,
    name: Option<String>,
    display_name: Option<String>,
    address: Option<NominatimAddress>,
}

#[derive(Debug, Default, Deserialize)]
struct NominatimAddress {
    house_number: Option<String>,
    road: Option<String>,
    city: Option<String>,
    town: Option<String>,
    village: Option<String>,
}

impl NominatimPlace {
    fn into_placemark(self) -> Result<Placemark, ServiceError> {
        let lat = parse_degrees(&self.lat)?;
        let lng = parse_degrees(&self.lon)?;
        let address = self.address.unwrap_or_default();

        let name = non_empty(self.name).or_else(|| match (address.house_number, address.road) {
            (Some(number), Some(road)) => Some(format!("{} {}", number, road)),
            (None, road) => road,
            (Some(_), None) => None,
        });
        let locality = address.city.or(address.town).or(address.village);

        Ok(Placemark {
            name,
            locality: non_empty(locality),
            formatted: non_empty(self.display_name),
            coordinate: Some((lat, lng)),
        })
    }
}

fn parse_degrees(raw: &str) -> Result<f64, ServiceError> {
    raw.parse::<f64>()
        .map_err(|_| ServiceError::Malformed(format!("bad coordinate {:?}", raw)))
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}
