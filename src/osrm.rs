//! OSRM HTTP adapter for walking directions.

use serde::Deserialize;

use crate::error::ServiceError;
use crate::polyline::{Polyline, DEFAULT_PRECISION};
use crate::traits::{DirectionsProvider, DirectionsRequest, RouteAlternative};

#[derive(Debug, Clone)]
pub struct OsrmConfig {
    pub base_url: String,
    /// Profile name override. When `None` the profile follows the request's
    /// transport mode (`foot` for walking).
    pub profile: Option<String>,
    pub timeout_secs: u64,
}

impl Default for OsrmConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:5000".to_string(),
            profile: None,
            timeout_secs: 10,
        }
    }
}

#[derive(Debug, Clone)]
pub struct OsrmClient {
    config: OsrmConfig,
    client: reqwest::blocking::Client,
}

impl OsrmClient {
    pub fn new(config: OsrmConfig) -> Result<Self, reqwest::Error> {
        let client = reqwest::blocking::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self { config, client })
    }

    fn route_url(&self, request: &DirectionsRequest) -> String {
        let profile = self
            .config
            .profile
            .as_deref()
            .unwrap_or_else(|| request.transport.osrm_profile());
        let (origin_lat, origin_lng) = request.origin;
        let (dest_lat, dest_lng) = request.destination;

        format!(
            "{}/route/v1/{}/{:.6},{:.6};{:.6},{:.6}\
             ?alternatives={}&overview=full&geometries=polyline",
            self.config.base_url.trim_end_matches('/'),
            profile,
            origin_lng,
            origin_lat,
            dest_lng,
            dest_lat,
            request.alternatives
        )
    }
}

impl DirectionsProvider for OsrmClient {
    fn directions(
        &self,
        request: &DirectionsRequest,
    ) -> Result<Vec<RouteAlternative>, ServiceError> {
        let url = self.route_url(request);
        tracing::debug!(%url, "requesting OSRM route");

        let response = self.client.get(url).send()?;
        let status = response.status();
        // OSRM answers NoRoute with 400 and a JSON body; keep reading it.
        if status.is_server_error() {
            return Err(ServiceError::Status(status.as_u16()));
        }

        let body = response.json::<OsrmRouteResponse>()?;
        body.into_alternatives()
    }
}

#[derive(Debug, Deserialize)]
struct OsrmRouteResponse {
    code: String,
    message: Option<String>,
    #[serde(default)]
    routes: Vec<OsrmRoute>,
}

#[derive(Debug, Deserialize)]
struct OsrmRoute {
    distance: f64,
    duration: f64,
    geometry: String,
}

impl OsrmRouteResponse {
    fn into_alternatives(self) -> Result<Vec<RouteAlternative>, ServiceError> {
        match self.code.as_str() {
            "Ok" => self
                .routes
                .into_iter()
                .map(|route| {
                    let geometry = Polyline::decode(&route.geometry, DEFAULT_PRECISION)
                        .map_err(|err| ServiceError::Malformed(err.to_string()))?;
                    Ok(RouteAlternative {
                        distance_m: route.distance,
                        duration_s: route.duration,
                        geometry,
                    })
                })
                .collect(),
            "NoRoute" | "NoSegment" => Ok(Vec::new()),
            code => Err(ServiceError::Other(format!(
                "OSRM {}: {}",
                code,
                self.message.unwrap_or_default()
            ))),
        }
    }
}
