//! Aggregate configuration with environment overrides.

use std::env;

use crate::nominatim::NominatimConfig;
use crate::osrm::OsrmConfig;
use crate::session::SessionConfig;

#[derive(Debug, Clone, Default)]
pub struct Config {
    pub osrm: OsrmConfig,
    pub nominatim: NominatimConfig,
    pub session: SessionConfig,
}

impl Config {
    /// Defaults overridden by `ROUTER_*` environment variables.
    ///
    /// Unparseable numeric values are ignored with a warning.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(url) = lookup("ROUTER_OSRM_URL") {
            config.osrm.base_url = url;
        }
        if let Some(profile) = lookup("ROUTER_OSRM_PROFILE") {
            config.osrm.profile = Some(profile);
        }
        if let Some(url) = lookup("ROUTER_NOMINATIM_URL") {
            config.nominatim.base_url = url;
        }
        if let Some(agent) = lookup("ROUTER_USER_AGENT") {
            config.nominatim.user_agent = agent;
        }
        if let Some(secs) = parse_var::<u64>(&lookup, "ROUTER_TIMEOUT_SECS") {
            config.osrm.timeout_secs = secs;
            config.nominatim.timeout_secs = secs;
        }
        if let Some(threshold) = parse_var::<usize>(&lookup, "ROUTER_ROUTE_READY_THRESHOLD") {
            config.session.route_ready_threshold = threshold;
        }

        config
    }
}

fn parse_var<T: std::str::FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
) -> Option<T> {
    let raw = lookup(key)?;
    match raw.trim().parse() {
        Ok(value) => Some(value),
        Err(_) => {
            tracing::warn!(key, value = %raw, "ignoring unparseable setting");
            None
        }
    }
}
