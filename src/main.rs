use std::process::ExitCode;

use clap::{Parser, Subcommand};
use serde_json::{Value, json};
use tracing_subscriber::EnvFilter;

use waypoint_router::config::Config;
use waypoint_router::geocoding::GeocodingAdapter;
use waypoint_router::haversine::StraightLineDirections;
use waypoint_router::location::{LiveLocationLabeler, LocationLabel, MarkerPolicy};
use waypoint_router::nominatim::NominatimClient;
use waypoint_router::osrm::OsrmClient;
use waypoint_router::polyline::DEFAULT_PRECISION;
use waypoint_router::traits::{DirectionsProvider, LocationEvent};
use waypoint_router::{Delivery, PlanOptions, RoutePlanner, RouteSegment, Session, Waypoint};

#[derive(Debug, Parser)]
#[command(name = "waypoint-router", version, about = "Walking routes between geocoded addresses")]
struct Cli {
    /// OSRM base URL (overrides ROUTER_OSRM_URL)
    #[arg(long, global = true)]
    osrm_url: Option<String>,

    /// Nominatim base URL (overrides ROUTER_NOMINATIM_URL)
    #[arg(long, global = true)]
    nominatim_url: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Geocode addresses in order and print the route as GeoJSON.
    Plan {
        /// Addresses in visiting order
        #[arg(required = true)]
        addresses: Vec<String>,

        /// Use straight lines instead of OSRM
        #[arg(long)]
        offline: bool,

        /// Waypoints needed before a route is planned
        #[arg(long)]
        threshold: Option<usize>,
    },
    /// Print the "Name, City" label for a coordinate.
    Label {
        #[arg(long, allow_negative_numbers = true)]
        lat: f64,
        #[arg(long, allow_negative_numbers = true)]
        lng: f64,
    },
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let mut config = Config::from_env();
    if let Some(url) = cli.osrm_url {
        config.osrm.base_url = url;
    }
    if let Some(url) = cli.nominatim_url {
        config.nominatim.base_url = url;
    }

    let result = match cli.command {
        Command::Plan {
            addresses,
            offline,
            threshold,
        } => {
            if let Some(threshold) = threshold {
                config.session.route_ready_threshold = threshold;
            }
            run_plan(config, &addresses, offline)
        }
        Command::Label { lat, lng } => run_label(config, (lat, lng)),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {}", err);
            ExitCode::FAILURE
        }
    }
}

fn run_plan(
    config: Config,
    addresses: &[String],
    offline: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let geocoder = GeocodingAdapter::new(NominatimClient::new(config.nominatim.clone())?);
    let directions: Box<dyn DirectionsProvider + Send + Sync> = if offline {
        Box::new(StraightLineDirections::default())
    } else {
        Box::new(OsrmClient::new(config.osrm.clone())?)
    };
    let planner = RoutePlanner::new(directions, PlanOptions::default());
    let mut session = Session::new(config.session);

    for address in addresses {
        if let Err(err) = session.add_address(&geocoder, address) {
            report(&err);
        }
    }

    let plan = session.plan_route(&planner)?;

    let segments: Vec<RouteSegment> = plan
        .outcomes
        .iter()
        .filter_map(|outcome| outcome.as_ref().ok().cloned())
        .collect();
    if let Delivery::Applied(failures) = session.apply_route(plan) {
        failures.iter().for_each(report);
    }

    let collection = feature_collection(session.waypoints(), &segments);
    println!("{}", serde_json::to_string_pretty(&collection)?);
    Ok(())
}

fn run_label(config: Config, coordinate: (f64, f64)) -> Result<(), Box<dyn std::error::Error>> {
    let geocoder = NominatimClient::new(config.nominatim)?;
    let mut labeler = LiveLocationLabeler::new(geocoder, MarkerPolicy::ReplaceLast);
    labeler.handle_event(LocationEvent::Update(coordinate));

    match labeler.label() {
        LocationLabel::Resolved(label) => println!("{}", label),
        LocationLabel::Unresolved => println!("(unresolved)"),
    }
    Ok(())
}

/// Stands in for the confirmation dialog. Log-only kinds were already
/// logged where they occurred.
fn report(err: &waypoint_router::Error) {
    if let Some(message) = dialog_text(err) {
        eprintln!("{}", message);
    }
}

fn dialog_text(err: &waypoint_router::Error) -> Option<&'static str> {
    err.user_message()
}

fn feature_collection(waypoints: &[Waypoint], segments: &[RouteSegment]) -> Value {
    let points = waypoints.iter().map(|waypoint| {
        let (lat, lng) = waypoint.coordinate();
        json!({
            "type": "Feature",
            "geometry": { "type": "Point", "coordinates": [lng, lat] },
            "properties": { "label": waypoint.label() },
        })
    });

    let lines = segments.iter().map(|segment| {
        let coordinates: Vec<[f64; 2]> = segment
            .polyline
            .points()
            .iter()
            .map(|&(lat, lng)| [lng, lat])
            .collect();
        json!({
            "type": "Feature",
            "geometry": { "type": "LineString", "coordinates": coordinates },
            "properties": {
                "segment": segment.index,
                "from": segment.from,
                "to": segment.to,
                "distance_m": segment.distance_m,
                "duration_s": segment.duration_s,
                "encoded": segment.polyline.encode(DEFAULT_PRECISION),
            },
        })
    });

    json!({
        "type": "FeatureCollection",
        "features": points.chain(lines).collect::<Vec<_>>(),
    })
}
