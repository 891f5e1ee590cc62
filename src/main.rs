use anyhow::Context;
use clap::{Parser, Subcommand};
use legwork::config::Config;
use legwork::itinerary::TripRecord;
use legwork::places::{PlaceList, ReverseGeocode};
use legwork::server::{self, AppState};
use legwork::telemetry;
use std::path::PathBuf;

/// legwork: travel itinerary forms and place autocomplete for a blog editor.
///
/// Examples:
///   legwork serve --port 8080
///   legwork search "Banff"
///   legwork geocode --lat 51.1784 --lon -115.5708
///   legwork form trips.json
#[derive(Parser)]
#[command(name = "legwork", version, about, long_about = None)]
struct Cli {
    /// Config file (JSON). Defaults to ~/.legwork/config.json when present.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Offline mode: answer place searches from the cache only.
    #[arg(long, global = true)]
    offline: bool,

    /// Log filter, e.g. "debug" or "legwork=trace". RUST_LOG wins when set.
    #[arg(long, global = true)]
    log: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run the HTTP service.
    Serve {
        #[arg(long)]
        host: Option<String>,
        #[arg(long)]
        port: Option<u16>,
    },
    /// Print place suggestions for a query as JSON.
    Search { query: String },
    /// Print the place name nearest to a coordinate.
    Geocode {
        #[arg(long, allow_hyphen_values = true)]
        lat: f64,
        #[arg(long, allow_hyphen_values = true)]
        lon: f64,
    },
    /// Render the itinerary form for a saved trip list (JSON array).
    Form { trips: PathBuf },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = Config::load(cli.config.as_deref()).context("Failed to load configuration")?;
    if let Some(log) = cli.log {
        config.log = log;
    }
    telemetry::init(&config.log);

    match cli.command {
        Command::Serve { host, port } => {
            if let Some(host) = host {
                config.host = host;
            }
            if let Some(port) = port {
                config.port = port;
            }
            let state = AppState::from_config(&config, cli.offline);
            let runtime = tokio::runtime::Runtime::new().context("Failed to start runtime")?;
            runtime.block_on(server::start(&config.host, config.port, state))?;
        }
        Command::Search { query } => {
            let state = AppState::from_config(&config, cli.offline);
            let (places, source) = state
                .places
                .search_with_source(&query)
                .with_context(|| format!("Search for '{}' failed", query))?;
            eprintln!("  {} result(s) from {}", places.len(), source);
            println!("{}", serde_json::to_string_pretty(&PlaceList { geonames: places })?);
        }
        Command::Geocode { lat, lon } => {
            if cli.offline {
                anyhow::bail!("Reverse geocoding needs network access");
            }
            let state = AppState::from_config(&config, cli.offline);
            let name = state
                .geocoder
                .nearby_place_name(lat, lon)
                .with_context(|| format!("No place name for {},{}", lat, lon))?;
            println!("{}", name);
        }
        Command::Form { trips } => {
            let data = std::fs::read_to_string(&trips)
                .with_context(|| format!("Cannot read {}", trips.display()))?;
            let records: Vec<TripRecord> =
                serde_json::from_str(&data).with_context(|| format!("Invalid trip list in {}", trips.display()))?;
            println!("{}", server::render_travel_form(&records));
        }
    }
    Ok(())
}
