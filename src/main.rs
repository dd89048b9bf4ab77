use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use geodesic::{CalendarEpoch, Cartesian, EllipsoidName, GeodeticTrack, Inertial};

mod config;

use config::Config;

#[derive(Parser)]
#[command(name = "geodesic")]
#[command(about = "Ellipsoidal geodesy calculations")]
#[command(version)]
struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Configuration file [default: ~/.config/geodesic/config.toml]
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Reference ellipsoid, overriding the configuration
    #[arg(long, global = true)]
    ellipsoid: Option<EllipsoidName>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Azimuths and distance between two points
    Inverse {
        #[arg(allow_negative_numbers = true)]
        lat1: f64,
        #[arg(allow_negative_numbers = true)]
        lon1: f64,
        #[arg(allow_negative_numbers = true)]
        lat2: f64,
        #[arg(allow_negative_numbers = true)]
        lon2: f64,
    },

    /// Point reached from an origin along an azimuth
    Direct {
        #[arg(allow_negative_numbers = true)]
        lat: f64,
        #[arg(allow_negative_numbers = true)]
        lon: f64,
        /// Degrees clockwise from north
        #[arg(allow_negative_numbers = true)]
        azimuth: f64,
        distance_km: f64,
    },

    /// Geodetic position of an Earth-fixed Cartesian position in meters
    Geodetic {
        #[arg(allow_negative_numbers = true)]
        x: f64,
        #[arg(allow_negative_numbers = true)]
        y: f64,
        #[arg(allow_negative_numbers = true)]
        z: f64,
    },

    /// Geodetic track of a COSMIC inertial position file
    Cosmic {
        /// JSON file with `epoch` (RFC 3339) and `positions` ([x, y, z] in km)
        path: PathBuf,

        /// Seconds added to the epoch, overriding the configuration
        #[arg(long, allow_negative_numbers = true)]
        offset_seconds: Option<f64>,
    },
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct CosmicInput {
    epoch: String,
    positions: Vec<[f64; 3]>,
}

#[derive(Serialize)]
struct CosmicOutput {
    epoch: CalendarEpoch,
    hour_angle: f64,
    #[serde(flatten)]
    track: GeodeticTrack,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = load_config(cli.config.as_deref())?;
    match cli.command {
        Commands::Inverse {
            lat1,
            lon1,
            lat2,
            lon2,
        } => {
            let solver = config.geodesic.solver(cli.ellipsoid)?;
            print_json(&solver.inverse(lat1, lon1, lat2, lon2)?)
        }
        Commands::Direct {
            lat,
            lon,
            azimuth,
            distance_km,
        } => {
            let solver = config.geodesic.solver(cli.ellipsoid)?;
            print_json(&solver.direct(lat, lon, azimuth, distance_km)?)
        }
        Commands::Geodetic { x, y, z } => {
            let ellipsoid = config.geodesic.ellipsoid(cli.ellipsoid)?;
            let point = Cartesian::new(x, y, z).to_geodetic(&ellipsoid);
            if point.is_sentinel() {
                bail!("conversion of ({x}, {y}, {z}) did not converge");
            }
            print_json(&point)
        }
        Commands::Cosmic {
            path,
            offset_seconds,
        } => {
            let offset_seconds = offset_seconds.unwrap_or(config.cosmic.offset_seconds);
            print_json(&convert_cosmic(&config, &path, offset_seconds)?)
        }
    }
}

fn init_logging(verbose: bool) {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    let default = if verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default)),
        )
        .init();
}

fn load_config(path: Option<&Path>) -> Result<Config> {
    let path = match path {
        Some(path) => path.to_path_buf(),
        None => {
            let Some(home) = std::env::home_dir() else {
                return Ok(Config::default());
            };
            let path = home.join(".config/geodesic/config.toml");
            if !path.exists() {
                return Ok(Config::default());
            }
            path
        }
    };

    debug!(path = %path.display(), "loading config");
    let content = std::fs::read_to_string(&path)
        .with_context(|| format!("failed to read config file {}", path.display()))?;
    toml::from_str(&content)
        .with_context(|| format!("failed to parse config file {}", path.display()))
}

fn convert_cosmic(config: &Config, path: &Path, offset_seconds: f64) -> Result<CosmicOutput> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    let input: CosmicInput = serde_json::from_str(&content)
        .with_context(|| format!("failed to parse {}", path.display()))?;

    let time = DateTime::parse_from_rfc3339(&input.epoch)
        .with_context(|| format!("invalid epoch {:?}", input.epoch))?
        .with_timezone(&Utc);
    let epoch = CalendarEpoch::from(time);

    let positions: Vec<Inertial> = input.positions.into_iter().map(Inertial::from).collect();
    info!(samples = positions.len(), %time, "converting COSMIC track");

    let track = config
        .cosmic
        .converter()
        .convert_track(&epoch, offset_seconds, &positions);
    Ok(CosmicOutput {
        epoch,
        hour_angle: epoch.hour_angle(offset_seconds),
        track,
    })
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
