//! Games command handler
//!
//! Searches for nearby football games and prints them.

use crate::config::Config;
use crate::discovery::DiscoveryClient;
use crate::error::{Error, Result};
use crate::format::{available_formats, get_formatter, SearchReport};
use crate::geo::fixed::FixedLocation;
use crate::geo::ip_location::IpLocator;
use crate::geo::nominatim::NominatimBackend;
use crate::geo::{ConfiguredLocation, Coordinates};
use crate::maps::{CommandLauncher, Platform};
use crate::nearby::{NearbyGames, SearchOutcome};
use crate::search::{LocationSource, SearchMode, SearchParameters};
use clap::Args;
use std::str::FromStr;

/// Games command arguments
#[derive(Args)]
pub struct GamesArgs {
    /// Search around a geocoded address instead of the device location
    #[arg(long, short = 'a', conflicts_with = "at")]
    pub address: Option<String>,

    /// Use a fixed "lat,lng" position as the device location
    #[arg(long)]
    pub at: Option<String>,

    /// Club or league page on fussball.de or fupa.net (repeatable)
    #[arg(long = "link", short = 'l')]
    pub links: Vec<String>,

    /// Address to center a link search on
    #[arg(long)]
    pub center: Option<String>,

    /// Search mode: coordinate or link
    #[arg(long, short = 'm')]
    pub mode: Option<String>,

    /// Search radius in km (1, 5, 10, 25, 50, 75, 100)
    #[arg(long, short = 'r')]
    pub radius: Option<u32>,

    /// Match date (YYYY-MM-DD), defaults to today
    #[arg(long, short = 'd')]
    pub date: Option<String>,

    /// Output format
    #[arg(long, short = 'f')]
    pub format: Option<String>,

    /// Maps platform for route links: ios or android
    #[arg(long)]
    pub platform: Option<String>,

    /// Open the route to the game with this id after searching
    #[arg(long)]
    pub open: Option<String>,

    /// List available formats
    #[arg(short = 'F', long = "list-formats")]
    pub list_formats: bool,
}

/// Run the games command
pub async fn run(args: GamesArgs) -> Result<()> {
    if args.list_formats {
        list_formats();
        return Ok(());
    }

    let config = Config::load()?;
    let params = build_parameters(&args, &config)?;

    let platform = match &args.platform {
        Some(p) => Platform::from_str(p).map_err(Error::Config)?,
        None => config.platform()?,
    };

    let format = args.format.clone().unwrap_or(config.output.format.clone());
    let formatter = get_formatter(&format)
        .ok_or_else(|| Error::Config(format!("Unknown format: {}", format)))?;

    let session = NearbyGames::new(
        NominatimBackend::with_base_url(&config.api.geocoder_url)?,
        build_location(&args, &config)?,
        DiscoveryClient::with_base_url(&config.api.base_url)?,
        Box::new(CommandLauncher::new(&config.maps.open_command)),
        platform,
        params,
    );

    let outcome = session.show().await.unwrap_or(SearchOutcome::Empty);
    print_alerts(&session);

    if let Some(message) = session.inline_error() {
        eprintln!("{}", message);
    }

    let report = SearchReport::new(&session.params(), &outcome);
    println!("{}", formatter.format(&report)?);

    if let Some(id) = &args.open {
        if session.open_route(id).is_err() {
            print_alerts(&session);
            std::process::exit(1);
        }
    }

    // Failures were already shown as alerts or inline messages
    if matches!(outcome, SearchOutcome::Error(_)) {
        std::process::exit(1);
    }

    Ok(())
}

/// Combine config defaults with command-line overrides
fn build_parameters(args: &GamesArgs, config: &Config) -> Result<SearchParameters> {
    let mut params = config.search_parameters()?;

    if !args.links.is_empty() {
        params.set_link_sources(args.links.clone());
    }
    if let Some(center) = &args.center {
        params.set_link_center_address(center.clone());
    }

    let mode = match &args.mode {
        Some(mode) => SearchMode::from_str(mode).map_err(Error::Config)?,
        // Links on the command line imply a link search
        None if !args.links.is_empty() => SearchMode::Link,
        None => params.mode(),
    };
    params.set_mode(mode);

    if let Some(address) = &args.address {
        params.set_source(LocationSource::Manual);
        params.set_manual_address(address.clone());
    } else if args.at.is_some() {
        params.set_source(LocationSource::Device);
    }

    if let Some(radius) = args.radius {
        params.set_radius(radius)?;
    }
    if let Some(date) = &args.date {
        params.set_date_str(date)?;
    }

    Ok(params)
}

/// Pick the device location provider
fn build_location(args: &GamesArgs, config: &Config) -> Result<ConfiguredLocation> {
    if let Some(at) = &args.at {
        let position = Coordinates::parse_pair(at)?;
        return Ok(ConfiguredLocation::Fixed(FixedLocation::granted(position)));
    }

    match config.location.provider.as_str() {
        "fixed" => Ok(ConfiguredLocation::Fixed(FixedLocation::new(
            config.fixed_position(),
            config.location.permission,
        ))),
        "ip" => Ok(ConfiguredLocation::Ip(IpLocator::new(
            config.location.permission,
        )?)),
        other => Err(Error::Config(format!("Unknown location provider: {}", other))),
    }
}

fn print_alerts<G, L, D>(session: &NearbyGames<G, L, D>)
where
    G: crate::geo::GeoBackend,
    L: crate::geo::LocationProvider,
    D: crate::discovery::GameDiscovery,
{
    for alert in session.take_alerts() {
        eprintln!("{}: {}", alert.title, alert.message);
    }
}

/// Print available output formats
fn list_formats() {
    println!("Available output formats:");
    for format in available_formats() {
        println!("  {:6} - {}", format.name, format.description);
    }
}
