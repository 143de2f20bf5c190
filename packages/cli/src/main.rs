#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! CLI entry point for food place search.
//!
//! Credentials come from the environment variables named in the provider
//! service registry; only providers with a key take part. Set `RUST_LOG`
//! to see the pipeline (`RUST_LOG=info`) or per-record detail
//! (`RUST_LOG=debug`).

mod format;

use std::process::ExitCode;
use std::time::Duration;

use clap::{Parser, Subcommand};
use food_map_aggregate::{AggregationEngine, EngineConfig};
use food_map_location::DegradedModePolicy;
use food_map_poi_models::{
    Coordinates, DEFAULT_KEYWORD, DEFAULT_RADIUS_METERS, PriceBucket, ProviderId, SearchRequest,
};
use food_map_provider::{Credentials, configured_providers, service_registry};

#[derive(Parser)]
#[command(name = "food_map", about = "Search food places across Chinese map providers")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Search food places near a location
    Search(SearchArgs),
    /// List map providers and whether each has a credential
    Providers,
}

#[derive(clap::Args)]
struct SearchArgs {
    /// Coordinates ("39.9042,116.4074"), an address or place name, a
    /// region ("朝阳区", "Chaoyang District"), or "current location"
    location: String,
    /// Search radius in meters for coordinate searches
    #[arg(long, default_value_t = DEFAULT_RADIUS_METERS)]
    radius: u32,
    /// Provider search keyword
    #[arg(long, default_value = DEFAULT_KEYWORD)]
    keyword: String,
    /// Keep only this cuisine (e.g. "火锅"), matched against cuisine and tags
    #[arg(long)]
    cuisine: Option<String>,
    /// Keep only this price bucket (cheap, medium, expensive, unknown)
    #[arg(long)]
    price: Option<PriceBucket>,
    /// Comma-separated provider ids to query (amap, baidu, tencent)
    #[arg(long, value_delimiter = ',')]
    providers: Vec<ProviderId>,
    /// Provider POI type code (e.g. Amap `050000`)
    #[arg(long)]
    type_code: Option<String>,
    /// Keep region searches inside the named city
    #[arg(long)]
    city_limit: bool,
    /// Drop places farther than this many meters
    #[arg(long)]
    max_distance: Option<f64>,
    /// Show at most this many places
    #[arg(long)]
    limit: Option<usize>,
    /// Per-provider timeout in milliseconds
    #[arg(long, default_value = "10000")]
    timeout_ms: u64,
    /// Latitude to search around when the location cannot be resolved
    #[arg(long, requires = "fallback_lng", allow_hyphen_values = true)]
    fallback_lat: Option<f64>,
    /// Longitude to search around when the location cannot be resolved
    #[arg(long, requires = "fallback_lat", allow_hyphen_values = true)]
    fallback_lng: Option<f64>,
    /// Print results as JSON
    #[arg(long)]
    json: bool,
}

impl SearchArgs {
    fn request(&self) -> SearchRequest {
        let mut request = SearchRequest::new(self.location.clone());
        request.radius_meters = self.radius;
        request.keyword.clone_from(&self.keyword);
        request.cuisine_filter.clone_from(&self.cuisine);
        request.price_filter = self.price;
        request.providers.clone_from(&self.providers);
        request.poi_type_code.clone_from(&self.type_code);
        request.city_limit = self.city_limit;
        request.max_distance_meters = self.max_distance;
        request.limit = self.limit;
        request
    }

    fn engine_config(&self) -> EngineConfig {
        let degraded_mode = match (self.fallback_lat, self.fallback_lng) {
            (Some(lat), Some(lng)) => DegradedModePolicy::Fallback(Coordinates::new(lat, lng)),
            _ => DegradedModePolicy::Strict,
        };
        EngineConfig {
            provider_timeout: Duration::from_millis(self.timeout_ms),
            degraded_mode,
            ..EngineConfig::default()
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    pretty_env_logger::init();
    let cli = Cli::parse();

    match run(cli.command).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

async fn run(command: Commands) -> Result<(), Box<dyn std::error::Error>> {
    let credentials = Credentials::from_env();

    match command {
        Commands::Providers => {
            println!("{:<10} {:<28} {:<8} {:<18} CONFIGURED", "ID", "NAME", "PRIORITY", "KEY");
            println!("{}", "-".repeat(78));
            for service in service_registry::all_services() {
                let configured = if !service.enabled {
                    "disabled"
                } else if credentials.get(service.id).is_some() {
                    "yes"
                } else {
                    "no"
                };
                println!(
                    "{:<10} {:<28} {:<8} {:<18} {configured}",
                    service.id.to_string(),
                    service.name,
                    service.priority,
                    service.api_key_env
                );
            }
        }
        Commands::Search(args) => {
            let client = reqwest::Client::builder()
                .user_agent("food-map/1.0")
                .build()?;
            let providers = configured_providers(&credentials, &client);
            if providers.is_empty() {
                let vars: Vec<String> = service_registry::enabled_services()
                    .into_iter()
                    .map(|s| s.api_key_env)
                    .collect();
                log::error!("Set at least one of: {}", vars.join(", "));
            }

            let engine = AggregationEngine::new(providers, args.engine_config())?;
            let pois = engine.search(&args.request()).await?;

            if args.json {
                println!("{}", format::render_json(&pois)?);
            } else {
                print!("{}", format::render_text(&pois));
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> SearchArgs {
        let cli = Cli::try_parse_from(std::iter::once("food_map").chain(args.iter().copied()))
            .unwrap();
        match cli.command {
            Commands::Search(args) => args,
            Commands::Providers => panic!("expected search"),
        }
    }

    #[test]
    fn defaults_map_into_request() {
        let request = parse(&["search", "39.9042,116.4074"]).request();
        assert_eq!(request, SearchRequest::new("39.9042,116.4074"));
    }

    #[test]
    fn flags_map_into_request() {
        let request = parse(&[
            "search",
            "朝阳区",
            "--radius",
            "2500",
            "--keyword",
            "火锅",
            "--cuisine",
            "火锅",
            "--price",
            "medium",
            "--providers",
            "tencent,amap",
            "--type-code",
            "050100",
            "--city-limit",
            "--max-distance",
            "1500",
            "--limit",
            "5",
        ])
        .request();

        assert_eq!(request.location, "朝阳区");
        assert_eq!(request.radius_meters, 2500);
        assert_eq!(request.keyword, "火锅");
        assert_eq!(request.cuisine_filter.as_deref(), Some("火锅"));
        assert_eq!(request.price_filter, Some(PriceBucket::Medium));
        assert_eq!(request.providers, vec![ProviderId::Tencent, ProviderId::Amap]);
        assert_eq!(request.poi_type_code.as_deref(), Some("050100"));
        assert!(request.city_limit);
        assert_eq!(request.max_distance_meters, Some(1500.0));
        assert_eq!(request.limit, Some(5));
    }

    #[test]
    fn fallback_requires_both_coordinates() {
        let config = parse(&["search", "somewhere"]).engine_config();
        assert_eq!(config.degraded_mode, DegradedModePolicy::Strict);
        assert_eq!(config.provider_timeout, Duration::from_secs(10));

        let config = parse(&[
            "search",
            "somewhere",
            "--fallback-lat",
            "-33.8688",
            "--fallback-lng",
            "151.2093",
            "--timeout-ms",
            "2500",
        ])
        .engine_config();
        assert_eq!(
            config.degraded_mode,
            DegradedModePolicy::Fallback(Coordinates::new(-33.8688, 151.2093))
        );
        assert_eq!(config.provider_timeout, Duration::from_millis(2500));

        assert!(
            Cli::try_parse_from(["food_map", "search", "x", "--fallback-lat", "39.9"]).is_err()
        );
    }

    #[test]
    fn unknown_provider_is_rejected() {
        assert!(Cli::try_parse_from(["food_map", "search", "x", "--providers", "google"]).is_err());
    }
}
