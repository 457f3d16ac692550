//! FellowFlight terminal front end

use std::io::read_to_string;

use clap::Parser;
use color_eyre::Result;
use color_eyre::eyre::eyre;
use cookie::CookieJar;
use fellowflight::autocomplete::AutocompleteController;
use fellowflight::guard::{Decision, NavigationGuard, Navigator, Route};
use fellowflight::matches::{
    AvatarSource, InitialsAvatar, LoadOutcome, MatchClient, MatchesView, Normalizer,
    RandomPortrait,
};
use fellowflight::session::{SessionMarkers, SessionReader, cookie_jar};
use tracing::info;

use crate::config::{Config, LogFormat};
use crate::opt::{Command, Opt};

mod config;
mod opt;

/// Initializes tracing collection
fn setup_tracing(config: config::Logging) -> Result<()> {
    use tracing_error::ErrorLayer;
    use tracing_subscriber::prelude::*;
    use tracing_subscriber::{EnvFilter, fmt};

    let fmt_layer = match config.format {
        LogFormat::Pretty => fmt::layer().pretty().with_writer(std::io::stderr).boxed(),
        LogFormat::Compact => fmt::layer().compact().with_writer(std::io::stderr).boxed(),
    };

    let filter_layer = EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new("info"))?;

    let filter_layer = config
        .filters
        .into_iter()
        .fold(filter_layer, |layer, filter| layer.add_directive(filter));

    tracing_subscriber::registry()
        .with(filter_layer)
        .with(fmt_layer)
        .with(ErrorLayer::default())
        .init();

    Ok(())
}

/// Prints redirects instead of performing them
struct StdoutNavigator;

impl Navigator for StdoutNavigator {
    fn redirect(&mut self, route: Route) {
        println!("redirect {route}");
    }
}

fn guard(cookies: &str, markers: SessionMarkers) -> NavigationGuard<SessionReader<CookieJar>> {
    NavigationGuard::new(SessionReader::with_markers(cookie_jar(cookies), markers))
}

async fn show_matches<A: AvatarSource>(
    view: MatchesView<SessionReader<CookieJar>, A>,
    flight_id: i64,
) -> Result<()> {
    match view.load(flight_id, &mut StdoutNavigator).await {
        LoadOutcome::Redirected(_) => return Ok(()),
        LoadOutcome::Unavailable => info!(flight_id, "Match service unavailable"),
        LoadOutcome::Loaded(count) => info!(flight_id, count, "Matches loaded"),
        LoadOutcome::Stale => return Err(eyre!("Matches request was superseded")),
    }

    println!("{}", serde_json::to_string_pretty(&view.matches().await)?);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let Opt {
        config: mut config_file,
        command,
    } = Opt::parse();

    let config = read_to_string(&mut config_file)?;
    let config: Config = toml::from_str(&config)?;

    setup_tracing(config.logging)?;
    color_eyre::install()?;

    info!(
        config = ?config_file.path().path(),
        "Tracing initialized"
    );

    match command {
        Command::Route { path, cookies } => {
            if guard(&cookies, config.session).on_navigation(&path, &mut StdoutNavigator)
                == Decision::Allow
            {
                println!("allow {path}");
            }
        }
        Command::Matches {
            flight_id,
            cookies,
            random_avatars,
        } => {
            let guard = guard(&cookies, config.session);
            let client = MatchClient::new(&config.api)?;
            if random_avatars {
                let normalizer = Normalizer::new(RandomPortrait::new());
                show_matches(MatchesView::with_normalizer(guard, client, normalizer), flight_id)
                    .await?;
            } else {
                let normalizer = Normalizer::new(InitialsAvatar);
                show_matches(MatchesView::with_normalizer(guard, client, normalizer), flight_id)
                    .await?;
            }
        }
        Command::Airports { query } => {
            let autocomplete = AutocompleteController::new();
            let report = autocomplete.load(&config.airports).await?;
            info!(
                indexed = report.indexed,
                skipped = report.skipped,
                "Airports ready"
            );
            for airport in autocomplete.on_query_changed(&query) {
                println!("{}", airport.label());
            }
        }
    }

    Ok(())
}
