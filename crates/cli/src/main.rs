use anyhow::Context;
use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use pulse_dashboard_core::format::compact_number;
use pulse_dashboard_core::{Dashboard, FailurePolicy, Settings, SlicePolicies};

#[derive(Debug, Parser)]
#[command(name = "pulse-dashboard")]
struct Args {
    /// Preferences file (overrides PULSE_PREFERENCES_PATH).
    #[arg(long)]
    preferences: Option<PathBuf>,

    /// Seed for the simulated feed (overrides PULSE_SIMULATOR_SEED).
    #[arg(long)]
    seed: Option<u64>,

    /// Stop after this many seconds instead of waiting for Ctrl-C.
    #[arg(long)]
    duration_secs: Option<u64>,

    /// How often to log a state summary.
    #[arg(long, default_value_t = 30)]
    summary_secs: u64,

    /// Keep the last data on fetch failure instead of substituting fallback data.
    #[arg(long)]
    serve_stale: bool,

    /// Print the final state as JSON on exit.
    #[arg(long)]
    json: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();

    let mut settings = Settings::from_env().context("load settings from environment")?;
    if let Some(path) = args.preferences {
        settings.preferences_path = path;
    }
    if let Some(seed) = args.seed {
        settings.simulator.seed = Some(seed);
    }
    if args.serve_stale {
        settings.policies = SlicePolicies::uniform(FailurePolicy::ServeStale);
    }
    anyhow::ensure!(args.summary_secs > 0, "--summary-secs must be > 0");

    let dashboard = Dashboard::from_settings(settings).context("build dashboard")?;
    let handle = dashboard.mount().await;
    log_summary(&dashboard);

    let mut summary = tokio::time::interval(Duration::from_secs(args.summary_secs));
    summary.tick().await;

    let duration_secs = args.duration_secs;
    let deadline = async move {
        match duration_secs {
            Some(secs) => tokio::time::sleep(Duration::from_secs(secs)).await,
            None => std::future::pending().await,
        }
    };
    tokio::pin!(deadline);

    loop {
        tokio::select! {
            res = tokio::signal::ctrl_c() => {
                res.context("listen for Ctrl-C")?;
                tracing::info!("interrupted");
                break;
            }
            _ = &mut deadline => break,
            _ = summary.tick() => log_summary(&dashboard),
        }
    }

    handle.unmount().await;

    if args.json {
        let state = dashboard.snapshot();
        println!("{}", serde_json::to_string_pretty(&state).context("serialize state")?);
    }
    Ok(())
}

fn log_summary(dashboard: &Dashboard) {
    let state = dashboard.snapshot();

    for w in state.weather.data() {
        tracing::info!(city = %w.name, temperature = w.temperature, condition = %w.condition, "weather");
    }
    for c in state.crypto.records() {
        tracing::info!(
            asset = %c.id,
            price = c.price,
            change_24h = c.price_change_24h,
            market_cap = %compact_number(c.market_cap),
            "crypto"
        );
    }
    if let Some(top) = state.news.data().first() {
        tracing::info!(headlines = state.news.data().len(), latest = %top.title, "news");
    }

    let favorites = dashboard.favorites_view();
    tracing::info!(
        favorite_cities = favorites.weather.len(),
        favorite_cryptos = favorites.crypto.len(),
        notifications = state.notifications.len(),
        unread = state.notifications.unread_count(),
        "summary"
    );
}
