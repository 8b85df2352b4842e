use std::sync::Arc;
use std::time::{Duration, Instant};

use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use pest_control_server::config::MinigameConfig;
use pest_control_server::lobby::boat::BoatTier;
use pest_control_server::metrics::{self, Metrics};
use pest_control_server::minigame::pest_control::PestControl;
use pest_control_server::world::sim::SimWorld;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(false)
        .init();

    info!("Pest Control Server v{}", env!("CARGO_PKG_VERSION"));

    let config = MinigameConfig::load_or_default();
    config.validate().map_err(anyhow::Error::msg)?;
    info!(
        "Configuration loaded: tick={}ms, boat_wait={} ticks, players {}-{}",
        config.tick_interval_ms,
        config.boat_wait_ticks,
        config.min_players,
        config.max_players_per_launch
    );

    let metrics = Arc::new(Metrics::new());
    let metrics_clone = metrics.clone();
    let metrics_port = config.metrics_port;
    tokio::spawn(async move {
        if let Err(e) = metrics::start_metrics_server(metrics_clone, metrics_port).await {
            error!("Metrics server error: {}", e);
        }
    });

    let tick_interval = Duration::from_millis(config.tick_interval_ms);
    let max_ticks = config.max_ticks;
    let demo_players = config.demo_players;

    let (mut ctx, mut tasks) = PestControl::start(config, SimWorld::new());

    for i in 0..demo_players {
        let player = ctx
            .world
            .add_player(format!("Player{}", i), BoatTier::Novice.enter_location());
        if let Err(e) = ctx.minigame.join_queue(&mut ctx.world, player, BoatTier::Novice) {
            warn!("Demo player {} could not board: {}", i, e);
        }
    }
    info!(
        queued = ctx.minigame.queued_players(),
        tasks = tasks.len(),
        "Pest Control ready"
    );

    let mut interval = tokio::time::interval(tick_interval);
    interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

    loop {
        tokio::select! {
            _ = interval.tick() => {
                let started = Instant::now();
                let report = tasks.process(&mut ctx);
                metrics.record_tick_time(started.elapsed());
                metrics.record_report(&report);
                metrics.update_from(&ctx.minigame);

                if max_ticks > 0 && report.tick >= max_ticks {
                    info!(ticks = report.tick, "Tick limit reached");
                    break;
                }
            }
            result = tokio::signal::ctrl_c() => {
                if let Err(e) = result {
                    error!("Failed to listen for shutdown signal: {}", e);
                }
                info!("Shutdown signal received");
                break;
            }
        }
    }

    let stats = ctx.minigame.stats();
    info!(
        ticks = tasks.current_tick(),
        faults = tasks.total_faults(),
        sessions = stats.sessions_armed,
        victories = stats.victories,
        defeats = stats.defeats,
        points = stats.points_awarded,
        "Server stopped"
    );

    Ok(())
}
