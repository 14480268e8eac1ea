mod config;
mod feed;
mod tracing_map;

use std::rc::Rc;

use chrono::Utc;
use fleet_map_client::{
    EntityMarkerTracker, IconSet, ObservabilityCounters, OverlayConfig, TrackerConfig,
    TrajectoryOverlay,
};
use fleet_map_shared::{EntitySnapshot, Itinerary};
use tokio::signal;
use tokio::task::LocalSet;
use tracing_subscriber::EnvFilter;

use crate::tracing_map::TracingMap;

#[tokio::main(flavor = "current_thread")]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let Some(feed_path) = config::feed_path() else {
        tracing::error!("FLEET_MAP_FEED is required to run fleet-map-replay");
        return;
    };
    let snapshots = match feed::load_feed(&feed_path).await {
        Ok(snapshots) => snapshots,
        Err(e) => {
            tracing::error!(error = %e, "failed to load snapshot feed");
            return;
        }
    };
    tracing::info!(snapshots = snapshots.len(), "Loaded snapshot feed");

    let itinerary = match config::itinerary_path() {
        Some(path) => match feed::load_itinerary(&path).await {
            Ok(itinerary) => Some(itinerary),
            Err(e) => {
                tracing::warn!(error = %e, "failed to load itinerary, continuing without it");
                None
            }
        },
        None => None,
    };

    LocalSet::new().run_until(replay(snapshots, itinerary)).await;

    tracing::info!("Replay finished");
}

async fn replay(snapshots: Vec<EntitySnapshot>, itinerary: Option<Itinerary>) {
    let map = Rc::new(TracingMap::default());
    let counters = Rc::new(ObservabilityCounters::default());
    let mut tracker = EntityMarkerTracker::new(
        map.clone(),
        TrackerConfig {
            icons: IconSet::with_base_dir(config::icon_base_dir()),
        },
    )
    .with_counters(counters.clone());
    let lag = if config::anchor_clock() {
        feed::recording_lag(&snapshots, Utc::now())
    } else {
        None
    };
    if let Some(lag) = lag {
        tracing::info!(lag_secs = lag.num_seconds(), "anchoring clock to the recorded feed");
        tracker = tracker.with_clock(move || Utc::now() - lag);
    }
    let overlay =
        TrajectoryOverlay::new(map, OverlayConfig::default()).with_counters(counters.clone());

    if let Some(itinerary) = itinerary.as_ref() {
        overlay.show(itinerary);
    }

    let mut step = tokio::time::interval(config::replay_step());
    let mut refresh = tokio::time::interval(config::icon_refresh_interval());
    // Consume the immediate first tick; markers are painted fresh on creation.
    refresh.tick().await;

    let shutdown = shutdown_signal();
    tokio::pin!(shutdown);

    let mut feed = snapshots.into_iter();
    loop {
        tokio::select! {
            _ = step.tick() => {
                let Some(snapshot) = feed.next() else {
                    break;
                };
                tracker.upsert(snapshot);
            }
            _ = refresh.tick() => {
                let changed = tracker.refresh();
                if changed > 0 {
                    tracing::info!(changed, tracked = tracker.len(), "repainted aging markers");
                }
            }
            name = &mut shutdown => {
                tracing::info!(signal = name, remaining = feed.len(), "stopping replay early");
                break;
            }
        }
    }

    // Let in-flight marker creations land before reporting.
    tokio::task::yield_now().await;
    tracker.refresh();

    let stats = counters.snapshot();
    tracing::info!(
        tracked = tracker.len(),
        created = stats.markers_created_total,
        moved = stats.position_updates_total,
        rejected = stats.rejected_snapshots_total,
        failures = stats.map_call_failures_total,
        "replay summary"
    );

    tracker.clear_all();
    overlay.hide();
}

/// Resolves with the name of the first termination signal received.
async fn shutdown_signal() -> &'static str {
    #[cfg(unix)]
    let sigterm = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                tracing::warn!(error = %e, "SIGTERM unavailable, only Ctrl+C stops the replay");
                std::future::pending::<()>().await;
            }
        }
    };
    #[cfg(not(unix))]
    let sigterm = std::future::pending::<()>();

    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::warn!(error = %e, "Ctrl+C handler failed");
            std::future::pending::<()>().await;
        }
    };

    tokio::select! {
        () = ctrl_c => "ctrl-c",
        () = sigterm => "sigterm",
    }
}
