//! Prometheus-compatible metrics endpoint
//!
//! Exposes minigame metrics in Prometheus format.
//! Default endpoint: http://localhost:9090/metrics

use std::collections::VecDeque;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use parking_lot::RwLock;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tracing::{debug, info};

use crate::game::task::TickReport;
use crate::lobby::boat::BoatTier;
use crate::minigame::pest_control::PestControl;

/// Metrics registry for the minigame server
#[derive(Debug)]
pub struct Metrics {
    // Tick timing (microseconds)
    pub tick_time_us: AtomicU64,
    pub tick_time_p95_us: AtomicU64,
    pub tick_time_p99_us: AtomicU64,
    pub tick_time_max_us: AtomicU64,

    // Scheduler
    pub tick_count: AtomicU64,
    pub tasks_executed: AtomicU64,
    pub tick_faults: AtomicU64,

    // Boats, indexed by BoatTier::index
    pub queued_players: [AtomicU64; 3],

    // Session
    pub session_active: AtomicU64,
    pub session_timer: AtomicU64,
    pub sessions_armed: AtomicU64,
    pub victories: AtomicU64,
    pub defeats: AtomicU64,
    pub players_launched: AtomicU64,
    pub points_awarded: AtomicU64,

    start_time: Instant,

    // Rolling tick times for percentile calculation
    tick_history: RwLock<VecDeque<u64>>,
}

impl Metrics {
    pub fn new() -> Self {
        Self {
            tick_time_us: AtomicU64::new(0),
            tick_time_p95_us: AtomicU64::new(0),
            tick_time_p99_us: AtomicU64::new(0),
            tick_time_max_us: AtomicU64::new(0),
            tick_count: AtomicU64::new(0),
            tasks_executed: AtomicU64::new(0),
            tick_faults: AtomicU64::new(0),
            queued_players: [AtomicU64::new(0), AtomicU64::new(0), AtomicU64::new(0)],
            session_active: AtomicU64::new(0),
            session_timer: AtomicU64::new(0),
            sessions_armed: AtomicU64::new(0),
            victories: AtomicU64::new(0),
            defeats: AtomicU64::new(0),
            players_launched: AtomicU64::new(0),
            points_awarded: AtomicU64::new(0),
            start_time: Instant::now(),
            tick_history: RwLock::new(VecDeque::with_capacity(1000)),
        }
    }

    /// Record a tick time and update percentiles
    pub fn record_tick_time(&self, duration: Duration) {
        let us = duration.as_micros() as u64;
        self.tick_time_us.store(us, Ordering::Relaxed);
        self.tick_count.fetch_add(1, Ordering::Relaxed);

        let mut history = self.tick_history.write();
        history.push_back(us);

        // Keep last 1000 samples
        while history.len() > 1000 {
            history.pop_front();
        }

        if history.len() >= 10 {
            let mut sorted: Vec<u64> = history.iter().copied().collect();
            sorted.sort_unstable();

            let p95_idx = (sorted.len() as f32 * 0.95) as usize;
            let p99_idx = (sorted.len() as f32 * 0.99) as usize;

            self.tick_time_p95_us.store(sorted[p95_idx.min(sorted.len() - 1)], Ordering::Relaxed);
            self.tick_time_p99_us.store(sorted[p99_idx.min(sorted.len() - 1)], Ordering::Relaxed);
            self.tick_time_max_us.store(sorted.last().copied().unwrap_or(0), Ordering::Relaxed);
        }
    }

    /// Fold a scheduler report into the counters
    pub fn record_report(&self, report: &TickReport) {
        self.tasks_executed.fetch_add(report.executed as u64, Ordering::Relaxed);
        self.tick_faults.fetch_add(report.faults as u64, Ordering::Relaxed);
    }

    /// Snapshot queue and session state after a tick
    pub fn update_from(&self, pest_control: &PestControl) {
        for boat in BoatTier::ALL {
            self.queued_players[boat.index()]
                .store(pest_control.queue(boat).len() as u64, Ordering::Relaxed);
        }

        let session = pest_control.session();
        self.session_active.store(u64::from(session.is_active()), Ordering::Relaxed);
        self.session_timer.store(session.timer().max(0) as u64, Ordering::Relaxed);

        let stats = pest_control.stats();
        self.sessions_armed.store(stats.sessions_armed, Ordering::Relaxed);
        self.victories.store(stats.victories, Ordering::Relaxed);
        self.defeats.store(stats.defeats, Ordering::Relaxed);
        self.players_launched.store(stats.players_launched, Ordering::Relaxed);
        self.points_awarded.store(stats.points_awarded, Ordering::Relaxed);
    }

    fn queued(&self, boat: BoatTier) -> u64 {
        self.queued_players[boat.index()].load(Ordering::Relaxed)
    }

    /// Get uptime in seconds
    pub fn uptime_seconds(&self) -> u64 {
        self.start_time.elapsed().as_secs()
    }

    /// Generate Prometheus-format metrics output
    pub fn to_prometheus(&self) -> String {
        let mut output = String::with_capacity(4096);

        macro_rules! metric {
            ($name:expr, $help:expr, $type:expr, $value:expr) => {
                output.push_str(&format!(
                    "# HELP {} {}\n# TYPE {} {}\n{} {}\n",
                    $name, $help, $name, $type, $name, $value
                ));
            };
        }

        // Performance metrics
        metric!("pest_control_tick_time_microseconds", "Current tick time in microseconds", "gauge",
            self.tick_time_us.load(Ordering::Relaxed));
        metric!("pest_control_tick_time_p95_microseconds", "95th percentile tick time", "gauge",
            self.tick_time_p95_us.load(Ordering::Relaxed));
        metric!("pest_control_tick_time_p99_microseconds", "99th percentile tick time", "gauge",
            self.tick_time_p99_us.load(Ordering::Relaxed));
        metric!("pest_control_tick_time_max_microseconds", "Maximum tick time", "gauge",
            self.tick_time_max_us.load(Ordering::Relaxed));
        metric!("pest_control_tick_count", "Total ticks processed", "counter",
            self.tick_count.load(Ordering::Relaxed));
        metric!("pest_control_tasks_executed_total", "Total task executions", "counter",
            self.tasks_executed.load(Ordering::Relaxed));
        metric!("pest_control_tick_faults_total", "Task faults caught by the scheduler", "counter",
            self.tick_faults.load(Ordering::Relaxed));

        // Per-boat queue sizes as labels
        output.push_str("# HELP pest_control_queued_players Players waiting on each boat\n");
        output.push_str("# TYPE pest_control_queued_players gauge\n");
        for boat in BoatTier::ALL {
            output.push_str(&format!(
                "pest_control_queued_players{{boat=\"{}\"}} {}\n",
                boat.name().to_lowercase(),
                self.queued(boat)
            ));
        }

        // Session
        metric!("pest_control_session_active", "Whether a game is running (0/1)", "gauge",
            self.session_active.load(Ordering::Relaxed));
        metric!("pest_control_session_timer_ticks", "Ticks left in the running game", "gauge",
            self.session_timer.load(Ordering::Relaxed));
        metric!("pest_control_sessions_armed_total", "Games started", "counter",
            self.sessions_armed.load(Ordering::Relaxed));
        metric!("pest_control_victories_total", "Games won", "counter",
            self.victories.load(Ordering::Relaxed));
        metric!("pest_control_defeats_total", "Games lost", "counter",
            self.defeats.load(Ordering::Relaxed));
        metric!("pest_control_players_launched_total", "Players moved onto the island", "counter",
            self.players_launched.load(Ordering::Relaxed));
        metric!("pest_control_points_awarded_total", "Pest Control points paid out", "counter",
            self.points_awarded.load(Ordering::Relaxed));
        metric!("pest_control_uptime_seconds", "Server uptime in seconds", "counter",
            self.uptime_seconds());

        output
    }

    /// Generate JSON format metrics
    pub fn to_json(&self) -> String {
        format!(r#"{{
  "performance": {{
    "tick_time_us": {},
    "tick_time_p95_us": {},
    "tick_time_p99_us": {},
    "tick_time_max_us": {},
    "tick_count": {},
    "tasks_executed": {},
    "tick_faults": {}
  }},
  "boats": {{
    "novice": {},
    "intermediate": {},
    "veteran": {}
  }},
  "session": {{
    "active": {},
    "timer": {},
    "armed": {},
    "victories": {},
    "defeats": {},
    "players_launched": {},
    "points_awarded": {}
  }},
  "uptime_seconds": {}
}}"#,
            self.tick_time_us.load(Ordering::Relaxed),
            self.tick_time_p95_us.load(Ordering::Relaxed),
            self.tick_time_p99_us.load(Ordering::Relaxed),
            self.tick_time_max_us.load(Ordering::Relaxed),
            self.tick_count.load(Ordering::Relaxed),
            self.tasks_executed.load(Ordering::Relaxed),
            self.tick_faults.load(Ordering::Relaxed),
            self.queued(BoatTier::Novice),
            self.queued(BoatTier::Intermediate),
            self.queued(BoatTier::Veteran),
            self.session_active.load(Ordering::Relaxed) == 1,
            self.session_timer.load(Ordering::Relaxed),
            self.sessions_armed.load(Ordering::Relaxed),
            self.victories.load(Ordering::Relaxed),
            self.defeats.load(Ordering::Relaxed),
            self.players_launched.load(Ordering::Relaxed),
            self.points_awarded.load(Ordering::Relaxed),
            self.uptime_seconds(),
        )
    }
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}

/// Start the metrics HTTP server
pub async fn start_metrics_server(metrics: Arc<Metrics>, port: u16) -> anyhow::Result<()> {
    let addr = format!("0.0.0.0:{}", port);
    let listener = TcpListener::bind(&addr).await?;

    info!("Metrics server listening on http://{}/metrics", addr);

    loop {
        let (mut socket, peer) = listener.accept().await?;
        let metrics = metrics.clone();

        tokio::spawn(async move {
            let mut buffer = [0u8; 1024];

            match socket.read(&mut buffer).await {
                Ok(n) if n > 0 => {
                    let request = String::from_utf8_lossy(&buffer[..n]);

                    let response = if request.starts_with("GET /metrics/json") || request.starts_with("GET /json") {
                        let body = metrics.to_json();
                        format!(
                            "HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                            body.len(),
                            body
                        )
                    } else if request.starts_with("GET /metrics") {
                        let body = metrics.to_prometheus();
                        format!(
                            "HTTP/1.1 200 OK\r\nContent-Type: text/plain; version=0.0.4\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                            body.len(),
                            body
                        )
                    } else if request.starts_with("GET /health") || request.starts_with("GET / ") {
                        let body = "OK";
                        format!(
                            "HTTP/1.1 200 OK\r\nContent-Type: text/plain\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                            body.len(),
                            body
                        )
                    } else {
                        "HTTP/1.1 404 Not Found\r\nContent-Length: 0\r\nConnection: close\r\n\r\n".to_string()
                    };

                    if let Err(e) = socket.write_all(response.as_bytes()).await {
                        debug!("Failed to write metrics response to {}: {}", peer, e);
                    }
                }
                Ok(_) => {}
                Err(e) => {
                    debug!("Failed to read from metrics socket {}: {}", peer, e);
                }
            }
        });
    }
}
