//! Kiosk control service.
//!
//! Accepts WebSocket connections from the sensor bridge, feeds decoded
//! frames into the session, and runs the heartbeat that drives the
//! debounce/idle clocks. The map runs headless here; a renderer process
//! can mirror the surface state, but the control loop does not need one.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};

use clap::Parser;
use futures_util::StreamExt;
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::Mutex;
use tokio_tungstenite::tungstenite::Message;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use foundation::geo::LatLng;
use foundation::time::{DurationMs, TimestampMs};
use gate::sampler::FixedQualitySampler;
use gesture::headless::{HeadlessSurface, RecordingDisplay};
use gesture::session::Session;
use gesture::surface::MapSurface;
use registry::config::load_registry_file;
use registry::demo::demo_registry;
use registry::registry::LayerRegistry;
use registry::settings::KioskConfig;

#[derive(Debug, Parser)]
#[command(name = "kiosk", about = "Tilty-table kiosk control service")]
struct Args {
    /// Address to listen on for sensor-bridge WebSocket connections.
    #[arg(long, default_value = "127.0.0.1:5678")]
    addr: SocketAddr,

    /// Layer registry JSON; the built-in demo table when omitted.
    #[arg(long)]
    registry: Option<PathBuf>,

    /// Settings JSON; built-in defaults when omitted.
    #[arg(long)]
    settings: Option<PathBuf>,

    /// Heartbeat interval in milliseconds.
    #[arg(long, default_value_t = 100)]
    tick_ms: u64,

    /// Seed for the analysis sample-point generator.
    #[arg(long, default_value_t = 0)]
    seed: u64,

    /// Fixed quality reading served by the stub imagery sampler.
    #[arg(long, default_value_t = 1200.0)]
    imagery_quality: f64,
}

/// The session plus its headless surface and real-clock bookkeeping.
struct Kiosk {
    session: Session,
    surface: HeadlessSurface,
    display: RecordingDisplay,
    sampler: FixedQualitySampler,
    epoch: Instant,
    settle_delay: DurationMs,
    tiles_due: Option<TimestampMs>,
}

impl Kiosk {
    fn new(registry: LayerRegistry, cfg: KioskConfig, args: &Args) -> Self {
        let home = cfg.home();
        let min_zoom = cfg.min_zoom;
        Self {
            session: Session::new(registry, cfg, args.seed),
            surface: HeadlessSurface::new(home, min_zoom),
            display: RecordingDisplay::default(),
            sampler: FixedQualitySampler(args.imagery_quality),
            epoch: Instant::now(),
            settle_delay: DurationMs::millis(args.tick_ms as i64),
            tiles_due: None,
        }
    }

    fn now(&self) -> TimestampMs {
        TimestampMs(self.epoch.elapsed().as_millis() as i64)
    }

    fn on_frame(&mut self, raw: &str) {
        let now = self.now();
        let inbound = transport::protocol::decode(raw);
        self.session
            .handle(now, &inbound, &mut self.surface, &mut self.display);
        self.flush_logs();
    }

    fn tick(&mut self) {
        let now = self.now();
        self.session.tick(now, &mut self.surface, &mut self.display);

        // Forward viewport movement to the analysis scheduler, then
        // synthesize the tiles-loaded signal one heartbeat later.
        let mut moved = false;
        if self.surface.take_zoom_changed() {
            self.session
                .on_zoom_changed(now, self.surface.zoom_value(), self.surface.center());
            moved = true;
        }
        if self.surface.take_center_changed() {
            let center: LatLng = self.surface.center();
            self.session.on_center_changed(now, center);
            moved = true;
        }
        if moved {
            self.tiles_due = Some(now.offset(self.settle_delay));
        } else if self.tiles_due.is_some_and(|due| now >= due) {
            self.tiles_due = None;
            self.session.on_tiles_loaded(now, &self.surface, &mut self.sampler);
        }
        self.flush_logs();
    }

    fn flush_logs(&mut self) {
        for event in self.session.drain_events() {
            info!(kind = event.kind, at = event.at.0, "{}", event.message);
        }
        for line in self.display.log.drain(..) {
            info!("display: {line}");
        }
    }
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let args = Args::parse();

    let registry = match &args.registry {
        Some(path) => match load_registry_file(path) {
            Ok(registry) => registry,
            Err(err) => {
                error!("cannot load registry {}: {err}", path.display());
                std::process::exit(1);
            }
        },
        None => demo_registry(),
    };

    let cfg = match &args.settings {
        Some(path) => {
            let raw = match std::fs::read_to_string(path) {
                Ok(raw) => raw,
                Err(err) => {
                    error!("cannot read settings {}: {err}", path.display());
                    std::process::exit(1);
                }
            };
            match serde_json::from_str::<KioskConfig>(&raw) {
                Ok(cfg) => cfg,
                Err(err) => {
                    error!("cannot parse settings {}: {err}", path.display());
                    std::process::exit(1);
                }
            }
        }
        None => KioskConfig::default(),
    };

    let kiosk = Arc::new(Mutex::new(Kiosk::new(registry, cfg, &args)));

    let heartbeat = kiosk.clone();
    let tick = Duration::from_millis(args.tick_ms.max(1));
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(tick);
        loop {
            interval.tick().await;
            heartbeat.lock().await.tick();
        }
    });

    let listener = match TcpListener::bind(args.addr).await {
        Ok(listener) => listener,
        Err(err) => {
            error!("cannot bind {}: {err}", args.addr);
            std::process::exit(1);
        }
    };
    info!("kiosk listening on ws://{}", args.addr);

    loop {
        match listener.accept().await {
            Ok((stream, peer)) => {
                tokio::spawn(handle_connection(kiosk.clone(), stream, peer));
            }
            Err(err) => warn!("accept failed: {err}"),
        }
    }
}

async fn handle_connection(kiosk: Arc<Mutex<Kiosk>>, stream: TcpStream, peer: SocketAddr) {
    let ws = match tokio_tungstenite::accept_async(stream).await {
        Ok(ws) => ws,
        Err(err) => {
            warn!(%peer, "websocket handshake failed: {err}");
            return;
        }
    };
    info!(%peer, "sensor bridge connected");

    let (_write, mut read) = ws.split();
    while let Some(frame) = read.next().await {
        match frame {
            Ok(Message::Text(raw)) => kiosk.lock().await.on_frame(&raw),
            Ok(Message::Close(_)) => break,
            Ok(_) => {}
            Err(err) => {
                warn!(%peer, "websocket read failed: {err}");
                break;
            }
        }
    }
    info!(%peer, "sensor bridge disconnected");
}
