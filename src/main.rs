//! Googly Star entry point
//!
//! Runs the frame loop on the main thread and the HTTP control surface on a
//! tokio runtime. Ctrl-C stops both.

use std::net::IpAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use tokio::sync::Notify;

use googly_star::render::LogSink;
use googly_star::{Settings, StarStore, api, driver};

#[derive(Parser, Debug)]
#[command(name = "googly-star", about = "Bouncing star with googly eyes and an HTTP control surface")]
struct Args {
    /// JSON settings file
    #[arg(long, env = "GOOGLY_STAR_CONFIG")]
    config: Option<PathBuf>,

    /// API listen address
    #[arg(long, env = "GOOGLY_STAR_HOST")]
    host: Option<IpAddr>,

    /// API server port
    #[arg(long, env = "GOOGLY_STAR_PORT")]
    port: Option<u16>,

    /// Display width in pixels
    #[arg(long, env = "GOOGLY_STAR_WIDTH")]
    width: Option<f64>,

    /// Display height in pixels
    #[arg(long, env = "GOOGLY_STAR_HEIGHT")]
    height: Option<f64>,

    /// Simulation ticks per second
    #[arg(long, env = "GOOGLY_STAR_FPS")]
    fps: Option<f64>,

    /// Seed for the corner-trap jitter
    #[arg(long, env = "GOOGLY_STAR_SEED")]
    seed: Option<u64>,
}

impl Args {
    fn settings(&self) -> Result<Settings> {
        let mut settings = match &self.config {
            Some(path) => Settings::load(path)?,
            None => Settings::default(),
        };
        if let Some(host) = self.host {
            settings.host = host;
        }
        if let Some(port) = self.port {
            settings.port = port;
        }
        if let Some(width) = self.width {
            settings.width = width;
        }
        if let Some(height) = self.height {
            settings.height = height;
        }
        if let Some(fps) = self.fps {
            settings.tick_rate = fps;
        }
        if let Some(seed) = self.seed {
            settings.seed = seed;
        }
        settings.validate()?;
        Ok(settings)
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    let settings = args.settings()?;
    log::info!(
        "Googly Star starting at {}x{} ({} ticks/s)",
        settings.width,
        settings.height,
        settings.tick_rate
    );

    let store = StarStore::new(settings.sim_config());
    let stop = Arc::new(AtomicBool::new(false));
    let shutdown = Arc::new(Notify::new());

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("failed to start tokio runtime")?;

    let addr = settings.addr();
    let listener = runtime
        .block_on(tokio::net::TcpListener::bind(addr))
        .with_context(|| format!("failed to bind {addr}"))?;

    let server = {
        let shutdown = shutdown.clone();
        runtime.spawn(api::serve_with_stop(
            listener,
            store.clone(),
            async move {
                shutdown.notified().await;
            },
            stop.clone(),
        ))
    };

    {
        let stop = stop.clone();
        runtime.spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                log::info!("Interrupted");
            }
            stop.store(true, Ordering::Release);
        });
    }

    let mut sink = LogSink::new(settings.log_every);
    let result = driver::run(&store, &mut sink, &stop);

    store.set_running(false);
    shutdown.notify_one();
    let served = runtime.block_on(server);
    runtime.shutdown_timeout(Duration::from_secs(1));

    result?;
    served
        .context("API server task failed")?
        .context("API server stopped")?;
    log::info!("Goodbye!");
    Ok(())
}
