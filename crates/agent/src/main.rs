mod config;
mod daylight;
mod pacing;
mod service;
mod sink;

use anyhow::Context;
use capture::{CameraGrabber, JpegEncoder};
use config::AgentConfig;
use firebase::{FirebaseClient, ServiceAccountKey};
use service::AgentService;
use signal_hook::{
    consts::{SIGINT, SIGTERM},
    flag,
};
use sink::LocalSink;
use std::sync::Arc;
use std::sync::atomic::AtomicBool;

fn main() -> anyhow::Result<()> {
    let config = AgentConfig::from_env();
    common::setup_logging(config.environment);

    tracing::info!("Starting farmcam agent");

    let shutdown = Arc::new(AtomicBool::new(false));
    flag::register(SIGTERM, Arc::clone(&shutdown))?;
    flag::register(SIGINT, Arc::clone(&shutdown))?;

    let key = ServiceAccountKey::from_file(&config.credential_path)
        .context("Failed to load service account key - check credential path")?;

    let mut client = FirebaseClient::connect(key, config.bucket.clone())
        .context("Failed to initialize storage backend")?;

    tracing::info!(email = %config.email, "Resolving user identity");
    let uid = client
        .lookup_uid(&config.email)
        .context("Identity lookup failed")?
        .with_context(|| format!("No account found for {}", config.email))?;
    tracing::info!(%uid, "User identity resolved");

    CameraGrabber::probe(config.device_index)
        .context("Camera not accessible - check camera connection")?;

    let encoder =
        JpegEncoder::new(config.jpeg_quality).context("Failed to initialize JPEG encoder")?;
    let service = AgentService::new(
        uid,
        CameraGrabber::new(config.device_index),
        client,
        encoder,
        LocalSink::new(config.output_dir.clone()),
        config.capture_interval,
    );

    service.run(&shutdown);
    tracing::info!("Agent stopped");
    Ok(())
}
