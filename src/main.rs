use anyhow::{Context, Result};
use futures::future::join_all;
use ptz_control::camera::CameraRegistry;
use ptz_control::config::AppConfig;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "ptz_control=info,ptz_probe=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config_path = std::env::var("CONFIG_PATH")
        .unwrap_or_else(|_| "config/cameras.yaml".to_string());

    let config = AppConfig::load_from_file(&config_path)
        .with_context(|| format!("Failed to load configuration from {}", config_path))?;

    let registry = CameraRegistry::from_config(&config);
    let cameras = registry.list().await;

    tracing::info!("Probing {} PTZ camera(s)", cameras.len());

    let results = join_all(cameras.iter().map(|camera| probe(&registry, &camera.name))).await;

    let failed: Vec<&str> = cameras
        .iter()
        .zip(&results)
        .filter(|(_, ok)| !**ok)
        .map(|(camera, _)| camera.name.as_str())
        .collect();

    if !failed.is_empty() {
        anyhow::bail!("{} of {} camera(s) failed: {}", failed.len(), cameras.len(), failed.join(", "));
    }

    tracing::info!("All cameras responded");
    Ok(())
}

async fn probe(registry: &CameraRegistry, name: &str) -> bool {
    match probe_camera(registry, name).await {
        Ok(()) => true,
        Err(e) => {
            tracing::error!("Camera {}: {}", name, e);
            false
        }
    }
}

async fn probe_camera(registry: &CameraRegistry, name: &str) -> ptz_control::Result<()> {
    let mut controller = registry.controller(name).await?;

    let status = controller.get_status().await?;
    tracing::info!(
        "Camera {}: pan={} tilt={} zoom={}",
        name,
        status.pan,
        status.tilt,
        status.zoom
    );

    let presets = controller.get_presets().await?;
    tracing::info!("Camera {}: {} preset(s)", name, presets.len());
    for preset in presets {
        tracing::debug!("Camera {}: preset {} {:?}", name, preset.id, preset.name);
    }

    Ok(())
}
