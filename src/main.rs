// Main entry point - Dependency injection and render loop
mod application;
mod domain;
mod infrastructure;

use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

use crate::application::dashboard_service::DashboardService;
use crate::application::display_driver::DisplayDriver;
use crate::application::frame_renderer::FrameRenderer;
use crate::application::stats_service::StatsService;
use crate::infrastructure::config::load_config;
use crate::infrastructure::pihole_client::PiholeClient;
use crate::infrastructure::preview_display::PreviewDisplay;

const DEFAULT_CONFIG_PATH: &str = "config.json";

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    // Load configuration
    let config_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| DEFAULT_CONFIG_PATH.to_string());
    let config = load_config(&config_path)?;

    // Display driver is owned here for the life of the process
    let mut display = PreviewDisplay::new(config.display.preview_path.clone());

    // Landscape canvas: bar capacity follows the panel's long side
    let columns = config.chart.columns.unwrap_or_else(|| {
        config
            .chart
            .geometry(display.width())
            .capacity(display.height())
    });

    // Create services
    let client = Arc::new(PiholeClient::from_settings(&config.pihole)?);
    let stats_service = StatsService::new(client).with_columns(columns);
    let renderer = FrameRenderer::new(config.chart.clone(), config.assets.clone());
    let dashboard_service = DashboardService::new(stats_service, renderer);

    let Some(interval_secs) = config.refresh.interval_secs else {
        dashboard_service.render_cycle(&mut display).await?;
        return Ok(());
    };

    tracing::info!("Refreshing every {}s", interval_secs);
    let mut ticker = tokio::time::interval(Duration::from_secs(interval_secs));
    loop {
        ticker.tick().await;
        if let Err(e) = dashboard_service.render_cycle(&mut display).await {
            tracing::error!("Render cycle failed: {:#}", e);
        }
    }
}
