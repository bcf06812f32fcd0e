// Dashboard service - Use case for one fetch-draw-display cycle
use crate::application::display_driver::DisplayDriver;
use crate::application::frame_renderer::FrameRenderer;
use crate::application::stats_service::StatsService;
use crate::domain::dashboard::Dashboard;
use crate::domain::frame::Frame;

#[derive(Clone)]
pub struct DashboardService {
    stats: StatsService,
    renderer: FrameRenderer,
}

impl DashboardService {
    pub fn new(stats: StatsService, renderer: FrameRenderer) -> Self {
        Self { stats, renderer }
    }

    pub async fn fetch(&self) -> anyhow::Result<Dashboard> {
        let stats = self.stats.get_current_stats().await?;
        let history = self.stats.get_history_stats().await?;

        let dashboard = Dashboard::new(stats, history);

        if dashboard.backend_running() {
            let stats = &dashboard.stats;
            tracing::info!(
                "Pi-hole: {} clients, {} of {} queries blocked ({:.1}%)",
                stats.unique_clients,
                stats.ads_blocked_today,
                stats.dns_queries_today,
                stats.ads_percentage_today
            );
        } else {
            tracing::warn!("Pi-hole FTL is not running, rendering an empty dashboard");
        }

        Ok(dashboard)
    }

    /// Draw the logo and both history charts onto a fresh frame
    pub fn draw(&self, dashboard: &Dashboard, driver: &dyn DisplayDriver) -> anyhow::Result<Frame> {
        let mut frame = self.renderer.new_frame(driver);
        self.renderer.draw_logo(&mut frame)?;
        self.renderer.draw_charts(
            &mut frame,
            &dashboard.history.domains,
            &dashboard.history.ads,
        );
        Ok(frame)
    }

    /// Fetch, draw and push one frame. A failed fetch aborts before drawing.
    pub async fn render_cycle(&self, driver: &mut dyn DisplayDriver) -> anyhow::Result<Dashboard> {
        let dashboard = self.fetch().await?;
        let frame = self.draw(&dashboard, &*driver)?;
        self.renderer.compose_and_emit(&frame, driver)?;
        Ok(dashboard)
    }
}
