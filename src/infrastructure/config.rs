use anyhow::Context;
use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::domain::chart::ChartGeometry;

/// Environment overrides look like `PIHOLE_EPAPER__PIHOLE__API_URL`.
pub const ENV_PREFIX: &str = "PIHOLE_EPAPER";

#[derive(Debug, Deserialize, Clone)]
pub struct DashboardConfig {
    pub pihole: PiholeSettings,
    pub chart: ChartSettings,
    #[serde(default)]
    pub assets: AssetSettings,
    #[serde(default)]
    pub display: DisplaySettings,
    #[serde(default)]
    pub refresh: RefreshSettings,
}

#[derive(Debug, Deserialize, Clone)]
pub struct PiholeSettings {
    pub api_url: String,
    #[serde(default)]
    pub api_key: String,
    #[serde(default = "default_api_key_file")]
    pub api_key_file: PathBuf,
    pub timeout_secs: Option<u64>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ChartSettings {
    pub height: u32,
    #[serde(default = "default_chart_left")]
    pub left: u32,
    #[serde(default = "default_bottom_margin")]
    pub bottom_margin: u32,
    #[serde(default = "default_pitch")]
    pub pitch: u32,
    #[serde(default = "default_bar_width")]
    pub bar_width: u32,
    pub columns: Option<usize>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AssetSettings {
    #[serde(default = "default_logo_top")]
    pub logo_top: PathBuf,
    #[serde(default = "default_logo_bottom")]
    pub logo_bottom: PathBuf,
    #[serde(default = "default_logo_x")]
    pub logo_x: i64,
    #[serde(default = "default_logo_y")]
    pub logo_y: i64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DisplaySettings {
    #[serde(default = "default_preview_path")]
    pub preview_path: PathBuf,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct RefreshSettings {
    pub interval_secs: Option<u64>,
}

fn default_api_key_file() -> PathBuf {
    PathBuf::from("api-key.txt")
}

fn default_chart_left() -> u32 {
    4
}

fn default_bottom_margin() -> u32 {
    22
}

fn default_pitch() -> u32 {
    3
}

fn default_bar_width() -> u32 {
    1
}

fn default_logo_top() -> PathBuf {
    PathBuf::from("img/pihole-bw-80-top.bmp")
}

fn default_logo_bottom() -> PathBuf {
    PathBuf::from("img/pihole-bw-80-bottom.bmp")
}

fn default_logo_x() -> i64 {
    -12
}

fn default_logo_y() -> i64 {
    2
}

fn default_preview_path() -> PathBuf {
    PathBuf::from("frame.png")
}

impl Default for AssetSettings {
    fn default() -> Self {
        Self {
            logo_top: default_logo_top(),
            logo_bottom: default_logo_bottom(),
            logo_x: default_logo_x(),
            logo_y: default_logo_y(),
        }
    }
}

impl Default for DisplaySettings {
    fn default() -> Self {
        Self {
            preview_path: default_preview_path(),
        }
    }
}

impl ChartSettings {
    /// Bar placement on a canvas of the given height
    pub fn geometry(&self, canvas_height: u32) -> ChartGeometry {
        ChartGeometry {
            left: self.left,
            baseline: canvas_height.saturating_sub(self.bottom_margin),
            pitch: self.pitch,
            bar_width: self.bar_width,
        }
    }
}

impl DashboardConfig {
    fn validate(&self) -> anyhow::Result<()> {
        if self.pihole.api_url.trim().is_empty() {
            anyhow::bail!("pihole.api_url must not be empty");
        }
        if self.chart.height == 0 {
            anyhow::bail!("chart.height must be greater than zero");
        }
        if self.chart.pitch == 0 || self.chart.bar_width == 0 {
            anyhow::bail!("chart.pitch and chart.bar_width must be greater than zero");
        }
        if self.chart.bar_width > self.chart.pitch {
            anyhow::bail!(
                "chart.bar_width ({}) must not exceed chart.pitch ({})",
                self.chart.bar_width,
                self.chart.pitch
            );
        }
        if self.refresh.interval_secs == Some(0) {
            anyhow::bail!("refresh.interval_secs must be greater than zero when set");
        }
        Ok(())
    }
}

fn environment() -> config::Environment {
    config::Environment::with_prefix(ENV_PREFIX)
        .separator("__")
        .try_parsing(true)
}

/// Load the dashboard configuration from `path` (extension optional) with
/// environment overrides, then merge in the API key file.
pub fn load_config(path: &str) -> anyhow::Result<DashboardConfig> {
    load_config_with(path, environment())
}

fn load_config_with(path: &str, env: config::Environment) -> anyhow::Result<DashboardConfig> {
    let settings = config::Config::builder()
        .add_source(config::File::with_name(path))
        .add_source(env)
        .build()
        .with_context(|| format!("Failed to read configuration from {}", path))?;

    let mut dashboard: DashboardConfig = settings
        .try_deserialize()
        .context("Invalid dashboard configuration")?;

    if dashboard.pihole.api_key.trim().is_empty() {
        dashboard.pihole.api_key = read_api_key(&dashboard.pihole.api_key_file)?;
    }

    dashboard.validate()?;
    Ok(dashboard)
}

/// Read the API key from its own file, dropping the trailing newline.
pub fn read_api_key(path: &Path) -> anyhow::Result<String> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read API key from {}", path.display()))?;
    let key = raw.lines().next().unwrap_or_default().trim_end().to_string();
    if key.is_empty() {
        anyhow::bail!("API key file {} is empty", path.display());
    }
    Ok(key)
}
