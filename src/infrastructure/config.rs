use crate::domain::distribution::ParameterPalette;
use crate::domain::equipment::Parameter;
use serde::Deserialize;

const CONFIG_PATH_VAR: &str = "EQUIPMENT_ANALYTICS_CONFIG";

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerSettings,
    pub backend: BackendSettings,
    #[serde(default)]
    pub analytics: AnalyticsSettings,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerSettings {
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            bind_addr: default_bind_addr(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct BackendSettings {
    pub base_url: String,
    /// Sent as `Authorization: Token <token>` when non-empty
    #[serde(default)]
    pub token: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AnalyticsSettings {
    /// Largest fraction of malformed values a chart tolerates before it is marked failed
    #[serde(default = "default_malformed_tolerance")]
    pub malformed_tolerance: f64,
    #[serde(default = "default_history_limit")]
    pub history_limit: usize,
    #[serde(default = "default_type_palette")]
    pub type_palette: Vec<String>,
    #[serde(default = "default_palettes")]
    pub palettes: Vec<ParameterPalette>,
}

impl Default for AnalyticsSettings {
    fn default() -> Self {
        Self {
            malformed_tolerance: default_malformed_tolerance(),
            history_limit: default_history_limit(),
            type_palette: default_type_palette(),
            palettes: default_palettes(),
        }
    }
}

fn default_bind_addr() -> String {
    "0.0.0.0:8080".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_malformed_tolerance() -> f64 {
    0.25
}

fn default_history_limit() -> usize {
    5
}

fn default_type_palette() -> Vec<String> {
    ["#0284c7", "#0891b2", "#14b8a6", "#10b981", "#84cc16", "#eab308"]
        .map(str::to_string)
        .to_vec()
}

fn default_palettes() -> Vec<ParameterPalette> {
    Parameter::ALL.iter().map(|p| default_palette(*p)).collect()
}

/// Segment shades for a parameter, darkest first
pub fn default_palette(parameter: Parameter) -> ParameterPalette {
    let colors = match parameter {
        Parameter::Flowrate => ["#0284c7", "#0ea5e9", "#38bdf8", "#7dd3fc"],
        Parameter::Pressure => ["#14b8a6", "#2dd4bf", "#5eead4", "#99f6e4"],
        Parameter::Temperature => ["#84cc16", "#a3e635", "#bef264", "#d9f99d"],
    };
    ParameterPalette::new(parameter, colors)
}

/// Load from the file named by `EQUIPMENT_ANALYTICS_CONFIG` (default `config/analytics`),
/// then apply `ANALYTICS__SECTION__KEY` environment overrides
pub fn load_app_config() -> anyhow::Result<AppConfig> {
    let path = std::env::var(CONFIG_PATH_VAR).unwrap_or_else(|_| "config/analytics".to_string());

    let settings = config::Config::builder()
        .add_source(config::File::with_name(&path))
        .add_source(
            config::Environment::with_prefix("ANALYTICS")
                .prefix_separator("__")
                .separator("__"),
        )
        .build()?;

    let app_config: AppConfig = settings.try_deserialize()?;
    validate(&app_config)?;
    Ok(app_config)
}

fn validate(app_config: &AppConfig) -> anyhow::Result<()> {
    let tolerance = app_config.analytics.malformed_tolerance;
    if !(0.0..=1.0).contains(&tolerance) {
        anyhow::bail!("analytics.malformed_tolerance must be within [0, 1], got {}", tolerance);
    }
    if app_config.backend.base_url.trim().is_empty() {
        anyhow::bail!("backend.base_url must not be empty");
    }
    Ok(())
}
