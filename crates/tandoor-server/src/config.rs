//! Server configuration loading from file and environment variables.

use serde::Deserialize;
use std::net::{IpAddr, Ipv4Addr};
use thiserror::Error;

/// Top-level server configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    /// Server network settings.
    #[serde(default)]
    pub server: ServerConfig,

    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Menu catalog settings.
    #[serde(default)]
    pub menu: MenuConfig,

    /// Live-cart cache settings.
    #[serde(default)]
    pub cart: CartConfig,

    /// AI-assisted parser settings.
    #[serde(default)]
    pub ai: AiSettings,

    /// POS forwarding settings.
    #[serde(default)]
    pub pos: PosConfig,

    /// Voice-agent routing settings.
    #[serde(default)]
    pub voice: VoiceConfig,

    /// Restaurant opening hours.
    #[serde(default)]
    pub hours: HoursConfig,
}

/// Network configuration for the HTTP server.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Host address to bind to.
    #[serde(default = "default_host")]
    pub host: IpAddr,

    /// Port to listen on.
    #[serde(default = "default_port")]
    pub port: u16,
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level filter (e.g., "info", "debug", "tandoor_server=debug,info").
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Whether to output logs in JSON format.
    #[serde(default)]
    pub json: bool,
}

/// Menu catalog configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MenuConfig {
    /// Path to a menu TOML file; the bundled default menu when absent.
    #[serde(default)]
    pub path: Option<String>,
}

/// Live-cart cache configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct CartConfig {
    /// Maximum number of calls with a retained live cart.
    #[serde(default = "default_cart_capacity")]
    pub capacity: usize,

    /// Snapshot validity window, in minutes.
    #[serde(default = "default_cart_retention_minutes")]
    pub retention_minutes: i64,
}

/// AI-assisted parser configuration. The API key comes from the
/// environment, never from the config file.
#[derive(Debug, Clone, Deserialize)]
pub struct AiSettings {
    /// Whether to consult the collaborator at all.
    #[serde(default)]
    pub enabled: bool,

    #[serde(default = "default_ai_base_url")]
    pub base_url: String,

    #[serde(default = "default_ai_model")]
    pub model: String,

    #[serde(default = "default_ai_timeout_secs")]
    pub timeout_secs: u64,
}

/// POS forwarding configuration. Forwarding is disabled until a URL is
/// configured.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PosConfig {
    #[serde(default)]
    pub url: Option<String>,

    #[serde(default)]
    pub api_key: Option<String>,
}

/// Voice-agent routing for the `/voice` redirect.
#[derive(Debug, Clone, Deserialize)]
pub struct VoiceConfig {
    #[serde(default = "default_main_agent")]
    pub main_agent_id: String,

    /// Agent used outside ordering hours (answers questions, takes no
    /// orders).
    #[serde(default = "default_fallback_agent")]
    pub fallback_agent_id: String,

    #[serde(default = "default_redirect_base")]
    pub redirect_base: String,
}

/// One open/close window, "HH:MM" wall-clock times.
#[derive(Debug, Clone, Deserialize)]
pub struct ShiftConfig {
    pub open: String,
    pub close: String,
}

/// Per-weekday opening shifts. A day with no shifts is closed.
#[derive(Debug, Clone, Deserialize)]
pub struct HoursConfig {
    /// Minutes before close when order-taking stops.
    #[serde(default = "default_cutoff_minutes")]
    pub cutoff_minutes: u32,

    #[serde(default)]
    pub monday: Vec<ShiftConfig>,
    #[serde(default = "default_weekday_shifts")]
    pub tuesday: Vec<ShiftConfig>,
    #[serde(default = "default_weekday_shifts")]
    pub wednesday: Vec<ShiftConfig>,
    #[serde(default = "default_weekday_shifts")]
    pub thursday: Vec<ShiftConfig>,
    #[serde(default = "default_weekend_shifts")]
    pub friday: Vec<ShiftConfig>,
    #[serde(default = "default_weekend_shifts")]
    pub saturday: Vec<ShiftConfig>,
    #[serde(default = "default_weekday_shifts")]
    pub sunday: Vec<ShiftConfig>,
}

fn default_host() -> IpAddr {
    IpAddr::V4(Ipv4Addr::new(127, 0, 0, 1))
}

fn default_port() -> u16 {
    3000
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_cart_capacity() -> usize {
    tandoor_cart::snapshot::DEFAULT_CART_CAPACITY
}

fn default_cart_retention_minutes() -> i64 {
    tandoor_cart::snapshot::DEFAULT_CART_RETENTION_MINUTES
}

fn default_ai_base_url() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_ai_model() -> String {
    "gpt-4o-mini".to_string()
}

fn default_ai_timeout_secs() -> u64 {
    10
}

fn default_main_agent() -> String {
    "agent_main".to_string()
}

fn default_fallback_agent() -> String {
    "agent_after_hours".to_string()
}

fn default_redirect_base() -> String {
    "https://api.elevenlabs.io/twilio/inbound_call".to_string()
}

fn default_cutoff_minutes() -> u32 {
    15
}

fn shift(open: &str, close: &str) -> ShiftConfig {
    ShiftConfig {
        open: open.to_string(),
        close: close.to_string(),
    }
}

fn default_weekday_shifts() -> Vec<ShiftConfig> {
    vec![shift("11:00", "15:00"), shift("17:00", "21:30")]
}

fn default_weekend_shifts() -> Vec<ShiftConfig> {
    vec![shift("11:00", "15:00"), shift("17:00", "22:00")]
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}

impl Default for CartConfig {
    fn default() -> Self {
        Self {
            capacity: default_cart_capacity(),
            retention_minutes: default_cart_retention_minutes(),
        }
    }
}

impl Default for AiSettings {
    fn default() -> Self {
        Self {
            enabled: false,
            base_url: default_ai_base_url(),
            model: default_ai_model(),
            timeout_secs: default_ai_timeout_secs(),
        }
    }
}

impl Default for VoiceConfig {
    fn default() -> Self {
        Self {
            main_agent_id: default_main_agent(),
            fallback_agent_id: default_fallback_agent(),
            redirect_base: default_redirect_base(),
        }
    }
}

impl Default for HoursConfig {
    fn default() -> Self {
        Self {
            cutoff_minutes: default_cutoff_minutes(),
            monday: Vec::new(),
            tuesday: default_weekday_shifts(),
            wednesday: default_weekday_shifts(),
            thursday: default_weekday_shifts(),
            friday: default_weekend_shifts(),
            saturday: default_weekend_shifts(),
            sunday: default_weekday_shifts(),
        }
    }
}

/// Errors that can occur when loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read the configuration file.
    #[error("failed to read config file: {0}")]
    FileRead(#[from] std::io::Error),

    /// Failed to parse the configuration file.
    #[error("failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),

    /// A field parsed but carries an unusable value.
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Loads configuration from a TOML file, falling back to defaults.
///
/// Environment variable overrides:
/// - `TANDOOR_HOST` overrides `server.host`
/// - `TANDOOR_PORT` overrides `server.port`
/// - `TANDOOR_LOG_LEVEL` overrides `logging.level`
/// - `TANDOOR_LOG_JSON` overrides `logging.json` (set to "true" to enable)
/// - `TANDOOR_MENU_PATH` overrides `menu.path`
/// - `TANDOOR_POS_URL` overrides `pos.url`
/// - `TANDOOR_POS_API_KEY` overrides `pos.api_key`
///
/// The AI collaborator key is read separately at startup from
/// `TANDOOR_OPENAI_API_KEY` (falling back to `OPENAI_API_KEY`).
///
/// # Errors
///
/// Returns `ConfigError` if the file exists but cannot be read or parsed.
pub fn load_config(path: Option<&str>) -> Result<Config, ConfigError> {
    let mut config = match path {
        Some(p) => match std::fs::read_to_string(p) {
            Ok(contents) => toml::from_str(&contents)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::info!(path = p, "config file not found, using defaults");
                Config::default()
            }
            Err(e) => return Err(ConfigError::FileRead(e)),
        },
        None => Config::default(),
    };

    // Environment variable overrides
    if let Ok(host) = std::env::var("TANDOOR_HOST") {
        if let Ok(parsed) = host.parse() {
            config.server.host = parsed;
        }
    }
    if let Ok(port) = std::env::var("TANDOOR_PORT") {
        if let Ok(parsed) = port.parse() {
            config.server.port = parsed;
        }
    }
    if let Ok(level) = std::env::var("TANDOOR_LOG_LEVEL") {
        config.logging.level = level;
    }
    if let Ok(json) = std::env::var("TANDOOR_LOG_JSON") {
        config.logging.json = json == "true" || json == "1";
    }
    if let Ok(menu_path) = std::env::var("TANDOOR_MENU_PATH") {
        config.menu.path = Some(menu_path);
    }
    if let Ok(pos_url) = std::env::var("TANDOOR_POS_URL") {
        config.pos.url = Some(pos_url);
    }
    if let Ok(pos_key) = std::env::var("TANDOOR_POS_API_KEY") {
        config.pos.api_key = Some(pos_key);
    }

    Ok(config)
}

/// Resolves the AI collaborator API key from the environment.
pub fn ai_api_key_from_env() -> Option<String> {
    std::env::var("TANDOOR_OPENAI_API_KEY")
        .or_else(|_| std::env::var("OPENAI_API_KEY"))
        .ok()
        .filter(|key| !key.trim().is_empty())
}
