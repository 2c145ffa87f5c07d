use serde::Deserialize;

/// Optional settings file in the working directory (`ptt_scraper.toml`).
pub const CONFIG_FILE: &str = "ptt_scraper";
pub const ENV_PREFIX: &str = "PTT";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub fetch: FetchSettings,
    pub analysis: AnalysisSettings,
}

impl Settings {
    /// Defaults, then `ptt_scraper.toml` if present, then `PTT_*` variables
    /// (`PTT_FETCH__TIMEOUT_SECS=5`).
    pub fn load() -> Result<Self, config::ConfigError> {
        Self::from_sources(
            config::Config::builder()
                .add_source(config::File::with_name(CONFIG_FILE).required(false))
                .add_source(env_source()),
        )
    }

    fn from_sources(
        builder: config::ConfigBuilder<config::builder::DefaultState>,
    ) -> Result<Self, config::ConfigError> {
        builder.build()?.try_deserialize()
    }
}

fn env_source() -> config::Environment {
    config::Environment::with_prefix(ENV_PREFIX)
        .prefix_separator("_")
        .separator("__")
        .try_parsing(true)
}

/// One way of reaching an article page.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Endpoint {
    pub name: String,
    /// Proxy base URL; `None` requests the article URL directly.
    #[serde(default)]
    pub base: Option<String>,
    /// Query parameter carrying the article URL; `None` sends it as the whole query.
    #[serde(default)]
    pub param: Option<String>,
    /// The proxy wraps the page in JSON under this field.
    #[serde(default)]
    pub json_field: Option<String>,
}

impl Endpoint {
    pub fn direct(name: &str) -> Self {
        Self {
            name: name.to_string(),
            base: None,
            param: None,
            json_field: None,
        }
    }

    pub fn proxy(name: &str, base: &str, param: Option<&str>, json_field: Option<&str>) -> Self {
        Self {
            name: name.to_string(),
            base: Some(base.to_string()),
            param: param.map(str::to_string),
            json_field: json_field.map(str::to_string),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FetchSettings {
    /// Tried in order; the first plausible page wins.
    pub endpoints: Vec<Endpoint>,
    pub timeout_secs: u64,
    pub max_retries: u32,
    pub backoff_ms: u64,
    pub user_agent: String,
}

impl Default for FetchSettings {
    fn default() -> Self {
        Self {
            endpoints: vec![
                Endpoint::direct("ptt.cc"),
                Endpoint::proxy("CorsProxy", "https://corsproxy.io/", None, None),
                Endpoint::proxy("AllOrigins", "https://api.allorigins.win/get", Some("url"), Some("contents")),
                Endpoint::proxy("CodeTabs", "https://api.codetabs.com/v1/proxy", Some("quest"), None),
            ],
            timeout_secs: 15,
            max_retries: 2,
            backoff_ms: 1000,
            user_agent: concat!("ptt_scraper/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AnalysisSettings {
    /// Character budget for the rendered comment lines.
    pub comment_budget: usize,
    /// Characters of body text sent along as context.
    pub excerpt_chars: usize,
}

impl Default for AnalysisSettings {
    fn default() -> Self {
        Self {
            comment_budget: 30_000,
            excerpt_chars: 500,
        }
    }
}
