//! DocGate configuration system.
//!
//! Configuration resolves in three layers: built-in defaults, an optional
//! TOML file (`~/.docgate/config.toml` or `DOCGATE_CONFIG`), then `DOCGATE_*`
//! environment variables, which always win. The resolved value is immutable
//! for the lifetime of the process and passed explicitly into the adapters.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{DocGateError, Result};

/// Root configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DocGateConfig {
    #[serde(default)]
    pub gateway: GatewayConfig,
    #[serde(default)]
    pub retrieval: RetrievalConfig,
    #[serde(default)]
    pub generation: GenerationConfig,
    #[serde(default)]
    pub http: HttpConfig,
    /// Service-account key JSON blob (`DOCGATE_GOOGLE_KEY`). Never written
    /// back out.
    #[serde(default, skip_serializing)]
    pub google_key: String,
}

impl DocGateConfig {
    /// Load from the default path, falling back to defaults when no file
    /// exists. Environment overrides are applied separately via
    /// [`DocGateConfig::apply_env`].
    pub fn load() -> Result<Self> {
        let path = std::env::var("DOCGATE_CONFIG")
            .map(PathBuf::from)
            .unwrap_or_else(|_| Self::default_path());
        if path.exists() {
            Self::load_from(&path)
        } else {
            Ok(Self::default())
        }
    }

    /// Load config from a specific path.
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| DocGateError::Config(format!("Failed to read config: {e}")))?;
        let config: Self = toml::from_str(&content)
            .map_err(|e| DocGateError::Config(format!("Failed to parse config: {e}")))?;
        Ok(config)
    }

    /// Get the default config path.
    pub fn default_path() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".docgate")
            .join("config.toml")
    }

    /// Apply `DOCGATE_*` environment overrides on top of the loaded file.
    pub fn apply_env(&mut self) {
        self.apply_env_from(|name| std::env::var(name).ok());
    }

    /// Same as [`DocGateConfig::apply_env`] with an injectable variable source.
    pub fn apply_env_from(&mut self, get: impl Fn(&str) -> Option<String>) {
        if let Some(v) = get("DOCGATE_GOOGLE_KEY") {
            self.google_key = v;
        }
        if let Some(v) = get("DOCGATE_HOST") {
            self.gateway.host = v;
        }
        if let Some(v) = get("DOCGATE_PORT").and_then(|v| v.parse().ok()) {
            self.gateway.port = v;
        }
        if let Some(v) = get("DOCGATE_ALLOWED_ORIGIN") {
            self.gateway.allowed_origin = v;
        }
        if let Some(v) = get("DOCGATE_PROJECT") {
            self.retrieval.project = v;
        }
        if let Some(v) = get("DOCGATE_LOCATION") {
            self.retrieval.location = v;
        }
        if let Some(v) = get("DOCGATE_COLLECTION") {
            self.retrieval.collection = v;
        }
        if let Some(v) = get("DOCGATE_DATA_STORE") {
            self.retrieval.data_store = v;
        }
        if let Some(v) = get("DOCGATE_ENGINE") {
            self.retrieval.engine = v;
        }
        if let Some(v) = get("DOCGATE_SERVING_CONFIGS") {
            let ids: Vec<String> = v
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect();
            if !ids.is_empty() {
                self.retrieval.serving_configs = ids;
            }
        }
        if let Some(v) = get("DOCGATE_SERVING_CONFIG_PATH") {
            self.retrieval.serving_config_path = v;
        }
        if let Some(v) = get("DOCGATE_ENDPOINT") {
            self.retrieval.endpoint = v;
        }
        if let Some(v) = get("DOCGATE_PAGE_SIZE").and_then(|v| v.parse().ok()) {
            self.retrieval.page_size = v;
        }
        if let Some(v) = get("DOCGATE_RETURN_SUMMARY").and_then(|v| parse_bool(&v)) {
            self.retrieval.return_summary = v;
        }
        if let Some(v) = get("DOCGATE_EXTRACTIVE_ANSWERS").and_then(|v| parse_bool(&v)) {
            self.retrieval.extractive_answers = v;
        }
        if let Some(v) = get("DOCGATE_SNIPPET_UNAVAILABLE_MARKER") {
            self.retrieval.snippet_unavailable_marker = v;
        }
        if let Some(v) = get("DOCGATE_GENERATION").and_then(|v| parse_bool(&v)) {
            self.generation.enabled = v;
        }
        if let Some(v) = get("DOCGATE_GEMINI_MODEL") {
            self.generation.model = v;
        }
        if let Some(v) = get("DOCGATE_GEMINI_PROJECT") {
            self.generation.project = v;
        }
        if let Some(v) = get("DOCGATE_GEMINI_LOCATION") {
            self.generation.location = v;
        }
        if let Some(v) = get("DOCGATE_TEMPERATURE").and_then(|v| v.parse().ok()) {
            self.generation.temperature = v;
        }
        if let Some(v) = get("DOCGATE_MAX_OUTPUT_TOKENS").and_then(|v| v.parse().ok()) {
            self.generation.max_output_tokens = v;
        }
        if let Some(v) = get("DOCGATE_HTTP_TIMEOUT_SECS").and_then(|v| v.parse().ok()) {
            self.http.timeout_secs = v;
        }
        if let Some(v) = get("DOCGATE_HTTP_CONNECT_TIMEOUT_SECS").and_then(|v| v.parse().ok()) {
            self.http.connect_timeout_secs = v;
        }
    }

    /// Fail fast on configuration the server cannot run without.
    pub fn validate(&self) -> Result<()> {
        if self.google_key.trim().is_empty() {
            return Err(DocGateError::Config("DOCGATE_GOOGLE_KEY is not set".into()));
        }
        let r = &self.retrieval;
        if !r.data_store.is_empty() && !r.engine.is_empty() {
            return Err(DocGateError::Config(
                "Set either retrieval.data_store or retrieval.engine, not both".into(),
            ));
        }
        let has_addressing = !r.data_store.is_empty() || !r.engine.is_empty();
        if has_addressing && r.project.is_empty() {
            return Err(DocGateError::Config("retrieval.project is not set".into()));
        }
        if !has_addressing && r.serving_config_path.is_empty() {
            return Err(DocGateError::Config(
                "Set retrieval.data_store, retrieval.engine, or retrieval.serving_config_path"
                    .into(),
            ));
        }
        if has_addressing && r.serving_configs.is_empty() && r.serving_config_path.is_empty() {
            return Err(DocGateError::Config("retrieval.serving_configs is empty".into()));
        }
        if self.generation.enabled && self.generation.project.is_empty() && r.project.is_empty() {
            return Err(DocGateError::Config(
                "generation.project is not set and there is no retrieval.project to fall back to"
                    .into(),
            ));
        }
        Ok(())
    }
}

fn parse_bool(v: &str) -> Option<bool> {
    match v.to_ascii_lowercase().as_str() {
        "1" | "true" | "on" | "yes" => Some(true),
        "0" | "false" | "off" | "no" => Some(false),
        _ => None,
    }
}

/// Gateway (inbound HTTP) configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    /// Allowed CORS origin(s), comma-separated; `*` allows all.
    #[serde(default = "default_allowed_origin")]
    pub allowed_origin: String,
}

fn default_host() -> String { "127.0.0.1".into() }
fn default_port() -> u16 { 3000 }
fn default_allowed_origin() -> String { "*".into() }

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            allowed_origin: default_allowed_origin(),
        }
    }
}

/// Document-retrieval configuration.
///
/// Exactly one of `data_store` / `engine` selects the addressing mode;
/// `serving_configs` is the ordered candidate list tried per request, and
/// `serving_config_path` optionally appends one fully-resolved path as the
/// final candidate.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetrievalConfig {
    /// Project identifier, numeric or string form.
    #[serde(default)]
    pub project: String,
    #[serde(default = "default_location")]
    pub location: String,
    #[serde(default = "default_collection")]
    pub collection: String,
    #[serde(default)]
    pub data_store: String,
    #[serde(default)]
    pub engine: String,
    #[serde(default = "default_serving_configs")]
    pub serving_configs: Vec<String>,
    #[serde(default)]
    pub serving_config_path: String,
    /// API base URL override; empty selects it from `location`.
    #[serde(default)]
    pub endpoint: String,
    #[serde(default = "default_page_size")]
    pub page_size: u32,
    #[serde(default = "bool_true")]
    pub return_snippet: bool,
    #[serde(default)]
    pub return_summary: bool,
    #[serde(default)]
    pub extractive_answers: bool,
    /// Substring (case-insensitive) marking a snippet as the service's
    /// "unavailable" placeholder.
    #[serde(default = "default_snippet_marker")]
    pub snippet_unavailable_marker: String,
}

fn default_location() -> String { "global".into() }
fn default_collection() -> String { "default_collection".into() }
fn default_serving_configs() -> Vec<String> {
    vec!["default_search".into(), "default_serving_config".into()]
}
fn default_page_size() -> u32 { 5 }
fn default_snippet_marker() -> String { "No snippet is available".into() }
fn bool_true() -> bool { true }

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            project: String::new(),
            location: default_location(),
            collection: default_collection(),
            data_store: String::new(),
            engine: String::new(),
            serving_configs: default_serving_configs(),
            serving_config_path: String::new(),
            endpoint: String::new(),
            page_size: default_page_size(),
            return_snippet: true,
            return_summary: false,
            extractive_answers: false,
            snippet_unavailable_marker: default_snippet_marker(),
        }
    }
}

/// Generative-model (answer synthesis) configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationConfig {
    #[serde(default = "bool_true")]
    pub enabled: bool,
    #[serde(default = "default_model")]
    pub model: String,
    /// Project for the model endpoint; falls back to the retrieval project.
    #[serde(default)]
    pub project: String,
    #[serde(default = "default_gen_location")]
    pub location: String,
    #[serde(default = "default_temperature")]
    pub temperature: f32,
    #[serde(default = "default_max_output_tokens")]
    pub max_output_tokens: u32,
}

fn default_model() -> String { "gemini-1.5-flash".into() }
fn default_gen_location() -> String { "us-central1".into() }
fn default_temperature() -> f32 { 0.2 }
fn default_max_output_tokens() -> u32 { 700 }

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            model: default_model(),
            project: String::new(),
            location: default_gen_location(),
            temperature: default_temperature(),
            max_output_tokens: default_max_output_tokens(),
        }
    }
}

impl GenerationConfig {
    /// Use the retrieval project when no dedicated model project is set.
    pub fn with_project_fallback(mut self, fallback: &str) -> Self {
        if self.project.is_empty() {
            self.project = fallback.to_string();
        }
        self
    }
}

/// Outbound HTTP client knobs, applied to every external call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpConfig {
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

fn default_timeout_secs() -> u64 { 30 }
fn default_connect_timeout_secs() -> u64 { 10 }
fn default_user_agent() -> String { "DocGate/1.0".into() }

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout_secs(),
            connect_timeout_secs: default_connect_timeout_secs(),
            user_agent: default_user_agent(),
        }
    }
}
