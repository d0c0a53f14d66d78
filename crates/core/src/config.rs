//! Configuration management for the helpdesk service.
//!
//! Configuration is assembled in layers, later layers winning:
//! - Built-in defaults
//! - A YAML config file (`helpdesk.yaml` or `--config`)
//! - Environment variables
//! - Command-line flags
//!
//! The result is one explicit `AppConfig` built at startup and handed to
//! every component that needs it. Nothing reads the environment after that.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{AppError, AppResult};

/// Default config file looked up in the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "helpdesk.yaml";

/// Providers the delegate can talk to.
pub const KNOWN_PROVIDERS: [&str; 2] = ["gemini", "ollama"];

/// Main application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Config file that was merged, if any
    pub config_file: Option<PathBuf>,

    /// Socket address the HTTP server binds to
    pub bind: String,

    /// Optional FAQ corpus file (YAML or JSON); built-in corpus otherwise
    pub faq_file: Option<PathBuf>,

    /// Optional prompt definition file for the delegate
    pub prompt_file: Option<PathBuf>,

    /// LLM provider used for delegation ("gemini", "ollama")
    pub provider: String,

    /// Model identifier
    pub model: String,

    /// Custom provider endpoint
    pub endpoint: Option<String>,

    /// API key for the LLM provider
    #[serde(skip_serializing)]
    pub api_key: Option<String>,

    /// Sampling temperature for delegated answers
    pub temperature: f32,

    /// Timeout for a single delegate call, in seconds
    pub timeout_secs: u64,

    /// Similarity a FAQ match must strictly exceed
    pub threshold: f64,

    /// Log level override
    pub log_level: Option<String>,

    /// Verbose mode (enables debug logging)
    pub verbose: bool,

    /// Disable colored output
    pub no_color: bool,
}

/// Config file structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct ConfigFile {
    server: Option<ServerSection>,
    faq: Option<FaqSection>,
    llm: Option<LlmSection>,
    logging: Option<LoggingSection>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct ServerSection {
    bind: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct FaqSection {
    file: Option<PathBuf>,
    threshold: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct LlmSection {
    provider: Option<String>,
    model: Option<String>,
    endpoint: Option<String>,
    #[serde(rename = "apiKeyEnv")]
    api_key_env: Option<String>,
    temperature: Option<f32>,
    timeout: Option<u64>,
    #[serde(rename = "promptFile")]
    prompt_file: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct LoggingSection {
    level: Option<String>,
    color: Option<bool>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            config_file: None,
            bind: "127.0.0.1:5000".to_string(),
            faq_file: None,
            prompt_file: None,
            provider: "gemini".to_string(),
            model: "gemini-1.5-flash-latest".to_string(),
            endpoint: None,
            api_key: None,
            temperature: 0.7,
            timeout_secs: 30,
            threshold: 0.6,
            log_level: None,
            verbose: false,
            no_color: false,
        }
    }
}

impl AppConfig {
    /// Load configuration from the config file and the process environment.
    ///
    /// Environment variables:
    /// - `HELPDESK_CONFIG`: Path to config file (when `config_file` is `None`)
    /// - `HELPDESK_BIND`: Server bind address
    /// - `HELPDESK_FAQ_FILE`: FAQ corpus file
    /// - `HELPDESK_PROVIDER`: LLM provider
    /// - `HELPDESK_MODEL`: Model identifier
    /// - `HELPDESK_ENDPOINT`: Provider endpoint
    /// - `HELPDESK_API_KEY` / `GOOGLE_API_KEY`: API key
    /// - `RUST_LOG`: Log level
    /// - `NO_COLOR`: Disable colored output
    ///
    /// # Example
    /// ```no_run
    /// use helpdesk_core::config::AppConfig;
    ///
    /// let config = AppConfig::load(None).expect("Failed to load config");
    /// println!("Binding to {}", config.bind);
    /// ```
    pub fn load(config_file: Option<&Path>) -> AppResult<Self> {
        Self::load_with(config_file, |key| std::env::var(key).ok())
    }

    /// Load configuration using `lookup` in place of the process environment.
    pub fn load_with<F>(config_file: Option<&Path>, lookup: F) -> AppResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        // An explicit path must exist; the implicit default is optional
        let explicit = config_file
            .map(Path::to_path_buf)
            .or_else(|| lookup("HELPDESK_CONFIG").map(PathBuf::from));

        let mut api_key_env = None;
        match explicit {
            Some(path) => {
                if !path.exists() {
                    return Err(AppError::Config(format!(
                        "Config file does not exist: {:?}",
                        path
                    )));
                }
                api_key_env = config.merge_yaml(&path)?;
            }
            None => {
                let path = PathBuf::from(DEFAULT_CONFIG_FILE);
                if path.exists() {
                    api_key_env = config.merge_yaml(&path)?;
                }
            }
        }

        // Environment variables override the config file
        if let Some(bind) = lookup("HELPDESK_BIND") {
            config.bind = bind;
        }

        if let Some(faq_file) = lookup("HELPDESK_FAQ_FILE") {
            config.faq_file = Some(PathBuf::from(faq_file));
        }

        if let Some(provider) = lookup("HELPDESK_PROVIDER") {
            config.provider = provider;
        }

        if let Some(model) = lookup("HELPDESK_MODEL") {
            config.model = model;
        }

        if let Some(endpoint) = lookup("HELPDESK_ENDPOINT") {
            config.endpoint = Some(endpoint);
        }

        config.api_key = lookup("HELPDESK_API_KEY")
            .or_else(|| api_key_env.as_deref().and_then(&lookup))
            .or_else(|| lookup("GOOGLE_API_KEY"))
            .filter(|key| !key.trim().is_empty());

        if let Some(level) = lookup("RUST_LOG") {
            config.log_level = Some(level);
        }

        if lookup("NO_COLOR").is_some() {
            config.no_color = true;
        }

        Ok(config)
    }

    /// Merge a YAML config file into this config.
    ///
    /// Returns the name of the environment variable the file designates for
    /// the API key, if any.
    fn merge_yaml(&mut self, path: &Path) -> AppResult<Option<String>> {
        let contents = std::fs::read_to_string(path).map_err(|e| {
            AppError::Config(format!("Failed to read config file {:?}: {}", path, e))
        })?;

        let file: ConfigFile = serde_yaml::from_str(&contents).map_err(|e| {
            AppError::Config(format!("Failed to parse config file {:?}: {}", path, e))
        })?;

        self.config_file = Some(path.to_path_buf());

        if let Some(bind) = file.server.and_then(|s| s.bind) {
            self.bind = bind;
        }

        if let Some(faq) = file.faq {
            if let Some(faq_file) = faq.file {
                self.faq_file = Some(faq_file);
            }
            if let Some(threshold) = faq.threshold {
                self.threshold = threshold;
            }
        }

        let mut api_key_env = None;
        if let Some(llm) = file.llm {
            if let Some(provider) = llm.provider {
                self.provider = provider;
            }
            if let Some(model) = llm.model {
                self.model = model;
            }
            if llm.endpoint.is_some() {
                self.endpoint = llm.endpoint;
            }
            if let Some(temperature) = llm.temperature {
                self.temperature = temperature;
            }
            if let Some(timeout) = llm.timeout {
                self.timeout_secs = timeout;
            }
            if llm.prompt_file.is_some() {
                self.prompt_file = llm.prompt_file;
            }
            api_key_env = llm.api_key_env;
        }

        if let Some(logging) = file.logging {
            if let Some(level) = logging.level {
                self.log_level = Some(level);
            }
            if let Some(color) = logging.color {
                self.no_color = !color;
            }
        }

        Ok(api_key_env)
    }

    /// Apply CLI overrides to the configuration.
    ///
    /// CLI flags take precedence over environment variables and the file.
    #[allow(clippy::too_many_arguments)]
    pub fn with_overrides(
        mut self,
        bind: Option<String>,
        faq_file: Option<PathBuf>,
        provider: Option<String>,
        model: Option<String>,
        log_level: Option<String>,
        verbose: bool,
        no_color: bool,
    ) -> Self {
        if let Some(bind) = bind {
            self.bind = bind;
        }

        if let Some(faq_file) = faq_file {
            self.faq_file = Some(faq_file);
        }

        if let Some(provider) = provider {
            self.provider = provider;
        }

        if let Some(model) = model {
            self.model = model;
        }

        if let Some(log_level) = log_level {
            self.log_level = Some(log_level);
        }

        if verbose {
            self.verbose = true;
            if self.log_level.is_none() {
                self.log_level = Some("debug".to_string());
            }
        }

        if no_color {
            self.no_color = true;
        }

        self
    }

    /// Whether the configured provider needs an API key.
    pub fn requires_api_key(&self) -> bool {
        self.provider.eq_ignore_ascii_case("gemini")
    }

    /// Whether delegation to the LLM is possible with this configuration.
    ///
    /// A missing credential is not an error: the service runs FAQ-only.
    pub fn delegation_enabled(&self) -> bool {
        !self.requires_api_key() || self.api_key.is_some()
    }

    /// Validate configuration values.
    pub fn validate(&self) -> AppResult<()> {
        let provider = self.provider.to_lowercase();
        if !KNOWN_PROVIDERS.contains(&provider.as_str()) {
            return Err(AppError::Config(format!(
                "Unknown provider: {}. Supported: {}",
                self.provider,
                KNOWN_PROVIDERS.join(", ")
            )));
        }

        if !(0.0..=1.0).contains(&self.threshold) {
            return Err(AppError::Config(format!(
                "Similarity threshold must be within [0, 1], got {}",
                self.threshold
            )));
        }

        if !(0.0..=2.0).contains(&self.temperature) {
            return Err(AppError::Config(format!(
                "Temperature must be within [0, 2], got {}",
                self.temperature
            )));
        }

        if self.timeout_secs == 0 {
            return Err(AppError::Config(
                "Delegate timeout must be at least one second".to_string(),
            ));
        }

        if self.model.trim().is_empty() {
            return Err(AppError::Config("Model name cannot be empty".to_string()));
        }

        Ok(())
    }
}
