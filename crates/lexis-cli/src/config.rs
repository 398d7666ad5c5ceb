use config::{Config as ConfigLoader, ConfigBuilder, ConfigError, Environment, File, Map, Source};
use config::builder::DefaultState;
use lexis::{ConversationOptions, GatewayConfig, SessionOptions};
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

/// Environment prefix and the config section it overrides
const ENV_SECTIONS: [(&str, &str); 3] = [
    ("GATEWAY", "gateway"),
    ("SESSION", "session"),
    ("LOG", "logging"),
];

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub gateway: GatewayConfig,
    #[serde(default)]
    pub session: SessionConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SessionConfig {
    #[serde(default = "default_poll_interval_secs")]
    pub poll_interval_secs: u64,
    #[serde(default)]
    pub greeting: Option<String>,
    #[serde(default)]
    pub reset_greeting: Option<String>,
    #[serde(default = "default_max_input_chars")]
    pub max_input_chars: usize,
    #[serde(default)]
    pub reply_delay_ms: u64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            poll_interval_secs: default_poll_interval_secs(),
            greeting: None,
            reset_greeting: None,
            max_input_chars: default_max_input_chars(),
            reply_delay_ms: 0,
        }
    }
}

impl From<SessionConfig> for SessionOptions {
    fn from(config: SessionConfig) -> Self {
        let mut conversation = ConversationOptions::default()
            .max_input_chars(config.max_input_chars)
            .reply_delay(Duration::from_millis(config.reply_delay_ms));
        // Unset greetings keep the built-in texts
        if let Some(greeting) = config.greeting {
            conversation = conversation.greeting(greeting);
        }
        if let Some(reset_greeting) = config.reset_greeting {
            conversation = conversation.reset_greeting(reset_greeting);
        }

        SessionOptions::default()
            .poll_interval(Duration::from_secs(config.poll_interval_secs))
            .conversation(conversation)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl Config {
    /// Load configuration from TOML files and environment variables
    ///
    /// Hierarchy (weakest to strongest):
    /// 1. config/default.toml
    /// 2. config/{ENV}.toml (if ENV is set, "dev" otherwise)
    /// 3. Environment variables (GATEWAY_, SESSION_, LOG_ prefixes)
    pub fn load() -> Result<Self, ConfigError> {
        let env = std::env::var("ENV").unwrap_or_else(|_| "dev".to_string());
        Self::load_from(Path::new("config"), &env, None)
    }

    /// Same layering rooted at `dir`; `vars` replaces the process environment
    /// when given (useful for testing)
    pub fn load_from(
        dir: &Path,
        env: &str,
        vars: Option<Map<String, String>>,
    ) -> Result<Self, ConfigError> {
        let builder = ConfigLoader::builder()
            .add_source(File::from(dir.join("default")).required(false))
            .add_source(File::from(dir.join(env)).required(false));

        let builder = apply_env_sections(builder, vars)?;
        let config = builder.build()?;
        config.try_deserialize()
    }

    /// Load config from a specific file, without environment overrides
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let builder = ConfigLoader::builder().add_source(File::from(path.as_ref()));

        let config = builder.build()?;
        config.try_deserialize()
    }
}

/// Nest each prefixed variable under its section: GATEWAY_BASE_URL becomes
/// `gateway.base_url`
fn apply_env_sections(
    mut builder: ConfigBuilder<DefaultState>,
    vars: Option<Map<String, String>>,
) -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    for (prefix, section) in ENV_SECTIONS {
        let overrides = Environment::with_prefix(prefix)
            .try_parsing(true)
            .source(vars.clone())
            .collect()?;

        for (key, value) in overrides {
            builder = builder.set_override(format!("{}.{}", section, key), value)?;
        }
    }
    Ok(builder)
}

fn default_poll_interval_secs() -> u64 {
    30
}

fn default_max_input_chars() -> usize {
    2000
}

fn default_log_level() -> String {
    "warn".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_config_structure() {
        let toml = r#"
            [gateway]
            base_url = "http://nlp.internal:8080"
            health_timeout_ms = 2000

            [session]
            poll_interval_secs = 10
            greeting = "Hi!"
            reply_delay_ms = 500

            [logging]
            level = "debug"
            format = "json"
        "#;

        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.gateway.base_url, "http://nlp.internal:8080");
        assert_eq!(config.gateway.health_timeout_ms, 2000);
        assert_eq!(config.gateway.request_timeout_ms, 30_000);
        assert_eq!(config.session.max_input_chars, 2000);
        assert_eq!(config.logging.format, "json");

        let options = SessionOptions::from(config.session);
        assert_eq!(options.poll_interval, Duration::from_secs(10));
        assert_eq!(options.conversation.greeting, "Hi!");
        assert_eq!(
            options.conversation.reset_greeting,
            ConversationOptions::default().reset_greeting
        );
        assert_eq!(options.conversation.reply_delay, Duration::from_millis(500));
    }

    #[test]
    fn test_empty_config_uses_defaults() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.gateway, GatewayConfig::default());
        assert_eq!(config.session.poll_interval_secs, 30);
        assert_eq!(config.logging.level, "warn");
    }

    #[test]
    fn test_layering_and_env_overrides() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("default.toml"),
            "[gateway]\nbase_url = \"http://default:5000\"\n\n[session]\npoll_interval_secs = 30\n",
        )
        .unwrap();
        fs::write(
            dir.path().join("staging.toml"),
            "[session]\npoll_interval_secs = 15\n",
        )
        .unwrap();

        let mut vars = Map::new();
        vars.insert("GATEWAY_BASE_URL".to_string(), "http://env:9000".to_string());
        vars.insert("LOG_FORMAT".to_string(), "json".to_string());
        vars.insert("UNRELATED_KEY".to_string(), "ignored".to_string());

        let config = Config::load_from(dir.path(), "staging", Some(vars)).unwrap();

        assert_eq!(config.gateway.base_url, "http://env:9000");
        assert_eq!(config.session.poll_interval_secs, 15);
        assert_eq!(config.logging.format, "json");
        assert_eq!(config.logging.level, "warn");
    }
}
