use dotenvy::dotenv;
use std::env;
use std::str::FromStr;
use std::time::Duration;

const DEFAULT_MODEL: &str = "gemini-2.0-flash";
const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} missing, it is required")]
    Missing(&'static str),

    #[error("{name} has an invalid value '{value}'")]
    Invalid { name: &'static str, value: String },
}

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub llm: LlmConfig,
    pub monitor: MonitorConfig,
}

/// Settings for the hosted structured-generation service.
#[derive(Debug, Clone)]
pub struct LlmConfig {
    pub api_key: String,
    pub model: String,
    pub base_url: String,
    pub timeout: Duration,
}

/// Settings for stop detection and the background loops.
#[derive(Debug, Clone)]
pub struct MonitorConfig {
    pub user_phone: String,
    pub stop_threshold_secs: f64,
    pub sample_interval_secs: f64,
    pub simulate_location: bool,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            user_phone: "+15550001111".to_string(),
            stop_threshold_secs: 30.0,
            sample_interval_secs: 5.0,
            simulate_location: true,
        }
    }
}

impl MonitorConfig {
    /// Anything below a millisecond rounds to a zero-length tick.
    pub const MIN_SAMPLE_INTERVAL_SECS: f64 = 0.001;

    pub fn validate(&self) -> Result<(), ConfigError> {
        // a zero, negative or NaN threshold would flag every fix as a stop
        if !self.stop_threshold_secs.is_finite() || self.stop_threshold_secs <= 0.0 {
            return Err(ConfigError::Invalid {
                name: "STOP_THRESHOLD_SECS",
                value: self.stop_threshold_secs.to_string(),
            });
        }

        if !self.sample_interval_secs.is_finite()
            || self.sample_interval_secs < Self::MIN_SAMPLE_INTERVAL_SECS
        {
            return Err(ConfigError::Invalid {
                name: "SAMPLE_INTERVAL_SECS",
                value: self.sample_interval_secs.to_string(),
            });
        }

        Ok(())
    }
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        let _ = dotenv().is_ok();

        let port = required("PORT")?;
        let host = env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string());

        let llm = LlmConfig {
            api_key: env::var("GEMINI_API_KEY").map_err(|_| ConfigError::Missing("GEMINI_API_KEY"))?,
            model: env::var("LLM_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string()),
            base_url: env::var("LLM_BASE_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string()),
            timeout: Duration::from_secs(optional("LLM_TIMEOUT_SECS", 20u64)?),
        };

        let defaults = MonitorConfig::default();
        let monitor = MonitorConfig {
            user_phone: env::var("USER_PHONE").unwrap_or(defaults.user_phone),
            stop_threshold_secs: optional("STOP_THRESHOLD_SECS", defaults.stop_threshold_secs)?,
            sample_interval_secs: optional("SAMPLE_INTERVAL_SECS", defaults.sample_interval_secs)?,
            simulate_location: optional("SIMULATE_LOCATION", defaults.simulate_location)?,
        };

        monitor.validate()?;

        Ok(Self { host, port, llm, monitor })
    }

    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn required<T: FromStr>(name: &'static str) -> Result<T, ConfigError> {
    let raw = env::var(name).map_err(|_| ConfigError::Missing(name))?;
    parse(name, raw)
}

fn optional<T: FromStr>(name: &'static str, default: T) -> Result<T, ConfigError> {
    match env::var(name) {
        Ok(raw) => parse(name, raw),
        Err(_) => Ok(default),
    }
}

fn parse<T: FromStr>(name: &'static str, raw: String) -> Result<T, ConfigError> {
    raw.trim()
        .parse()
        .map_err(|_| ConfigError::Invalid { name, value: raw })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_rejects_garbage() {
        let result: Result<u16, _> = parse("PORT", "not-a-port".to_string());
        assert!(matches!(result, Err(ConfigError::Invalid { name: "PORT", .. })));
    }

    #[test]
    fn test_parse_trims_whitespace() {
        let port: u16 = parse("PORT", " 8080 ".to_string()).unwrap();
        assert_eq!(port, 8080);
        let flag: bool = parse("SIMULATE_LOCATION", "false".to_string()).unwrap();
        assert!(!flag);
    }

    #[test]
    fn test_default_monitor_config_is_valid() {
        assert!(MonitorConfig::default().validate().is_ok());
    }

    #[test]
    fn test_stop_threshold_must_be_positive() {
        for threshold in [0.0, -5.0, f64::NAN, f64::INFINITY] {
            let monitor = MonitorConfig {
                stop_threshold_secs: threshold,
                ..MonitorConfig::default()
            };
            assert!(
                matches!(
                    monitor.validate(),
                    Err(ConfigError::Invalid { name: "STOP_THRESHOLD_SECS", .. })
                ),
                "accepted threshold {}",
                threshold
            );
        }
    }

    #[test]
    fn test_sample_interval_has_a_floor() {
        for interval in [0.0, -1.0, 1e-12, 0.0009, f64::NAN] {
            let monitor = MonitorConfig {
                sample_interval_secs: interval,
                ..MonitorConfig::default()
            };
            assert!(
                matches!(
                    monitor.validate(),
                    Err(ConfigError::Invalid { name: "SAMPLE_INTERVAL_SECS", .. })
                ),
                "accepted interval {}",
                interval
            );
        }

        let monitor = MonitorConfig {
            sample_interval_secs: 0.001,
            ..MonitorConfig::default()
        };
        assert!(monitor.validate().is_ok());
    }

    #[test]
    fn test_addr() {
        let config = Config {
            host: "0.0.0.0".to_string(),
            port: 3000,
            llm: LlmConfig {
                api_key: "key".to_string(),
                model: DEFAULT_MODEL.to_string(),
                base_url: DEFAULT_BASE_URL.to_string(),
                timeout: Duration::from_secs(1),
            },
            monitor: MonitorConfig::default(),
        };
        assert_eq!(config.addr(), "0.0.0.0:3000");
    }
}
