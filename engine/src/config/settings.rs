// Engine settings, loaded from environment variables (and `.env` via dotenv in main)
use serde::Deserialize;
use std::env;
use std::path::PathBuf;

use crate::signal::SignalConfig;

pub const DEFAULT_MIN_CONFIDENCE: f64 = 0.6;

#[derive(Debug, Deserialize, Clone)]
pub struct EngineSettings {
    pub host: String,
    pub port: u16,
    /// `ALPHA_VANTAGE_KEY`; checked by the market-data adapter on each fetch.
    pub market_data_api_key: Option<String>,
    /// `GOOGLE_API_KEY`; checked by the orchestrator before the model call.
    pub model_api_key: Option<String>,
    pub model: String,
    pub min_confidence: f64,
    pub bars_limit: usize,
    pub prompt_window: usize,
    /// When set, bars come from `<dir>/<PAIR>_<TF>.csv` instead of Alpha Vantage.
    pub csv_data_dir: Option<PathBuf>,
    pub http_timeout_secs: u64,
    pub alpha_vantage_url: String,
    pub gemini_url: String,
}

impl Default for EngineSettings {
    fn default() -> Self {
        EngineSettings {
            host: "127.0.0.1".to_string(),
            port: 3000,
            market_data_api_key: None,
            model_api_key: None,
            model: "gemini-1.5-flash".to_string(),
            min_confidence: DEFAULT_MIN_CONFIDENCE,
            bars_limit: 400,
            prompt_window: 200,
            csv_data_dir: None,
            http_timeout_secs: 30,
            alpha_vantage_url: "https://www.alphavantage.co/query".to_string(),
            gemini_url: "https://generativelanguage.googleapis.com".to_string(),
        }
    }
}

fn env_opt(name: &str) -> Option<String> {
    env::var(name)
        .ok()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

fn env_parse<T: std::str::FromStr>(name: &str, default: T) -> T {
    match env_opt(name) {
        Some(raw) => raw.parse().unwrap_or_else(|_| {
            tracing::warn!(
                variable = name,
                value = %raw,
                "Ignoring unparsable setting, using default"
            );
            default
        }),
        None => default,
    }
}

/// Thresholds outside [0, 1], NaN included, fall back to the default.
fn min_confidence_from_env(default: f64) -> f64 {
    let value = env_parse("SIGNAL_MIN_CONFIDENCE", default);
    if (0.0..=1.0).contains(&value) {
        value
    } else {
        tracing::warn!(
            variable = "SIGNAL_MIN_CONFIDENCE",
            value,
            "Confidence threshold must be within [0, 1], using default"
        );
        default
    }
}

impl EngineSettings {
    pub fn from_env() -> Self {
        let defaults = EngineSettings::default();
        EngineSettings {
            host: env_opt("ENGINE_HOST").unwrap_or(defaults.host),
            port: env_parse("ENGINE_PORT", defaults.port),
            market_data_api_key: env_opt("ALPHA_VANTAGE_KEY"),
            model_api_key: env_opt("GOOGLE_API_KEY"),
            model: env_opt("SIGNAL_MODEL").unwrap_or(defaults.model),
            min_confidence: min_confidence_from_env(defaults.min_confidence),
            bars_limit: env_parse("SIGNAL_BARS_LIMIT", defaults.bars_limit),
            prompt_window: env_parse("SIGNAL_PROMPT_WINDOW", defaults.prompt_window),
            csv_data_dir: env_opt("SIGNAL_CSV_DIR").map(PathBuf::from),
            http_timeout_secs: env_parse("HTTP_TIMEOUT_SECS", defaults.http_timeout_secs),
            alpha_vantage_url: env_opt("ALPHA_VANTAGE_URL")
                .unwrap_or(defaults.alpha_vantage_url),
            gemini_url: env_opt("GEMINI_URL").unwrap_or(defaults.gemini_url),
        }
    }

    pub fn signal_config(&self) -> SignalConfig {
        SignalConfig {
            model_api_key: self.model_api_key.clone(),
            min_confidence: self.min_confidence,
            prompt_window: self.prompt_window,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    // Tests below mutate process-wide environment variables.
    static ENV_LOCK: Mutex<()> = Mutex::new(());

    const VARS: [&str; 4] = [
        "SIGNAL_MIN_CONFIDENCE",
        "SIGNAL_BARS_LIMIT",
        "ENGINE_PORT",
        "SIGNAL_CSV_DIR",
    ];

    fn with_env<F: FnOnce()>(vars: &[(&str, &str)], check: F) {
        let _guard = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        for name in VARS {
            env::remove_var(name);
        }
        for (name, value) in vars {
            env::set_var(name, value);
        }
        check();
        for name in VARS {
            env::remove_var(name);
        }
    }

    #[test]
    fn test_from_env_reads_overrides() {
        with_env(
            &[
                ("SIGNAL_MIN_CONFIDENCE", "0.75"),
                ("SIGNAL_BARS_LIMIT", "250"),
                ("ENGINE_PORT", "8080"),
                ("SIGNAL_CSV_DIR", " /tmp/bars "),
            ],
            || {
                let settings = EngineSettings::from_env();
                assert_eq!(settings.min_confidence, 0.75);
                assert_eq!(settings.bars_limit, 250);
                assert_eq!(settings.port, 8080);
                assert_eq!(settings.csv_data_dir, Some(PathBuf::from("/tmp/bars")));
            },
        );
    }

    #[test]
    fn test_from_env_falls_back_on_garbage() {
        with_env(
            &[
                ("SIGNAL_MIN_CONFIDENCE", "high"),
                ("SIGNAL_BARS_LIMIT", "-5"),
                ("ENGINE_PORT", "not-a-port"),
            ],
            || {
                let settings = EngineSettings::from_env();
                assert_eq!(settings.min_confidence, DEFAULT_MIN_CONFIDENCE);
                assert_eq!(settings.bars_limit, 400);
                assert_eq!(settings.port, 3000);
                assert!(settings.csv_data_dir.is_none());
            },
        );
    }

    #[test]
    fn test_from_env_rejects_out_of_range_threshold() {
        for raw in ["NaN", "inf", "-0.1", "1.5"] {
            with_env(&[("SIGNAL_MIN_CONFIDENCE", raw)], || {
                let settings = EngineSettings::from_env();
                assert_eq!(
                    settings.min_confidence, DEFAULT_MIN_CONFIDENCE,
                    "threshold {} should fall back",
                    raw
                );
            });
        }
    }

    #[test]
    fn test_from_env_accepts_threshold_bounds() {
        for (raw, expected) in [("0", 0.0), ("1", 1.0)] {
            with_env(&[("SIGNAL_MIN_CONFIDENCE", raw)], || {
                assert_eq!(EngineSettings::from_env().min_confidence, expected);
            });
        }
    }

    #[test]
    fn test_defaults() {
        let settings = EngineSettings::default();
        assert_eq!(settings.min_confidence, 0.6);
        assert_eq!(settings.bars_limit, 400);
        assert_eq!(settings.prompt_window, 200);
        assert!(settings.model_api_key.is_none());
    }

    #[test]
    fn test_signal_config_carries_gate_settings() {
        let settings = EngineSettings {
            model_api_key: Some("key".to_string()),
            min_confidence: 0.75,
            ..EngineSettings::default()
        };
        let config = settings.signal_config();
        assert_eq!(config.model_api_key.as_deref(), Some("key"));
        assert_eq!(config.min_confidence, 0.75);
        assert_eq!(config.prompt_window, 200);
    }
}
