use crate::app_config::{AppConfig, Environment, DEFAULT_USER_AGENT};
use crate::ConfigError;

/// Reads `PRICEWATCH_*` settings, loading a `.env` file first if present.
///
/// # Errors
///
/// Returns `ConfigError` if a variable is present but holds an invalid value.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Like [`load_app_config`] but reads the process environment only.
///
/// # Errors
///
/// Returns `ConfigError` if a variable is present but holds an invalid value.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Parses settings through `lookup`; tests pass a `HashMap`-backed closure.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::path::PathBuf;

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        let raw = or_default(var, default);
        raw.trim()
            .parse::<u64>()
            .map_err(|e| ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: e.to_string(),
            })
    };

    let env = parse_environment(&or_default("PRICEWATCH_ENV", "development"));
    let log_level = or_default("PRICEWATCH_LOG_LEVEL", "info");
    let competitors_path = lookup("PRICEWATCH_COMPETITORS_PATH")
        .ok()
        .filter(|p| !p.trim().is_empty())
        .map(PathBuf::from);

    let request_timeout_secs = parse_u64("PRICEWATCH_REQUEST_TIMEOUT_SECS", "30")?;
    if request_timeout_secs == 0 {
        return Err(ConfigError::InvalidEnvVar {
            var: "PRICEWATCH_REQUEST_TIMEOUT_SECS".to_string(),
            reason: "timeout must be at least one second".to_string(),
        });
    }
    let request_delay_ms = parse_u64("PRICEWATCH_REQUEST_DELAY_MS", "2000")?;

    let user_agent = or_default("PRICEWATCH_USER_AGENT", DEFAULT_USER_AGENT);
    if user_agent.trim().is_empty() {
        return Err(ConfigError::InvalidEnvVar {
            var: "PRICEWATCH_USER_AGENT".to_string(),
            reason: "user agent must be non-empty".to_string(),
        });
    }

    Ok(AppConfig {
        env,
        log_level,
        competitors_path,
        request_timeout_secs,
        request_delay_ms,
        user_agent,
    })
}

/// Anything other than `production` or `test` is treated as development.
fn parse_environment(s: &str) -> Environment {
    match s {
        "production" => Environment::Production,
        "test" => Environment::Test,
        _ => Environment::Development,
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
