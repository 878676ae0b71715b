use crate::app_config::{AppConfig, Environment};
use crate::ConfigError;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if values are invalid.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files — useful for testing
/// or when the caller manages env setup.
///
/// # Errors
///
/// Returns `ConfigError` if values are invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Every variable is optional: with no inference URLs configured the engine
/// runs on its rule-based tier alone.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::net::SocketAddr;

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let optional = |var: &str| -> Option<String> {
        lookup(var)
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    };

    let invalid = |var: &str, reason: String| ConfigError::InvalidEnvVar {
        var: var.to_string(),
        reason,
    };

    let parse_addr = |var: &str, default: &str| -> Result<SocketAddr, ConfigError> {
        or_default(var, default)
            .parse::<SocketAddr>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        or_default(var, default)
            .parse::<u64>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let parse_usize = |var: &str, default: &str| -> Result<usize, ConfigError> {
        or_default(var, default)
            .parse::<usize>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let parse_bool = |var: &str, default: &str| -> Result<bool, ConfigError> {
        let raw = or_default(var, default);
        match raw.trim().to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => Ok(true),
            "0" | "false" | "no" | "off" => Ok(false),
            other => Err(invalid(var, format!("expected a boolean, got '{other}'"))),
        }
    };

    let env = parse_environment(&or_default("HRPULSE_ENV", "development"))?;
    let bind_addr = parse_addr("HRPULSE_BIND_ADDR", "0.0.0.0:8001")?;
    let log_level = or_default("HRPULSE_LOG_LEVEL", "info");

    let zero_shot_url = optional("HRPULSE_ZERO_SHOT_URL");
    let zero_shot_token = optional("HRPULSE_ZERO_SHOT_TOKEN");
    let tei_url = optional("HRPULSE_TEI_URL");

    let inference_timeout_ms = parse_u64("HRPULSE_INFERENCE_TIMEOUT_MS", "10000")?;
    if inference_timeout_ms == 0 {
        return Err(invalid(
            "HRPULSE_INFERENCE_TIMEOUT_MS",
            "must be greater than zero".to_string(),
        ));
    }
    let serialize_inference = parse_bool("HRPULSE_SERIALIZE_INFERENCE", "false")?;

    let batch_concurrency = parse_usize("HRPULSE_BATCH_CONCURRENCY", "8")?;
    if batch_concurrency == 0 {
        return Err(invalid(
            "HRPULSE_BATCH_CONCURRENCY",
            "must be greater than zero".to_string(),
        ));
    }
    let max_batch_size = parse_usize("HRPULSE_MAX_BATCH_SIZE", "500")?;

    let api_keys = or_default("HRPULSE_API_KEYS", "")
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(ToOwned::to_owned)
        .collect();

    Ok(AppConfig {
        env,
        bind_addr,
        log_level,
        zero_shot_url,
        zero_shot_token,
        tei_url,
        inference_timeout_ms,
        serialize_inference,
        batch_concurrency,
        max_batch_size,
        api_keys,
    })
}

/// Parse a string into an `Environment` variant.
fn parse_environment(s: &str) -> Result<Environment, ConfigError> {
    match s {
        "development" => Ok(Environment::Development),
        "test" => Ok(Environment::Test),
        "production" => Ok(Environment::Production),
        other => Err(ConfigError::InvalidEnvVar {
            var: "HRPULSE_ENV".to_string(),
            reason: format!("unknown environment '{other}'"),
        }),
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
