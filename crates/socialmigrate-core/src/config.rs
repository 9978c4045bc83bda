use crate::app_config::{AppConfig, Environment};
use crate::ConfigError;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but invalid.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Every variable has a default except `GEMINI_API_KEY`, whose absence leaves
/// the classifier unconfigured rather than failing startup.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u64>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let parse_usize = |var: &str, default: &str| -> Result<usize, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<usize>()
            .map_err(|e| ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: e.to_string(),
            })
    };

    let env = parse_environment(&or_default("SOCIALMIGRATE_ENV", "development"))?;
    let log_level = or_default("SOCIALMIGRATE_LOG_LEVEL", "info");

    let graph_base_url = or_default("SOCIALMIGRATE_GRAPH_BASE_URL", "https://graph.facebook.com");
    let graph_api_version = or_default("SOCIALMIGRATE_GRAPH_API_VERSION", "v19.0");
    let fetch_limit = parse_usize("SOCIALMIGRATE_FETCH_LIMIT", "50")?;
    if fetch_limit == 0 {
        return Err(ConfigError::InvalidEnvVar {
            var: "SOCIALMIGRATE_FETCH_LIMIT".to_string(),
            reason: "must be at least 1".to_string(),
        });
    }
    let request_timeout_secs = parse_u64("SOCIALMIGRATE_REQUEST_TIMEOUT_SECS", "30")?;
    let user_agent = or_default(
        "SOCIALMIGRATE_USER_AGENT",
        "socialmigrate/0.1 (post-migration)",
    );

    let gemini_api_key = lookup("GEMINI_API_KEY")
        .ok()
        .filter(|k| !k.trim().is_empty());
    let gemini_base_url = or_default(
        "SOCIALMIGRATE_GEMINI_BASE_URL",
        "https://generativelanguage.googleapis.com",
    );
    let gemini_model = or_default("SOCIALMIGRATE_GEMINI_MODEL", "gemini-2.5-flash");

    Ok(AppConfig {
        env,
        log_level,
        graph_base_url,
        graph_api_version,
        fetch_limit,
        request_timeout_secs,
        user_agent,
        gemini_api_key,
        gemini_base_url,
        gemini_model,
    })
}

/// Parse a string into an `Environment` variant.
fn parse_environment(s: &str) -> Result<Environment, ConfigError> {
    match s {
        "development" => Ok(Environment::Development),
        "test" => Ok(Environment::Test),
        "production" => Ok(Environment::Production),
        other => Err(ConfigError::InvalidEnvVar {
            var: "SOCIALMIGRATE_ENV".to_string(),
            reason: format!("unknown environment \"{other}\""),
        }),
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
