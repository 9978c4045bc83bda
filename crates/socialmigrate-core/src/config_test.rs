use std::collections::HashMap;
use std::env::VarError;

use super::*;

fn lookup_from_map<'a>(
    map: &'a HashMap<&'a str, &'a str>,
) -> impl Fn(&str) -> Result<String, VarError> + 'a {
    move |key| {
        map.get(key)
            .map(|v| (*v).to_string())
            .ok_or(VarError::NotPresent)
    }
}

#[test]
fn parse_environment_production() {
    assert_eq!(
        parse_environment("production").unwrap(),
        Environment::Production
    );
}

#[test]
fn parse_environment_test() {
    assert_eq!(parse_environment("test").unwrap(), Environment::Test);
}

#[test]
fn parse_environment_unknown_fails() {
    let err = parse_environment("staging").unwrap_err();
    assert!(matches!(err, ConfigError::InvalidEnvVar { ref var, .. } if var == "SOCIALMIGRATE_ENV"));
}

#[test]
fn build_app_config_defaults_with_empty_env() {
    let map: HashMap<&str, &str> = HashMap::new();
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.env, Environment::Development);
    assert_eq!(cfg.log_level, "info");
    assert_eq!(cfg.graph_base_url, "https://graph.facebook.com");
    assert_eq!(cfg.graph_api_version, "v19.0");
    assert_eq!(cfg.fetch_limit, 50);
    assert_eq!(cfg.request_timeout_secs, 30);
    assert_eq!(cfg.user_agent, "socialmigrate/0.1 (post-migration)");
    assert!(cfg.gemini_api_key.is_none());
    assert_eq!(cfg.gemini_model, "gemini-2.5-flash");
}

#[test]
fn gemini_api_key_is_picked_up() {
    let mut map = HashMap::new();
    map.insert("GEMINI_API_KEY", "abc123");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.gemini_api_key.as_deref(), Some("abc123"));
}

#[test]
fn blank_gemini_api_key_counts_as_missing() {
    let mut map = HashMap::new();
    map.insert("GEMINI_API_KEY", "   ");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert!(cfg.gemini_api_key.is_none());
}

#[test]
fn fetch_limit_override() {
    let mut map = HashMap::new();
    map.insert("SOCIALMIGRATE_FETCH_LIMIT", "25");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.fetch_limit, 25);
}

#[test]
fn fetch_limit_invalid() {
    let mut map = HashMap::new();
    map.insert("SOCIALMIGRATE_FETCH_LIMIT", "lots");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "SOCIALMIGRATE_FETCH_LIMIT"),
        "expected InvalidEnvVar(SOCIALMIGRATE_FETCH_LIMIT), got: {result:?}"
    );
}

#[test]
fn fetch_limit_zero_is_rejected() {
    let mut map = HashMap::new();
    map.insert("SOCIALMIGRATE_FETCH_LIMIT", "0");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "SOCIALMIGRATE_FETCH_LIMIT"),
        "expected InvalidEnvVar(SOCIALMIGRATE_FETCH_LIMIT), got: {result:?}"
    );
}

#[test]
fn request_timeout_invalid() {
    let mut map = HashMap::new();
    map.insert("SOCIALMIGRATE_REQUEST_TIMEOUT_SECS", "-1");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "SOCIALMIGRATE_REQUEST_TIMEOUT_SECS"),
        "expected InvalidEnvVar(SOCIALMIGRATE_REQUEST_TIMEOUT_SECS), got: {result:?}"
    );
}

#[test]
fn debug_output_redacts_gemini_key() {
    let mut map = HashMap::new();
    map.insert("GEMINI_API_KEY", "super-secret-key");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    let out = format!("{cfg:?}");
    assert!(!out.contains("super-secret-key"), "key leaked: {out}");
    assert!(out.contains("[redacted]"));
}
