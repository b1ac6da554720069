use std::env;
use std::io::Write;
use std::sync::{Mutex, OnceLock};

use serde_json::Value;
use shopchat_cli::commands::{ask, config, doctor};
use tempfile::NamedTempFile;

const CATALOG: &str = r#"[
    {"id": 1, "name": "Cotton Kurta", "price": 799, "brand": "Fabindia", "category": "clothing", "rating": 4.4},
    {"id": 2, "name": "Denim Jacket", "price": 2499, "brand": "Levi's", "category": "clothing", "rating": 4.1},
    {"id": 3, "name": "Running Shoes", "price": 3299, "brand": "Nike", "category": "footwear", "rating": 4.6}
]"#;

#[test]
fn config_reports_env_source_for_overridden_values() {
    with_env(&[("SHOPCHAT_SERVER_PORT", "8081"), ("SHOPCHAT_LOG_LEVEL", "debug")], || {
        let result = config::run();
        assert_eq!(result.exit_code, 0, "expected config inspection to succeed");

        let payload = parse_payload(&result.output);
        assert_eq!(payload["command"], "config");
        assert_eq!(payload["status"], "ok");

        let message = payload["message"].as_str().unwrap_or("");
        assert!(message.contains("- server.port = 8081 (source: env (SHOPCHAT_SERVER_PORT))"));
        assert!(message.contains("- logging.level = debug (source: env (SHOPCHAT_LOG_LEVEL))"));
        assert!(message.contains("- remote.max_retries = 2 (source: default)"));
    });
}

#[test]
fn config_returns_validation_failure_for_bad_env_value() {
    with_env(&[("SHOPCHAT_REMOTE_TIMEOUT_SECS", "soon")], || {
        let result = config::run();
        assert_eq!(result.exit_code, 2, "expected config validation failure code");

        let payload = parse_payload(&result.output);
        assert_eq!(payload["status"], "error");
        assert_eq!(payload["error_class"], "config_validation");
    });
}

#[test]
fn doctor_reports_catalog_counts_per_category() {
    let catalog = catalog_file(CATALOG);
    let path = catalog.path().display().to_string();

    with_env(&[("SHOPCHAT_CATALOG_PATH", path.as_str())], || {
        let result = doctor::run(true, false);
        assert_eq!(result.exit_code, 0, "expected doctor to pass: {}", result.output);

        let report = parse_payload(&result.output);
        assert_eq!(report["overall_status"], "pass");

        let checks = report["checks"].as_array().expect("checks array");
        let catalog_check = checks
            .iter()
            .find(|check| check["name"] == "catalog_load")
            .expect("catalog check present");
        assert_eq!(catalog_check["status"], "pass");
        let details = catalog_check["details"].as_str().unwrap_or("");
        assert!(details.starts_with("3 products"));
        assert!(details.contains("clothing=2"));
        assert!(details.contains("footwear=1"));

        let remote_check = checks
            .iter()
            .find(|check| check["name"] == "remote_fetch")
            .expect("remote check present");
        assert_eq!(remote_check["status"], "skipped");
    });
}

#[test]
fn doctor_fails_with_catalog_exit_code_for_missing_file() {
    with_env(&[("SHOPCHAT_CATALOG_PATH", "/nonexistent/shopchat/products.json")], || {
        let result = doctor::run(false, false);
        assert_eq!(result.exit_code, 3, "expected catalog failure code");
        assert!(result.output.starts_with("doctor: one or more readiness checks failed"));
        assert!(result.output.contains("- [fail] catalog_load:"));
    });
}

#[test]
fn ask_routes_search_against_local_catalog() {
    let catalog = catalog_file(CATALOG);
    let path = catalog.path().display().to_string();

    with_env(&[("SHOPCHAT_CATALOG_PATH", path.as_str())], || {
        let result = ask::run("show clothing under 1000", false);
        assert_eq!(result.exit_code, 0, "expected ask to succeed: {}", result.output);

        let payload = parse_payload(&result.output);
        assert_eq!(payload["command"], "ask");
        assert_eq!(payload["message"], "Here are some clothing items under ₹1000:");

        let products = payload["data"]["products"].as_array().expect("products array");
        assert_eq!(products.len(), 1);
        assert_eq!(products[0]["id"], 1);
    });
}

#[test]
fn ask_answers_fixed_intents_without_products() {
    let catalog = catalog_file(CATALOG);
    let path = catalog.path().display().to_string();

    with_env(&[("SHOPCHAT_CATALOG_PATH", path.as_str())], || {
        let result = ask::run("When will my delivery arrive?", false);
        assert_eq!(result.exit_code, 0);

        let payload = parse_payload(&result.output);
        assert_eq!(
            payload["data"],
            serde_json::json!({"reply": "Delivery usually takes 3-5 working days."})
        );
    });
}

#[test]
fn ask_fails_with_catalog_exit_code_for_malformed_catalog() {
    let catalog = catalog_file("[{\"id\": 1");
    let path = catalog.path().display().to_string();

    with_env(&[("SHOPCHAT_CATALOG_PATH", path.as_str())], || {
        let result = ask::run("hi", false);
        assert_eq!(result.exit_code, 3);

        let payload = parse_payload(&result.output);
        assert_eq!(payload["status"], "error");
        assert_eq!(payload["error_class"], "catalog_load");
    });
}

fn catalog_file(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("temp catalog file");
    file.write_all(contents.as_bytes()).expect("write catalog");
    file
}

fn parse_payload(output: &str) -> Value {
    serde_json::from_str(output).expect("command output should be valid JSON")
}

fn with_env(vars: &[(&str, &str)], test_fn: impl FnOnce()) {
    static ENV_LOCK: OnceLock<Mutex<()>> = OnceLock::new();
    let _guard =
        ENV_LOCK.get_or_init(|| Mutex::new(())).lock().expect("env mutex should not be poisoned");

    let keys = [
        "SHOPCHAT_SERVER_BIND_ADDRESS",
        "SHOPCHAT_SERVER_PORT",
        "SHOPCHAT_SERVER_STATIC_DIR",
        "SHOPCHAT_SERVER_GRACEFUL_SHUTDOWN_SECS",
        "SHOPCHAT_CATALOG_PATH",
        "SHOPCHAT_REMOTE_ENABLED",
        "SHOPCHAT_REMOTE_BASE_URL",
        "SHOPCHAT_REMOTE_TIMEOUT_SECS",
        "SHOPCHAT_REMOTE_MAX_RETRIES",
        "SHOPCHAT_REMOTE_RETRY_BACKOFF_MS",
        "SHOPCHAT_REMOTE_CACHE_DURATION_SECS",
        "SHOPCHAT_REMOTE_ID_OFFSET",
        "SHOPCHAT_REMOTE_PRICE_FACTOR",
        "SHOPCHAT_LOGGING_LEVEL",
        "SHOPCHAT_LOGGING_FORMAT",
        "SHOPCHAT_LOG_LEVEL",
        "SHOPCHAT_LOG_FORMAT",
    ];

    let previous_values: Vec<(&str, Option<String>)> =
        keys.iter().map(|key| (*key, env::var(key).ok())).collect();

    for key in &keys {
        env::remove_var(key);
    }
    for (key, value) in vars {
        env::set_var(key, value);
    }

    test_fn();

    for (key, value) in previous_values {
        if let Some(value) = value {
            env::set_var(key, value);
        } else {
            env::remove_var(key);
        }
    }
}
