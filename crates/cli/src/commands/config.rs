use std::env;
use std::fs;
use std::path::Path;

use shopchat_core::config::{resolve_config_path, AppConfig, LoadOptions};
use toml::Value;

use crate::commands::{CommandResult, EXIT_CONFIG};

struct Field {
    key_path: &'static str,
    value: String,
    env_keys: &'static [&'static str],
}

pub fn run() -> CommandResult {
    let config = match AppConfig::load(LoadOptions::default()) {
        Ok(config) => config,
        Err(error) => {
            return CommandResult::failure(
                "config",
                "config_validation",
                format!("config validation failed: {error}"),
                EXIT_CONFIG,
            );
        }
    };

    let config_file_path = resolve_config_path(None);
    let config_file_doc = load_config_file_doc(config_file_path.as_deref());

    let mut lines = vec!["effective config (source precedence: env > file > default):".to_string()];
    for field in fields(&config) {
        let source = field_source(
            field.key_path,
            field.env_keys,
            config_file_doc.as_ref(),
            config_file_path.as_deref(),
        );
        lines.push(render_line(field.key_path, &field.value, source));
    }

    CommandResult::success("config", lines.join("\n"))
}

fn fields(config: &AppConfig) -> Vec<Field> {
    let server = &config.server;
    let remote = &config.remote;

    vec![
        Field {
            key_path: "server.bind_address",
            value: server.bind_address.clone(),
            env_keys: &["SHOPCHAT_SERVER_BIND_ADDRESS"],
        },
        Field {
            key_path: "server.port",
            value: server.port.to_string(),
            env_keys: &["SHOPCHAT_SERVER_PORT"],
        },
        Field {
            key_path: "server.static_dir",
            value: server.static_dir.display().to_string(),
            env_keys: &["SHOPCHAT_SERVER_STATIC_DIR"],
        },
        Field {
            key_path: "server.graceful_shutdown_secs",
            value: server.graceful_shutdown_secs.to_string(),
            env_keys: &["SHOPCHAT_SERVER_GRACEFUL_SHUTDOWN_SECS"],
        },
        Field {
            key_path: "catalog.path",
            value: config.catalog.path.display().to_string(),
            env_keys: &["SHOPCHAT_CATALOG_PATH"],
        },
        Field {
            key_path: "remote.enabled",
            value: remote.enabled.to_string(),
            env_keys: &["SHOPCHAT_REMOTE_ENABLED"],
        },
        Field {
            key_path: "remote.base_url",
            value: remote.base_url.clone(),
            env_keys: &["SHOPCHAT_REMOTE_BASE_URL"],
        },
        Field {
            key_path: "remote.timeout_secs",
            value: remote.timeout_secs.to_string(),
            env_keys: &["SHOPCHAT_REMOTE_TIMEOUT_SECS"],
        },
        Field {
            key_path: "remote.max_retries",
            value: remote.max_retries.to_string(),
            env_keys: &["SHOPCHAT_REMOTE_MAX_RETRIES"],
        },
        Field {
            key_path: "remote.retry_backoff_ms",
            value: remote.retry_backoff_ms.to_string(),
            env_keys: &["SHOPCHAT_REMOTE_RETRY_BACKOFF_MS"],
        },
        Field {
            key_path: "remote.cache_duration_secs",
            value: remote.cache_duration_secs.to_string(),
            env_keys: &["SHOPCHAT_REMOTE_CACHE_DURATION_SECS"],
        },
        Field {
            key_path: "remote.id_offset",
            value: remote.id_offset.to_string(),
            env_keys: &["SHOPCHAT_REMOTE_ID_OFFSET"],
        },
        Field {
            key_path: "remote.price_factor",
            value: remote.price_factor.to_string(),
            env_keys: &["SHOPCHAT_REMOTE_PRICE_FACTOR"],
        },
        Field {
            key_path: "logging.level",
            value: config.logging.level.clone(),
            env_keys: &["SHOPCHAT_LOGGING_LEVEL", "SHOPCHAT_LOG_LEVEL"],
        },
        Field {
            key_path: "logging.format",
            value: format!("{:?}", config.logging.format),
            env_keys: &["SHOPCHAT_LOGGING_FORMAT", "SHOPCHAT_LOG_FORMAT"],
        },
    ]
}

fn load_config_file_doc(path: Option<&Path>) -> Option<Value> {
    let path = path?;
    let raw = fs::read_to_string(path).ok()?;
    raw.parse::<Value>().ok()
}

fn field_source(
    key_path: &str,
    env_keys: &[&str],
    config_file_doc: Option<&Value>,
    config_file_path: Option<&Path>,
) -> String {
    if let Some(env_key) = env_keys.iter().find(|key| env::var_os(key).is_some()) {
        return format!("env ({env_key})");
    }

    if let Some(doc) = config_file_doc {
        if contains_path(doc, key_path) {
            let file_path = config_file_path
                .map(|path| path.display().to_string())
                .unwrap_or_else(|| "config file".to_string());
            return format!("file ({file_path})");
        }
    }

    "default".to_string()
}

fn contains_path(root: &Value, key_path: &str) -> bool {
    let mut current = root;
    for key in key_path.split('.') {
        let Some(next) = current.get(key) else {
            return false;
        };
        current = next;
    }
    true
}

fn render_line(key: &str, value: &str, source: String) -> String {
    format!("- {key} = {value} (source: {source})")
}

#[cfg(test)]
mod tests {
    use super::contains_path;

    #[test]
    fn contains_path_walks_nested_tables() {
        let doc = "[remote]\nbase_url = \"http://localhost:8080/products\"\n"
            .parse::<toml::Value>()
            .expect("toml");

        assert!(contains_path(&doc, "remote.base_url"));
        assert!(!contains_path(&doc, "remote.timeout_secs"));
        assert!(!contains_path(&doc, "server.port"));
    }
}
