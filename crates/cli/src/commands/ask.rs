use std::sync::Arc;

use shopchat_agent::AgentRuntime;
use shopchat_core::config::{AppConfig, LoadOptions};
use shopchat_core::{Catalog, NoRemoteProducts, RemoteProducts};
use shopchat_gateway::{GatewaySettings, RemoteCatalog};

use crate::commands::{CommandResult, EXIT_CATALOG, EXIT_CONFIG, EXIT_RUNTIME};

/// Routes one message through a fresh runtime. The remote source is used
/// only when `use_remote` is set and the configuration enables it.
pub fn run(message: &str, use_remote: bool) -> CommandResult {
    let config = match AppConfig::load(LoadOptions::default()) {
        Ok(config) => config,
        Err(error) => {
            return CommandResult::failure(
                "ask",
                "config_validation",
                format!("configuration issue: {error}"),
                EXIT_CONFIG,
            );
        }
    };

    let catalog = match Catalog::load(&config.catalog.path) {
        Ok(catalog) => Arc::new(catalog),
        Err(error) => {
            return CommandResult::failure("ask", "catalog_load", error.to_string(), EXIT_CATALOG);
        }
    };

    let remote: Arc<dyn RemoteProducts> = if use_remote && config.remote.enabled {
        match RemoteCatalog::new(GatewaySettings::from(&config.remote)) {
            Ok(gateway) => Arc::new(gateway),
            Err(error) => {
                return CommandResult::failure(
                    "ask",
                    "gateway_build",
                    error.to_string(),
                    EXIT_RUNTIME,
                );
            }
        }
    } else {
        Arc::new(NoRemoteProducts)
    };

    let runtime = match tokio::runtime::Builder::new_current_thread().enable_all().build() {
        Ok(runtime) => runtime,
        Err(error) => {
            return CommandResult::failure(
                "ask",
                "runtime_init",
                format!("failed to initialize async runtime: {error}"),
                EXIT_RUNTIME,
            );
        }
    };

    let agent = AgentRuntime::new(catalog, remote);
    let reply = runtime.block_on(agent.handle_message(message));

    match serde_json::to_value(&reply) {
        Ok(data) => CommandResult::success_with_data("ask", reply.reply, Some(data)),
        Err(error) => {
            CommandResult::failure("ask", "serialization", error.to_string(), EXIT_RUNTIME)
        }
    }
}
