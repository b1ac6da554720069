use std::sync::Arc;

use axum::Router;
use shopchat_agent::AgentRuntime;
use shopchat_core::config::{AppConfig, ConfigError};
use shopchat_core::{Catalog, CatalogError, NoRemoteProducts, RemoteProducts};
use shopchat_gateway::{GatewayError, GatewaySettings, RemoteCatalog};
use thiserror::Error;
use tower_http::services::{ServeDir, ServeFile};
use tracing::info;

use crate::{chat, health};

pub struct Application {
    pub config: AppConfig,
    pub catalog: Arc<Catalog>,
    pub runtime: Arc<AgentRuntime>,
    /// `None` when `remote.enabled = false`.
    pub remote: Option<Arc<RemoteCatalog>>,
}

#[derive(Debug, Error)]
pub enum BootstrapError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Catalog(#[from] CatalogError),
    #[error("remote product client could not be built: {0}")]
    Gateway(#[source] GatewayError),
}

pub fn bootstrap_with_config(config: AppConfig) -> Result<Application, BootstrapError> {
    info!(
        event_name = "system.bootstrap.start",
        correlation_id = "bootstrap",
        catalog_path = %config.catalog.path.display(),
        "starting application bootstrap"
    );

    let catalog = Arc::new(Catalog::load(&config.catalog.path)?);
    info!(
        event_name = "system.bootstrap.catalog_loaded",
        correlation_id = "bootstrap",
        product_count = catalog.len(),
        "local catalog loaded"
    );

    let remote = if config.remote.enabled {
        let gateway = RemoteCatalog::new(GatewaySettings::from(&config.remote))
            .map_err(BootstrapError::Gateway)?;
        info!(
            event_name = "system.bootstrap.remote_ready",
            correlation_id = "bootstrap",
            upstream = %gateway.upstream_url(),
            "remote product gateway configured"
        );
        Some(Arc::new(gateway))
    } else {
        info!(
            event_name = "system.bootstrap.remote_disabled",
            correlation_id = "bootstrap",
            "remote product gateway disabled"
        );
        None
    };

    let source: Arc<dyn RemoteProducts> = match &remote {
        Some(gateway) => Arc::clone(gateway) as Arc<dyn RemoteProducts>,
        None => Arc::new(NoRemoteProducts),
    };
    let runtime = Arc::new(AgentRuntime::new(Arc::clone(&catalog), source));

    Ok(Application { config, catalog, runtime, remote })
}

impl Application {
    pub fn router(&self) -> Router {
        let static_dir = &self.config.server.static_dir;

        chat::router(Arc::clone(&self.runtime))
            .merge(health::router(Arc::clone(&self.catalog), self.remote.clone()))
            .route_service("/", ServeFile::new(static_dir.join("index.html")))
            .nest_service("/static", ServeDir::new(static_dir))
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use shopchat_core::config::{AppConfig, ConfigOverrides, LoadOptions};
    use shopchat_core::ProductId;
    use tempfile::NamedTempFile;

    use super::{bootstrap_with_config, Application, BootstrapError};

    fn bootstrap(options: LoadOptions) -> Result<Application, BootstrapError> {
        bootstrap_with_config(AppConfig::load(options)?)
    }

    fn catalog_file(contents: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().expect("temp file");
        file.write_all(contents.as_bytes()).expect("write catalog");
        file
    }

    fn options(catalog: &NamedTempFile, remote_enabled: bool) -> LoadOptions {
        LoadOptions {
            overrides: ConfigOverrides {
                catalog_path: Some(catalog.path().to_path_buf()),
                remote_enabled: Some(remote_enabled),
                remote_base_url: Some("http://127.0.0.1:9/products".to_string()),
                ..ConfigOverrides::default()
            },
            ..LoadOptions::default()
        }
    }

    #[tokio::test]
    async fn bootstrap_wires_catalog_into_runtime() {
        let catalog = catalog_file(
            r#"[{"id": 1, "name": "Linen Shirt", "price": 799, "brand": "Zara", "category": "clothing"}]"#,
        );

        let app = bootstrap(options(&catalog, false)).expect("bootstrap should succeed");

        assert_eq!(app.catalog.len(), 1);
        assert!(app.remote.is_none());
        let outcome = app.runtime.add_to_cart(ProductId(1)).await;
        assert!(outcome.success);
        assert_eq!(outcome.cart_count, Some(1));
    }

    #[test]
    fn bootstrap_builds_gateway_when_remote_is_enabled() {
        let catalog = catalog_file("[]");

        let app = bootstrap(options(&catalog, true)).expect("bootstrap should succeed");

        let remote = app.remote.expect("remote gateway");
        assert_eq!(remote.upstream_url(), "http://127.0.0.1:9/products");
    }

    #[test]
    fn bootstrap_fails_fast_on_malformed_catalog() {
        let catalog = catalog_file("{not json");

        let result = bootstrap(options(&catalog, false));

        assert!(matches!(result, Err(BootstrapError::Catalog(_))));
    }

    #[test]
    fn bootstrap_rejects_non_http_remote_url() {
        let catalog = catalog_file("[]");
        let mut options = options(&catalog, true);
        options.overrides.remote_base_url = Some("ftp://example.com/products".to_string());

        let error = bootstrap(options).err().expect("config should be rejected");

        assert!(matches!(error, BootstrapError::Config(_)));
        assert!(error.to_string().contains("remote.base_url"));
    }
}
