use serde::Serialize;
use shopchat_core::config::{AppConfig, LoadOptions};
use shopchat_core::{Catalog, RemoteProducts};
use shopchat_gateway::{GatewaySettings, RemoteCatalog};

use crate::commands::{escape_json, CommandResult, EXIT_CATALOG, EXIT_CONFIG, EXIT_RUNTIME};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
enum CheckStatus {
    Pass,
    Fail,
    Skipped,
}

#[derive(Debug, Serialize)]
struct DoctorCheck {
    name: &'static str,
    status: CheckStatus,
    details: String,
    #[serde(skip)]
    exit_code: u8,
}

impl DoctorCheck {
    fn pass(name: &'static str, details: impl Into<String>) -> Self {
        Self { name, status: CheckStatus::Pass, details: details.into(), exit_code: 0 }
    }

    fn fail(name: &'static str, details: impl Into<String>, exit_code: u8) -> Self {
        Self { name, status: CheckStatus::Fail, details: details.into(), exit_code }
    }

    fn skipped(name: &'static str, details: impl Into<String>) -> Self {
        Self { name, status: CheckStatus::Skipped, details: details.into(), exit_code: 0 }
    }
}

#[derive(Debug, Serialize)]
struct DoctorReport {
    overall_status: CheckStatus,
    summary: String,
    checks: Vec<DoctorCheck>,
}

pub fn run(json_output: bool, probe_remote: bool) -> CommandResult {
    let report = build_report(probe_remote);
    let exit_code =
        report.checks.iter().map(|check| check.exit_code).find(|code| *code != 0).unwrap_or(0);

    let output = if json_output {
        serde_json::to_string_pretty(&report).unwrap_or_else(|error| {
            format!(
                "{{\"overall_status\":\"fail\",\"summary\":\"doctor serialization failed\",\"error\":\"{}\"}}",
                escape_json(&error.to_string())
            )
        })
    } else {
        render_human(&report)
    };

    CommandResult { exit_code, output }
}

fn build_report(probe_remote: bool) -> DoctorReport {
    let mut checks = Vec::new();

    match AppConfig::load(LoadOptions::default()) {
        Ok(config) => {
            checks.push(DoctorCheck::pass(
                "config_validation",
                "configuration loaded and validated",
            ));
            checks.push(check_catalog(&config));
            checks.push(if probe_remote {
                check_remote(&config)
            } else {
                DoctorCheck::skipped("remote_fetch", "pass --remote to probe the remote source")
            });
        }
        Err(error) => {
            checks.push(DoctorCheck::fail("config_validation", error.to_string(), EXIT_CONFIG));
            checks.push(DoctorCheck::skipped(
                "catalog_load",
                "skipped because configuration did not load",
            ));
            checks.push(DoctorCheck::skipped(
                "remote_fetch",
                "skipped because configuration did not load",
            ));
        }
    }

    let all_pass = checks.iter().all(|check| check.status != CheckStatus::Fail);
    let overall_status = if all_pass { CheckStatus::Pass } else { CheckStatus::Fail };
    let summary = if all_pass {
        "doctor: all readiness checks passed".to_string()
    } else {
        "doctor: one or more readiness checks failed".to_string()
    };

    DoctorReport { overall_status, summary, checks }
}

fn check_catalog(config: &AppConfig) -> DoctorCheck {
    let catalog = match Catalog::load(&config.catalog.path) {
        Ok(catalog) => catalog,
        Err(error) => return DoctorCheck::fail("catalog_load", error.to_string(), EXIT_CATALOG),
    };

    if catalog.is_empty() {
        return DoctorCheck::fail(
            "catalog_load",
            format!("`{}` contains no products", config.catalog.path.display()),
            EXIT_CATALOG,
        );
    }

    let counts = catalog
        .count_by_category()
        .into_iter()
        .map(|(category, count)| format!("{category}={count}"))
        .collect::<Vec<_>>()
        .join(", ");
    DoctorCheck::pass("catalog_load", format!("{} products ({counts})", catalog.len()))
}

fn check_remote(config: &AppConfig) -> DoctorCheck {
    if !config.remote.enabled {
        return DoctorCheck::skipped("remote_fetch", "remote source disabled in configuration");
    }

    let gateway = match RemoteCatalog::new(GatewaySettings::from(&config.remote)) {
        Ok(gateway) => gateway,
        Err(error) => return DoctorCheck::fail("remote_fetch", error.to_string(), EXIT_RUNTIME),
    };

    let runtime = match tokio::runtime::Builder::new_current_thread().enable_all().build() {
        Ok(runtime) => runtime,
        Err(error) => {
            return DoctorCheck::fail(
                "remote_fetch",
                format!("failed to initialize async runtime: {error}"),
                EXIT_RUNTIME,
            );
        }
    };

    let products = runtime.block_on(gateway.fetch_products());
    if products.is_empty() {
        DoctorCheck::fail(
            "remote_fetch",
            format!("no products returned from `{}`", gateway.upstream_url()),
            EXIT_RUNTIME,
        )
    } else {
        DoctorCheck::pass(
            "remote_fetch",
            format!("{} products fetched from `{}`", products.len(), gateway.upstream_url()),
        )
    }
}

fn render_human(report: &DoctorReport) -> String {
    let mut lines = Vec::new();
    lines.push(report.summary.clone());

    for check in &report.checks {
        let marker = match check.status {
            CheckStatus::Pass => "ok",
            CheckStatus::Fail => "fail",
            CheckStatus::Skipped => "skip",
        };
        lines.push(format!("- [{marker}] {}: {}", check.name, check.details));
    }

    lines.join("\n")
}
