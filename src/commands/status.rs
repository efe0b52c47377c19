use anyhow::Result;

use crate::commands::CommandReport;
use crate::titler::config::{load_config, resolve_config_path};
use crate::titler::paths::resolve_paths;
use crate::titler::provider::resolve_provider_config;

/// Report resolved paths, config values, and provider resolution. Never
/// touches the network and never prints key material.
pub fn run() -> Result<CommandReport> {
    let mut report = CommandReport::new("status");

    let paths = resolve_paths()?;
    report.detail(format!("home={}", paths.home.display()));
    report.detail(format!("logs_dir={}", paths.logs_dir.display()));

    if let Some(path) = resolve_config_path() {
        let presence = if path.exists() { "present" } else { "absent" };
        report.detail(format!("config_path={} ({presence})", path.display()));
    }

    let config = load_config()?;
    report.detail(format!("lower_case={}", config.titles.lower_case));
    report.detail(format!("accept_subtitles={}", config.titles.accept_subtitles));

    match resolve_provider_config() {
        Some(provider) => {
            report.detail(format!("provider={}", provider.provider.label()));
            report.detail(format!("model={}", provider.model));
            if let Some(base_url) = &provider.base_url {
                report.detail(format!("base_url={base_url}"));
            }
        }
        None => report.detail("provider=unconfigured"),
    }

    Ok(report)
}
