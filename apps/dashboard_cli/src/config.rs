use std::{fs, io, path::Path, time::Duration};

use anyhow::Context;
use client_core::{
    resource::DEFAULT_PAGE_SIZE, source::DEFAULT_REQUEST_TIMEOUT, window::DEFAULT_WINDOW,
};
use serde::Deserialize;

pub const DEFAULT_CONFIG_PATH: &str = "dashboard.toml";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub server_url: String,
    pub request_timeout_ms: u64,
    pub page_window: u32,
    pub default_page_size: u32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            server_url: "http://localhost:8080".into(),
            request_timeout_ms: DEFAULT_REQUEST_TIMEOUT.as_millis() as u64,
            page_window: DEFAULT_WINDOW,
            default_page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl Settings {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }
}

#[derive(Debug, Default, Deserialize)]
struct FileSettings {
    server_url: Option<String>,
    request_timeout_ms: Option<u64>,
    page_window: Option<u32>,
    default_page_size: Option<u32>,
}

/// Defaults, then the TOML file at `path` if it exists, then the
/// environment.
pub fn load_settings(path: &Path) -> anyhow::Result<Settings> {
    let mut settings = Settings::default();

    match fs::read_to_string(path) {
        Ok(raw) => apply_file(&mut settings, &raw)
            .with_context(|| format!("invalid config file '{}'", path.display()))?,
        Err(err) if err.kind() == io::ErrorKind::NotFound => {}
        Err(err) => {
            return Err(err).with_context(|| format!("failed to read '{}'", path.display()))
        }
    }

    apply_env(&mut settings, |key| std::env::var(key).ok());
    Ok(settings)
}

fn apply_file(settings: &mut Settings, raw: &str) -> anyhow::Result<()> {
    let file_cfg: FileSettings = toml::from_str(raw)?;
    if let Some(v) = file_cfg.server_url {
        settings.server_url = v;
    }
    if let Some(v) = file_cfg.request_timeout_ms {
        settings.request_timeout_ms = v;
    }
    if let Some(v) = file_cfg.page_window {
        settings.page_window = v;
    }
    if let Some(v) = file_cfg.default_page_size.filter(|size| *size > 0) {
        settings.default_page_size = v;
    }
    Ok(())
}

/// `APP__*` wins over `DASHBOARD_*`. Unparseable numbers are ignored.
fn apply_env(settings: &mut Settings, var: impl Fn(&str) -> Option<String>) {
    let lookup = |name: &str| {
        var(&format!("APP__{name}")).or_else(|| var(&format!("DASHBOARD_{name}")))
    };

    if let Some(v) = lookup("SERVER_URL") {
        settings.server_url = v;
    }
    if let Some(v) = lookup("REQUEST_TIMEOUT_MS").and_then(|v| v.trim().parse().ok()) {
        settings.request_timeout_ms = v;
    }
    if let Some(v) = lookup("PAGE_WINDOW").and_then(|v| v.trim().parse().ok()) {
        settings.page_window = v;
    }
    if let Some(v) = lookup("DEFAULT_PAGE_SIZE")
        .and_then(|v| v.trim().parse::<u32>().ok())
        .filter(|size| *size > 0)
    {
        settings.default_page_size = v;
    }
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
