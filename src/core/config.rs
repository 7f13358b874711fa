use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::ops::RangeInclusive;
use std::time::Duration;

#[cfg(not(target_arch = "wasm32"))]
use std::fs;
#[cfg(not(target_arch = "wasm32"))]
use std::path::Path;

pub const CONFIG_FILE: &str = "config.yml";

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Config {
    #[serde(default)]
    pub api: ApiConfig,

    #[serde(default = "default_output")]
    pub output_folder: String,

    #[serde(default)]
    pub ui: UiConfig,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ApiConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// 0 waits for the backend indefinitely.
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct UiConfig {
    #[serde(default = "default_acknowledgement_ms")]
    pub acknowledgement_ms: u64,
    #[serde(default = "default_min_pages")]
    pub min_pages: u32,
    #[serde(default = "default_max_pages")]
    pub max_pages: u32,
    #[serde(default = "default_recommended_pages")]
    pub recommended_pages: [u32; 2],
    #[serde(default = "default_service_worker")]
    pub service_worker: String,
}

fn default_output() -> String {
    "output".to_string()
}
fn default_base_url() -> String {
    "http://127.0.0.1:5000".to_string()
}
fn default_request_timeout() -> u64 {
    180
}
fn default_acknowledgement_ms() -> u64 {
    2000
}
fn default_min_pages() -> u32 {
    1
}
fn default_max_pages() -> u32 {
    10
}
fn default_recommended_pages() -> [u32; 2] {
    [4, 8]
}
fn default_service_worker() -> String {
    "/static/sw.js".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api: ApiConfig::default(),
            output_folder: default_output(),
            ui: UiConfig::default(),
        }
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            request_timeout_secs: default_request_timeout(),
        }
    }
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            acknowledgement_ms: default_acknowledgement_ms(),
            min_pages: default_min_pages(),
            max_pages: default_max_pages(),
            recommended_pages: default_recommended_pages(),
            service_worker: default_service_worker(),
        }
    }
}

impl ApiConfig {
    pub fn request_timeout(&self) -> Option<Duration> {
        match self.request_timeout_secs {
            0 => None,
            secs => Some(Duration::from_secs(secs)),
        }
    }
}

/// One entry of the page-count selection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageOption {
    pub value: String,
    pub label: String,
}

impl UiConfig {
    pub fn acknowledgement(&self) -> Duration {
        Duration::from_millis(self.acknowledgement_ms)
    }

    fn recommended(&self) -> RangeInclusive<u32> {
        self.recommended_pages[0]..=self.recommended_pages[1]
    }

    pub fn page_options(&self) -> Vec<PageOption> {
        let recommended = self.recommended();
        (self.min_pages..=self.max_pages)
            .map(|n| {
                let unit = if n == 1 { "page" } else { "pages" };
                let label = if recommended.contains(&n) {
                    format!("{} {} (recommended)", n, unit)
                } else {
                    format!("{} {}", n, unit)
                };
                PageOption {
                    value: n.to_string(),
                    label,
                }
            })
            .collect()
    }
}

impl Config {
    pub fn parse(content: &str) -> Result<Self> {
        serde_yaml_ng::from_str(content).context("Failed to parse config.yml")
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Result<Self> {
        Self::load_from(CONFIG_FILE)
    }

    /// Reads `path`, or falls back to defaults when it does not exist.
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            log::warn!("{} not found, using default settings", path.display());
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        Self::parse(&content)
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn ensure_directories(&self) -> Result<()> {
        fs::create_dir_all(&self.output_folder)
            .with_context(|| format!("Failed to create {}", self.output_folder))?;
        Ok(())
    }
}
