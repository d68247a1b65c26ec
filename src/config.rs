//! Configuration module for anifetch

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::api::github::DEFAULT_CATALOG_URL;
use crate::paths;

/// Application configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Whether to fetch and show an image at all
    #[serde(default = "default_show_image")]
    pub show_image: bool,

    /// Viewer size used when the terminal size gives nothing better (`WxH`)
    #[serde(default = "default_image_size")]
    pub image_size: String,

    /// Image cache directory (defaults to ~/.anifetch)
    #[serde(default)]
    pub cache_dir: Option<PathBuf>,

    /// Contents API URL listing the image categories
    #[serde(default = "default_catalog_url")]
    pub catalog_url: String,

    /// Timeout for every remote request, in seconds
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
}

fn default_show_image() -> bool {
    true
}

fn default_image_size() -> String {
    ImageSize::default().to_string()
}

fn default_catalog_url() -> String {
    DEFAULT_CATALOG_URL.to_string()
}

fn default_request_timeout() -> u64 {
    10
}

impl Default for Config {
    fn default() -> Self {
        Self {
            show_image: default_show_image(),
            image_size: default_image_size(),
            cache_dir: None,
            catalog_url: default_catalog_url(),
            request_timeout_secs: default_request_timeout(),
        }
    }
}

impl Config {
    /// Get the default config file path
    pub fn default_path() -> Result<PathBuf> {
        paths::config_path()
    }

    /// Load config from the default path or create default
    pub fn load() -> Result<Self> {
        let path = Self::default_path()?;
        Self::load_from(&path)
    }

    /// Load config from a specific path
    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path).context("Failed to read config file")?;
            toml::from_str(&content).context("Failed to parse config file")
        } else {
            Ok(Self::default())
        }
    }

    /// Resolve the cache directory
    pub fn cache_dir(&self) -> Result<PathBuf> {
        match &self.cache_dir {
            Some(dir) => Ok(dir.clone()),
            None => paths::default_cache_dir(),
        }
    }

    /// Request timeout, never zero
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs.max(1))
    }

    /// Parsed fallback image size
    pub fn image_size(&self) -> ImageSize {
        ImageSize::parse_or_default(&self.image_size)
    }
}

/// Viewer size in terminal cells
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImageSize {
    /// Columns
    pub width: u16,
    /// Rows
    pub height: u16,
}

impl Default for ImageSize {
    fn default() -> Self {
        Self {
            width: 40,
            height: 20,
        }
    }
}

impl ImageSize {
    /// Parse a `WxH` string like `40x20`
    pub fn parse(input: &str) -> Option<Self> {
        let (width, height) = input.trim().split_once(['x', 'X'])?;
        let width: u16 = width.trim().parse().ok()?;
        let height: u16 = height.trim().parse().ok()?;
        (width > 0 && height > 0).then_some(Self { width, height })
    }

    /// Parse a `WxH` string, warning and falling back to the default
    pub fn parse_or_default(input: &str) -> Self {
        Self::parse(input).unwrap_or_else(|| {
            tracing::warn!("Invalid image size {input:?}, using {}", Self::default());
            Self::default()
        })
    }
}

impl std::fmt::Display for ImageSize {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// Process environment relevant to anifetch, captured once at startup
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Environment {
    /// GitHub token (`GITHUB_TOKEN`)
    pub github_token: Option<String>,
    /// Login name (`USER`)
    pub user: Option<String>,
    /// Login shell (`SHELL`)
    pub shell: Option<String>,
    /// Terminal type (`TERM`)
    pub term: Option<String>,
    /// Terminal emulator (`TERM_PROGRAM`)
    pub term_program: Option<String>,
    /// Directories searched for external programs (`PATH`)
    pub search_path: Vec<PathBuf>,
}

impl Environment {
    /// Read the variables from the process environment
    pub fn from_env() -> Self {
        let var = |name: &str| std::env::var(name).ok().filter(|v| !v.is_empty());
        Self {
            github_token: var("GITHUB_TOKEN"),
            user: var("USER"),
            shell: var("SHELL"),
            term: var("TERM"),
            term_program: var("TERM_PROGRAM"),
            search_path: std::env::var_os("PATH")
                .map(|path| std::env::split_paths(&path).collect())
                .unwrap_or_default(),
        }
    }

    /// GitHub API requests per hour available with this environment
    pub const fn rate_limit_per_hour(&self) -> u32 {
        if self.github_token.is_some() { 5000 } else { 60 }
    }

    /// Whether the terminal understands the iTerm2 inline image protocol
    pub fn supports_inline_images(&self) -> bool {
        matches!(
            self.term_program.as_deref(),
            Some("iTerm.app" | "WezTerm")
        )
    }

    /// Locate an executable in the search path
    pub fn find_program(&self, program: &str) -> Option<PathBuf> {
        self.search_path
            .iter()
            .map(|dir| dir.join(program))
            .find(|candidate| candidate.is_file())
    }
}
