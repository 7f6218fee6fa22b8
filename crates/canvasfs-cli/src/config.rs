//! Settings: TOML file, then environment, then command-line flags.

use anyhow::{Context, Result, bail};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

use canvasfs_canvas::{CanvasConfig, DEFAULT_API_URL};

const DEFAULT_TOKEN_FILE: &str = "token.txt";
const DEFAULT_TIMEOUT_SECS: u64 = 30;
const DEFAULT_PER_PAGE: u32 = 100;

/// Contents of `config.toml`. Every key is optional.
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FileConfig {
    pub api_url: Option<String>,
    pub token: Option<String>,
    pub token_file: Option<String>,
    pub timeout_secs: Option<u64>,
    pub per_page: Option<u32>,
}

impl FileConfig {
    pub fn parse(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }
}

/// `CANVAS_API_URL` / `CANVAS_TOKEN`.
#[derive(Debug, Default, Clone)]
pub struct Environment {
    pub api_url: Option<String>,
    pub token: Option<String>,
}

impl Environment {
    pub fn from_process() -> Self {
        let var = |name: &str| std::env::var(name).ok().filter(|v| !v.is_empty());
        Self {
            api_url: var("CANVAS_API_URL"),
            token: var("CANVAS_TOKEN"),
        }
    }
}

/// Values given on the command line.
#[derive(Debug, Default, Clone)]
pub struct Overrides {
    pub config: Option<PathBuf>,
    pub api_url: Option<String>,
    pub token_file: Option<String>,
}

/// Fully resolved connection settings.
#[derive(Clone)]
pub struct Settings {
    pub api_url: String,
    pub token: String,
    pub timeout: Duration,
    pub per_page: u32,
}

impl std::fmt::Debug for Settings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Settings")
            .field("api_url", &self.api_url)
            .field("timeout", &self.timeout)
            .field("per_page", &self.per_page)
            .finish_non_exhaustive()
    }
}

impl Settings {
    pub fn canvas_config(&self) -> CanvasConfig {
        CanvasConfig {
            api_url: self.api_url.clone(),
            token: self.token.clone(),
            timeout: self.timeout,
            per_page: self.per_page,
        }
    }
}

/// `$XDG_CONFIG_HOME/canvasfs/config.toml` (or the platform equivalent).
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("canvasfs").join("config.toml"))
}

/// Resolve settings.
///
/// An explicit `--config` must exist; the default location is optional.
pub fn load(overrides: &Overrides, env: &Environment) -> Result<Settings> {
    let file = match &overrides.config {
        Some(path) => read_config(path)?,
        None => match default_config_path() {
            Some(path) if path.exists() => read_config(&path)?,
            _ => FileConfig::default(),
        },
    };
    resolve(file, overrides, env)
}

fn read_config(path: &Path) -> Result<FileConfig> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read config {}", path.display()))?;
    let config = FileConfig::parse(&text)
        .with_context(|| format!("failed to parse config {}", path.display()))?;
    tracing::debug!(path = %path.display(), "loaded config");
    Ok(config)
}

fn resolve(file: FileConfig, overrides: &Overrides, env: &Environment) -> Result<Settings> {
    let api_url = overrides
        .api_url
        .clone()
        .or_else(|| env.api_url.clone())
        .or(file.api_url)
        .unwrap_or_else(|| DEFAULT_API_URL.to_string());

    let token = if let Some(token_file) = &overrides.token_file {
        read_token(token_file)?
    } else if let Some(token) = env.token.clone().or(file.token) {
        token
    } else {
        let token_file = file.token_file.as_deref().unwrap_or(DEFAULT_TOKEN_FILE);
        read_token(token_file)?
    };

    let per_page = file.per_page.unwrap_or(DEFAULT_PER_PAGE);
    if per_page == 0 {
        bail!("per_page must be at least 1");
    }

    Ok(Settings {
        api_url,
        token,
        timeout: Duration::from_secs(file.timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS)),
        per_page,
    })
}

fn read_token(file: &str) -> Result<String> {
    let path: PathBuf = shellexpand::tilde(file).as_ref().into();
    let token = std::fs::read_to_string(&path)
        .with_context(|| format!("failed to read token file {}", path.display()))?;
    let token = token.trim();
    if token.is_empty() {
        bail!("token file {} is empty", path.display());
    }
    Ok(token.to_string())
}
