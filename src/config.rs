//! Site configuration.
//!
//! Two sources, both read once at startup:
//!
//! - **`config.toml`** in the project root (optional): listen address and the
//!   directory layout. Sparse files are merged over the stock defaults and
//!   unknown keys are rejected to catch typos early.
//! - **The process environment**, captured into a [`RuntimeEnv`]: development
//!   mode and the contact-form public key.
//!
//! ```toml
//! [server]
//! address = "127.0.0.1:5000"
//!
//! [paths]
//! static_dir = "static"        # stylesheet, js/, photos/<variant>/
//! templates_dir = "site_src"   # index.html, view/index.html
//! output_dir = "docs"          # static build target, wiped on every build
//! stylesheet = "default.css"   # file name inside static_dir
//! ```
//!
//! Relative paths are resolved against the project root.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::ffi::OsString;
use std::fs;
use std::path::{Component, Path, PathBuf};
use thiserror::Error;

/// Set to `development` to enable the debug page and 404 logging.
pub const DEV_MODE_VAR: &str = "GALLERY_ENV";
/// Web3Forms public access key embedded in the contact form.
pub const CONTACT_KEY_VAR: &str = "WEB3FORMS_KEY";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SiteConfig {
    pub server: ServerConfig,
    pub paths: PathsConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ServerConfig {
    /// Socket address the live server binds to.
    pub address: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            address: "127.0.0.1:5000".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PathsConfig {
    pub static_dir: PathBuf,
    pub templates_dir: PathBuf,
    pub output_dir: PathBuf,
    pub stylesheet: String,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            static_dir: PathBuf::from("static"),
            templates_dir: PathBuf::from("site_src"),
            output_dir: PathBuf::from("docs"),
            stylesheet: "default.css".to_string(),
        }
    }
}

/// Directory layout with every path resolved against the project root.
#[derive(Debug, Clone, PartialEq)]
pub struct SitePaths {
    pub static_dir: PathBuf,
    pub templates_dir: PathBuf,
    pub output_dir: PathBuf,
    pub stylesheet: String,
}

impl SitePaths {
    pub fn photos_dir(&self) -> PathBuf {
        self.static_dir.join("photos")
    }

    pub fn scripts_dir(&self) -> PathBuf {
        self.static_dir.join("js")
    }

    pub fn stylesheet_path(&self) -> PathBuf {
        self.static_dir.join(&self.stylesheet)
    }

    /// The build deletes `output_dir` first, so it must not hold any input,
    /// and it copies the photo and script folders into it, so it must not
    /// sit inside either of them.
    ///
    /// Paths are compared after resolving `..` and symlinks.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let output = real_path(&self.output_dir)?;
        for (name, input) in [
            ("static_dir", &self.static_dir),
            ("templates_dir", &self.templates_dir),
        ] {
            if real_path(input)?.starts_with(&output) {
                return Err(ConfigError::Validation(format!(
                    "paths.output_dir ({}) must not contain paths.{name} ({})",
                    self.output_dir.display(),
                    input.display()
                )));
            }
        }
        for source in [self.photos_dir(), self.scripts_dir()] {
            if output.starts_with(real_path(&source)?) {
                return Err(ConfigError::Validation(format!(
                    "paths.output_dir ({}) must not be inside {}",
                    self.output_dir.display(),
                    source.display()
                )));
            }
        }
        Ok(())
    }
}

/// Absolute form of `path` with symlinks resolved for the part that exists
/// and `.`/`..` folded lexically for the part that does not.
fn real_path(path: &Path) -> std::io::Result<PathBuf> {
    let mut resolved = if path.is_absolute() {
        PathBuf::new()
    } else {
        fs::canonicalize(std::env::current_dir()?)?
    };
    for component in path.components() {
        match component {
            Component::Prefix(_) | Component::RootDir => resolved.push(component),
            Component::CurDir => {}
            Component::ParentDir => {
                resolved.pop();
            }
            Component::Normal(name) => {
                resolved.push(name);
                if let Ok(real) = fs::canonicalize(&resolved) {
                    resolved = real;
                }
            }
        }
    }
    Ok(resolved)
}

impl SiteConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.server.address.trim().is_empty() {
            return Err(ConfigError::Validation(
                "server.address must not be empty".into(),
            ));
        }
        if self.paths.output_dir.as_os_str().is_empty() {
            return Err(ConfigError::Validation(
                "paths.output_dir must not be empty".into(),
            ));
        }
        let mut components = Path::new(&self.paths.stylesheet).components();
        let plain_name = matches!(components.next(), Some(Component::Normal(_)))
            && components.next().is_none();
        if !plain_name {
            return Err(ConfigError::Validation(
                "paths.stylesheet must be a plain file name".into(),
            ));
        }
        Ok(())
    }

    pub fn resolve_paths(&self, root: &Path) -> SitePaths {
        SitePaths {
            static_dir: root.join(&self.paths.static_dir),
            templates_dir: root.join(&self.paths.templates_dir),
            output_dir: root.join(&self.paths.output_dir),
            stylesheet: self.paths.stylesheet.clone(),
        }
    }
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

pub fn stock_defaults_value() -> toml::Value {
    toml::Value::try_from(SiteConfig::default()).expect("default config must serialize")
}

/// Recursively merge `overlay` on top of `base`.
///
/// Tables merge key by key; any other overlay value replaces the base value.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_toml(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// `Ok(None)` when the directory has no `config.toml`.
pub fn load_raw_config(dir: &Path) -> Result<Option<toml::Value>, ConfigError> {
    let config_path = dir.join("config.toml");
    if !config_path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(&config_path)?;
    let value: toml::Value = toml::from_str(&content)?;
    Ok(Some(value))
}

/// Load `config.toml` from the project root over the stock defaults.
pub fn load_config(root: &Path) -> Result<SiteConfig, ConfigError> {
    let merged = match load_raw_config(root)? {
        Some(overlay) => merge_toml(stock_defaults_value(), overlay),
        None => stock_defaults_value(),
    };
    let config: SiteConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

pub fn stock_config_toml() -> &'static str {
    r##"# Gallery site configuration
# ==========================
# Every key is optional; the values below are the defaults.

[server]
# Address the live server (`gallery-site serve`) listens on.
address = "127.0.0.1:5000"

[paths]
# Static assets: the stylesheet, js/ and photos/<variant>/ folders.
# Variants are desktop, mobile and portfolio.
static_dir = "static"

# HTML templates for the static build: index.html and view/index.html.
# index.html may contain {{MOBILE_GALLERY}} and {{WEB3FORMS_KEY}}.
templates_dir = "site_src"

# Static build output. Deleted and recreated on every build.
output_dir = "docs"

# Stylesheet file name inside static_dir.
stylesheet = "default.css"

# Environment variables (not configurable here):
#   GALLERY_ENV=development   enables /debug and logs unmatched routes
#   WEB3FORMS_KEY=...         contact form public key
#   RUST_LOG=debug            log verbosity
"##
}

// =============================================================================
// Process environment
// =============================================================================

/// Snapshot of the process environment taken once at startup.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RuntimeEnv {
    pub development: bool,
    pub contact_key: Option<String>,
    /// Full environment, kept only in development mode for `/debug`.
    pub vars: BTreeMap<String, String>,
}

impl RuntimeEnv {
    pub fn from_process() -> Self {
        Self::from_os_vars(std::env::vars_os())
    }

    /// Like [`RuntimeEnv::from_vars`], skipping pairs that are not UTF-8.
    pub fn from_os_vars<I>(vars: I) -> Self
    where
        I: IntoIterator<Item = (OsString, OsString)>,
    {
        Self::from_vars(vars.into_iter().filter_map(|(key, value)| {
            Some((key.into_string().ok()?, value.into_string().ok()?))
        }))
    }

    pub fn from_vars<I, K, V>(vars: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let vars: BTreeMap<String, String> = vars
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        let development = vars.get(DEV_MODE_VAR).map(String::as_str) == Some("development");
        let contact_key = vars
            .get(CONTACT_KEY_VAR)
            .filter(|key| !key.is_empty())
            .cloned();
        Self {
            development,
            contact_key,
            vars: if development { vars } else { BTreeMap::new() },
        }
    }
}
