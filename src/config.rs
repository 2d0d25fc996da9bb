//! Engine configuration and the process-wide shared snapshot.

use crate::error::{Error, Result};
use std::sync::{Arc, RwLock};

/// Immutable, strictly-validated engine configuration.
///
/// Constructed once at startup, then held for the process lifetime inside
/// [`SharedConfig`]. Only the recognized options are accepted; unknown keys
/// fail construction with [`Error::UnrecognizedOption`].
///
/// # Example
///
/// ```
/// use webcache_kit::Config;
///
/// let config = Config::default().with_master_salt("v2");
/// assert_eq!(config.master_salt, "v2");
///
/// let parsed = Config::from_options([
///     ("master_salt", "v2"),
///     ("x_cache_header_name", "X-Proxy-Cache"),
/// ])
/// .unwrap();
/// assert_eq!(parsed.x_cache_header_name, "X-Proxy-Cache");
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Config {
    /// Global invalidation epoch, mixed into every fingerprint.
    ///
    /// Changing it makes every subsequent lookup for every resource miss,
    /// with no store traversal or deletion.
    pub master_salt: String,

    /// Name of the header consulted for freshness directives.
    pub cache_control_header_name: String,

    /// Name of the diagnostic header reporting `hit` / `miss`.
    pub x_cache_header_name: String,

    /// Default-policy cachability for query-less requests carrying no
    /// explicit freshness information.
    pub default_cacheable_without_query: bool,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            master_salt: String::new(),
            cache_control_header_name: "Cache-Control".to_string(),
            x_cache_header_name: "X-Cache".to_string(),
            default_cacheable_without_query: true,
        }
    }
}

impl Config {
    /// Build a configuration from named string options.
    ///
    /// Unspecified options keep their defaults.
    ///
    /// # Errors
    ///
    /// - [`Error::UnrecognizedOption`] for any key outside the recognized set
    /// - [`Error::ConfigError`] for a malformed value (non-boolean flag,
    ///   empty header name)
    pub fn from_options<I, K, V>(options: I) -> Result<Self>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut config = Config::default();

        for (key, value) in options {
            let value = value.as_ref();
            match key.as_ref() {
                "master_salt" => config.master_salt = value.to_string(),
                "cache_control_header_name" => {
                    config.cache_control_header_name = non_empty_header(value)?;
                }
                "x_cache_header_name" => {
                    config.x_cache_header_name = non_empty_header(value)?;
                }
                "default_cacheable_without_query" => {
                    config.default_cacheable_without_query = parse_bool(value)?;
                }
                other => return Err(Error::UnrecognizedOption(other.to_string())),
            }
        }

        Ok(config)
    }

    /// Set the global invalidation salt.
    pub fn with_master_salt(mut self, salt: impl Into<String>) -> Self {
        self.master_salt = salt.into();
        self
    }

    /// Set the diagnostic header name.
    pub fn with_x_cache_header_name(mut self, name: impl Into<String>) -> Self {
        self.x_cache_header_name = name.into();
        self
    }

    /// Set the default-policy cachability of query-less requests.
    pub fn with_default_cacheable_without_query(mut self, cacheable: bool) -> Self {
        self.default_cacheable_without_query = cacheable;
        self
    }
}

fn non_empty_header(value: &str) -> Result<String> {
    if value.trim().is_empty() {
        return Err(Error::ConfigError("header name must not be empty".to_string()));
    }
    Ok(value.to_string())
}

fn parse_bool(value: &str) -> Result<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Ok(true),
        "false" | "0" | "no" | "off" => Ok(false),
        other => Err(Error::ConfigError(format!(
            "expected a boolean, got {:?}",
            other
        ))),
    }
}

/// Process-wide, read-mostly shared configuration with atomic swap.
///
/// Lookups read the configuration live, so swapping in a new `master_salt`
/// is the global invalidation lever: every key derived afterwards differs
/// from every key derived before.
///
/// `Clone` is cheap (an `Arc` increment); all clones observe the same
/// snapshot.
///
/// # Example
///
/// ```
/// use webcache_kit::{Config, SharedConfig};
///
/// let shared = SharedConfig::new(Config::default());
/// let snapshot = shared.load();
/// assert_eq!(snapshot.master_salt, "");
///
/// shared.rotate_master_salt("deploy-42");
/// assert_eq!(shared.load().master_salt, "deploy-42");
/// ```
#[derive(Clone)]
pub struct SharedConfig {
    inner: Arc<RwLock<Arc<Config>>>,
}

impl SharedConfig {
    /// Wrap a configuration for process-wide sharing.
    pub fn new(config: Config) -> Self {
        SharedConfig {
            inner: Arc::new(RwLock::new(Arc::new(config))),
        }
    }

    /// Take a snapshot of the current configuration.
    ///
    /// The snapshot is immutable; a concurrent [`store`](Self::store) does
    /// not affect snapshots already taken.
    pub fn load(&self) -> Arc<Config> {
        self.inner
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    /// Atomically replace the configuration.
    pub fn store(&self, config: Config) {
        let mut guard = self
            .inner
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        *guard = Arc::new(config);
    }

    /// Replace only the master salt, keeping every other option.
    ///
    /// This is the hot global-invalidation lever.
    pub fn rotate_master_salt(&self, salt: impl Into<String>) {
        let salt = salt.into();
        let current = self.load();
        info!("Rotating master salt; all cached lookups will now miss");
        self.store(Config {
            master_salt: salt,
            ..(*current).clone()
        });
    }
}

impl Default for SharedConfig {
    fn default() -> Self {
        SharedConfig::new(Config::default())
    }
}
