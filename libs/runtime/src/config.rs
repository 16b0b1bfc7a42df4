use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// In-memory SQLite DSN used by `--mock`.
pub const MOCK_DATABASE_URL: &str = "sqlite::memory:";

/// Main application configuration with strongly-typed global sections
/// and a flexible per-module configuration bag.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct AppConfig {
    /// Core server configuration.
    pub server: ServerConfig,
    /// Database configuration (optional).
    pub database: Option<DatabaseConfig>,
    /// Logging configuration (optional, uses defaults if None).
    pub logging: Option<LoggingConfig>,
    /// Directory containing per-module YAML files (optional).
    #[serde(default)]
    pub modules_dir: Option<String>,
    /// Per-module configuration bag: module_name → arbitrary JSON/YAML value.
    #[serde(default)]
    pub modules: HashMap<String, serde_json::Value>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ServerConfig {
    /// Base directory for relative log and database paths.
    /// Empty means the current working directory; `~` expands to $HOME.
    #[serde(default)]
    pub home_dir: String,
    pub host: String,
    pub port: u16,
    #[serde(default)]
    pub timeout_sec: u64,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct DatabaseConfig {
    /// Database connection URL (e.g., "sqlite://database/users.db?mode=rwc").
    pub url: String,
    /// Maximum number of connections in the pool (optional, defaults to 10).
    pub max_conns: Option<u32>,
    /// SQLite busy timeout in milliseconds (optional, defaults to 5000).
    pub busy_timeout_ms: Option<u32>,
}

/// Logging configuration - maps subsystem names to their logging settings.
/// Key "default" is the catch-all for logs that don't match explicit subsystems.
pub type LoggingConfig = HashMap<String, Section>;

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Section {
    pub console_level: String, // "info", "debug", "error", "off"
    pub file: String,          // "logs/users.log", empty disables the file
    #[serde(default)]
    pub file_level: String,
    #[serde(default)]
    pub max_backups: Option<usize>, // rotated files kept next to the live one
    #[serde(default)]
    pub max_size_mb: Option<u64>, // rotate once the live file passes this size
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            home_dir: String::new(),
            host: "127.0.0.1".to_string(),
            port: 8087,
            timeout_sec: 0,
        }
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: "sqlite://database/users.db?mode=rwc".to_string(),
            max_conns: Some(10),
            busy_timeout_ms: Some(5000),
        }
    }
}

/// Create a default logging configuration.
pub fn default_logging_config() -> LoggingConfig {
    let mut logging = HashMap::new();
    logging.insert(
        "default".to_string(),
        Section {
            console_level: "info".to_string(),
            file: "logs/user-management.log".to_string(),
            file_level: "debug".to_string(),
            max_backups: Some(3),
            max_size_mb: Some(100),
        },
    );
    logging
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            database: Some(DatabaseConfig::default()),
            logging: Some(default_logging_config()),
            modules_dir: None,
            modules: HashMap::new(),
        }
    }
}

impl AppConfig {
    /// Load configuration with layered loading: defaults → YAML file → environment variables.
    /// Also normalizes `server.home_dir` into an absolute path and creates the directory.
    pub fn load_layered<P: AsRef<Path>>(config_path: P) -> Result<Self> {
        use figment::{
            providers::{Env, Format, Serialized, Yaml},
            Figment,
        };

        let path = config_path.as_ref();
        if !path.exists() {
            return Err(anyhow!("Config file not found: {}", path.display()));
        }

        // Optional sections stay None unless YAML/ENV provide them.
        let base = AppConfig {
            server: ServerConfig::default(),
            database: None,
            logging: None,
            modules_dir: None,
            modules: HashMap::new(),
        };

        let figment = Figment::new()
            .merge(Serialized::defaults(base))
            .merge(Yaml::file(path))
            // APP__SERVER__PORT=8087 maps to server.port
            .merge(Env::prefixed("APP__").split("__"));

        let mut config: AppConfig = figment
            .extract()
            .with_context(|| format!("Failed to load config from {}", path.display()))?;

        normalize_home_dir_inplace(&mut config.server)
            .context("Failed to resolve server.home_dir")?;

        if let Some(dir) = config.modules_dir.clone() {
            let dir = resolve_relative(&dir, Path::new(&config.server.home_dir))?;
            merge_module_files(&mut config.modules, dir)?;
        }

        Ok(config)
    }

    /// Load configuration from file or fall back to defaults.
    pub fn load_or_default<P: AsRef<Path>>(config_path: Option<P>) -> Result<Self> {
        match config_path {
            Some(path) => Self::load_layered(path),
            None => {
                let mut c = Self::default();
                normalize_home_dir_inplace(&mut c.server)
                    .context("Failed to resolve server.home_dir (defaults)")?;
                Ok(c)
            }
        }
    }

    /// Serialize configuration to YAML.
    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml::to_string(self).context("Failed to serialize config to YAML")
    }

    /// Raw config section of one module, if present.
    pub fn module_config(&self, module_name: &str) -> Option<&serde_json::Value> {
        self.modules.get(module_name)
    }

    /// Apply overrides from command line arguments.
    pub fn apply_cli_overrides(&mut self, args: &CliArgs) {
        if let Some(port) = args.port {
            self.server.port = port;
        }

        if args.mock {
            // A single connection keeps every query on the same memory database
            self.database = Some(DatabaseConfig {
                url: MOCK_DATABASE_URL.to_string(),
                max_conns: Some(1),
                busy_timeout_ms: None,
            });
        }

        let logging = self.logging.get_or_insert_with(default_logging_config);
        if let Some(default_section) = logging.get_mut("default") {
            default_section.console_level = match args.verbose {
                0 => default_section.console_level.clone(),
                1 => "debug".to_string(),
                _ => "trace".to_string(),
            };
        }
    }
}

impl DatabaseConfig {
    /// Connection URL with relative SQLite paths anchored at `base_dir`.
    ///
    /// In-memory and non-SQLite URLs pass through unchanged. With
    /// `create_dirs`, the parent directory of the database file is created.
    pub fn resolved_url(&self, base_dir: &Path, create_dirs: bool) -> Result<String> {
        let dsn = self.url.trim();
        if dsn.is_empty() {
            return Err(anyhow!("Database URL not configured"));
        }
        if is_memory_sqlite(dsn) {
            return Ok(MOCK_DATABASE_URL.to_string());
        }
        let Some(rest) = dsn.strip_prefix("sqlite://") else {
            return Ok(dsn.to_string());
        };

        let (path_str, query) = match rest.split_once('?') {
            Some((p, q)) => (p, Some(q)),
            None => (rest, None),
        };
        if path_str.is_empty() {
            return Err(anyhow!("Empty SQLite path in DSN '{}'", dsn));
        }

        let mut p = PathBuf::from(path_str);
        if p.is_relative() {
            p = base_dir.join(p);
        }
        if create_dirs {
            if let Some(dir) = p.parent() {
                std::fs::create_dir_all(dir)
                    .with_context(|| format!("Failed to create {}", dir.display()))?;
            }
        }

        let mut out = String::from("sqlite://");
        out.push_str(&p.to_string_lossy().replace('\\', "/"));
        if let Some(q) = query {
            out.push('?');
            out.push_str(q);
        }
        Ok(out)
    }
}

fn is_memory_sqlite(dsn: &str) -> bool {
    dsn.eq_ignore_ascii_case("sqlite::memory:")
        || dsn.eq_ignore_ascii_case("sqlite://:memory:")
        || dsn.eq_ignore_ascii_case("sqlite:memory:")
}

/// Command line arguments structure.
#[derive(Debug, Clone, Default)]
pub struct CliArgs {
    pub config: Option<String>,
    pub port: Option<u16>,
    pub print_config: bool,
    pub verbose: u8,
    pub mock: bool,
}

/// Resolve `server.home_dir` to an absolute directory and create it.
fn normalize_home_dir_inplace(server: &mut ServerConfig) -> Result<()> {
    let cwd = std::env::current_dir().context("current directory is not accessible")?;
    let resolved = if server.home_dir.trim().is_empty() {
        cwd
    } else {
        resolve_relative(server.home_dir.trim(), &cwd)?
    };

    std::fs::create_dir_all(&resolved)
        .with_context(|| format!("Failed to create home_dir {}", resolved.display()))?;
    server.home_dir = resolved.to_string_lossy().to_string();
    Ok(())
}

/// Expand a leading `~` and anchor relative paths at `base`.
fn resolve_relative(raw: &str, base: &Path) -> Result<PathBuf> {
    if raw == "~" || raw.starts_with("~/") || raw.starts_with("~\\") {
        let home = std::env::var_os("HOME")
            .or_else(|| std::env::var_os("USERPROFILE"))
            .ok_or_else(|| anyhow!("cannot expand '~': HOME is not set"))?;
        let tail = raw[1..].trim_start_matches(['/', '\\']);
        return Ok(PathBuf::from(home).join(tail));
    }

    let p = PathBuf::from(raw);
    Ok(if p.is_absolute() { p } else { base.join(p) })
}

fn merge_module_files(
    bag: &mut HashMap<String, serde_json::Value>,
    dir: impl AsRef<Path>,
) -> Result<()> {
    use std::fs;
    let dir = dir.as_ref();
    if !dir.exists() {
        return Ok(());
    }
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if !path.is_file() {
            continue;
        }
        let ext = path
            .extension()
            .and_then(|s| s.to_str())
            .unwrap_or("")
            .to_ascii_lowercase();
        if ext != "yml" && ext != "yaml" {
            continue;
        }
        let Some(name) = path.file_stem().and_then(|s| s.to_str()) else {
            continue;
        };
        let raw = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read module config {}", path.display()))?;
        let val: serde_yaml::Value = serde_yaml::from_str(&raw)
            .with_context(|| format!("Invalid YAML in {}", path.display()))?;
        // Files in modules_dir win over inline sections with the same name
        bag.insert(name.to_string(), serde_json::to_value(val)?);
    }
    Ok(())
}
