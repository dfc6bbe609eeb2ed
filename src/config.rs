use crate::database::{ConnectionParams, EntityCounts, FoodshareDatabase, SchemaStatus, SCHEMA_VERSION};
use anyhow::{anyhow, Result};
use config::Config;
use serde::Serialize;
use std::collections::HashMap;
use std::path::Path;
use std::time::Duration;

pub struct FoodshareConfig {
    /// Path to the directory holding the foodshare database
    pub data_dir: String,

    /// Database file name without extension
    pub database_name: String,

    /// How long dashboard filter options are reused, in seconds (default: 1 hour)
    pub filter_cache_ttl_secs: u64,
}

const DEFAULT_DATABASE_NAME: &str = "foodshare";
const DEFAULT_FILTER_CACHE_TTL_SECS: u64 = 3600;

const EMPTY_CONFIG: &str = r#"### foodshare configuration file

### directory holding the foodshare database
# data_dir = "~/.foodshare"

### database file name, stored as {data_dir}/{database_name}.sqlite3
# database_name = "foodshare"

### how long dashboard filter options are cached (in seconds)
# filter_cache_ttl_secs = 3600      # 1 hour
"#;

fn home_dir_string() -> Result<String> {
    dirs::home_dir()
        .ok_or_else(|| anyhow!("Could not find home directory"))?
        .to_str()
        .ok_or_else(|| anyhow!("Could not convert home directory path to string"))
        .map(str::to_owned)
}

impl Default for FoodshareConfig {
    fn default() -> Self {
        let home_dir = dirs::home_dir()
            .map(|h| h.to_string_lossy().to_string())
            .unwrap_or_else(|| ".".to_string());

        Self {
            data_dir: format!("{}/.foodshare", home_dir),
            database_name: DEFAULT_DATABASE_NAME.to_string(),
            filter_cache_ttl_secs: DEFAULT_FILTER_CACHE_TTL_SECS,
        }
    }
}

impl FoodshareConfig {
    /// Load configuration from a TOML file and `FOODSHARE_*` environment variables
    ///
    /// Without an explicit path, `$HOME/.foodshare/foodshare.toml` is used. A
    /// missing file is created from a commented template.
    pub fn new(path: &Option<String>) -> Result<FoodshareConfig> {
        let mut builder = Config::builder();

        let home_dir = home_dir_string()?;
        let foodshare_dir = format!("{}/.foodshare", home_dir);

        match path {
            Some(p) => {
                let path = Path::new(p.as_str());
                if path.exists() {
                    let path_str = path
                        .to_str()
                        .ok_or_else(|| anyhow!("Could not convert path to string"))?;
                    builder = builder.add_source(config::File::with_name(path_str));
                } else {
                    std::fs::write(p.as_str(), EMPTY_CONFIG)
                        .map_err(|e| anyhow!("Unable to create config file: {}", e))?;
                }
            }
            None => {
                std::fs::create_dir_all(foodshare_dir.as_str())
                    .map_err(|e| anyhow!("Unable to create foodshare directory: {}", e))?;
                let p = format!("{}/foodshare.toml", foodshare_dir);
                if Path::new(p.as_str()).exists() {
                    builder = builder.add_source(config::File::with_name(p.as_str()));
                } else {
                    std::fs::write(p.as_str(), EMPTY_CONFIG).map_err(|e| {
                        anyhow!("Unable to create config file {}: {}", p.as_str(), e)
                    })?;
                }
            }
        }

        // E.g., `FOODSHARE_DATABASE_NAME=demo foodshare food list`
        builder = builder.add_source(config::Environment::with_prefix("FOODSHARE"));

        let settings = builder
            .build()
            .map_err(|e| anyhow!("Failed to build configuration: {}", e))?;

        let config = settings
            .try_deserialize::<HashMap<String, String>>()
            .map_err(|e| anyhow!("Failed to deserialize configuration: {}", e))?;

        Self::from_settings(&config, &home_dir)
    }

    fn from_settings(config: &HashMap<String, String>, home_dir: &str) -> Result<FoodshareConfig> {
        let data_dir = match config.get("data_dir") {
            Some(p) => expand_home(p, home_dir),
            None => format!("{}/.foodshare", home_dir),
        };
        std::fs::create_dir_all(data_dir.as_str())
            .map_err(|e| anyhow!("Unable to create data directory {}: {}", data_dir, e))?;

        let database_name = match config.get("database_name").map(|s| s.trim()) {
            Some(name) if !name.is_empty() => name.to_string(),
            _ => DEFAULT_DATABASE_NAME.to_string(),
        };

        let filter_cache_ttl_secs = match config.get("filter_cache_ttl_secs") {
            Some(s) => s
                .parse()
                .map_err(|_| anyhow!("filter_cache_ttl_secs must be a number of seconds: {}", s))?,
            None => DEFAULT_FILTER_CACHE_TTL_SECS,
        };

        Ok(FoodshareConfig {
            data_dir,
            database_name,
            filter_cache_ttl_secs,
        })
    }

    /// Get the path to the SQLite database file
    pub fn sqlite_path(&self) -> String {
        self.connection_params().path
    }

    /// Connection parameters for the configured database
    pub fn connection_params(&self) -> ConnectionParams {
        ConnectionParams::in_dir(&self.data_dir, &self.database_name)
    }

    pub fn filter_cache_ttl(&self) -> Duration {
        Duration::from_secs(self.filter_cache_ttl_secs)
    }

    /// Display configuration summary
    pub fn summary(&self) -> String {
        [
            format!("Data Directory:     {}", self.data_dir),
            format!("Database Name:      {}", self.database_name),
            format!("SQLite Path:        {}", self.sqlite_path()),
            format!("Filter Cache TTL:   {} seconds", self.filter_cache_ttl_secs),
        ]
        .join("\n")
    }

    /// Get the default config file path
    pub fn config_file_path() -> String {
        let home_dir = dirs::home_dir()
            .map(|h| h.to_string_lossy().to_string())
            .unwrap_or_else(|| "~".to_string());
        format!("{}/.foodshare/foodshare.toml", home_dir)
    }
}

fn expand_home(path: &str, home_dir: &str) -> String {
    match path.strip_prefix('~') {
        Some(rest) => format!("{}{}", home_dir, rest),
        None => path.to_string(),
    }
}

// =============================================================================
// Database status (shared by the config and db commands)
// =============================================================================

/// Information about the SQLite database file
#[derive(Debug, Serialize, Clone)]
pub struct DatabaseInfo {
    pub path: String,
    pub exists: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size_bytes: Option<u64>,
    pub schema: String,
    pub schema_initialized: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub schema_version: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub counts: Option<EntityCounts>,
}

/// Inspect the configured database; a missing file is reported, not created
pub fn get_database_info(config: &FoodshareConfig) -> DatabaseInfo {
    let sqlite_path = config.sqlite_path();
    let exists = Path::new(&sqlite_path).exists();
    let size_bytes = if exists {
        std::fs::metadata(&sqlite_path).ok().map(|m| m.len())
    } else {
        None
    };

    let status = if exists {
        FoodshareDatabase::open(config.connection_params())
            .and_then(|db| Ok((db.schema_status()?, db)))
            .ok()
    } else {
        None
    };

    let (schema, schema_initialized, schema_version, counts) = match status {
        Some((status, db)) => {
            let (initialized, version) = match &status {
                SchemaStatus::Current => (true, Some(SCHEMA_VERSION)),
                SchemaStatus::NeedsMigration { from, .. } => (true, Some(*from)),
                SchemaStatus::Incompatible {
                    database_version, ..
                } => (true, Some(*database_version)),
                SchemaStatus::NotInitialized | SchemaStatus::Corrupted => (false, None),
            };
            let counts = if status == SchemaStatus::Current {
                db.counts().ok()
            } else {
                None
            };
            (status.to_string(), initialized, version, counts)
        }
        None => ("not created".to_string(), false, None, None),
    };

    DatabaseInfo {
        path: sqlite_path,
        exists,
        size_bytes,
        schema,
        schema_initialized,
        schema_version,
        counts,
    }
}

/// Format bytes as human-readable size
pub fn format_size(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;

    if bytes >= GB {
        format!("{:.2} GB", bytes as f64 / GB as f64)
    } else if bytes >= MB {
        format!("{:.2} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.2} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} B", bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_default_config() {
        let config = FoodshareConfig::default();
        assert_eq!(config.database_name, "foodshare");
        assert_eq!(config.filter_cache_ttl_secs, 3600);
        assert!(config.data_dir.ends_with("/.foodshare"));
    }

    #[test]
    fn test_paths() {
        let config = FoodshareConfig {
            data_dir: "/test/dir/".to_string(),
            database_name: "demo".to_string(),
            filter_cache_ttl_secs: 60,
        };

        assert_eq!(config.sqlite_path(), "/test/dir/demo.sqlite3");
        assert_eq!(config.filter_cache_ttl(), Duration::from_secs(60));
    }

    #[test]
    fn test_from_settings() {
        let dir = tempfile::tempdir().unwrap();
        let data_dir = dir.path().join("data");
        let data_dir = data_dir.to_str().unwrap();

        let config = FoodshareConfig::from_settings(
            &settings(&[
                ("data_dir", data_dir),
                ("database_name", "pilot"),
                ("filter_cache_ttl_secs", "120"),
            ]),
            "/home/nobody",
        )
        .unwrap();

        assert_eq!(config.data_dir, data_dir);
        assert_eq!(config.database_name, "pilot");
        assert_eq!(config.filter_cache_ttl_secs, 120);
        assert!(Path::new(data_dir).is_dir());
    }

    #[test]
    fn test_from_settings_rejects_bad_ttl() {
        let dir = tempfile::tempdir().unwrap();
        let result = FoodshareConfig::from_settings(
            &settings(&[
                ("data_dir", dir.path().to_str().unwrap()),
                ("filter_cache_ttl_secs", "an hour"),
            ]),
            "/home/nobody",
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_expand_home() {
        assert_eq!(expand_home("~/.foodshare", "/home/a"), "/home/a/.foodshare");
        assert_eq!(expand_home("/srv/foodshare", "/home/a"), "/srv/foodshare");
    }

    #[test]
    fn test_config_file_is_read() {
        let dir = tempfile::tempdir().unwrap();
        let data_dir = dir.path().join("data");
        let config_path = dir.path().join("foodshare.toml");
        std::fs::write(
            &config_path,
            format!(
                "data_dir = \"{}\"\ndatabase_name = \"from_file\"\n",
                data_dir.to_str().unwrap()
            ),
        )
        .unwrap();

        let config =
            FoodshareConfig::new(&Some(config_path.to_str().unwrap().to_string())).unwrap();
        assert_eq!(config.database_name, "from_file");
        assert!(config.sqlite_path().ends_with("data/from_file.sqlite3"));
    }

    #[test]
    fn test_database_info() {
        let dir = tempfile::tempdir().unwrap();
        let config = FoodshareConfig {
            data_dir: dir.path().to_str().unwrap().to_string(),
            database_name: "info".to_string(),
            filter_cache_ttl_secs: 3600,
        };

        let missing = get_database_info(&config);
        assert!(!missing.exists);
        assert!(!missing.schema_initialized);

        FoodshareDatabase::open(config.connection_params()).unwrap();
        let info = get_database_info(&config);
        assert!(info.exists);
        assert!(info.schema_initialized);
        assert_eq!(info.schema_version, Some(SCHEMA_VERSION));
        assert_eq!(info.counts, Some(EntityCounts::default()));
    }

    #[test]
    fn test_format_size() {
        assert_eq!(format_size(500), "500 B");
        assert_eq!(format_size(1536), "1.50 KB");
        assert_eq!(format_size(1048576), "1.00 MB");
        assert_eq!(format_size(1073741824), "1.00 GB");
    }
}
