//! Persistent client configuration model and file-backed manager.

use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::classifier::KeywordSets;
use crate::worklog::{DEFAULT_DATE_FALLBACK, DEFAULT_WORKLOG_COMMENT};

fn default_backend_url() -> String {
    assist_api::config::DEFAULT_BACKEND_URL.to_string()
}

fn default_tracker_url() -> String {
    "https://jira.corezoid.com".to_string()
}

fn default_sprint_limit() -> u32 {
    5
}

/// Tracker account that can be used as a search filter.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct KnownUser {
    pub key: String,
    pub name: String,
}

/// Represents the client configuration persisted on disk: backend and tracker locations, filter users, worklog
/// command defaults and the classifier keyword sets.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct Config {
    #[serde(default = "default_backend_url")]
    pub backend_url: String,
    #[serde(default = "default_tracker_url")]
    pub tracker_url: String,
    #[serde(default = "default_sprint_limit")]
    pub sprint_limit: u32,
    pub worklog_comment: String,
    pub date_fallback: String,
    pub users: Vec<KnownUser>,
    pub keywords: KeywordSets,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            backend_url: default_backend_url(),
            tracker_url: default_tracker_url(),
            sprint_limit: default_sprint_limit(),
            worklog_comment: DEFAULT_WORKLOG_COMMENT.to_string(),
            date_fallback: DEFAULT_DATE_FALLBACK.to_string(),
            users: Vec::new(),
            keywords: KeywordSets::default(),
        }
    }
}

impl Config {
    pub fn user_keys(&self) -> Vec<String> {
        self.users.iter().map(|user| user.key.clone()).collect()
    }

    /// Browse URL for an issue key on the configured tracker.
    pub fn browse_url(&self, key: &str) -> String {
        format!("{}/browse/{}", self.tracker_url.trim_end_matches('/'), key)
    }
}

pub(crate) fn project_dirs() -> io::Result<directories::ProjectDirs> {
    directories::ProjectDirs::from("com", "corezoid", "jira-assist").ok_or_else(|| {
        io::Error::new(io::ErrorKind::NotFound, "could not determine home directory")
    })
}

/// Manages loading and saving of the configuration JSON file in the platform-specific config directory.
pub struct ConfigManager {
    path: PathBuf,
}

impl ConfigManager {
    /// Creates a manager bound to the platform-specific config path.
    pub fn new() -> io::Result<Self> {
        let dirs = project_dirs()?;
        Ok(Self {
            path: dirs.config_dir().join("config.json"),
        })
    }

    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads config from disk, falling back to defaults on read/parse errors.
    pub fn load(&self) -> Config {
        if self.path.exists() {
            let content = fs::read_to_string(&self.path).unwrap_or_default();
            serde_json::from_str(&content).unwrap_or_default()
        } else {
            Config::default()
        }
    }

    /// Persists config to disk, creating parent directories when needed.
    pub fn save(&self, config: &Config) -> io::Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(config)?;
        fs::write(&self.path, content)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{Config, ConfigManager, KnownUser};
    use std::env;
    use std::fs;
    use std::path::PathBuf;
    use std::time::{SystemTime, UNIX_EPOCH};

    fn unique_path(name: &str) -> PathBuf {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("system time before unix epoch")
            .as_nanos();
        env::temp_dir().join(format!("jira-assist-tests-{name}-{nanos}/config.json"))
    }

    #[test]
    fn default_config_has_expected_values() {
        let config = Config::default();
        assert_eq!(config.backend_url, "http://localhost:8080");
        assert_eq!(config.sprint_limit, 5);
        assert_eq!(config.worklog_comment, "Auto log");
        assert_eq!(config.date_fallback, "сегодня");
        assert!(config.keywords.worklog.contains(&"worklog".to_string()));
    }

    #[test]
    fn browse_url_joins_without_double_slash() {
        let config = Config {
            tracker_url: "https://jira.example.com/".to_string(),
            ..Config::default()
        };
        assert_eq!(config.browse_url("QA-1"), "https://jira.example.com/browse/QA-1");
    }

    #[test]
    fn load_missing_file_returns_default() {
        let manager = ConfigManager::at(unique_path("missing"));
        assert_eq!(manager.load(), Config::default());
    }

    #[test]
    fn partial_file_keeps_defaults_for_missing_fields() {
        let path = unique_path("partial");
        let parent = path.parent().expect("parent must exist").to_path_buf();
        fs::create_dir_all(&parent).expect("create temp directory");
        let content = r#"{"tracker_url": "https://jira.local", "keywords": {"worklog": ["track"]}}"#;
        fs::write(&path, content).expect("write partial config");

        let loaded = ConfigManager::at(path).load();
        assert_eq!(loaded.tracker_url, "https://jira.local");
        assert_eq!(loaded.sprint_limit, 5);
        assert_eq!(loaded.keywords.worklog, vec!["track".to_string()]);
        assert!(!loaded.keywords.autofill.is_empty());

        let _ = fs::remove_dir_all(parent);
    }

    #[test]
    fn save_and_load_keeps_users() {
        let path = unique_path("roundtrip");
        let parent = path.parent().map(ToOwned::to_owned);
        let manager = ConfigManager::at(path);
        let config = Config {
            users: vec![KnownUser {
                key: "mw071175maj".to_string(),
                name: "Oleksii".to_string(),
            }],
            ..Config::default()
        };

        manager.save(&config).expect("save should succeed");
        let loaded = manager.load();
        assert_eq!(loaded.user_keys(), vec!["mw071175maj".to_string()]);

        if let Some(parent) = parent {
            let _ = fs::remove_dir_all(parent);
        }
    }

    #[test]
    fn load_invalid_json_falls_back_to_default() {
        let path = unique_path("invalid");
        let parent = path.parent().expect("parent must exist").to_path_buf();
        fs::create_dir_all(&parent).expect("create temp directory");
        fs::write(&path, "not-valid-json").expect("write invalid config");

        let loaded = ConfigManager::at(path).load();
        assert_eq!(loaded.tracker_url, "https://jira.corezoid.com");

        let _ = fs::remove_dir_all(parent);
    }
}
