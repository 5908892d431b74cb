use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::notify::NotificationsConfig;
use crate::planner::{LibraryConfig, NamingConfig};
use crate::resolver::ResolverConfig;
use crate::scripts::ScriptsConfig;
use crate::tagger::TaggingConfig;

/// Root configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    pub library: LibraryConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub naming: NamingConfig,
    #[serde(default)]
    pub resolver: ResolverConfig,
    #[serde(default)]
    pub tagging: TaggingConfig,
    #[serde(default)]
    pub scripts: ScriptsConfig,
    #[serde(default)]
    pub notifications: NotificationsConfig,
}

impl Config {
    /// A configuration with defaults everywhere except the library root.
    pub fn new(destination_root: impl Into<PathBuf>) -> Self {
        Self {
            library: LibraryConfig::new(destination_root),
            database: DatabaseConfig::default(),
            naming: NamingConfig::default(),
            resolver: ResolverConfig::default(),
            tagging: TaggingConfig::default(),
            scripts: ScriptsConfig::default(),
            notifications: NotificationsConfig::default(),
        }
    }
}

/// Database configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DatabaseConfig {
    #[serde(default = "default_db_path")]
    pub path: PathBuf,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_db_path(),
        }
    }
}

fn default_db_path() -> PathBuf {
    PathBuf::from("shortbox.db")
}

/// Sanitized config for display (secrets redacted)
#[derive(Debug, Clone, Serialize)]
pub struct SanitizedConfig {
    pub library: LibraryConfig,
    pub database: DatabaseConfig,
    pub naming: NamingConfig,
    pub resolver: ResolverConfig,
    pub tagging: TaggingConfig,
    pub scripts: ScriptsConfig,
    pub notifications: SanitizedNotificationsConfig,
}

/// Notification channels with credentials hidden
#[derive(Debug, Clone, Serialize)]
pub struct SanitizedNotificationsConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pushover: Option<SanitizedChannel>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prowl: Option<SanitizedChannel>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nma: Option<SanitizedChannel>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SanitizedChannel {
    pub enabled: bool,
    pub url: String,
    pub credentials_configured: bool,
}

impl From<&Config> for SanitizedConfig {
    fn from(config: &Config) -> Self {
        let notifications = &config.notifications;
        Self {
            library: config.library.clone(),
            database: config.database.clone(),
            naming: config.naming.clone(),
            resolver: config.resolver.clone(),
            tagging: config.tagging.clone(),
            scripts: config.scripts.clone(),
            notifications: SanitizedNotificationsConfig {
                pushover: notifications.pushover.as_ref().map(|p| SanitizedChannel {
                    enabled: p.enabled,
                    url: p.url.clone(),
                    credentials_configured: !p.api_token.is_empty() && !p.user_key.is_empty(),
                }),
                prowl: notifications.prowl.as_ref().map(|p| SanitizedChannel {
                    enabled: p.enabled,
                    url: p.url.clone(),
                    credentials_configured: !p.api_key.is_empty(),
                }),
                nma: notifications.nma.as_ref().map(|n| SanitizedChannel {
                    enabled: n.enabled,
                    url: n.url.clone(),
                    credentials_configured: !n.api_key.is_empty(),
                }),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::issue::PaddingLevel;

    #[test]
    fn test_deserialize_minimal_config() {
        let toml = r#"
[library]
destination_root = "/comics"
"#;
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.library.destination_root, PathBuf::from("/comics"));
        assert_eq!(config.database.path.to_str().unwrap(), "shortbox.db");
        assert!(config.naming.rename_files);
        assert_eq!(config.resolver.one_off_threshold, 900_000);
        assert_eq!(config.resolver.story_arc_marker, "S");
        assert!(!config.tagging.enabled);
        assert!(config.scripts.pre_script.is_none());
        assert!(config.notifications.pushover.is_none());
    }

    #[test]
    fn test_deserialize_missing_library_fails() {
        let toml = r#"
[database]
path = "/data/shortbox.db"
"#;
        let result: Result<Config, _> = toml::from_str(toml);
        assert!(result.is_err());
    }

    #[test]
    fn test_deserialize_full_config() {
        let toml = r#"
[library]
destination_root = "/comics"
grab_bag_dir = "/comics/Grab Bag"
story_arc_dirs = true
reading_order = true
download_dir_override = "/downloads/complete"

[naming]
file_format = "$Series - $Issue"
replace_spaces = true
replace_char = "_"
lowercase_filenames = true

[naming.padding]
under_ten = "0x"

[resolver]
one_off_threshold = 500000

[tagging]
enabled = true
program = "/usr/bin/comictagger"
args = ["-s", "-t", "cr"]

[scripts]
pre_script = "/scripts/pre.sh --verbose"
post_script = "python3 /scripts/post.py"
"#;
        let config: Config = toml::from_str(toml).unwrap();
        assert!(config.library.story_arc_dirs);
        assert_eq!(
            config.library.download_dir_override,
            Some(PathBuf::from("/downloads/complete"))
        );
        assert_eq!(config.naming.replace_char, "_");
        assert_eq!(config.naming.padding.under_ten, PaddingLevel::SingleZero);
        assert_eq!(config.naming.padding.under_hundred, PaddingLevel::SingleZero);
        assert_eq!(config.resolver.one_off_threshold, 500_000);
        assert_eq!(config.tagging.args, vec!["-s", "-t", "cr"]);
        assert_eq!(
            config.scripts.post_script.as_deref(),
            Some("python3 /scripts/post.py")
        );
    }

    #[test]
    fn test_sanitized_config_hides_keys() {
        let toml = r#"
[library]
destination_root = "/comics"

[notifications.pushover]
api_token = "secret-token"
user_key = "secret-user"

[notifications.nma]
api_key = ""
"#;
        let config: Config = toml::from_str(toml).unwrap();
        let sanitized = SanitizedConfig::from(&config);

        let pushover = sanitized.notifications.pushover.as_ref().unwrap();
        assert!(pushover.credentials_configured);
        assert!(!sanitized.notifications.nma.as_ref().unwrap().credentials_configured);
        assert!(sanitized.notifications.prowl.is_none());

        let json = serde_json::to_string(&sanitized).unwrap();
        assert!(!json.contains("secret-token"));
        assert!(!json.contains("secret-user"));
    }
}
