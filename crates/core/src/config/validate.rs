use super::{types::Config, ConfigError};

/// Validate configuration
/// Currently validates:
/// - Library root is set
/// - Space replacement has a character to replace with
/// - Story-arc marker is non-empty and the one-off threshold positive
/// - Enabled notification channels carry credentials
/// - Configured scripts are not blank
pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    if config.library.destination_root.as_os_str().is_empty() {
        return Err(ConfigError::ValidationError(
            "library.destination_root cannot be empty".to_string(),
        ));
    }

    if config.naming.replace_spaces && config.naming.replace_char.is_empty() {
        return Err(ConfigError::ValidationError(
            "naming.replace_char cannot be empty when replace_spaces is set".to_string(),
        ));
    }

    if config.resolver.story_arc_marker.is_empty() {
        return Err(ConfigError::ValidationError(
            "resolver.story_arc_marker cannot be empty".to_string(),
        ));
    }

    if config.resolver.one_off_threshold == 0 {
        return Err(ConfigError::ValidationError(
            "resolver.one_off_threshold cannot be 0".to_string(),
        ));
    }

    let notifications = &config.notifications;
    if let Some(pushover) = notifications.pushover.as_ref().filter(|p| p.enabled) {
        if pushover.api_token.is_empty() || pushover.user_key.is_empty() {
            return Err(ConfigError::ValidationError(
                "notifications.pushover requires api_token and user_key".to_string(),
            ));
        }
    }
    if let Some(prowl) = notifications.prowl.as_ref().filter(|p| p.enabled) {
        if prowl.api_key.is_empty() {
            return Err(ConfigError::ValidationError(
                "notifications.prowl requires api_key".to_string(),
            ));
        }
    }
    if let Some(nma) = notifications.nma.as_ref().filter(|n| n.enabled) {
        if nma.api_key.is_empty() {
            return Err(ConfigError::ValidationError(
                "notifications.nma requires api_key".to_string(),
            ));
        }
    }

    for (key, script) in [
        ("scripts.pre_script", &config.scripts.pre_script),
        ("scripts.post_script", &config.scripts.post_script),
    ] {
        if script.as_deref().is_some_and(|s| s.trim().is_empty()) {
            return Err(ConfigError::ValidationError(format!(
                "{} cannot be blank",
                key
            )));
        }
    }

    Ok(())
}
