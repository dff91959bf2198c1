use alloc::string::String;

use serde::{Deserialize, Serialize};

/// Settings of a [`SaveManager`](crate::SaveManager).
///
/// Missing keys take their default when deserialized.
///
/// # Examples
///
/// ```
/// use vc_archive::ArchiveConfig;
///
/// let config = ArchiveConfig::default();
/// assert!(config.enabled);
/// assert_eq!(config.level_category, "Level");
/// assert_eq!(config.player_category, "Player");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArchiveConfig {
    /// Master switch: a disabled manager neither saves nor loads.
    pub enabled: bool,
    pub level_category: String,
    pub player_category: String,
    /// Write indented JSON.
    pub pretty: bool,
    /// Load a level's save when it is initialized. If `false`, levels are
    /// always initialized as new.
    pub load_on_init: bool,
    /// Run game-init hooks on actors spawned after their level was loaded.
    pub init_spawned_actors: bool,
}

impl Default for ArchiveConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            level_category: "Level".into(),
            player_category: "Player".into(),
            pretty: false,
            load_on_init: true,
            init_spawned_actors: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::ArchiveConfig;

    #[test]
    fn partial_config() {
        let config: ArchiveConfig = serde_json::from_str(r#"{ "pretty": true, "load_on_init": false }"#).unwrap();
        assert_eq!(
            config,
            ArchiveConfig {
                pretty: true,
                load_on_init: false,
                ..ArchiveConfig::default()
            }
        );

        let text = serde_json::to_string(&ArchiveConfig::default()).unwrap();
        assert_eq!(serde_json::from_str::<ArchiveConfig>(&text).unwrap(), ArchiveConfig::default());
    }
}
