use serde::{Deserialize, Serialize};

/// Configuration from config.toml in the data directory
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub mirror: MirrorConfig,
    #[serde(default)]
    pub display: DisplayConfig,
}

/// Identity mirror settings. Only user ids and names are ever mirrored.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MirrorConfig {
    #[serde(default)]
    pub enabled: bool,
    /// Outbox file, relative to the data directory
    #[serde(default = "default_outbox")]
    pub outbox: String,
}

impl Default for MirrorConfig {
    fn default() -> Self {
        MirrorConfig {
            enabled: false,
            outbox: default_outbox(),
        }
    }
}

fn default_outbox() -> String {
    "mirror-outbox.jsonl".to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DisplayConfig {
    /// Render sub-items under their parent in `show`
    #[serde(default = "default_true")]
    pub show_sub_items: bool,
    /// Colour category headers with their palette colour
    #[serde(default = "default_true")]
    pub color: bool,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        DisplayConfig {
            show_sub_items: true,
            color: true,
        }
    }
}

fn default_true() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_uses_defaults() {
        let config: AppConfig = toml::from_str("").unwrap();
        assert!(!config.mirror.enabled);
        assert_eq!(config.mirror.outbox, "mirror-outbox.jsonl");
        assert!(config.display.show_sub_items);
        assert!(config.display.color);
    }

    #[test]
    fn partial_tables_keep_remaining_defaults() {
        let config: AppConfig = toml::from_str(
            r#"
[mirror]
enabled = true

[display]
color = false
"#,
        )
        .unwrap();
        assert!(config.mirror.enabled);
        assert_eq!(config.mirror.outbox, "mirror-outbox.jsonl");
        assert!(config.display.show_sub_items);
        assert!(!config.display.color);
    }
}
