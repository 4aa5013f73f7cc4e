use crate::config::{ConfigMap, ConfigValue};
use crate::error::Result;
use indexmap::IndexMap;

pub mod json;
pub mod properties;
pub mod yaml;

/// Supported configuration formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    Json,
    Yaml,
    Properties,
}

impl ConfigFormat {
    /// Returns the file extensions associated with this format.
    pub fn extensions(&self) -> &[&str] {
        match self {
            ConfigFormat::Json => &["json"],
            ConfigFormat::Yaml => &["yaml", "yml"],
            ConfigFormat::Properties => &["properties"],
        }
    }

    /// Guesses the format from a file extension (without dot).
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "json" => Some(ConfigFormat::Json),
            "yaml" | "yml" => Some(ConfigFormat::Yaml),
            "properties" => Some(ConfigFormat::Properties),
            _ => None,
        }
    }
}

/// A trait for parsing configuration from a string.
pub trait FormatParser: Send + Sync {
    /// Parses the input string into a ConfigMap.
    fn parse(&self, input: &str) -> Result<ConfigMap>;
}

/// A trait for serializing configuration to a string.
pub trait FormatSerializer: Send + Sync {
    /// Serializes the ConfigMap into a string.
    fn serialize(&self, config: &ConfigMap) -> Result<String>;
}

/// Flattens a hierarchical ConfigMap into a flat map with dot-notation keys.
///
/// Example: `{"server": {"port": 80}}` becomes `{"server.port": 80}`.
/// Arrays are treated as leaves, not expanded into indexed keys.
pub fn flatten_config_map(config: &ConfigMap) -> IndexMap<String, ConfigValue> {
    let mut flat_map = IndexMap::new();
    for (key, value) in config.as_inner() {
        flatten_value(key, value, &mut flat_map);
    }
    flat_map
}

fn flatten_value(prefix: &str, value: &ConfigValue, target: &mut IndexMap<String, ConfigValue>) {
    match value {
        ConfigValue::Object(map) => {
            for (curr_key, curr_val) in map {
                let new_key = format!("{}.{}", prefix, curr_key);
                flatten_value(&new_key, curr_val, target);
            }
        },
        _ => {
            target.insert(prefix.to_string(), value.clone());
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ConfigMap;

    #[test]
    fn test_flattening_logic() {
        let json = r#"{
            "server": {
                "port": 8080,
                "ssl": {
                    "enabled": true
                }
            },
            "app": "test"
        }"#;
        let config = ConfigMap::from_json(json).unwrap();
        let flat = flatten_config_map(&config);

        assert_eq!(flat.get("server.port").unwrap().as_i64(), Some(8080));
        assert_eq!(
            flat.get("server.ssl.enabled").unwrap().as_bool(),
            Some(true)
        );
        assert_eq!(flat.get("app").unwrap().as_str(), Some("test"));
        assert!(flat.get("server").is_none());
        assert!(flat.get("server.ssl").is_none());
    }
}
