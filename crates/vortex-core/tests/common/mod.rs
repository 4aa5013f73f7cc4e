#![allow(dead_code)]
use vortex_core::ConfigMap;

/// Helper to create a ConfigMap from a JSON string slice.
/// Panics if the JSON is invalid (intended for tests).
pub fn config_from_json(json: &str) -> ConfigMap {
    ConfigMap::from_json(json).expect("Failed to create test config from JSON")
}

/// Returns a complex nested configuration fixture.
pub fn complex_config() -> ConfigMap {
    config_from_json(r#"{
        "server": {
            "port": 8080,
            "host": "localhost",
            "ssl": {
                "enabled": true,
                "cert": "/path/to/cert"
            }
        },
        "database": {
            "primary": {
                "url": "jdbc:postgres://local",
                "pool": 10
            }
        },
        "features": ["new-ui", "beta-api"]
    }"#)
}
