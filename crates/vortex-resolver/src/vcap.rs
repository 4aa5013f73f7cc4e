//! Parses Cloud Foundry's `VCAP_APPLICATION` and `VCAP_SERVICES` environment
//! variables into the `vcap.application.*` / `vcap.services.<name>.*`
//! placeholder namespace, mirroring Spring Cloud Connectors' behavior.

use indexmap::IndexMap;
use vortex_core::ConfigValue;

/// Builds the `vcap.*` subtree from the two VCAP environment variables, if
/// present. Either or both may be absent; malformed JSON in one does not
/// prevent the other from contributing.
pub fn build_vcap_tree(env: &IndexMap<String, String>) -> IndexMap<String, ConfigValue> {
    let mut vcap = IndexMap::new();

    if let Some(raw) = find_case_insensitive(env, "VCAP_APPLICATION") {
        match serde_json::from_str::<serde_json::Value>(raw) {
            Ok(parsed) => {
                vcap.insert("application".to_string(), json_to_config_value(&parsed));
            },
            Err(e) => tracing::warn!(error = %e, "VCAP_APPLICATION present but not valid JSON, ignoring"),
        }
    }

    if let Some(raw) = find_case_insensitive(env, "VCAP_SERVICES") {
        match serde_json::from_str::<serde_json::Value>(raw) {
            Ok(parsed) => {
                vcap.insert("services".to_string(), build_services_tree(&parsed));
            },
            Err(e) => tracing::warn!(error = %e, "VCAP_SERVICES present but not valid JSON, ignoring"),
        }
    }

    vcap
}

fn find_case_insensitive<'a>(env: &'a IndexMap<String, String>, key: &str) -> Option<&'a str> {
    env.iter()
        .find(|(k, _)| k.eq_ignore_ascii_case(key))
        .map(|(_, v)| v.as_str())
}

/// `VCAP_SERVICES` groups service instances by plan/label; Spring flattens
/// this to `vcap.services.<instance-name>.*` keyed on each instance's own
/// `name` field (falling back to its label if `name` is absent).
fn build_services_tree(parsed: &serde_json::Value) -> ConfigValue {
    let mut services = IndexMap::new();
    let Some(by_label) = parsed.as_object() else {
        return ConfigValue::Object(services);
    };

    for (label, instances) in by_label {
        let Some(instances) = instances.as_array() else { continue };
        for instance in instances {
            let name = instance
                .get("name")
                .and_then(|v| v.as_str())
                .unwrap_or(label.as_str())
                .to_string();
            services.insert(name, json_to_config_value(instance));
        }
    }

    ConfigValue::Object(services)
}

fn json_to_config_value(value: &serde_json::Value) -> ConfigValue {
    match value {
        serde_json::Value::Null => ConfigValue::Null,
        serde_json::Value::Bool(b) => ConfigValue::Bool(*b),
        serde_json::Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                ConfigValue::Integer(i)
            } else {
                ConfigValue::Float(n.as_f64().unwrap_or_default().into())
            }
        },
        serde_json::Value::String(s) => ConfigValue::String(s.clone()),
        serde_json::Value::Array(arr) => ConfigValue::Array(arr.iter().map(json_to_config_value).collect()),
        serde_json::Value::Object(obj) => {
            ConfigValue::Object(obj.iter().map(|(k, v)| (k.clone(), json_to_config_value(v))).collect())
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn env(pairs: &[(&str, &str)]) -> IndexMap<String, String> {
        pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
    }

    #[test]
    fn test_no_vcap_vars_yields_empty_tree() {
        let tree = build_vcap_tree(&IndexMap::new());
        assert!(tree.is_empty());
    }

    #[test]
    fn test_vcap_application_parsed() {
        let e = env(&[("VCAP_APPLICATION", r#"{"application_name":"demo","instance_index":2}"#)]);
        let tree = build_vcap_tree(&e);
        let app = tree.get("application").unwrap().as_object().unwrap();
        assert_eq!(app.get("application_name").unwrap().as_str(), Some("demo"));
        assert_eq!(app.get("instance_index").unwrap().as_i64(), Some(2));
    }

    #[test]
    fn test_vcap_services_flattened_by_instance_name() {
        let raw = r#"{"postgresql":[{"name":"my-db","credentials":{"uri":"postgres://x"}}]}"#;
        let e = env(&[("VCAP_SERVICES", raw)]);
        let tree = build_vcap_tree(&e);
        let services = tree.get("services").unwrap().as_object().unwrap();
        let instance = services.get("my-db").unwrap().as_object().unwrap();
        assert_eq!(
            instance
                .get("credentials")
                .unwrap()
                .as_object()
                .unwrap()
                .get("uri")
                .unwrap()
                .as_str(),
            Some("postgres://x")
        );
    }

    #[test]
    fn test_vcap_services_instance_without_name_falls_back_to_label() {
        let raw = r#"{"redis":[{"credentials":{"host":"h"}}]}"#;
        let e = env(&[("VCAP_SERVICES", raw)]);
        let tree = build_vcap_tree(&e);
        let services = tree.get("services").unwrap().as_object().unwrap();
        assert!(services.contains_key("redis"));
    }

    #[test]
    fn test_malformed_vcap_json_is_silently_skipped() {
        let e = env(&[("VCAP_APPLICATION", "not json"), ("VCAP_SERVICES", r#"{"ok":[{"name":"a"}]}"#)]);
        let tree = build_vcap_tree(&e);
        assert!(tree.get("application").is_none());
        assert!(tree.get("services").is_some());
    }

    #[test]
    fn test_case_insensitive_env_lookup() {
        let e = env(&[("vcap_application", r#"{"x":1}"#)]);
        let tree = build_vcap_tree(&e);
        assert!(tree.contains_key("application"));
    }
}
