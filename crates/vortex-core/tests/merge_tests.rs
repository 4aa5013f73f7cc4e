use vortex_core::merge::deep_merge;

mod common;

#[test]
fn test_cascading_merge_scenario() {
    // 1. Base (application defaults)
    let mut base = common::config_from_json(
        r#"{
        "server": { "port": 8000, "host": "localhost" },
        "logging": { "level": "INFO", "file": "app.log" }
    }"#,
    );

    // 2. Overlay (production profile)
    let prod = common::config_from_json(
        r#"{
        "server": { "port": 80 },
        "logging": { "level": "WARN" }
    }"#,
    );

    deep_merge(&mut base, &prod);

    // Verification
    assert_eq!(base.get("server.port").unwrap().as_i64(), Some(80)); // Overridden
    assert_eq!(base.get("server.host").unwrap().as_str(), Some("localhost")); // Preserved
    assert_eq!(base.get("logging.level").unwrap().as_str(), Some("WARN")); // Overridden
    assert_eq!(base.get("logging.file").unwrap().as_str(), Some("app.log")); // Preserved
}

#[test]
fn test_three_way_cascade_precedence() {
    // Simulates defaults -> app config -> env overrides, applied in order.
    let mut merged = common::config_from_json(r#"{"app": {"timeout": 5000, "retries": 3}}"#);
    deep_merge(&mut merged, &common::config_from_json(r#"{"app": {"timeout": 1000}}"#));
    deep_merge(&mut merged, &common::config_from_json(r#"{"app": {"retries": 5}}"#));

    // Timeout: second layer overrides the first; third layer didn't specify it.
    assert_eq!(merged.get("app.timeout").unwrap().as_i64(), Some(1000));
    // Retries: third layer overrides the first; second layer didn't specify it.
    assert_eq!(merged.get("app.retries").unwrap().as_i64(), Some(5));
}

#[test]
fn test_array_semantics_replacement() {
    // Arrays should be replaced, not merged.
    let mut base = common::config_from_json(r#"{"whitelist": ["127.0.0.1"]}"#);
    let overlay = common::config_from_json(r#"{"whitelist": ["10.0.0.1", "10.0.0.2"]}"#);

    deep_merge(&mut base, &overlay);

    let whitelist = base.get("whitelist").unwrap().as_array().unwrap();
    assert_eq!(whitelist.len(), 2);
    assert_eq!(whitelist[0].as_str(), Some("10.0.0.1"));
}
