//! Behavioural properties of the in-memory store.

use config_store::tree::{deep_merge, deep_replace, path, substitute};
use config_store::{ConfigStore, ConfigTree, LoadOptions, StoreOptions};
use serde_json::{Value, json};

fn in_memory(data: Value) -> ConfigStore {
    ConfigStore::from_value(data, StoreOptions::in_memory()).expect("Failed to create store")
}

fn tree(value: Value) -> ConfigTree {
    value.as_object().cloned().unwrap()
}

#[test]
fn set_then_get_for_many_paths_and_separators() {
    let values = [json!(5), json!("s"), json!(null), json!([1, {"a": 2}]), json!({"n": true})];
    for separator in [".", "|", "::", "/"] {
        for depth in 1..=4 {
            let keys: Vec<String> = (0..depth).map(|i| format!("k{i}")).collect();
            let index = keys.join(separator);
            for value in &values {
                let mut t = tree(json!({"k0": "scalar in the way"}));
                path::set(&mut t, &index, value.clone(), separator);
                assert_eq!(path::get(&t, &index, separator), Some(value), "{index}");
                assert!(path::has(&t, &index, separator));
            }
        }
    }
}

#[test]
fn has_requires_mapping_prefixes() {
    let t = tree(json!({"a": {"b": [{"c": 1}], "d": {"e": null}}}));
    assert!(path::has(&t, "a.d.e", "."));
    assert!(path::has(&t, "a.b", "."));
    assert!(!path::has(&t, "a.b.c", "."));
    assert!(!path::has(&t, "a.x.e", "."));
}

#[test]
fn scenario_set_and_get_with_default() {
    let mut store = in_memory(json!({}));
    store.set("x.y.z", 5).unwrap();
    assert_eq!(store.get_or("x.y.z", Value::Null), json!(5));
    assert_eq!(store.get_or("x.y.w", "none"), json!("none"));
}

#[test]
fn scenario_template_on_construction() {
    let store = ConfigStore::from_value(
        json!({"greet": "%name%"}),
        StoreOptions::in_memory().with_template_variable("%name%", "Ada"),
    )
    .unwrap();
    assert_eq!(store.get("greet"), Some(&json!("Ada")));
}

#[test]
fn scenario_load_in_key() {
    let mut store = in_memory(json!({}));
    store
        .load(
            LoadOptions::new()
                .with_data(json!({"user": {"name": "Bo"}}))
                .load_in_key("cfg"),
        )
        .unwrap();
    assert_eq!(store.get("cfg.user.name"), Some(&json!("Bo")));
}

#[test]
fn clear_first_replaces_everything() {
    let mut store = in_memory(json!({"b": 2}));
    store
        .load(LoadOptions::new().with_data(json!({"a": 1})).clear_first(true))
        .unwrap();
    assert_eq!(store.data(), &tree(json!({"a": 1})));
}

#[test]
fn missing_import_is_skipped() {
    let mut store = in_memory(json!({}));
    store
        .load(
            LoadOptions::from_value(json!({
                "data": {"import": [{"file": "missing.yml"}], "other": "data"},
                "processImports": true
            }))
            .unwrap(),
        )
        .unwrap();
    assert_eq!(store.get("other"), Some(&json!("data")));
}

#[test]
fn substitution_identity_and_nesting() {
    let data = json!({"a": {"b": "%x%", "list": ["%x%", 1]}, "n": 2.5});
    assert_eq!(substitute(data.clone(), &ConfigTree::new()).unwrap(), data);
    assert_eq!(
        substitute(json!({"a": {"b": "%x%"}}), &tree(json!({"%x%": "y"}))).unwrap(),
        json!({"a": {"b": "y"}})
    );
}

#[test]
fn deep_merge_right_biased_and_associative_on_disjoint_keys() {
    let a = json!({"s": {"a": 1}, "x": 1});
    let b = json!({"s": {"b": 2}, "y": 2});
    let c = json!({"s": {"c": 3}, "z": 3});
    for combine in [deep_merge as fn(Value, Value) -> Value, deep_replace] {
        assert_eq!(
            combine(combine(a.clone(), b.clone()), c.clone()),
            combine(a.clone(), combine(b.clone(), c.clone()))
        );
        assert_eq!(combine(json!({"k": 1}), json!({"k": 2})), json!({"k": 2}));
    }
}
