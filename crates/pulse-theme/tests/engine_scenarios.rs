//! End-to-end engine behavior: registry, resolution, persistence and
//! publication working together.

use std::sync::{Arc, Mutex};

use pulse_theme::{
    default_tokens, is_valid, ActiveSelection, BrandConfig, EngineConfig, Fallback, FileStore,
    MemoryStore, PreferenceAdapter, ResolutionPolicy, RootAttributes, Selection, ThemeEngine,
    ThemeMode, TokenSet, UnavailableStore,
};
use serde_json::json;
use tempfile::TempDir;

fn ibm() -> BrandConfig {
    BrandConfig::new("ibm", "IBM", "1.0")
        .with_light(TokenSet::new().with("primary", "#0f62fe"))
        .with_dark(TokenSet::new().with("primary", "#78a9ff"))
}

fn engine(store: MemoryStore, root: RootAttributes) -> ThemeEngine {
    ThemeEngine::builder()
        .store(store)
        .environment(root)
        .default_mode(ThemeMode::Light)
        .build()
        .unwrap()
}

// =============================================================================
// Resolution scenarios
// =============================================================================

#[test]
fn test_empty_registry_resolves_default_dark() {
    let mut engine = engine(MemoryStore::new(), RootAttributes::new());
    engine.start();
    engine.set_mode(ThemeMode::Dark);

    assert!(engine.available_brand_ids().is_empty());
    assert_eq!(&engine.active().tokens, &default_tokens().dark);
}

#[test]
fn test_registered_brand_resolves_light_primary() {
    let mut engine = engine(MemoryStore::new(), RootAttributes::new());
    engine.add_brand(ibm()).unwrap();
    engine.apply_selection(Selection::new(Some("ibm"), ThemeMode::Light));

    assert_eq!(engine.active_token_value("primary"), "#0f62fe");
}

#[test]
fn test_missing_dark_tokens_fail_validation() {
    let config = json!({"id": "x", "name": "X", "version": "1.0", "tokens": {"light": {}}});
    assert!(!is_valid(&config));

    let mut engine = engine(MemoryStore::new(), RootAttributes::new());
    assert!(!engine.import_brand_config(&config.to_string()));
    assert!(engine.available_brand_ids().is_empty());
}

#[test]
fn test_removed_brand_resolves_to_default() {
    let root = RootAttributes::new();
    let mut engine = engine(MemoryStore::new(), root.clone());
    engine.add_brand(ibm()).unwrap();
    engine.set_brand(Some("ibm"));

    engine.remove_brand("ibm");
    let active = engine.set_brand(Some("ibm")).clone();

    assert_eq!(active.brand_id, None);
    assert_eq!(active.fallback, Some(Fallback::BrandUnavailable("ibm".to_string())));
    assert_eq!(&active.tokens, &default_tokens().light);
    assert_eq!(root.attribute("data-brand"), None);
}

#[tokio::test]
async fn test_url_load_without_remote_source_returns_none() {
    let mut engine = engine(MemoryStore::new(), RootAttributes::new());
    engine.add_brand(ibm()).unwrap();

    let loaded = engine
        .load_brand_from_url("acme", "https://bad.example/404")
        .await;

    assert!(loaded.is_none());
    assert_eq!(engine.available_brand_ids(), vec!["ibm"]);
}

#[test]
fn test_toggle_twice_persists_final_mode() {
    let store = MemoryStore::new();
    let mut engine = engine(store.clone(), RootAttributes::new());
    let start = engine.start().mode;

    engine.toggle_mode();
    engine.toggle_mode();

    assert_eq!(engine.active().mode, start);
    assert_eq!(store.entry("pulseui-theme").as_deref(), Some(start.as_str()));
}

// =============================================================================
// Publication
// =============================================================================

#[test]
fn test_listeners_see_state_already_published() {
    let root = RootAttributes::new();
    let mut engine = engine(MemoryStore::new(), root.clone());
    engine.add_brand(ibm()).unwrap();

    let observed: Arc<Mutex<Vec<(Option<String>, Option<String>)>>> = Arc::default();
    let sink = observed.clone();
    let reader = root.clone();
    let _subscription = engine.subscribe(move |active: &ActiveSelection| {
        sink.lock()
            .unwrap()
            .push((active.brand_id.clone(), reader.attribute("data-brand")));
    });

    engine.set_brand(Some("ibm"));
    engine.set_brand(None);

    assert_eq!(
        *observed.lock().unwrap(),
        vec![
            (Some("ibm".to_string()), Some("ibm".to_string())),
            (None, None),
        ]
    );
}

#[test]
fn test_custom_attribute_and_storage_names() {
    let config = EngineConfig::from_yaml(
        r#"
        storage:
          brand: app.brand
          mode: app.mode
        attributes:
          brand: data-app-brand
          mode: data-app-mode
        default_mode: dark
        "#,
    )
    .unwrap();
    let store = MemoryStore::new();
    let root = RootAttributes::new();
    let mut engine = ThemeEngine::builder()
        .config(config)
        .store(store.clone())
        .environment(root.clone())
        .build()
        .unwrap();
    engine.add_brand(ibm()).unwrap();
    engine.start();
    engine.set_brand(Some("ibm"));

    assert_eq!(root.attribute("data-app-brand").as_deref(), Some("ibm"));
    assert_eq!(root.attribute("data-app-mode").as_deref(), Some("dark"));
    assert_eq!(store.entry("app.brand").as_deref(), Some("ibm"));
    assert_eq!(store.entry("app.mode").as_deref(), Some("dark"));
}

// =============================================================================
// Persistence
// =============================================================================

#[test]
fn test_selection_survives_restart_with_file_store() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("preferences.json");

    {
        let mut engine = ThemeEngine::builder()
            .store(FileStore::new(&path))
            .default_mode(ThemeMode::Light)
            .build()
            .unwrap();
        engine.add_brand(ibm()).unwrap();
        engine.start();
        engine.apply_selection(Selection::new(Some("ibm"), ThemeMode::Dark));
    }

    let mut engine = ThemeEngine::builder()
        .store(FileStore::new(&path))
        .default_mode(ThemeMode::Light)
        .build()
        .unwrap();
    engine.add_brand(ibm()).unwrap();
    let active = engine.start();

    assert_eq!(active.brand_id.as_deref(), Some("ibm"));
    assert_eq!(active.mode, ThemeMode::Dark);
    assert_eq!(active.token("primary"), "#78a9ff");
}

#[test]
fn test_failing_store_returns_supplied_defaults() {
    let adapter = PreferenceAdapter::new(UnavailableStore);
    let defaults = Selection::new(Some("ibm"), ThemeMode::Dark);
    assert_eq!(adapter.read_preference(&defaults), defaults);

    let mut engine = ThemeEngine::builder()
        .store(UnavailableStore)
        .default_mode(ThemeMode::Dark)
        .build()
        .unwrap();
    engine.add_brand(ibm()).unwrap();
    engine.start();
    engine.set_brand(Some("ibm"));
    assert_eq!(engine.active_token_value("primary"), "#78a9ff");
}

#[test]
fn test_corrupt_preference_file_falls_back() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("preferences.json");
    std::fs::write(&path, "{ not json").unwrap();

    let mut engine = ThemeEngine::builder()
        .store(FileStore::new(&path))
        .default_mode(ThemeMode::Dark)
        .build()
        .unwrap();
    let active = engine.start().clone();
    assert_eq!(active.selection(), Selection::unbranded(ThemeMode::Dark));

    // The corrupt file is replaced by the first write.
    let reread: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(reread["pulseui-theme"], "dark");
    assert_eq!(reread["pulseui-brand"], "pulseui");
}

// =============================================================================
// Brand directories
// =============================================================================

#[test]
fn test_brand_dirs_are_registered_at_build() {
    let temp_dir = TempDir::new().unwrap();
    std::fs::write(
        temp_dir.path().join("ibm.yaml"),
        r##"
id: ibm
name: IBM
version: "1.0"
tokens:
  light:
    primary: "#0f62fe"
  dark:
    primary: "#78a9ff"
"##,
    )
    .unwrap();
    std::fs::write(
        temp_dir.path().join("acme.json"),
        r##"{"id":"acme","name":"Acme","version":"2","tokens":{"light":{"primary":"#f00"},"dark":{"primary":"#800"}}}"##,
    )
    .unwrap();

    let config = EngineConfig {
        brand_dirs: vec![temp_dir.path().to_path_buf()],
        default_mode: Some(ThemeMode::Light),
        ..EngineConfig::default()
    };
    let mut engine = ThemeEngine::builder().config(config).build().unwrap();

    assert_eq!(engine.available_brand_ids(), vec!["acme", "ibm"]);
    engine.set_brand(Some("acme"));
    assert_eq!(engine.active_token_value("primary"), "#f00");
}

#[test]
fn test_invalid_brand_dir_fails_build() {
    let temp_dir = TempDir::new().unwrap();
    std::fs::write(temp_dir.path().join("bad.json"), r#"{"id":"bad"}"#).unwrap();

    let config = EngineConfig {
        brand_dirs: vec![temp_dir.path().to_path_buf()],
        ..EngineConfig::default()
    };
    assert!(ThemeEngine::builder().config(config).build().is_err());
}

#[test]
fn test_policy_is_exposed_for_inspection() {
    let engine = engine(MemoryStore::new(), RootAttributes::new());
    let policy: &ResolutionPolicy = engine.policy();
    assert_eq!(policy.defaults(), default_tokens());
}
