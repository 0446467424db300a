use pdf_handout::*;

fn custom_preset(id: &str) -> TemplatePreset {
    TemplatePreset::new(
        id,
        "Custom",
        HandoutSettings {
            slots_per_sheet: SlotsPerSheet::Six,
            ..Default::default()
        },
    )
}

#[tokio::test]
async fn test_file_store_defaults_when_empty() {
    let dir = tempfile::tempdir().unwrap();
    let store = JsonFileStore::new(dir.path().join("config"));

    assert_eq!(store.load_settings().await.unwrap(), HandoutSettings::default());
    assert!(store.load_presets().await.unwrap().is_empty());
    assert_eq!(store.selected_preset().await.unwrap(), None);
}

#[tokio::test]
async fn test_file_store_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let store = JsonFileStore::new(dir.path().join("config"));

    let settings = HandoutSettings {
        margin_mm: 12.0,
        ..Default::default()
    };
    store.save_settings(&settings).await.unwrap();
    store.save_presets(&[custom_preset("mine")]).await.unwrap();
    store.select_preset(Some("mine")).await.unwrap();

    let reopened = JsonFileStore::new(store.dir());
    assert_eq!(reopened.load_settings().await.unwrap(), settings);
    assert_eq!(reopened.load_presets().await.unwrap(), vec![custom_preset("mine")]);
    assert_eq!(
        reopened.selected_preset().await.unwrap().as_deref(),
        Some("mine")
    );

    reopened.select_preset(None).await.unwrap();
    assert_eq!(reopened.selected_preset().await.unwrap(), None);
    // Clearing twice is fine.
    reopened.select_preset(None).await.unwrap();
}

#[tokio::test]
async fn test_file_store_merges_partial_settings() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("settings.json"), r#"{ "spacingMm": 2 }"#).unwrap();

    let store = JsonFileStore::new(dir.path());
    let settings = store.load_settings().await.unwrap();
    assert_eq!(settings.spacing_mm, 2.0);
    assert_eq!(settings.slots_per_sheet, SlotsPerSheet::Four);
}

#[tokio::test]
async fn test_file_store_skips_bad_presets() {
    let dir = tempfile::tempdir().unwrap();
    let good = custom_preset("good").to_json().unwrap();
    let presets = format!(
        r#"[{}, {{ "id": "", "name": "x", "settings": {{}} }}, {{ "bogus": 1 }}]"#,
        good
    );
    std::fs::write(dir.path().join("presets.json"), presets).unwrap();

    let store = JsonFileStore::new(dir.path());
    let loaded = store.load_presets().await.unwrap();
    assert_eq!(loaded.len(), 1);
    assert_eq!(loaded[0].id, "good");
}

#[tokio::test]
async fn test_store_rejects_invalid_settings() {
    let store = MemoryStore::new();
    let bad = HandoutSettings {
        scale: 10.0,
        ..Default::default()
    };
    assert!(store.save_settings(&bad).await.is_err());
    assert_eq!(store.load_settings().await.unwrap(), HandoutSettings::default());
}

#[tokio::test]
async fn test_memory_store() {
    let store = MemoryStore::new();
    store.save_presets(&[custom_preset("a")]).await.unwrap();
    store.select_preset(Some("a")).await.unwrap();

    let custom = store.load_presets().await.unwrap();
    let selected = store.selected_preset().await.unwrap().unwrap();
    let preset = find_preset(&selected, &custom).unwrap();
    assert_eq!(preset.settings.slots_per_sheet, SlotsPerSheet::Six);
}
