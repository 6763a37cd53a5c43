use pick_risk::{Config, ConfigStore};

#[test]
fn test_missing_file_gives_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let store = ConfigStore::new(dir.path().join("absent.toml"));
    assert_eq!(store.load(), Config::default());
}

#[test]
fn test_save_then_load() {
    let dir = tempfile::tempdir().unwrap();
    let store = ConfigStore::new(dir.path().join("nested").join("config.toml"));
    let cfg = Config::default()
        .with_avg_pl_min_input("11.25")
        .with_shift_end_input("12:15")
        .with_show_safe_rows(true);
    store.save(&cfg).unwrap();
    assert_eq!(store.load(), cfg);
}

#[test]
fn test_malformed_file_gives_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(&path, "avg_pl_min = \"fast\"\n[[[").unwrap();
    let store = ConfigStore::new(&path);
    assert!(store.try_load().is_err());
    assert_eq!(store.load(), Config::default());
}
