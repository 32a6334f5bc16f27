use tripmode_store::Store;

#[test]
fn migrate_is_idempotent() {
    let store = Store::open_in_memory().expect("open store");
    assert_eq!(store.schema_version().expect("version"), 0);
    store.migrate().expect("migrate");
    store.migrate().expect("migrate again");
    assert_eq!(store.schema_version().expect("version"), 1);
}

#[test]
fn open_on_disk_creates_database() {
    let temp = tempfile::TempDir::new().expect("tempdir");
    let path = tripmode_store::paths::db_path_in(temp.path());
    let store = Store::open(&path).expect("open store");
    store.migrate().expect("migrate");
    assert!(path.exists());
}
