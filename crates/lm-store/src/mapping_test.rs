use super::*;

#[test]
fn test_set_and_get_round_trip() {
    let db = MigrateDb::open_memory().unwrap();
    let map = MappingStore::new(&db, RunMode::Execute);

    assert_eq!(map.get("17", "business").unwrap(), None);
    map.set("17", "business", 42).unwrap();
    assert_eq!(map.get("17", "business").unwrap(), Some(42));
    // Stable across repeated lookups
    assert_eq!(map.get("17", "business").unwrap(), Some(42));
}

#[test]
fn test_kinds_are_scoped() {
    let db = MigrateDb::open_memory().unwrap();
    let map = MappingStore::new(&db, RunMode::Execute);

    map.set("17", "business", 42).unwrap();
    map.set("17", "user", 9).unwrap();

    assert_eq!(map.get("17", "business").unwrap(), Some(42));
    assert_eq!(map.get("17", "user").unwrap(), Some(9));
    assert_eq!(map.count_for_kind("business").unwrap(), 1);
}

#[test]
fn test_replace_on_conflict() {
    let db = MigrateDb::open_memory().unwrap();
    let map = MappingStore::new(&db, RunMode::Execute);

    map.set("5", "company", 100).unwrap();
    map.set("5", "company", 100).unwrap();
    assert_eq!(map.count_for_kind("company").unwrap(), 1);
    assert_eq!(map.get("5", "company").unwrap(), Some(100));
}

#[test]
fn test_dry_run_set_is_noop() {
    let db = MigrateDb::open_memory().unwrap();
    let map = MappingStore::new(&db, RunMode::DryRun);

    map.set("17", "business", 42).unwrap();
    assert_eq!(map.get("17", "business").unwrap(), None);
    assert_eq!(map.count_for_kind("business").unwrap(), 0);
}
