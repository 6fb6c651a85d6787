use crate::context::RunContext;
use crate::stages::group_types;
use crate::test_fixtures::Fixture;
use lm_core::RunMode;

#[test]
fn test_creates_terms_and_mappings() {
    let fixture = Fixture::seeded();
    let source = fixture.source();
    let ctx = RunContext::new(&fixture.db, &source, &fixture.config).with_mode(RunMode::Execute);

    let report = group_types::run(&ctx).unwrap();
    assert_eq!(report.created, 2);
    assert_eq!(report.errors, 0);

    let term_id = ctx.mappings().get("1", "group_type_term").unwrap().unwrap();
    assert!(fixture.db.entity_exists(term_id).unwrap());
    assert_eq!(
        fixture.db.entity_title(term_id).unwrap().as_deref(),
        Some("Grower")
    );
}

#[test]
fn test_second_run_creates_nothing() {
    let fixture = Fixture::seeded();
    let source = fixture.source();
    let ctx = RunContext::new(&fixture.db, &source, &fixture.config).with_mode(RunMode::Execute);

    group_types::run(&ctx).unwrap();
    let second = group_types::run(&ctx).unwrap();
    assert_eq!(second.created, 0);
    assert_eq!(second.updated, 2);
    assert_eq!(fixture.db.count_entities("group_type_term").unwrap(), 2);
}

#[test]
fn test_dry_run_counts_without_writes() {
    let fixture = Fixture::seeded();
    let source = fixture.source();
    let ctx = RunContext::new(&fixture.db, &source, &fixture.config);

    let report = group_types::run(&ctx).unwrap();
    assert_eq!(report.created, 2);
    assert_eq!(fixture.db.count_entities("group_type_term").unwrap(), 0);
    assert!(ctx.mappings().get("1", "group_type_term").unwrap().is_none());
}

#[test]
fn test_missing_file_is_nothing_to_import() {
    let fixture = Fixture::new();
    let source = fixture.source();
    let ctx = RunContext::new(&fixture.db, &source, &fixture.config).with_mode(RunMode::Execute);

    let report = group_types::run(&ctx).unwrap();
    assert_eq!(report.total(), 0);
}

#[test]
fn test_nameless_row_is_skipped() {
    let fixture = Fixture::new();
    fixture.write(
        "nmda_grouptype.sql",
        "INSERT INTO nmda_grouptype (GroupTypeId, Name) VALUES (1,'Grower'),(2,NULL);",
    );
    let source = fixture.source();
    let ctx = RunContext::new(&fixture.db, &source, &fixture.config).with_mode(RunMode::Execute);

    let report = group_types::run(&ctx).unwrap();
    assert_eq!(report.created, 1);
    assert_eq!(report.skipped, 1);
}
