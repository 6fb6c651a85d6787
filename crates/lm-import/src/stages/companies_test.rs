use crate::context::RunContext;
use crate::stages::companies;
use crate::test_fixtures::Fixture;
use lm_core::RunMode;

#[test]
fn test_creates_companies_with_approval_status() {
    let fixture = Fixture::seeded();
    let source = fixture.source();
    let ctx = RunContext::new(&fixture.db, &source, &fixture.config).with_mode(RunMode::Execute);

    let report = companies::run(&ctx).unwrap();
    assert_eq!(report.created, 2);

    let approved = ctx.mappings().get("10", "company").unwrap().unwrap();
    let status: String = fixture
        .db
        .conn()
        .query_row(
            "SELECT status FROM lm_mig.entities WHERE entity_id = ?",
            duckdb::params![approved],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(status, "approved");

    let pending = ctx.mappings().get("11", "company").unwrap().unwrap();
    let status: String = fixture
        .db
        .conn()
        .query_row(
            "SELECT status FROM lm_mig.entities WHERE entity_id = ?",
            duckdb::params![pending],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(status, "pending");
}

#[test]
fn test_contact_fields_land_in_field_set() {
    let fixture = Fixture::seeded();
    let source = fixture.source();
    let ctx = RunContext::new(&fixture.db, &source, &fixture.config).with_mode(RunMode::Execute);

    companies::run(&ctx).unwrap();
    let company_id = ctx.mappings().get("10", "company").unwrap().unwrap();
    let fields = fixture.db.entity_fields(company_id).unwrap().unwrap();
    assert_eq!(fields["email"], "elena@hatchvalley.example");
    assert_eq!(fields["legacy_id"], "10");
}

#[test]
fn test_rerun_does_not_clobber() {
    let fixture = Fixture::seeded();
    let source = fixture.source();
    let ctx = RunContext::new(&fixture.db, &source, &fixture.config).with_mode(RunMode::Execute);

    companies::run(&ctx).unwrap();
    let second = companies::run(&ctx).unwrap();
    assert_eq!(second.created, 0);
    assert_eq!(second.updated, 2);
    assert_eq!(fixture.db.count_entities("company").unwrap(), 2);
}
