use crate::context::RunContext;
use crate::stages::businesses::{
    BusinessImporter, ASSOCIATE_TYPE_TAXONOMY, CLASSIFICATION_TAXONOMY, PRODUCT_TYPE_TAXONOMY,
};
use crate::stages::company_terms::GROUP_TYPE_TAXONOMY;
use crate::stages::{businesses, companies, company_terms, group_types, users};
use crate::test_fixtures::Fixture;
use lm_core::RunMode;
use lm_store::NewEntity;

fn run_prereqs(ctx: &RunContext<'_>) {
    group_types::run(ctx).unwrap();
    companies::run(ctx).unwrap();
    company_terms::run(ctx).unwrap();
    users::run(ctx).unwrap();
}

#[test]
fn test_creates_businesses_with_quote_aware_names() {
    let fixture = Fixture::seeded();
    let source = fixture.source();
    let ctx = RunContext::new(&fixture.db, &source, &fixture.config).with_mode(RunMode::Execute);
    run_prereqs(&ctx);

    let report = businesses::run(&ctx).unwrap();
    assert_eq!(report.created, 2);

    let business = ctx.mappings().get("502", "business").unwrap().unwrap();
    assert_eq!(
        fixture.db.entity_title(business).unwrap().as_deref(),
        Some("O'Brien, Inc.")
    );
}

#[test]
fn test_classification_and_product_terms() {
    let fixture = Fixture::seeded();
    let source = fixture.source();
    let ctx = RunContext::new(&fixture.db, &source, &fixture.config).with_mode(RunMode::Execute);
    run_prereqs(&ctx);
    businesses::run(&ctx).unwrap();

    let grown = ctx.mappings().get("501", "business").unwrap().unwrap();
    assert_eq!(
        fixture.db.entity_terms(grown, CLASSIFICATION_TAXONOMY).unwrap(),
        vec!["grown".to_string()]
    );
    assert_eq!(
        fixture.db.entity_terms(grown, PRODUCT_TYPE_TAXONOMY).unwrap(),
        vec!["Chile".to_string(), "Onions".to_string()]
    );

    // ClassAssociate=1 + AssociateOnline=1 → associate/online, no catch-all
    let associate = ctx.mappings().get("502", "business").unwrap().unwrap();
    assert_eq!(
        fixture
            .db
            .entity_terms(associate, CLASSIFICATION_TAXONOMY)
            .unwrap(),
        vec!["associate".to_string()]
    );
    assert_eq!(
        fixture
            .db
            .entity_terms(associate, ASSOCIATE_TYPE_TAXONOMY)
            .unwrap(),
        vec!["online".to_string()]
    );
}

#[test]
fn test_owner_resolved_via_bridge_link() {
    let fixture = Fixture::seeded();
    let source = fixture.source();
    let ctx = RunContext::new(&fixture.db, &source, &fixture.config).with_mode(RunMode::Execute);
    run_prereqs(&ctx);
    businesses::run(&ctx).unwrap();

    let user_id = ctx.mappings().get("100", "user").unwrap().unwrap();
    let business_id = ctx.mappings().get("501", "business").unwrap().unwrap();

    let fields = fixture.db.entity_fields(business_id).unwrap().unwrap();
    assert_eq!(fields["owner_user_id"], user_id);

    // The businesses stage backfills the link's business side
    assert_eq!(
        fixture.db.link_owner_for_business(business_id).unwrap(),
        Some(user_id)
    );
}

#[test]
fn test_owner_fallback_via_legacy_user_scan() {
    let fixture = Fixture::seeded();
    let source = fixture.source();
    let ctx = RunContext::new(&fixture.db, &source, &fixture.config).with_mode(RunMode::Execute);

    // No users stage run, so no bridge links exist. Map the user by hand
    // so only the legacy-row scan can find the owner.
    let user_id = fixture
        .db
        .create_entity(&NewEntity {
            kind: "user",
            title: "elena@hatchvalley.example",
            status: "active",
            fields: serde_json::json!({}),
        })
        .unwrap();
    ctx.mappings().set("100", "user", user_id).unwrap();

    businesses::run(&ctx).unwrap();

    let business_id = ctx.mappings().get("501", "business").unwrap().unwrap();
    let fields = fixture.db.entity_fields(business_id).unwrap().unwrap();
    assert_eq!(fields["owner_user_id"], user_id);
}

#[test]
fn test_exact_company_match_mirrors_group_terms() {
    let fixture = Fixture::seeded();
    let source = fixture.source();
    let ctx = RunContext::new(&fixture.db, &source, &fixture.config).with_mode(RunMode::Execute);
    run_prereqs(&ctx);
    businesses::run(&ctx).unwrap();

    // "Hatch Valley Produce" matches company 10 by exact title
    let company_id = ctx.mappings().get("10", "company").unwrap().unwrap();
    let business_id = ctx.mappings().get("501", "business").unwrap().unwrap();

    let fields = fixture.db.entity_fields(business_id).unwrap().unwrap();
    assert_eq!(fields["company_id"], company_id);
    assert_eq!(
        fixture
            .db
            .entity_terms(business_id, GROUP_TYPE_TAXONOMY)
            .unwrap(),
        vec!["Grower".to_string(), "Processor".to_string()]
    );
}

#[test]
fn test_duplicate_id_within_dump_skipped() {
    let fixture = Fixture::new();
    fixture.write(
        "nmda_business.sql",
        "INSERT INTO nmda_business (BusinessId, Name) VALUES (1,'First'),(1,'Repeat');",
    );
    let source = fixture.source();
    let ctx = RunContext::new(&fixture.db, &source, &fixture.config).with_mode(RunMode::Execute);

    let report = businesses::run(&ctx).unwrap();
    assert_eq!(report.created, 1);
    assert_eq!(report.skipped, 1);
    assert_eq!(report.warnings, 1);
}

#[test]
fn test_second_run_refreshes_derived_data_only() {
    let fixture = Fixture::seeded();
    let source = fixture.source();
    let ctx = RunContext::new(&fixture.db, &source, &fixture.config).with_mode(RunMode::Execute);
    run_prereqs(&ctx);
    businesses::run(&ctx).unwrap();

    // Re-export adds a Taste flag on business 501
    fixture.write(
        "nmda_business.sql",
        "INSERT INTO nmda_business (BusinessId, Name, ProductTypes, ClassGrown, TasteSalsa) VALUES
         (501,'Renamed After Import','Chile',1,1),
         (502,'O''Brien, Inc.',NULL,0,0);",
    );
    let second = businesses::run(&ctx).unwrap();
    assert_eq!(second.created, 0);
    assert_eq!(second.updated, 2);

    let business_id = ctx.mappings().get("501", "business").unwrap().unwrap();
    assert_eq!(
        fixture
            .db
            .entity_terms(business_id, CLASSIFICATION_TAXONOMY)
            .unwrap(),
        vec!["grown".to_string(), "taste".to_string()]
    );
    // The title is not derivable data and must survive the re-run
    assert_eq!(
        fixture.db.entity_title(business_id).unwrap().as_deref(),
        Some("Hatch Valley Produce")
    );
}

#[test]
fn test_update_only_never_creates() {
    let fixture = Fixture::seeded();
    let source = fixture.source();
    let ctx = RunContext::new(&fixture.db, &source, &fixture.config).with_mode(RunMode::Execute);

    let report = BusinessImporter::update_only().run(&ctx).unwrap();
    assert_eq!(report.created, 0);
    assert_eq!(report.skipped, 2);
    assert_eq!(fixture.db.count_entities("business").unwrap(), 0);
}

#[test]
fn test_dry_run_leaves_no_side_effects() {
    let fixture = Fixture::seeded();
    let source = fixture.source();
    let ctx = RunContext::new(&fixture.db, &source, &fixture.config);

    let report = businesses::run(&ctx).unwrap();
    assert_eq!(report.created, 2);
    assert_eq!(fixture.db.count_entities("business").unwrap(), 0);
    assert!(ctx.mappings().get("501", "business").unwrap().is_none());
}
