use super::*;
use serde_json::json;

fn app() -> CsrApplication {
    CsrApplication {
        legacy_id: "31".to_string(),
        app_type: "advertising".to_string(),
        business_id: 4,
        user_id: 7,
        status: "approved".to_string(),
        fiscal_year: "2019".to_string(),
        amount_requested: Some(1234.56),
        amount_approved: Some(1000.0),
        data: json!({"Description": "Radio spots"}),
        submitted_at: Some("2019-04-02 10:00:00".to_string()),
    }
}

#[test]
fn test_insert_and_row_exists() {
    let db = MigrateDb::open_memory().unwrap();
    let id = db.insert_application(&app()).unwrap();

    assert!(db.application_row_exists(id).unwrap());
    assert!(!db.application_row_exists(id + 100).unwrap());
    assert_eq!(db.count_applications("advertising").unwrap(), 1);
    assert_eq!(db.count_applications("labels").unwrap(), 0);
}

#[test]
fn test_null_amounts_stay_null() {
    let db = MigrateDb::open_memory().unwrap();
    let mut a = app();
    a.amount_requested = None;
    a.amount_approved = None;
    let id = db.insert_application(&a).unwrap();

    let requested: Option<f64> = db
        .conn()
        .query_row(
            "SELECT amount_requested FROM lm_mig.csr_applications WHERE application_id = ?",
            duckdb::params![id],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(requested, None);
}
