use super::*;
use tempfile::tempdir;

const BUSINESS_DUMP: &str = r#"
-- MySQL dump 10.13
DROP TABLE IF EXISTS `nmda_business`;
CREATE TABLE `nmda_business` (
  `BusinessId` int(11) NOT NULL AUTO_INCREMENT,
  `BusinessName` varchar(255) NOT NULL,
  `ClassAssociate` tinyint(1) DEFAULT '0',
  PRIMARY KEY (`BusinessId`)
) ENGINE=InnoDB;

LOCK TABLES `nmda_business` WRITE;
INSERT INTO `nmda_business` VALUES (1,'O\'Brien, Inc.',1),(2,'Hatch Farms',0);
INSERT INTO `nmda_business` (`BusinessId`,`BusinessName`,`ClassAssociate`) VALUES (3,'Mesa Winery',NULL);
UNLOCK TABLES;
"#;

#[test]
fn test_rows_from_both_insert_forms() {
    let rows = rows_for_table(BUSINESS_DUMP, "nmda_business").unwrap();
    assert_eq!(rows.len(), 3);

    // Bare-VALUES form recovers columns from CREATE TABLE
    assert_eq!(rows[0].id_col("BusinessId"), Some("1".to_string()));
    assert_eq!(rows[0].str_col("BusinessName"), Some("O'Brien, Inc."));
    assert!(rows[0].flag_on("ClassAssociate"));
    assert!(!rows[1].flag_on("ClassAssociate"));

    // Column-list form
    assert_eq!(rows[2].str_col("BusinessName"), Some("Mesa Winery"));
    assert!(rows[2].get("ClassAssociate").unwrap().is_null());
}

#[test]
fn test_other_tables_ignored() {
    let text = format!("{BUSINESS_DUMP}\nINSERT INTO `nmda_user` VALUES (9,'x');");
    let rows = rows_for_table(&text, "nmda_business").unwrap();
    assert_eq!(rows.len(), 3);
}

#[test]
fn test_insert_select_elsewhere_does_not_abort() {
    let text = format!(
        "INSERT INTO `staging_copy` SELECT * FROM `nmda_user`;\n{BUSINESS_DUMP}"
    );
    let rows = rows_for_table(&text, "nmda_business").unwrap();
    assert_eq!(rows.len(), 3);
}

#[test]
fn test_positional_fallback_columns() {
    let text = "INSERT INTO widgets VALUES (1,'a'),(2,'b');";
    let rows = rows_for_table(text, "widgets").unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].columns(), &["col_0", "col_1"]);
    assert_eq!(rows[1].str_col("col_1"), Some("b"));
}

#[test]
fn test_tuple_width_mismatch_skipped() {
    let text = "INSERT INTO t (a,b) VALUES (1,2),(3),(4,5);";
    let rows = rows_for_table(text, "t").unwrap();
    assert_eq!(rows.len(), 2);
}

#[test]
fn test_column_lookup_case_insensitive() {
    let rows = rows_for_table(BUSINESS_DUMP, "NMDA_BUSINESS").unwrap();
    assert_eq!(rows[0].int_col("businessid"), Some(1));
}

#[test]
fn test_flags_view() {
    let rows = rows_for_table(BUSINESS_DUMP, "nmda_business").unwrap();
    let flags: Vec<(&str, bool)> = rows[0].flags().collect();
    assert!(flags.contains(&("ClassAssociate", true)));
    // Non-flag columns simply read as off
    assert!(flags.contains(&("BusinessName", false)));
}

#[test]
fn test_source_missing_file_is_empty() {
    let dir = tempdir().unwrap();
    let source = DumpSource::new(dir.path());
    let rows = source.load("nmda_business.sql", "nmda_business").unwrap();
    assert!(rows.is_empty());
}

#[test]
fn test_source_empty_file_is_empty() {
    let dir = tempdir().unwrap();
    std::fs::write(dir.path().join("nmda_business.sql"), "  \n").unwrap();
    let source = DumpSource::new(dir.path());
    let rows = source.load("nmda_business.sql", "nmda_business").unwrap();
    assert!(rows.is_empty());
}

#[test]
fn test_source_zero_rows_is_fatal() {
    let dir = tempdir().unwrap();
    // Non-empty file whose inserts are for a different table
    std::fs::write(
        dir.path().join("nmda_business.sql"),
        "INSERT INTO wrong_table VALUES (1);",
    )
    .unwrap();
    let source = DumpSource::new(dir.path());
    let err = source
        .load("nmda_business.sql", "nmda_business")
        .unwrap_err();
    assert!(matches!(err, DumpError::NoRows { .. }));
}

#[test]
fn test_source_parses_rows() {
    let dir = tempdir().unwrap();
    std::fs::write(dir.path().join("nmda_business.sql"), BUSINESS_DUMP).unwrap();
    let source = DumpSource::new(dir.path());
    let rows = source.load("nmda_business.sql", "nmda_business").unwrap();
    assert_eq!(rows.len(), 3);
}
