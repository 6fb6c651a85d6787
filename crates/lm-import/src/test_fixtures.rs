//! Shared fixtures for stage importer tests: an in-memory destination
//! store plus a temp directory of small but realistic legacy dumps.

use lm_core::Config;
use lm_dump::{DumpSource, Row};
use lm_store::MigrateDb;
use std::fs;
use tempfile::TempDir;

pub(crate) const GROUP_TYPES_SQL: &str = r"
CREATE TABLE `nmda_grouptype` (
  `GroupTypeId` int(11) NOT NULL,
  `Name` varchar(255) DEFAULT NULL,
  PRIMARY KEY (`GroupTypeId`)
);
INSERT INTO `nmda_grouptype` (`GroupTypeId`, `Name`) VALUES (1,'Grower'),(2,'Processor');
";

pub(crate) const COMPANIES_SQL: &str = r"
INSERT INTO `nmda_company` (`CompanyId`, `Name`, `ContactName`, `Email`, `Phone`, `Website`, `Approved`, `Denied`) VALUES
(10,'Hatch Valley Produce','Elena Ortiz','elena@hatchvalley.example','575-555-0101','https://hatchvalley.example',1,0),
(11,'Rio Grande Farms',NULL,NULL,NULL,NULL,0,0);
";

pub(crate) const COMPANY_TERMS_SQL: &str = r"
INSERT INTO `nmda_companygrouptype` (`CompanyGroupTypeId`, `CompanyId`, `GroupTypeId`) VALUES
(1,10,1),(2,10,2),(3,11,1);
";

pub(crate) const USERS_SQL: &str = r"
INSERT INTO `nmda_user` (`UserId`, `Email`, `FirstName`, `LastName`, `CompanyId`) VALUES
(100,'elena@hatchvalley.example','Elena','Ortiz',501),
(101,'sam@riogrande.example','Sam','Baca',NULL);
";

// Business 502 carries an escaped quote and a comma inside the quoted
// name, and is the associate/online classification case.
pub(crate) const BUSINESSES_SQL: &str = r"
INSERT INTO `nmda_business` (`BusinessId`,`Name`,`DBA`,`Email`,`Phone`,`Website`,`ProductTypes`,`Approved`,`Denied`,`ClassGrown`,`ClassAssociate`,`GrownChile`,`GrownOnion`,`GrownPecan`,`TasteSalsa`,`AssociateOnline`,`AssociateInPerson`) VALUES
(501,'Hatch Valley Produce','HVP','orders@hatchvalley.example','575-555-0101',NULL,'Chile, Onions',1,0,1,0,1,1,0,0,0,0),
(502,'O\'Brien, Inc.',NULL,NULL,NULL,NULL,NULL,0,0,0,1,0,0,0,0,1,0);
";

pub(crate) const ADDRESSES_SQL: &str = r"
INSERT INTO `nmda_address` (`AddressId`,`BusinessId`,`Type`,`Name`,`Address1`,`Address2`,`City`,`State`,`Zip`,`Phone`,`Email`,`Category`,`Other`,`Reservation`) VALUES
(9001,501,'Mailing','Hatch Valley Produce','PO Box 12',NULL,'Hatch','NM','87937',NULL,NULL,NULL,NULL,NULL),
(9002,501,'Physical',NULL,'100 Chile Rd',NULL,'Hatch','NM','87937',NULL,NULL,NULL,NULL,NULL),
(9003,502,NULL,NULL,'55 Main St',NULL,'Santa Fe','NM','87501',NULL,NULL,NULL,NULL,NULL);
";

pub(crate) const CSR_ADVERTISING_SQL: &str = r"
INSERT INTO `nmda_csr_advertising` (`AdvertisingId`,`BusinessId`,`Approved`,`Denied`,`SubmittedDate`,`EstimatedCost`,`ApprovedAmount`) VALUES
(7001,501,1,0,'2019-04-02','$1,234.56 (estimated)','1000'),
(7002,502,0,0,NULL,'TBD',NULL);
";

pub(crate) const CSR_LABELS_SQL: &str = r"
INSERT INTO `nmda_csr_labels` (`LabelsId`,`BusinessId`,`Approved`,`Denied`,`SubmittedDate`,`EstimatedCost`,`ApprovedAmount`) VALUES
(7101,501,0,1,'2020-01-15','250',NULL);
";

pub(crate) const CSR_LEAD_SQL: &str = r"
INSERT INTO `nmda_csr_lead` (`LeadId`,`BusinessId`,`Approved`,`Denied`,`SubmittedDate`,`EstimatedCost`,`ApprovedAmount`) VALUES
(7201,502,0,0,'2021-07-01','75.50',NULL);
";

/// In-memory store plus a temp dump directory
pub(crate) struct Fixture {
    pub db: MigrateDb,
    pub config: Config,
    dir: TempDir,
}

impl Fixture {
    pub fn new() -> Self {
        Self {
            db: MigrateDb::open_memory().unwrap(),
            config: Config::default(),
            dir: tempfile::tempdir().unwrap(),
        }
    }

    /// Fixture with the full standard dump set written out
    pub fn seeded() -> Self {
        let fixture = Self::new();
        fixture.write("nmda_grouptype.sql", GROUP_TYPES_SQL);
        fixture.write("nmda_company.sql", COMPANIES_SQL);
        fixture.write("nmda_companygrouptype.sql", COMPANY_TERMS_SQL);
        fixture.write("nmda_user.sql", USERS_SQL);
        fixture.write("nmda_business.sql", BUSINESSES_SQL);
        fixture.write("nmda_address.sql", ADDRESSES_SQL);
        fixture.write("nmda_csr_advertising.sql", CSR_ADVERTISING_SQL);
        fixture.write("nmda_csr_labels.sql", CSR_LABELS_SQL);
        fixture.write("nmda_csr_lead.sql", CSR_LEAD_SQL);
        fixture
    }

    pub fn source(&self) -> DumpSource {
        DumpSource::new(self.dir.path())
    }

    pub fn write(&self, file_name: &str, content: &str) {
        fs::write(self.dir.path().join(file_name), content).unwrap();
    }
}

/// Parse rows straight from dump text, for unit tests on row helpers
pub(crate) fn parse_rows(table: &str, sql: &str) -> Vec<Row> {
    lm_dump::rows_for_table(sql, table).unwrap()
}
