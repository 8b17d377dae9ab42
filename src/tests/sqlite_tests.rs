use crate::core::errors::LoanError;
use crate::core::models::{AccountId, CasteCategory, DocumentKind, LoanOffer};
use crate::core::recommendation::LoanLabel;
use crate::core::services::LoanService;
use crate::infrastructure::storage::Storage;
use crate::infrastructure::storage::sqlite::SqliteStorage;
use crate::tests::{TEST_BCRYPT_COST, TEST_JWT_SECRET, document, profile_with, sample_form};
use tempfile::TempDir;

fn sqlite_service() -> LoanService<SqliteStorage> {
    let _ = env_logger::try_init();
    LoanService::new(SqliteStorage::open_in_memory().unwrap(), TEST_JWT_SECRET, TEST_BCRYPT_COST)
}

fn offer(bank_name: &str, max_loan_amount: i64) -> LoanOffer {
    LoanOffer {
        bank_name: bank_name.to_string(),
        loan_name: format!("{bank_name} Education Loan"),
        interest_rate: 9.5,
        max_loan_amount,
        eligibility_criteria: "Indian nationals".to_string(),
        repayment_period: 10,
        processing_fee: 0.0,
        required_documents: "KYC".to_string(),
    }
}

#[test]
fn test_unique_constraint_rejects_duplicate_username() {
    let mut storage = SqliteStorage::open_in_memory().unwrap();

    let first = storage.create_account("asha", "$2b$04$hash").unwrap();
    let second = storage.create_account("asha", "$2b$04$other");

    assert_eq!(first.id, AccountId(1));
    assert!(matches!(second, Err(LoanError::DuplicateUsername(_))));
}

#[test]
fn test_account_lookup_by_id_and_username() {
    let mut storage = SqliteStorage::open_in_memory().unwrap();
    let created = storage.create_account("asha", "$2b$04$hash").unwrap();

    let by_id = storage.get_account(created.id).unwrap().unwrap();
    let by_name = storage.get_account_by_username("asha").unwrap().unwrap();

    assert_eq!(by_id.username, "asha");
    assert_eq!(by_name.id, created.id);
    assert_eq!(by_name.password_hash, "$2b$04$hash");
    assert!(storage.get_account_by_username("ravi").unwrap().is_none());
}

#[test]
fn test_profile_round_trip_with_documents_in_order() {
    let mut storage = SqliteStorage::open_in_memory().unwrap();
    let account = storage.create_account("asha", "$2b$04$hash").unwrap();

    let mut profile = profile_with(9.1, "No Defaults", CasteCategory::St, "NPTEL Python");
    profile.account_id = account.id;
    profile.documents = vec![
        document(DocumentKind::TwelfthMarksheet, "twelfth.pdf"),
        document(DocumentKind::TenthMarksheet, "tenth.jpg"),
    ];
    storage.upsert_profile(&profile).unwrap();

    let loaded = storage.get_profile(account.id).unwrap().unwrap();
    assert_eq!(loaded, profile);
}

#[test]
fn test_upsert_replaces_profile_and_documents() {
    let mut storage = SqliteStorage::open_in_memory().unwrap();
    let account = storage.create_account("asha", "$2b$04$hash").unwrap();

    let mut first = profile_with(9.2, "", CasteCategory::General, "");
    first.account_id = account.id;
    first.documents = vec![document(DocumentKind::Certification, "aws.png")];
    storage.upsert_profile(&first).unwrap();

    let mut second = profile_with(6.0, "", CasteCategory::Obc, "");
    second.account_id = account.id;
    storage.upsert_profile(&second).unwrap();

    let loaded = storage.get_profile(account.id).unwrap().unwrap();
    assert_eq!(loaded.gpa, 6.0);
    assert_eq!(loaded.caste_category, CasteCategory::Obc);
    assert!(loaded.documents.is_empty());
}

#[test]
fn test_profile_for_missing_account_is_refused() {
    let mut storage = SqliteStorage::open_in_memory().unwrap();

    let mut profile = profile_with(7.0, "", CasteCategory::General, "");
    profile.account_id = AccountId(99);

    assert!(matches!(
        storage.upsert_profile(&profile),
        Err(LoanError::AccountNotFound(AccountId(99)))
    ));
}

#[test]
fn test_offers_filtered_in_insertion_order() {
    let mut storage = SqliteStorage::open_in_memory().unwrap();
    storage
        .insert_loan_offers(&[offer("Canara", 300_000), offer("Baroda", 600_000), offer("SBI", 1_000_000)])
        .unwrap();

    let offers = storage.find_loan_offers(500_000).unwrap();

    assert_eq!(storage.count_loan_offers().unwrap(), 3);
    assert_eq!(offers, vec![offer("Baroda", 600_000), offer("SBI", 1_000_000)]);
}

#[test]
fn test_data_survives_reopening_the_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("loan_checker.db");

    let account_id = {
        let mut service = LoanService::new(SqliteStorage::open(&path).unwrap(), TEST_JWT_SECRET, TEST_BCRYPT_COST);
        let account_id = service.register("asha", "s3cret").unwrap();
        let mut form = sample_form();
        form.caste_category = "SC".to_string();
        service.save_profile(account_id, form).unwrap();
        account_id
    };

    let mut service = LoanService::new(SqliteStorage::open(&path).unwrap(), TEST_JWT_SECRET, TEST_BCRYPT_COST);
    assert_eq!(service.authenticate("asha", "s3cret").unwrap(), account_id);
    assert!(matches!(
        service.register("asha", "again"),
        Err(LoanError::DuplicateUsername(_))
    ));
    let recommendation = service.recommend_for_account(account_id).unwrap();
    assert_eq!(recommendation.labels, vec![LoanLabel::GovernmentSubsidized]);
}

#[test]
fn test_full_flow_against_sqlite() {
    let mut service = sqlite_service();
    let account_id = service.register("ravi", "pw").unwrap();

    let mut form = sample_form();
    form.gpa = 9.2;
    service.save_profile(account_id, form).unwrap();
    let mut form = sample_form();
    form.gpa = 6.0;
    form.documents = vec![document(DocumentKind::Certification, "coursera.pdf")];
    service.save_profile(account_id, form).unwrap();

    let profile = service.get_profile(account_id).unwrap().unwrap();
    assert_eq!(profile.gpa, 6.0);
    assert_eq!(
        service.recommend_for_account(account_id).unwrap().labels,
        vec![LoanLabel::SkillBasedEducation]
    );
}
