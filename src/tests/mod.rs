mod sqlite_tests;

use crate::core::models::{AccountId, CasteCategory, DocumentKind, DocumentRef, Profile, ProfileForm};
use crate::core::services::LoanService;
use crate::infrastructure::storage::in_memory::InMemoryStorage;
use chrono::{NaiveDate, Utc};

// Lowest cost bcrypt accepts; keeps the suite fast.
pub const TEST_BCRYPT_COST: u32 = 4;
pub const TEST_JWT_SECRET: &str = "test-secret";

pub fn create_test_service() -> LoanService<InMemoryStorage> {
    let _ = env_logger::try_init();
    LoanService::new(InMemoryStorage::new(), TEST_JWT_SECRET, TEST_BCRYPT_COST)
}

pub fn sample_form() -> ProfileForm {
    ProfileForm {
        name: "Asha Verma".to_string(),
        age: 19,
        date_of_birth: NaiveDate::from_ymd_opt(2005, 3, 14).unwrap(),
        contact: "+91 98765 43210".to_string(),
        address: "12 MG Road, Pune".to_string(),
        caste_category: "General".to_string(),
        gpa: 7.5,
        transaction_history: String::new(),
        certifications: String::new(),
        exam_scores: "JEE: 90".to_string(),
        documents: Vec::new(),
    }
}

pub fn document(kind: DocumentKind, file_name: &str) -> DocumentRef {
    DocumentRef {
        kind,
        file_name: file_name.to_string(),
    }
}

/// A stored profile built directly, bypassing validation.
pub fn profile_with(gpa: f64, transaction_history: &str, caste_category: CasteCategory, certifications: &str) -> Profile {
    Profile {
        account_id: AccountId(1),
        name: "Asha Verma".to_string(),
        age: 19,
        date_of_birth: NaiveDate::from_ymd_opt(2005, 3, 14).unwrap(),
        contact: String::new(),
        address: String::new(),
        caste_category,
        gpa,
        transaction_history: transaction_history.to_string(),
        certifications: certifications.to_string(),
        exam_scores: String::new(),
        documents: Vec::new(),
        updated_at: Utc::now(),
    }
}
