use crate::core::errors::LoanError;
use crate::core::models::{Account, AccountId, LoanOffer, Profile};

/// Persistence seam for accounts, profiles and the loan catalog.
///
/// Each call is one complete read or write; implementations own their
/// connection and release it on every exit path.
pub trait Storage: Send {
    /// Fails with [`LoanError::DuplicateUsername`] when the username is taken.
    fn create_account(&mut self, username: &str, password_hash: &str) -> Result<Account, LoanError>;
    fn get_account(&self, account_id: AccountId) -> Result<Option<Account>, LoanError>;
    fn get_account_by_username(&self, username: &str) -> Result<Option<Account>, LoanError>;

    /// Replaces any previous profile for the account, documents included.
    fn upsert_profile(&mut self, profile: &Profile) -> Result<(), LoanError>;
    fn get_profile(&self, account_id: AccountId) -> Result<Option<Profile>, LoanError>;

    fn count_loan_offers(&self) -> Result<usize, LoanError>;
    /// Appends offers in the given order, all or nothing.
    fn insert_loan_offers(&mut self, offers: &[LoanOffer]) -> Result<usize, LoanError>;
    /// Offers whose ceiling is at least `amount`, in catalog order.
    fn find_loan_offers(&self, amount: i64) -> Result<Vec<LoanOffer>, LoanError>;
}

pub mod in_memory;
pub mod schema;
pub mod sqlite;
